//! Conversion between SCIM JSON payloads and [`Resource`](crate::resource::Resource) trees.
//!
//! ```rust
//! use scim_core::codec::{Decoder, Encoder};
//! use scim_core::schema::SchemaRegistry;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = SchemaRegistry::new()?;
//! let json = r#"{"userName":"alice","emails":[{"value":"a@b.com","type":"work"}]}"#;
//! let resource = Decoder::decode(json, registry.user_schema()?)?;
//! let encoded = Encoder::encode_value(&resource)?;
//! assert_eq!(encoded["emails"][0]["value"], "a@b.com");
//! # Ok(())
//! # }
//! ```

pub mod decoder;
pub mod encoder;

pub use decoder::Decoder;
pub use encoder::Encoder;
