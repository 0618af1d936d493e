//! Schema-driven SCIM 2.0 core for Rust.
//!
//! Provides a typed attribute model bound to SCIM schemas, a JSON codec
//! that reads and writes it, and the server-side validation engine that
//! decides what a client may change and what it gets back.
//!
//! # Core Components
//!
//! - [`SchemaRegistry`] - Composed core and extension schemas per resource type
//! - [`Resource`] - Typed attribute tree of one SCIM resource
//! - [`Decoder`] / [`Encoder`] - JSON to resource and back
//! - [`ServerSideValidator`] - Create, update and retrieve rules
//! - [`ResourceEndpoint`] - Request pipeline over a pluggable [`ResourceHandler`]
//!
//! # Quick Start
//!
//! ```rust
//! use scim_core::{Decoder, Encoder, SchemaRegistry, ServerSideValidator};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = SchemaRegistry::new()?;
//! let mut user = Decoder::decode(
//!     r#"{"schemas": ["urn:ietf:params:scim:schemas:core:2.0:User"], "userName": "bjensen"}"#,
//!     registry.user_schema()?,
//! )?;
//!
//! ServerSideValidator::default().validate_create(&mut user)?;
//! assert!(user.id().is_some());
//!
//! let json = Encoder::encode(&user)?;
//! assert!(json.contains("bjensen"));
//! # Ok(())
//! # }
//! ```

pub mod attribute;
pub mod codec;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod protocol;
pub mod resource;
pub mod schema;
pub mod validation;

// Re-export commonly used types for convenience
pub use attribute::{
    Attribute, AttributeFactory, AttributeValue, ComplexAttribute, MultiValuedAttribute,
    SimpleAttribute,
};
pub use codec::{Decoder, Encoder};
pub use config::ScimConfig;
pub use endpoint::{ResourceEndpoint, ResourceHandler, ScimResponse};
pub use error::{ErrorKind, ScimError, ScimResult, ValidationError, ValidationResult};
pub use resource::{Resource, ResourceVersion};
pub use schema::{AttributeSchema, ResourceTypeSchema, SchemaRegistry};
pub use validation::{AttributeProjection, ServerSideValidator};

// Protocol messages
pub use protocol::{
    BulkProcessor, BulkRequest, BulkResponse, ErrorResponse, ListResponse, PatchRequest,
    SearchRequest,
};
