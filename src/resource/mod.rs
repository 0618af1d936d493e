//! SCIM resource instances.
//!
//! # Key Components
//!
//! * [`Resource`] - Attribute value tree of one resource plus its schema URIs
//! * [`ResourceVersion`] - Content-hash version stored in `meta.version`

pub mod resource;
pub mod version;

pub use resource::{
    ID, META, META_CREATED, META_LAST_MODIFIED, META_LOCATION, META_RESOURCE_TYPE, META_VERSION,
    Resource,
};
pub use version::ResourceVersion;
