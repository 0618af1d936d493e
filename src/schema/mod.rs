//! Schema definitions for SCIM resources.
//!
//! This module holds the immutable attribute-schema trees that describe
//! every legal attribute of a resource type, and the registry that composes
//! core schemas with their extensions.
//!
//! # Key Types
//!
//! - [`AttributeSchema`] - One legal attribute and its characteristics
//! - [`ResourceTypeSchema`] - Core plus extension attributes of one resource kind
//! - [`SchemaRegistry`] - Built once at startup, shared read-only afterwards
//! - [`ExtensionSchemaBuilder`] - Recursive builder for configured extensions
//!
//! # Examples
//!
//! ```rust
//! use scim_core::schema::SchemaRegistry;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = SchemaRegistry::new()?;
//! let user = registry.get_resource_schema("User")?;
//! assert!(user.resolve_attribute("userName").is_some());
//! # Ok(())
//! # }
//! ```

pub mod embedded;
pub mod extension;
pub mod registry;
pub mod types;


pub use embedded::{
    ENTERPRISE_USER_SCHEMA_URI, GROUP_SCHEMA_URI, ROLE_SCHEMA_URI, USER_SCHEMA_URI,
};
pub use extension::{ExtensionAttributeConfig, ExtensionKind, ExtensionSchemaBuilder};
pub use registry::{
    AGENT_RESOURCE_TYPE, GROUP_RESOURCE_TYPE, ROLE_RESOURCE_TYPE, SchemaRegistry,
    SchemaRegistryBuilder, USER_RESOURCE_TYPE,
};
pub use types::{
    AttributeDefinition, AttributeName, AttributeSchema, AttributeSchemaBuilder, AttributeType,
    Mutability, ReferenceType, ResourceTypeSchema, Returned, SchemaDefinition, Uniqueness,
};
