//! Schema registry for composing and accessing resource type schemas.
//!
//! The registry is built once, during a single-threaded configuration phase,
//! and is read-only afterwards. Resource type schemas are handed out as
//! `Arc`s so any number of concurrent requests can share them without
//! locking. Rebuilding for a reconfigured tenant means building a new
//! registry and swapping it in; readers never see a partially built tree.

use super::embedded::{self, GROUP_SCHEMA_URI, ROLE_SCHEMA_URI, USER_SCHEMA_URI};
use super::extension::{ExtensionAttributeConfig, ExtensionKind, ExtensionSchemaBuilder};
use super::types::{AttributeSchema, ResourceTypeSchema, SchemaDefinition};
use crate::error::{ScimError, ScimResult};
use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;

/// Resource type name of users.
pub const USER_RESOURCE_TYPE: &str = "User";
/// Resource type name of groups.
pub const GROUP_RESOURCE_TYPE: &str = "Group";
/// Resource type name of roles.
pub const ROLE_RESOURCE_TYPE: &str = "Role";
/// Resource type name of agents.
pub const AGENT_RESOURCE_TYPE: &str = "Agent";

/// Registry of composed resource type schemas.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    resource_types: HashMap<String, Arc<ResourceTypeSchema>>,
}

impl SchemaRegistry {
    /// Create a registry with the embedded core schemas and the default
    /// enterprise User extension.
    pub fn new() -> ScimResult<Self> {
        let enterprise = ExtensionSchemaBuilder::parse_configs(embedded::enterprise_user_extension())?;
        Self::builder()
            .with_extension(ExtensionKind::Enterprise, enterprise)
            .build()
    }

    /// Start configuring a registry.
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::default()
    }

    /// Composed schema of a resource type such as `User`.
    pub fn get_resource_schema(&self, kind: &str) -> ScimResult<Arc<ResourceTypeSchema>> {
        self.resource_types
            .get(kind)
            .cloned()
            .ok_or_else(|| ScimError::not_found(format!("resource type '{}'", kind)))
    }

    /// Composed schema of the resource type served at `endpoint` (`/Users`).
    pub fn get_resource_schema_by_endpoint(
        &self,
        endpoint: &str,
    ) -> ScimResult<Arc<ResourceTypeSchema>> {
        let wanted = endpoint.trim_matches('/');
        self.resource_types
            .values()
            .find(|schema| schema.endpoint().trim_matches('/').eq_ignore_ascii_case(wanted))
            .cloned()
            .ok_or_else(|| ScimError::not_found(format!("endpoint '{}'", endpoint)))
    }

    pub fn user_schema(&self) -> ScimResult<Arc<ResourceTypeSchema>> {
        self.get_resource_schema(USER_RESOURCE_TYPE)
    }

    pub fn group_schema(&self) -> ScimResult<Arc<ResourceTypeSchema>> {
        self.get_resource_schema(GROUP_RESOURCE_TYPE)
    }

    pub fn role_schema(&self) -> ScimResult<Arc<ResourceTypeSchema>> {
        self.get_resource_schema(ROLE_RESOURCE_TYPE)
    }

    /// Names of all registered resource types.
    pub fn resource_type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.resource_types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Load a schema document from a JSON string.
    fn load_schema_from_str(content: &str) -> ScimResult<SchemaDefinition> {
        serde_json::from_str(content)
            .map_err(|e| ScimError::internal(format!("invalid embedded schema: {}", e)))
    }

    /// Convert a schema document into a resource type schema.
    fn resource_type_from_definition(
        definition: &SchemaDefinition,
        endpoint: &str,
    ) -> ScimResult<ResourceTypeSchema> {
        let attributes = definition
            .attributes
            .iter()
            .map(|attr| AttributeSchema::from_definition(&definition.id, None, attr, false))
            .collect::<ScimResult<Vec<_>>>()?;

        Ok(ResourceTypeSchema::new(
            definition.name.clone(),
            definition.id.clone(),
            definition.description.clone(),
            endpoint,
            attributes,
        ))
    }
}

/// Configuration phase of a [`SchemaRegistry`].
#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder {
    extensions: Vec<(ExtensionKind, String, Vec<ExtensionAttributeConfig>)>,
}

impl SchemaRegistryBuilder {
    /// Attach an extension under its kind's default schema URI.
    pub fn with_extension(self, kind: ExtensionKind, configs: Vec<ExtensionAttributeConfig>) -> Self {
        self.with_extension_uri(kind, kind.default_uri(), configs)
    }

    /// Attach an extension under an explicit schema URI.
    pub fn with_extension_uri(
        mut self,
        kind: ExtensionKind,
        uri: impl Into<String>,
        configs: Vec<ExtensionAttributeConfig>,
    ) -> Self {
        self.extensions.push((kind, uri.into(), configs));
        self
    }

    /// Build every resource type schema.
    pub fn build(self) -> ScimResult<SchemaRegistry> {
        let user_definition = SchemaRegistry::load_schema_from_str(embedded::core_user_schema())?;
        let group_definition = SchemaRegistry::load_schema_from_str(embedded::core_group_schema())?;
        let role_definition = SchemaRegistry::load_schema_from_str(embedded::role_schema())?;

        let core_user = SchemaRegistry::resource_type_from_definition(&user_definition, "/Users")?;
        let mut user = core_user.clone();
        let mut agent: Option<ResourceTypeSchema> = None;

        for (kind, uri, configs) in &self.extensions {
            let root = ExtensionSchemaBuilder::new(uri.clone(), configs)?.build()?;
            debug!("Attaching {:?} extension '{}'", kind, uri);
            match kind {
                ExtensionKind::Agent => {
                    let target = agent.get_or_insert_with(|| {
                        ResourceTypeSchema::new(
                            AGENT_RESOURCE_TYPE,
                            USER_SCHEMA_URI,
                            "Agent Account",
                            "/Agents",
                            core_user.attributes().to_vec(),
                        )
                    });
                    target.push_extension(root)?;
                }
                ExtensionKind::Enterprise | ExtensionKind::System | ExtensionKind::Custom => {
                    user.push_extension(root)?;
                }
            }
        }

        let group = SchemaRegistry::resource_type_from_definition(&group_definition, "/Groups")?;
        let role = SchemaRegistry::resource_type_from_definition(&role_definition, "/Roles")?;

        let mut resource_types = HashMap::new();
        resource_types.insert(USER_RESOURCE_TYPE.to_string(), Arc::new(user));
        resource_types.insert(GROUP_RESOURCE_TYPE.to_string(), Arc::new(group));
        resource_types.insert(ROLE_RESOURCE_TYPE.to_string(), Arc::new(role));
        if let Some(agent) = agent {
            resource_types.insert(AGENT_RESOURCE_TYPE.to_string(), Arc::new(agent));
        }

        info!(
            "Schema registry built with {} resource types ({}, {}, {} core schemas)",
            resource_types.len(),
            USER_SCHEMA_URI,
            GROUP_SCHEMA_URI,
            ROLE_SCHEMA_URI
        );
        Ok(SchemaRegistry { resource_types })
    }
}
