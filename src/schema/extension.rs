//! Extension schema construction from attribute configuration records.
//!
//! Extension schemas (enterprise, system, custom, agent) are described as a
//! flat list of [`ExtensionAttributeConfig`] records. Each record names its
//! sub-attributes; the builder resolves those names into URIs, builds every
//! sub-attribute before its parent and memoizes finished attributes by URI,
//! so a record referenced twice is only built once.

use super::embedded::ENTERPRISE_USER_SCHEMA_URI;
use super::types::{
    AttributeSchema, AttributeType, Mutability, ReferenceType, Returned, Uniqueness,
};
use crate::error::{ScimError, ScimResult};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Kind of extension schema layered onto a core resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtensionKind {
    /// Enterprise User extension (RFC 7643 section 4.3)
    Enterprise,
    /// Server managed system attributes
    System,
    /// Tenant defined custom attributes
    Custom,
    /// Attributes of agent identities
    Agent,
}

impl ExtensionKind {
    /// Schema URI used when a configuration does not name its own.
    pub fn default_uri(self) -> &'static str {
        match self {
            Self::Enterprise => ENTERPRISE_USER_SCHEMA_URI,
            Self::System => "urn:ietf:params:scim:schemas:extension:system:2.0:User",
            Self::Custom => "urn:ietf:params:scim:schemas:extension:custom:2.0:User",
            Self::Agent => "urn:ietf:params:scim:schemas:extension:agent:2.0:User",
        }
    }
}

/// One configured extension attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionAttributeConfig {
    #[serde(rename = "attributeURI")]
    pub attribute_uri: String,
    pub attribute_name: String,
    pub data_type: AttributeType,
    #[serde(default)]
    pub multi_valued: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub case_exact: bool,
    #[serde(default)]
    pub mutability: Mutability,
    #[serde(default)]
    pub returned: Returned,
    #[serde(default)]
    pub uniqueness: Uniqueness,
    /// Names of the sub-attributes, resolved relative to this attribute's URI
    #[serde(default)]
    pub sub_attributes: Vec<String>,
    #[serde(default)]
    pub canonical_values: Vec<String>,
    #[serde(default)]
    pub reference_types: Vec<ReferenceType>,
}

/// Builds the root [`AttributeSchema`] of one extension schema.
pub struct ExtensionSchemaBuilder<'a> {
    extension_uri: String,
    configs: HashMap<&'a str, &'a ExtensionAttributeConfig>,
    built: HashMap<String, AttributeSchema>,
    in_progress: HashSet<String>,
}

impl<'a> ExtensionSchemaBuilder<'a> {
    /// Index the configuration records of the extension named `extension_uri`.
    pub fn new(
        extension_uri: impl Into<String>,
        configs: &'a [ExtensionAttributeConfig],
    ) -> ScimResult<Self> {
        let mut index = HashMap::new();
        for config in configs {
            if index.insert(config.attribute_uri.as_str(), config).is_some() {
                return Err(ScimError::internal(format!(
                    "extension attribute '{}' is configured twice",
                    config.attribute_uri
                )));
            }
        }

        Ok(Self {
            extension_uri: extension_uri.into(),
            configs: index,
            built: HashMap::new(),
            in_progress: HashSet::new(),
        })
    }

    /// Parse configuration records from JSON text.
    pub fn parse_configs(json: &str) -> ScimResult<Vec<ExtensionAttributeConfig>> {
        serde_json::from_str(json).map_err(|e| {
            ScimError::internal(format!("invalid extension attribute configuration: {}", e))
        })
    }

    /// Build the extension root attribute and everything below it.
    pub fn build(mut self) -> ScimResult<AttributeSchema> {
        let root_uri = self.extension_uri.clone();
        let root = self.build_attribute(&root_uri, 0)?;
        if root.data_type() != AttributeType::Complex {
            return Err(ScimError::internal(format!(
                "extension root '{}' must be complex",
                root_uri
            )));
        }

        for uri in self.configs.keys() {
            if !self.built.contains_key(*uri) {
                warn!("Extension attribute '{}' is not reachable from '{}'", uri, root_uri);
            }
        }

        debug!(
            "Built extension schema '{}' with {} attributes",
            root_uri,
            self.built.len()
        );
        Ok(root)
    }

    fn build_attribute(&mut self, uri: &str, depth: usize) -> ScimResult<AttributeSchema> {
        if let Some(schema) = self.built.get(uri) {
            trace!("Extension attribute '{}' already built", uri);
            return Ok(schema.clone());
        }
        if !self.in_progress.insert(uri.to_string()) {
            return Err(ScimError::internal(format!(
                "extension attribute '{}' references itself",
                uri
            )));
        }

        let config = *self.configs.get(uri).ok_or_else(|| {
            ScimError::internal(format!("extension attribute '{}' is not configured", uri))
        })?;

        if config.data_type.is_primitive() && !config.sub_attributes.is_empty() {
            return Err(ScimError::internal(format!(
                "{} attribute '{}' cannot declare sub-attributes",
                config.data_type.as_str(),
                uri
            )));
        }
        if config.data_type == AttributeType::Complex {
            if config.sub_attributes.is_empty() {
                return Err(ScimError::internal(format!(
                    "complex attribute '{}' declares no sub-attributes",
                    uri
                )));
            }
            // root, then one nested complex level
            if depth > 1 {
                return Err(ScimError::internal(format!(
                    "complex attribute '{}' is nested too deeply",
                    uri
                )));
            }
        }

        let mut builder = AttributeSchema::builder(
            config.attribute_uri.clone(),
            config.attribute_name.clone(),
            config.data_type,
        )
        .schema_uri(self.extension_uri.clone())
        .multi_valued(config.multi_valued)
        .description(config.description.clone())
        .required(config.required)
        .case_exact(config.case_exact)
        .mutability(config.mutability)
        .returned(config.returned)
        .uniqueness(config.uniqueness)
        .canonical_values(config.canonical_values.clone())
        .reference_types(config.reference_types.clone())
        .extension(true);

        let mut seen = HashSet::new();
        for sub_name in &config.sub_attributes {
            let sub_uri = self.sub_attribute_uri(uri, sub_name);
            if !seen.insert(sub_uri.clone()) {
                continue;
            }
            if !self.configs.contains_key(sub_uri.as_str()) {
                return Err(ScimError::internal(format!(
                    "sub-attribute '{}' of '{}' is not configured",
                    sub_name, uri
                )));
            }
            builder = builder.sub_attribute(self.build_attribute(&sub_uri, depth + 1)?);
        }

        let schema = builder.build()?;
        self.in_progress.remove(uri);
        self.built.insert(uri.to_string(), schema.clone());
        Ok(schema)
    }

    fn sub_attribute_uri(&self, parent_uri: &str, sub_name: &str) -> String {
        if parent_uri == self.extension_uri {
            format!("{}:{}", parent_uri, sub_name)
        } else {
            format!("{}.{}", parent_uri, sub_name)
        }
    }
}
