//! Core schema type definitions for SCIM resources.
//!
//! Two layers live here. [`SchemaDefinition`] and [`AttributeDefinition`] are
//! the serde view of the RFC 7643 schema representation used by the embedded
//! core schemas. [`AttributeSchema`] and [`ResourceTypeSchema`] are the
//! immutable, validated trees every other component reads at runtime.

use crate::error::{ScimError, ScimResult};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// A SCIM schema definition in its RFC 7643 JSON representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDefinition {
    /// Unique schema identifier (URI)
    pub id: String,
    /// Human-readable schema name
    pub name: String,
    /// Schema description
    #[serde(default)]
    pub description: String,
    /// List of attribute definitions
    pub attributes: Vec<AttributeDefinition>,
}

/// Definition of a SCIM attribute as it appears in a schema document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDefinition {
    /// Attribute name
    pub name: String,
    /// Data type of the attribute
    #[serde(rename = "type")]
    pub data_type: AttributeType,
    /// Whether this attribute can have multiple values
    #[serde(default)]
    pub multi_valued: bool,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Whether this attribute is required
    #[serde(default)]
    pub required: bool,
    /// Whether string comparison is case-sensitive
    #[serde(default)]
    pub case_exact: bool,
    /// Mutability characteristics
    #[serde(default)]
    pub mutability: Mutability,
    /// How the attribute is returned in responses
    #[serde(default)]
    pub returned: Returned,
    /// Uniqueness constraints
    #[serde(default)]
    pub uniqueness: Uniqueness,
    /// Allowed values for string attributes
    #[serde(default)]
    pub canonical_values: Vec<String>,
    /// Resource types a reference attribute may point to
    #[serde(default)]
    pub reference_types: Vec<ReferenceType>,
    /// Sub-attributes for complex types
    #[serde(default)]
    pub sub_attributes: Vec<AttributeDefinition>,
}

/// SCIM attribute data types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum AttributeType {
    #[default]
    #[serde(alias = "STRING")]
    String,
    #[serde(alias = "BOOLEAN")]
    Boolean,
    #[serde(alias = "DECIMAL")]
    Decimal,
    #[serde(alias = "INTEGER")]
    Integer,
    #[serde(alias = "DATE_TIME")]
    DateTime,
    #[serde(alias = "BINARY")]
    Binary,
    #[serde(alias = "REFERENCE")]
    Reference,
    #[serde(alias = "COMPLEX")]
    Complex,
}

impl AttributeType {
    /// Whether values of this type are scalars.
    pub fn is_primitive(self) -> bool {
        !matches!(self, Self::Complex)
    }

    /// Wire name of the type, used in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Decimal => "decimal",
            Self::Integer => "integer",
            Self::DateTime => "dateTime",
            Self::Binary => "binary",
            Self::Reference => "reference",
            Self::Complex => "complex",
        }
    }
}

/// Attribute mutability characteristics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum Mutability {
    /// Read-write attribute (can be modified by clients)
    #[default]
    #[serde(alias = "READ_WRITE")]
    ReadWrite,
    /// Read-only attribute (managed by server)
    #[serde(alias = "READ_ONLY")]
    ReadOnly,
    /// Immutable attribute (set once, never modified)
    #[serde(alias = "IMMUTABLE")]
    Immutable,
    /// Write-only attribute (passwords, etc.)
    #[serde(alias = "WRITE_ONLY")]
    WriteOnly,
}

/// When an attribute is returned in responses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum Returned {
    #[serde(alias = "ALWAYS")]
    Always,
    #[serde(alias = "NEVER")]
    Never,
    #[default]
    #[serde(alias = "DEFAULT")]
    Default,
    #[serde(alias = "REQUEST")]
    Request,
}

/// Attribute uniqueness constraints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum Uniqueness {
    /// No uniqueness constraint
    #[default]
    #[serde(alias = "NONE")]
    None,
    /// Unique within the server
    #[serde(alias = "SERVER")]
    Server,
    /// Globally unique
    #[serde(alias = "GLOBAL")]
    Global,
}

/// Resource kinds a reference attribute may point to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ReferenceType {
    #[serde(rename = "external", alias = "EXTERNAL")]
    External,
    #[serde(rename = "User", alias = "USER")]
    User,
    #[serde(rename = "Group", alias = "GROUP")]
    Group,
    #[serde(rename = "uri", alias = "URI")]
    Uri,
}

/// Immutable definition of one legal attribute.
///
/// Built once, either from an embedded [`AttributeDefinition`] or through
/// [`AttributeSchemaBuilder`], and shared read-only afterwards. A COMPLEX
/// schema always has at least one sub-attribute; any other type has none.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSchema {
    uri: String,
    name: String,
    schema_uri: String,
    data_type: AttributeType,
    multi_valued: bool,
    description: String,
    required: bool,
    case_exact: bool,
    mutability: Mutability,
    returned: Returned,
    uniqueness: Uniqueness,
    canonical_values: Vec<String>,
    reference_types: Vec<ReferenceType>,
    sub_attributes: Vec<AttributeSchema>,
    extension: bool,
}

impl AttributeSchema {
    /// Start building an attribute schema.
    pub fn builder(
        uri: impl Into<String>,
        name: impl Into<String>,
        data_type: AttributeType,
    ) -> AttributeSchemaBuilder {
        AttributeSchemaBuilder::new(uri.into(), name.into(), data_type)
    }

    /// Convert a schema document attribute into a validated schema node.
    ///
    /// Top-level URIs are `<schemaId>:<name>`, sub-attribute URIs append
    /// `.<name>` to their parent's URI.
    pub fn from_definition(
        schema_id: &str,
        parent_uri: Option<&str>,
        definition: &AttributeDefinition,
        extension: bool,
    ) -> ScimResult<Self> {
        let uri = match parent_uri {
            Some(parent) => format!("{}.{}", parent, definition.name),
            None => format!("{}:{}", schema_id, definition.name),
        };

        let mut builder = Self::builder(uri.clone(), definition.name.clone(), definition.data_type)
            .schema_uri(schema_id)
            .multi_valued(definition.multi_valued)
            .description(definition.description.clone())
            .required(definition.required)
            .case_exact(definition.case_exact)
            .mutability(definition.mutability)
            .returned(definition.returned)
            .uniqueness(definition.uniqueness)
            .canonical_values(definition.canonical_values.clone())
            .reference_types(definition.reference_types.clone())
            .extension(extension);

        for sub in &definition.sub_attributes {
            builder = builder.sub_attribute(Self::from_definition(
                schema_id,
                Some(&uri),
                sub,
                extension,
            )?);
        }

        builder.build()
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// URI of the schema that owns this attribute.
    pub fn schema_uri(&self) -> &str {
        &self.schema_uri
    }

    pub fn data_type(&self) -> AttributeType {
        self.data_type
    }

    pub fn is_multi_valued(&self) -> bool {
        self.multi_valued
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_case_exact(&self) -> bool {
        self.case_exact
    }

    pub fn mutability(&self) -> Mutability {
        self.mutability
    }

    pub fn is_read_only(&self) -> bool {
        self.mutability == Mutability::ReadOnly
    }

    pub fn returned(&self) -> Returned {
        self.returned
    }

    pub fn uniqueness(&self) -> Uniqueness {
        self.uniqueness
    }

    pub fn canonical_values(&self) -> &[String] {
        &self.canonical_values
    }

    pub fn reference_types(&self) -> &[ReferenceType] {
        &self.reference_types
    }

    pub fn sub_attributes(&self) -> &[AttributeSchema] {
        &self.sub_attributes
    }

    /// Whether this attribute belongs to an extension schema.
    pub fn is_extension(&self) -> bool {
        self.extension
    }

    /// Key under which values of this attribute are stored.
    pub fn attribute_name(&self) -> AttributeName {
        AttributeName(self.name.clone())
    }

    /// Whether `name_or_uri` refers to this attribute.
    ///
    /// Names compare case-insensitively as SCIM attribute names do.
    pub fn matches(&self, name_or_uri: &str) -> bool {
        self.name.eq_ignore_ascii_case(name_or_uri) || self.uri.eq_ignore_ascii_case(name_or_uri)
    }

    /// Resolve a sub-attribute by short name or full URI.
    pub fn resolve_sub_attribute(&self, name_or_uri: &str) -> Option<&AttributeSchema> {
        self.sub_attributes.iter().find(|s| s.matches(name_or_uri))
    }
}

/// Builder for [`AttributeSchema`] that checks structural invariants.
#[derive(Debug, Clone)]
pub struct AttributeSchemaBuilder {
    schema: AttributeSchema,
}

impl AttributeSchemaBuilder {
    fn new(uri: String, name: String, data_type: AttributeType) -> Self {
        Self {
            schema: AttributeSchema {
                schema_uri: uri.clone(),
                uri,
                name,
                data_type,
                multi_valued: false,
                description: String::new(),
                required: false,
                case_exact: false,
                mutability: Mutability::ReadWrite,
                returned: Returned::Default,
                uniqueness: Uniqueness::None,
                canonical_values: Vec::new(),
                reference_types: Vec::new(),
                sub_attributes: Vec::new(),
                extension: false,
            },
        }
    }

    pub fn schema_uri(mut self, schema_uri: impl Into<String>) -> Self {
        self.schema.schema_uri = schema_uri.into();
        self
    }

    pub fn multi_valued(mut self, multi_valued: bool) -> Self {
        self.schema.multi_valued = multi_valued;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.schema.description = description.into();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.schema.required = required;
        self
    }

    pub fn case_exact(mut self, case_exact: bool) -> Self {
        self.schema.case_exact = case_exact;
        self
    }

    pub fn mutability(mut self, mutability: Mutability) -> Self {
        self.schema.mutability = mutability;
        self
    }

    pub fn returned(mut self, returned: Returned) -> Self {
        self.schema.returned = returned;
        self
    }

    pub fn uniqueness(mut self, uniqueness: Uniqueness) -> Self {
        self.schema.uniqueness = uniqueness;
        self
    }

    pub fn canonical_values(mut self, values: Vec<String>) -> Self {
        self.schema.canonical_values = values;
        self
    }

    pub fn reference_types(mut self, types: Vec<ReferenceType>) -> Self {
        self.schema.reference_types = types;
        self
    }

    pub fn sub_attribute(mut self, sub_attribute: AttributeSchema) -> Self {
        self.schema.sub_attributes.push(sub_attribute);
        self
    }

    pub fn extension(mut self, extension: bool) -> Self {
        self.schema.extension = extension;
        self
    }

    /// Finish the schema, rejecting structural inconsistencies.
    pub fn build(self) -> ScimResult<AttributeSchema> {
        let schema = self.schema;
        if schema.name.is_empty() {
            return Err(ScimError::internal(format!(
                "attribute '{}' has an empty name",
                schema.uri
            )));
        }
        match schema.data_type {
            AttributeType::Complex if schema.sub_attributes.is_empty() => {
                Err(ScimError::internal(format!(
                    "complex attribute '{}' declares no sub-attributes",
                    schema.uri
                )))
            }
            data_type if data_type.is_primitive() && !schema.sub_attributes.is_empty() => {
                Err(ScimError::internal(format!(
                    "{} attribute '{}' cannot declare sub-attributes",
                    data_type.as_str(),
                    schema.uri
                )))
            }
            _ => Ok(schema),
        }
    }
}

/// Composed schema for one resource kind: core attributes followed by the
/// root attributes of every attached extension.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceTypeSchema {
    name: String,
    schema_uri: String,
    description: String,
    endpoint: String,
    attributes: Vec<AttributeSchema>,
}

impl ResourceTypeSchema {
    pub fn new(
        name: impl Into<String>,
        schema_uri: impl Into<String>,
        description: impl Into<String>,
        endpoint: impl Into<String>,
        attributes: Vec<AttributeSchema>,
    ) -> Self {
        Self {
            name: name.into(),
            schema_uri: schema_uri.into(),
            description: description.into(),
            endpoint: endpoint.into(),
            attributes,
        }
    }

    /// Resource type name such as `User`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// URI of the primary (core) schema.
    pub fn schema_uri(&self) -> &str {
        &self.schema_uri
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Endpoint path such as `/Users`.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// All top-level attributes in schema order.
    pub fn attributes(&self) -> &[AttributeSchema] {
        &self.attributes
    }

    /// Resolve a top-level attribute by short name or full URI.
    pub fn resolve_attribute(&self, name_or_uri: &str) -> Option<&AttributeSchema> {
        self.attributes.iter().find(|a| a.matches(name_or_uri))
    }

    /// URIs of all extension schemas attached to this resource type.
    pub fn extension_uris(&self) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|a| a.is_extension())
            .map(|a| a.schema_uri())
            .collect()
    }

    /// Append an extension root attribute. Core attributes are never replaced.
    pub(crate) fn push_extension(&mut self, root: AttributeSchema) -> ScimResult<()> {
        if self.attributes.iter().any(|a| a.uri() == root.uri()) {
            return Err(ScimError::internal(format!(
                "extension '{}' is already attached to resource type '{}'",
                root.uri(),
                self.name
            )));
        }
        self.attributes.push(root);
        Ok(())
    }
}

/// Key of an attribute in a resource's attribute map.
///
/// Values are the schema's short attribute name (extension roots use their
/// schema URI as name), so URI and short-name spellings of the same
/// attribute never produce two keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttributeName(String);

impl AttributeName {
    /// Create a name outside schema resolution.
    pub fn new(name: impl Into<String>) -> ScimResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ScimError::internal("attribute name cannot be empty"));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for AttributeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
