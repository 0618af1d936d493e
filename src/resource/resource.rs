//! The runtime SCIM resource.
//!
//! A [`Resource`] owns the attribute value tree of one identity resource
//! together with the schema-URI list it advertises. It keeps a handle to its
//! [`ResourceTypeSchema`] so every attribute attached through
//! [`Resource::set_attribute`] runs through the [`AttributeFactory`].

use crate::attribute::{
    Attribute, AttributeFactory, AttributeValue, ComplexAttribute, SimpleAttribute,
};
use crate::error::{ScimError, ScimResult, ValidationError};
use crate::schema::types::{AttributeName, AttributeSchema, ResourceTypeSchema};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const ID: &str = "id";
pub const META: &str = "meta";
pub const META_CREATED: &str = "created";
pub const META_LAST_MODIFIED: &str = "lastModified";
pub const META_LOCATION: &str = "location";
pub const META_VERSION: &str = "version";
pub const META_RESOURCE_TYPE: &str = "resourceType";

/// One identity resource instance.
///
/// `id`, `meta.created` and `meta.location` can be assigned at most once;
/// a second assignment fails with [`ValidationError::AttributeAlreadySet`].
#[derive(Debug, Clone)]
pub struct Resource {
    schema: Arc<ResourceTypeSchema>,
    schemas: Vec<String>,
    attributes: BTreeMap<AttributeName, Attribute>,
}

impl Resource {
    /// Create an empty resource of the given type.
    pub fn new(schema: Arc<ResourceTypeSchema>) -> Self {
        Self {
            schema,
            schemas: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn schema(&self) -> &ResourceTypeSchema {
        &self.schema
    }

    /// Shared handle to the resource type schema.
    pub fn schema_handle(&self) -> Arc<ResourceTypeSchema> {
        Arc::clone(&self.schema)
    }

    /// Resource type name such as `User`.
    pub fn resource_type(&self) -> &str {
        self.schema.name()
    }

    /// Schema URIs advertised in the `schemas` member.
    pub fn schemas(&self) -> &[String] {
        &self.schemas
    }

    /// Replace the schema-URI list, dropping duplicates.
    pub fn set_schemas<I, S>(&mut self, schemas: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schemas.clear();
        for uri in schemas {
            self.add_schema(uri);
        }
    }

    /// Append a schema URI unless already present.
    pub fn add_schema(&mut self, uri: impl Into<String>) {
        let uri = uri.into();
        if !self.schemas.contains(&uri) {
            self.schemas.push(uri);
        }
    }

    /// Validate and attach a top-level attribute, returning the one it replaces.
    pub fn set_attribute(&mut self, attribute: impl Into<Attribute>) -> ScimResult<Option<Attribute>> {
        let schema = Arc::clone(&self.schema);
        let attribute = attribute.into();
        let attribute_schema = Self::resolve(&schema, attribute.name())?;
        let attribute = AttributeFactory::create_attribute(attribute_schema, attribute)?;
        self.check_once_only(&attribute)?;
        Ok(self.attributes.insert(attribute_schema.attribute_name(), attribute))
    }

    /// Attribute by short name or full URI.
    pub fn get_attribute(&self, name_or_uri: &str) -> Option<&Attribute> {
        let key = self.key_for(name_or_uri)?;
        self.attributes.get(key.as_str())
    }

    /// In-place access that bypasses the factory; callers only ever remove data.
    pub(crate) fn attribute_mut(&mut self, name_or_uri: &str) -> Option<&mut Attribute> {
        let key = self.key_for(name_or_uri)?;
        self.attributes.get_mut(key.as_str())
    }

    pub fn has_attribute(&self, name_or_uri: &str) -> bool {
        self.get_attribute(name_or_uri).is_some()
    }

    /// Remove an attribute by short name or full URI.
    pub fn remove_attribute(&mut self, name_or_uri: &str) -> Option<Attribute> {
        let key = self.key_for(name_or_uri)?;
        self.attributes.remove(key.as_str())
    }

    /// Remove one sub-attribute of a complex attribute, or one entry of a
    /// multi-valued attribute by its identity name.
    pub fn delete_sub_attribute(&mut self, name_or_uri: &str, sub_name: &str) -> Option<Attribute> {
        let key = self.key_for(name_or_uri)?;
        match self.attributes.get_mut(key.as_str())? {
            Attribute::Complex(complex) => complex.remove_sub_attribute(sub_name),
            Attribute::MultiValued(multi) => multi.remove_entry(sub_name).map(Attribute::Complex),
            Attribute::Simple(_) => None,
        }
    }

    /// Present attributes keyed by their schema name.
    pub fn attributes(&self) -> impl Iterator<Item = (&AttributeName, &Attribute)> {
        self.attributes.iter()
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    pub fn id(&self) -> Option<&str> {
        self.get_attribute(ID)?.as_simple()?.value().as_str()
    }

    /// Assign the resource id. Fails when an id is already present.
    pub fn set_id(&mut self, id: impl Into<String>) -> ScimResult<()> {
        self.set_attribute(SimpleAttribute::new(ID, AttributeValue::String(id.into())))
            .map(|_| ())
    }

    pub fn external_id(&self) -> Option<&str> {
        self.get_attribute("externalId")?.as_simple()?.value().as_str()
    }

    pub fn meta(&self) -> Option<&ComplexAttribute> {
        self.get_attribute(META)?.as_complex()
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.meta()?.simple_value(META_CREATED)?.as_date_time()
    }

    /// Assign `meta.created`. Fails when already present.
    pub fn set_created(&mut self, created: DateTime<Utc>) -> ScimResult<()> {
        self.set_meta_field(META_CREATED, AttributeValue::DateTime(created), true)
    }

    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.meta()?.simple_value(META_LAST_MODIFIED)?.as_date_time()
    }

    pub fn set_last_modified(&mut self, last_modified: DateTime<Utc>) -> ScimResult<()> {
        self.set_meta_field(META_LAST_MODIFIED, AttributeValue::DateTime(last_modified), false)
    }

    pub fn location(&self) -> Option<&str> {
        self.meta()?.simple_value(META_LOCATION)?.as_str()
    }

    /// Assign `meta.location`. Fails when already present.
    pub fn set_location(&mut self, location: impl Into<String>) -> ScimResult<()> {
        self.set_meta_field(META_LOCATION, AttributeValue::Reference(location.into()), true)
    }

    pub fn version(&self) -> Option<&str> {
        self.meta()?.simple_value(META_VERSION)?.as_str()
    }

    pub fn set_version(&mut self, version: impl Into<String>) -> ScimResult<()> {
        self.set_meta_field(META_VERSION, AttributeValue::String(version.into()), false)
    }

    pub fn meta_resource_type(&self) -> Option<&str> {
        self.meta()?.simple_value(META_RESOURCE_TYPE)?.as_str()
    }

    pub fn set_meta_resource_type(&mut self, resource_type: impl Into<String>) -> ScimResult<()> {
        self.set_meta_field(
            META_RESOURCE_TYPE,
            AttributeValue::String(resource_type.into()),
            false,
        )
    }

    fn set_meta_field(&mut self, field: &str, value: AttributeValue, once: bool) -> ScimResult<()> {
        if once && self.meta().is_some_and(|meta| meta.has_sub_attribute(field)) {
            return Err(ValidationError::AttributeAlreadySet {
                attribute: format!("{}.{}", META, field),
            }
            .into());
        }

        let schema = Arc::clone(&self.schema);
        let meta_schema = Self::resolve(&schema, META)?;
        let sub = AttributeFactory::create_sub_attribute(
            meta_schema,
            SimpleAttribute::new(field, value).into(),
        )?;

        match self.attributes.get_mut(META) {
            Some(Attribute::Complex(meta)) => {
                meta.set_sub_attribute(sub);
            }
            Some(other) => {
                return Err(ScimError::internal(format!(
                    "meta is stored as a {} attribute",
                    other.kind_str()
                )));
            }
            None => {
                let meta = ComplexAttribute::new(META).with_sub_attribute(sub);
                let meta = AttributeFactory::create_attribute(meta_schema, meta.into())?;
                self.attributes.insert(meta_schema.attribute_name(), meta);
            }
        }
        Ok(())
    }

    /// Reject reassignment of `id`, `meta.created` and `meta.location`.
    fn check_once_only(&self, incoming: &Attribute) -> ScimResult<()> {
        let already_set = |attribute: String| -> ScimResult<()> {
            Err(ValidationError::AttributeAlreadySet { attribute }.into())
        };

        match incoming.name() {
            ID if self.has_attribute(ID) => already_set(ID.to_string()),
            META => {
                let (Some(current), Some(incoming)) = (self.meta(), incoming.as_complex()) else {
                    return Ok(());
                };
                for field in [META_CREATED, META_LOCATION] {
                    if let (Some(old), Some(new)) =
                        (current.simple_value(field), incoming.simple_value(field))
                    {
                        if old != new {
                            return already_set(format!("{}.{}", META, field));
                        }
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn resolve<'s>(schema: &'s ResourceTypeSchema, name: &str) -> ScimResult<&'s AttributeSchema> {
        schema.resolve_attribute(name).ok_or_else(|| {
            ValidationError::UnknownAttribute {
                attribute: name.to_string(),
                resource_type: schema.name().to_string(),
            }
            .into()
        })
    }

    fn key_for(&self, name_or_uri: &str) -> Option<AttributeName> {
        match self.schema.resolve_attribute(name_or_uri) {
            Some(schema) => Some(schema.attribute_name()),
            None => AttributeName::new(name_or_uri).ok(),
        }
    }
}

/// Resources are equal when type, schema URIs and attribute trees match.
impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name() == other.schema.name()
            && self.schemas == other.schemas
            && self.attributes == other.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::MultiValuedAttribute;
    use crate::error::ErrorKind;
    use crate::schema::SchemaRegistry;

    fn user() -> Resource {
        Resource::new(SchemaRegistry::new().unwrap().user_schema().unwrap())
    }

    fn string(value: &str) -> AttributeValue {
        AttributeValue::String(value.to_string())
    }

    #[test]
    fn test_set_and_get_by_name_or_uri() {
        let mut resource = user();
        resource
            .set_attribute(SimpleAttribute::new("userName", string("alice")))
            .unwrap();

        assert!(resource.has_attribute("userName"));
        assert!(resource.has_attribute("urn:ietf:params:scim:schemas:core:2.0:User:userName"));
        assert_eq!(resource.attribute_count(), 1);
    }

    #[test]
    fn test_unknown_attribute_is_rejected() {
        let mut resource = user();
        let err = resource
            .set_attribute(SimpleAttribute::new("shoeSize", string("44")))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);
    }

    #[test]
    fn test_id_is_set_once() {
        let mut resource = user();
        resource.set_id("1").unwrap();
        let err = resource.set_id("2").unwrap_err();
        assert_eq!(err.scim_type(), Some("mutability"));
        assert_eq!(resource.id(), Some("1"));
    }

    #[test]
    fn test_meta_once_only_fields() {
        let mut resource = user();
        let now = Utc::now();
        resource.set_created(now).unwrap();
        resource.set_location("https://example.com/v2/Users/1").unwrap();
        resource.set_last_modified(now).unwrap();
        resource.set_last_modified(now).unwrap();

        assert!(resource.set_created(now).is_err());
        assert!(resource.set_location("elsewhere").is_err());
        assert_eq!(resource.location(), Some("https://example.com/v2/Users/1"));
        assert_eq!(resource.created(), Some(now));
    }

    #[test]
    fn test_delete_sub_attribute_by_identity() {
        let mut resource = user();
        let mut emails = MultiValuedAttribute::new_complex("emails");
        emails
            .add_entry(
                ComplexAttribute::new("emails")
                    .with_sub_attribute(SimpleAttribute::new("value", string("a@b.com")))
                    .with_sub_attribute(SimpleAttribute::new("type", string("work"))),
            )
            .unwrap();
        resource.set_attribute(emails).unwrap();

        assert!(resource
            .delete_sub_attribute("emails", "emails_a@b.com_work")
            .is_some());
        let emails = resource.get_attribute("emails").unwrap().as_multi_valued().unwrap();
        assert!(emails.is_empty());
    }

    #[test]
    fn test_schemas_are_deduplicated() {
        let mut resource = user();
        resource.set_schemas(["a", "b", "a"]);
        assert_eq!(resource.schemas(), &["a".to_string(), "b".to_string()]);
    }
}
