//! Runtime attribute value tree.
//!
//! A resource's data is a tree of [`Attribute`] nodes: scalar
//! [`SimpleAttribute`]s, structured [`ComplexAttribute`]s and
//! [`MultiValuedAttribute`]s holding either scalars or complex entries.
//! Nodes carry a copy of their schema [`Characteristics`], stamped by the
//! [`AttributeFactory`] when the node is attached to a resource.
//!
//! Complex entries of a multi-valued attribute are addressed by an identity
//! name, `<attributeName>_<value>_<type>`, which stays stable when entries
//! are reordered and is recomputed whenever `value` or `type` changes.

pub mod factory;

pub use factory::AttributeFactory;

use crate::config::DATE_TIME_FORMAT;
use crate::error::{ValidationError, ValidationResult};
use crate::schema::types::{
    AttributeSchema, AttributeType, Mutability, ReferenceType, Returned, Uniqueness,
};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Placeholder for a missing `value` or `type` in an entry identity name.
pub const DEFAULT_IDENTITY_MARKER: &str = "default";

/// Scalar value of a simple attribute or primitive multi-valued entry.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(String),
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    DateTime(DateTime<Utc>),
    Binary(Vec<u8>),
    Reference(String),
}

impl AttributeValue {
    /// Schema data type this value satisfies.
    pub fn data_type(&self) -> AttributeType {
        match self {
            Self::String(_) => AttributeType::String,
            Self::Boolean(_) => AttributeType::Boolean,
            Self::Integer(_) => AttributeType::Integer,
            Self::Decimal(_) => AttributeType::Decimal,
            Self::DateTime(_) => AttributeType::DateTime,
            Self::Binary(_) => AttributeType::Binary,
            Self::Reference(_) => AttributeType::Reference,
        }
    }

    /// Text of string and reference values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Reference(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Textual form used inside entry identity names.
    pub fn to_identity_string(&self) -> String {
        match self {
            Self::String(s) | Self::Reference(s) => s.clone(),
            Self::Boolean(b) => b.to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Decimal(d) => d.to_string(),
            Self::DateTime(dt) => dt.format(DATE_TIME_FORMAT).to_string(),
            Self::Binary(bytes) => BASE64.encode(bytes),
        }
    }
}

/// Schema characteristics copied onto a value node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Characteristics {
    pub uri: String,
    pub required: bool,
    pub case_exact: bool,
    pub mutability: Mutability,
    pub returned: Returned,
    pub uniqueness: Uniqueness,
    pub canonical_values: Vec<String>,
    pub reference_types: Vec<ReferenceType>,
}

impl Characteristics {
    pub fn from_schema(schema: &AttributeSchema) -> Self {
        Self {
            uri: schema.uri().to_string(),
            required: schema.is_required(),
            case_exact: schema.is_case_exact(),
            mutability: schema.mutability(),
            returned: schema.returned(),
            uniqueness: schema.uniqueness(),
            canonical_values: schema.canonical_values().to_vec(),
            reference_types: schema.reference_types().to_vec(),
        }
    }
}

/// One scalar value.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleAttribute {
    name: String,
    value: AttributeValue,
    characteristics: Characteristics,
}

impl SimpleAttribute {
    pub fn new(name: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            name: name.into(),
            value,
            characteristics: Characteristics::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &AttributeValue {
        &self.value
    }

    pub fn data_type(&self) -> AttributeType {
        self.value.data_type()
    }

    pub fn characteristics(&self) -> &Characteristics {
        &self.characteristics
    }
}

/// Structured value made of named sub-attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComplexAttribute {
    name: String,
    sub_attributes: BTreeMap<String, Attribute>,
    characteristics: Characteristics,
}

impl ComplexAttribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style variant of [`set_sub_attribute`](Self::set_sub_attribute).
    pub fn with_sub_attribute(mut self, attribute: impl Into<Attribute>) -> Self {
        self.set_sub_attribute(attribute);
        self
    }

    /// Add or replace a sub-attribute, returning the replaced one.
    pub fn set_sub_attribute(&mut self, attribute: impl Into<Attribute>) -> Option<Attribute> {
        let attribute = attribute.into();
        self.sub_attributes
            .insert(attribute.name().to_string(), attribute)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sub_attribute(&self, name: &str) -> Option<&Attribute> {
        self.sub_attributes.get(name)
    }

    pub fn remove_sub_attribute(&mut self, name: &str) -> Option<Attribute> {
        self.sub_attributes.remove(name)
    }

    pub fn has_sub_attribute(&self, name: &str) -> bool {
        self.sub_attributes.contains_key(name)
    }

    /// Sub-attributes ordered by name.
    pub fn sub_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.sub_attributes.values()
    }

    pub fn is_empty(&self) -> bool {
        self.sub_attributes.is_empty()
    }

    pub fn characteristics(&self) -> &Characteristics {
        &self.characteristics
    }

    /// Scalar value of a simple sub-attribute.
    pub fn simple_value(&self, name: &str) -> Option<&AttributeValue> {
        match self.sub_attributes.get(name) {
            Some(Attribute::Simple(simple)) => Some(simple.value()),
            _ => None,
        }
    }

    pub(crate) fn sub_attribute_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.sub_attributes.get_mut(name)
    }

    pub(crate) fn take_sub_attributes(&mut self) -> BTreeMap<String, Attribute> {
        std::mem::take(&mut self.sub_attributes)
    }

    pub(crate) fn rename(&mut self, name: String) {
        self.name = name;
    }
}

/// Identity name of a complex entry of the multi-valued attribute `attribute_name`.
pub fn entry_identity(attribute_name: &str, entry: &ComplexAttribute) -> String {
    let component = |sub: &str| {
        entry
            .simple_value(sub)
            .map(AttributeValue::to_identity_string)
            .unwrap_or_else(|| DEFAULT_IDENTITY_MARKER.to_string())
    };
    format!("{}_{}_{}", attribute_name, component("value"), component("type"))
}

/// Values of a multi-valued attribute; never a mix of scalars and entries.
#[derive(Debug, Clone, PartialEq)]
pub enum MultiValues {
    Primitive(Vec<AttributeValue>),
    Complex(Vec<ComplexAttribute>),
}

/// Zero or more values of one attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiValuedAttribute {
    name: String,
    values: MultiValues,
    characteristics: Characteristics,
}

impl MultiValuedAttribute {
    /// Multi-valued attribute of scalars.
    pub fn new_primitive(name: impl Into<String>, values: Vec<AttributeValue>) -> Self {
        Self {
            name: name.into(),
            values: MultiValues::Primitive(values),
            characteristics: Characteristics::default(),
        }
    }

    /// Empty multi-valued attribute of complex entries.
    pub fn new_complex(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: MultiValues::Complex(Vec::new()),
            characteristics: Characteristics::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &MultiValues {
        &self.values
    }

    pub fn characteristics(&self) -> &Characteristics {
        &self.characteristics
    }

    /// Scalar values; empty for attributes holding complex entries.
    pub fn primitive_values(&self) -> &[AttributeValue] {
        match &self.values {
            MultiValues::Primitive(values) => values,
            MultiValues::Complex(_) => &[],
        }
    }

    /// Complex entries; empty for attributes holding scalars.
    pub fn entries(&self) -> &[ComplexAttribute] {
        match &self.values {
            MultiValues::Complex(entries) => entries,
            MultiValues::Primitive(_) => &[],
        }
    }

    pub fn len(&self) -> usize {
        match &self.values {
            MultiValues::Primitive(values) => values.len(),
            MultiValues::Complex(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a scalar value.
    pub fn add_value(&mut self, value: AttributeValue) -> ValidationResult<()> {
        if let MultiValues::Complex(entries) = &self.values {
            if !entries.is_empty() {
                return Err(ValidationError::invalid_type(
                    &self.name,
                    "complex entry",
                    value.data_type().as_str(),
                ));
            }
            self.values = MultiValues::Primitive(Vec::new());
        }
        if let MultiValues::Primitive(values) = &mut self.values {
            values.push(value);
        }
        Ok(())
    }

    /// Remove every occurrence of a scalar value; returns whether any was removed.
    pub fn remove_value(&mut self, value: &AttributeValue) -> bool {
        match &mut self.values {
            MultiValues::Primitive(values) => {
                let before = values.len();
                values.retain(|v| v != value);
                values.len() != before
            }
            MultiValues::Complex(_) => false,
        }
    }

    /// Append a complex entry under its identity name.
    ///
    /// Fails when another entry already resolves to the same identity.
    pub fn add_entry(&mut self, mut entry: ComplexAttribute) -> ValidationResult<()> {
        if let MultiValues::Primitive(values) = &self.values {
            if !values.is_empty() {
                return Err(ValidationError::invalid_type(&self.name, "scalar", "complex"));
            }
            self.values = MultiValues::Complex(Vec::new());
        }

        let identity = entry_identity(&self.name, &entry);
        if self.entry(&identity).is_some() {
            return Err(ValidationError::DuplicateMultiValuedEntry {
                attribute: self.name.clone(),
                identity,
            });
        }
        entry.rename(identity);
        if let MultiValues::Complex(entries) = &mut self.values {
            entries.push(entry);
        }
        Ok(())
    }

    /// Complex entry with the given identity name.
    pub fn entry(&self, identity: &str) -> Option<&ComplexAttribute> {
        self.entries().iter().find(|e| e.name() == identity)
    }

    /// Modify the entry named `identity` and recompute its identity.
    ///
    /// Returns `Ok(false)` when no such entry exists. The entry is left
    /// unchanged when the modification would collide with another entry.
    pub fn update_entry<F>(&mut self, identity: &str, update: F) -> ValidationResult<bool>
    where
        F: FnOnce(&mut ComplexAttribute),
    {
        let MultiValues::Complex(entries) = &mut self.values else {
            return Ok(false);
        };
        let Some(index) = entries.iter().position(|e| e.name() == identity) else {
            return Ok(false);
        };

        let mut updated = entries[index].clone();
        update(&mut updated);
        let new_identity = entry_identity(&self.name, &updated);
        let collides = entries
            .iter()
            .enumerate()
            .any(|(i, e)| i != index && e.name() == new_identity);
        if collides {
            return Err(ValidationError::DuplicateMultiValuedEntry {
                attribute: self.name.clone(),
                identity: new_identity,
            });
        }
        updated.rename(new_identity);
        entries[index] = updated;
        Ok(true)
    }

    /// Remove the entry with the given identity name.
    pub fn remove_entry(&mut self, identity: &str) -> Option<ComplexAttribute> {
        match &mut self.values {
            MultiValues::Complex(entries) => {
                let index = entries.iter().position(|e| e.name() == identity)?;
                Some(entries.remove(index))
            }
            MultiValues::Primitive(_) => None,
        }
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [ComplexAttribute] {
        match &mut self.values {
            MultiValues::Complex(entries) => entries,
            MultiValues::Primitive(_) => &mut [],
        }
    }

    pub(crate) fn take_values(&mut self) -> MultiValues {
        std::mem::replace(&mut self.values, MultiValues::Primitive(Vec::new()))
    }

    pub(crate) fn set_values(&mut self, values: MultiValues) {
        self.values = values;
    }
}

/// A node of the attribute value tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Simple(SimpleAttribute),
    Complex(ComplexAttribute),
    MultiValued(MultiValuedAttribute),
}

impl Attribute {
    pub fn name(&self) -> &str {
        match self {
            Self::Simple(a) => a.name(),
            Self::Complex(a) => a.name(),
            Self::MultiValued(a) => a.name(),
        }
    }

    pub fn characteristics(&self) -> &Characteristics {
        match self {
            Self::Simple(a) => &a.characteristics,
            Self::Complex(a) => &a.characteristics,
            Self::MultiValued(a) => &a.characteristics,
        }
    }

    /// Variant name used in error messages.
    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::Simple(_) => "simple",
            Self::Complex(_) => "complex",
            Self::MultiValued(_) => "multiValued",
        }
    }

    pub fn as_simple(&self) -> Option<&SimpleAttribute> {
        match self {
            Self::Simple(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_complex(&self) -> Option<&ComplexAttribute> {
        match self {
            Self::Complex(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_complex_mut(&mut self) -> Option<&mut ComplexAttribute> {
        match self {
            Self::Complex(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_multi_valued(&self) -> Option<&MultiValuedAttribute> {
        match self {
            Self::MultiValued(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_multi_valued_mut(&mut self) -> Option<&mut MultiValuedAttribute> {
        match self {
            Self::MultiValued(a) => Some(a),
            _ => None,
        }
    }

    pub(crate) fn set_characteristics(&mut self, characteristics: Characteristics) {
        match self {
            Self::Simple(a) => a.characteristics = characteristics,
            Self::Complex(a) => a.characteristics = characteristics,
            Self::MultiValued(a) => a.characteristics = characteristics,
        }
    }

    pub(crate) fn rename(&mut self, name: &str) {
        match self {
            Self::Simple(a) => a.name = name.to_string(),
            Self::Complex(a) => a.name = name.to_string(),
            Self::MultiValued(a) => a.name = name.to_string(),
        }
    }
}

impl From<SimpleAttribute> for Attribute {
    fn from(attribute: SimpleAttribute) -> Self {
        Self::Simple(attribute)
    }
}

impl From<ComplexAttribute> for Attribute {
    fn from(attribute: ComplexAttribute) -> Self {
        Self::Complex(attribute)
    }
}

impl From<MultiValuedAttribute> for Attribute {
    fn from(attribute: MultiValuedAttribute) -> Self {
        Self::MultiValued(attribute)
    }
}
