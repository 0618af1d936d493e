//! Schema conformance boundary for value nodes.
//!
//! [`AttributeFactory::create_attribute`] is the only way a node enters a
//! [`Resource`](crate::resource::Resource). It checks the node against its
//! [`AttributeSchema`], repairs the few differences that are lossless
//! (integer for decimal, string for reference), and stamps the schema's
//! characteristics onto every node of the subtree. Date-times are cut to
//! whole seconds, the precision of the wire format.

use super::{
    Attribute, AttributeValue, Characteristics, ComplexAttribute, MultiValues,
    MultiValuedAttribute, SimpleAttribute, entry_identity,
};
use crate::error::{ValidationError, ValidationResult};
use crate::schema::types::{AttributeSchema, AttributeType};
use chrono::SubsecRound;
use log::trace;
use std::collections::HashSet;

/// Validates value nodes and copies schema characteristics onto them.
pub struct AttributeFactory;

impl AttributeFactory {
    /// Validate a top-level node against its schema.
    pub fn create_attribute(schema: &AttributeSchema, attribute: Attribute) -> ValidationResult<Attribute> {
        Self::create_at_depth(schema, attribute, 0)
    }

    /// Validate a sub-attribute node of a top-level complex attribute.
    pub fn create_sub_attribute(
        parent: &AttributeSchema,
        attribute: Attribute,
    ) -> ValidationResult<Attribute> {
        let schema = parent.resolve_sub_attribute(attribute.name()).ok_or_else(|| {
            ValidationError::UnknownSubAttribute {
                attribute: parent.name().to_string(),
                sub_attribute: attribute.name().to_string(),
            }
        })?;
        Self::create_at_depth(schema, attribute, 1)
    }

    fn create_at_depth(
        schema: &AttributeSchema,
        mut attribute: Attribute,
        depth: usize,
    ) -> ValidationResult<Attribute> {
        if !schema.matches(attribute.name()) {
            return Err(ValidationError::custom(format!(
                "value '{}' cannot be attached as attribute '{}'",
                attribute.name(),
                schema.name()
            )));
        }
        if schema.data_type() == AttributeType::Complex {
            Self::check_nesting(schema, depth)?;
        }

        attribute = match (schema.is_multi_valued(), attribute) {
            (true, Attribute::MultiValued(multi)) => {
                Attribute::MultiValued(Self::create_multi_valued(schema, multi, depth)?)
            }
            (true, _) => {
                return Err(ValidationError::ExpectedMultiValue {
                    attribute: schema.name().to_string(),
                });
            }
            (false, Attribute::MultiValued(_)) => {
                return Err(ValidationError::ExpectedSingleValue {
                    attribute: schema.name().to_string(),
                });
            }
            (false, Attribute::Complex(complex)) if schema.data_type() == AttributeType::Complex => {
                Attribute::Complex(Self::create_complex(schema, complex, depth)?)
            }
            (false, Attribute::Simple(simple)) if schema.data_type().is_primitive() => {
                let value = Self::conform_value(schema, simple.value)?;
                Attribute::Simple(SimpleAttribute::new(schema.name(), value))
            }
            (false, other) => {
                return Err(ValidationError::invalid_type(
                    schema.name(),
                    schema.data_type().as_str(),
                    other.kind_str(),
                ));
            }
        };

        attribute.rename(schema.name());
        attribute.set_characteristics(Characteristics::from_schema(schema));
        trace!("Attached '{}' at depth {}", schema.uri(), depth);
        Ok(attribute)
    }

    /// One level of complex nesting, or two inside an extension schema.
    fn check_nesting(schema: &AttributeSchema, depth: usize) -> ValidationResult<()> {
        let allowed = if schema.is_extension() { 1 } else { 0 };
        if depth > allowed {
            return Err(ValidationError::NestedComplexAttribute {
                attribute: schema.uri().to_string(),
            });
        }
        Ok(())
    }

    fn create_complex(
        schema: &AttributeSchema,
        mut complex: ComplexAttribute,
        depth: usize,
    ) -> ValidationResult<ComplexAttribute> {
        let mut conformed = ComplexAttribute::new(complex.name());
        for (name, sub) in complex.take_sub_attributes() {
            let sub_schema = schema.resolve_sub_attribute(&name).ok_or_else(|| {
                ValidationError::UnknownSubAttribute {
                    attribute: schema.name().to_string(),
                    sub_attribute: name.clone(),
                }
            })?;
            conformed.set_sub_attribute(Self::create_at_depth(sub_schema, sub, depth + 1)?);
        }
        conformed.characteristics = Characteristics::from_schema(schema);
        Ok(conformed)
    }

    fn create_multi_valued(
        schema: &AttributeSchema,
        mut multi: MultiValuedAttribute,
        depth: usize,
    ) -> ValidationResult<MultiValuedAttribute> {
        let values = match (schema.data_type(), multi.take_values()) {
            (AttributeType::Complex, MultiValues::Complex(entries)) => {
                MultiValues::Complex(Self::create_entries(schema, entries, depth)?)
            }
            (AttributeType::Complex, MultiValues::Primitive(values)) if values.is_empty() => {
                MultiValues::Complex(Vec::new())
            }
            (data_type, MultiValues::Primitive(values)) if data_type.is_primitive() => {
                MultiValues::Primitive(
                    values
                        .into_iter()
                        .map(|value| Self::conform_value(schema, value))
                        .collect::<ValidationResult<Vec<_>>>()?,
                )
            }
            (data_type, MultiValues::Complex(entries)) if entries.is_empty() => {
                trace!("Empty '{}' converted to {} values", schema.name(), data_type.as_str());
                MultiValues::Primitive(Vec::new())
            }
            (data_type, values) => {
                let actual = match values {
                    MultiValues::Primitive(_) => "primitive values",
                    MultiValues::Complex(_) => "complex entries",
                };
                return Err(ValidationError::invalid_type(
                    schema.name(),
                    data_type.as_str(),
                    actual,
                ));
            }
        };
        multi.set_values(values);
        Ok(multi)
    }

    fn create_entries(
        schema: &AttributeSchema,
        entries: Vec<ComplexAttribute>,
        depth: usize,
    ) -> ValidationResult<Vec<ComplexAttribute>> {
        let mut identities = HashSet::new();
        let mut conformed = Vec::with_capacity(entries.len());
        for entry in entries {
            let mut entry = Self::create_complex(schema, entry, depth)?;
            let identity = entry_identity(schema.name(), &entry);
            if !identities.insert(identity.clone()) {
                return Err(ValidationError::DuplicateMultiValuedEntry {
                    attribute: schema.name().to_string(),
                    identity,
                });
            }
            entry.rename(identity);
            conformed.push(entry);
        }
        Ok(conformed)
    }

    /// Check a scalar against the schema type and canonical values.
    fn conform_value(schema: &AttributeSchema, value: AttributeValue) -> ValidationResult<AttributeValue> {
        let value = match (schema.data_type(), value) {
            (AttributeType::Decimal, AttributeValue::Integer(i)) => AttributeValue::Decimal(i as f64),
            (AttributeType::DateTime, AttributeValue::DateTime(dt)) => {
                AttributeValue::DateTime(dt.trunc_subsecs(0))
            }
            (AttributeType::Reference, AttributeValue::String(s)) => AttributeValue::Reference(s),
            (AttributeType::String, AttributeValue::Reference(s)) => AttributeValue::String(s),
            (expected, value) if value.data_type() == expected => value,
            (expected, value) => {
                return Err(ValidationError::invalid_type(
                    schema.name(),
                    expected.as_str(),
                    value.data_type().as_str(),
                ));
            }
        };

        if let AttributeValue::String(text) = &value {
            Self::check_canonical(schema, text)?;
        }
        Ok(value)
    }

    fn check_canonical(schema: &AttributeSchema, text: &str) -> ValidationResult<()> {
        let allowed = schema.canonical_values();
        if allowed.is_empty() {
            return Ok(());
        }
        let accepted = if schema.is_case_exact() {
            allowed.iter().any(|c| c == text)
        } else {
            allowed.iter().any(|c| c.eq_ignore_ascii_case(text))
        };
        if accepted {
            Ok(())
        } else {
            Err(ValidationError::InvalidCanonicalValue {
                attribute: schema.name().to_string(),
                value: text.to_string(),
                allowed: allowed.to_vec(),
            })
        }
    }
}
