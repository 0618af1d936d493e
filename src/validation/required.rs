//! Required attribute enforcement.

use crate::attribute::{Attribute, ComplexAttribute};
use crate::error::{ValidationError, ValidationResult};
use crate::resource::Resource;
use crate::schema::types::AttributeSchema;
use log::trace;

/// Fail on the first required attribute or sub-attribute without a value.
///
/// Sub-attributes are checked in every present occurrence of their parent,
/// including every entry of a multi-valued complex attribute. An empty
/// multi-valued attribute counts as missing.
pub fn check_required(resource: &Resource) -> ValidationResult<()> {
    for schema in resource.schema().attributes() {
        match resource.get_attribute(schema.name()) {
            Some(attribute) if !is_empty(attribute) => check_present(schema, attribute)?,
            _ if schema.is_required() => {
                return Err(ValidationError::missing_required(schema.name()));
            }
            _ => {}
        }
    }
    trace!("Required attributes present on {}", resource.resource_type());
    Ok(())
}

fn check_present(schema: &AttributeSchema, attribute: &Attribute) -> ValidationResult<()> {
    match attribute {
        Attribute::Simple(_) => Ok(()),
        Attribute::Complex(complex) => check_complex(schema, complex),
        Attribute::MultiValued(multi) => multi
            .entries()
            .iter()
            .try_for_each(|entry| check_complex(schema, entry)),
    }
}

fn check_complex(schema: &AttributeSchema, complex: &ComplexAttribute) -> ValidationResult<()> {
    for sub in schema.sub_attributes() {
        match complex.sub_attribute(sub.name()) {
            Some(attribute) if !is_empty(attribute) => check_present(sub, attribute)?,
            _ if sub.is_required() => {
                return Err(ValidationError::missing_required_sub(schema.name(), sub.name()));
            }
            _ => {}
        }
    }
    Ok(())
}

fn is_empty(attribute: &Attribute) -> bool {
    match attribute {
        Attribute::Simple(_) => false,
        Attribute::Complex(complex) => complex.is_empty(),
        Attribute::MultiValued(multi) => multi.is_empty(),
    }
}
