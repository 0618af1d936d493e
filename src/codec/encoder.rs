//! Attribute tree to JSON encoding.
//!
//! The encoder does not consult any schema. It dispatches on the runtime
//! variant of each node, so anything that made it into a [`Resource`] can
//! be written back out.

use crate::attribute::{Attribute, AttributeValue, ComplexAttribute, MultiValues};
use crate::config::DATE_TIME_FORMAT;
use crate::error::{ScimError, ScimResult};
use crate::resource::Resource;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde_json::{Map, Number, Value};

/// Encodes [`Resource`]s as SCIM JSON.
pub struct Encoder;

impl Encoder {
    /// Compact JSON text of a resource.
    pub fn encode(resource: &Resource) -> ScimResult<String> {
        Ok(serde_json::to_string(&Self::encode_value(resource)?)?)
    }

    pub fn encode_pretty(resource: &Resource) -> ScimResult<String> {
        Ok(serde_json::to_string_pretty(&Self::encode_value(resource)?)?)
    }

    /// JSON object of a resource, with `schemas` as its first member.
    pub fn encode_value(resource: &Resource) -> ScimResult<Value> {
        let mut object = Map::new();
        object.insert(
            "schemas".to_string(),
            Value::Array(
                resource
                    .schemas()
                    .iter()
                    .map(|uri| Value::String(uri.clone()))
                    .collect(),
            ),
        );
        for (name, attribute) in resource.attributes() {
            object.insert(name.to_string(), Self::encode_attribute(attribute)?);
        }
        Ok(Value::Object(object))
    }

    pub fn encode_attribute(attribute: &Attribute) -> ScimResult<Value> {
        match attribute {
            Attribute::Simple(simple) => Self::encode_scalar(simple.value()),
            Attribute::Complex(complex) => Self::encode_complex(complex),
            Attribute::MultiValued(multi) => {
                let items = match multi.values() {
                    MultiValues::Primitive(values) => values
                        .iter()
                        .map(Self::encode_scalar)
                        .collect::<ScimResult<Vec<_>>>()?,
                    MultiValues::Complex(entries) => entries
                        .iter()
                        .map(Self::encode_complex)
                        .collect::<ScimResult<Vec<_>>>()?,
                };
                Ok(Value::Array(items))
            }
        }
    }

    fn encode_complex(complex: &ComplexAttribute) -> ScimResult<Value> {
        let mut object = Map::new();
        for sub in complex.sub_attributes() {
            object.insert(sub.name().to_string(), Self::encode_attribute(sub)?);
        }
        Ok(Value::Object(object))
    }

    pub fn encode_scalar(value: &AttributeValue) -> ScimResult<Value> {
        Ok(match value {
            AttributeValue::String(s) | AttributeValue::Reference(s) => Value::String(s.clone()),
            AttributeValue::Boolean(b) => Value::Bool(*b),
            AttributeValue::Integer(i) => Value::Number((*i).into()),
            AttributeValue::Decimal(d) => Value::Number(Number::from_f64(*d).ok_or_else(|| {
                ScimError::internal(format!("decimal value {} has no JSON representation", d))
            })?),
            AttributeValue::DateTime(dt) => Value::String(dt.format(DATE_TIME_FORMAT).to_string()),
            AttributeValue::Binary(bytes) => Value::String(BASE64.encode(bytes)),
        })
    }
}
