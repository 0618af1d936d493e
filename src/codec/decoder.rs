//! JSON to attribute tree decoding.
//!
//! Decoding is driven by the resource type schema, not by the JSON
//! document: attributes are visited in schema order and looked up in the
//! payload by short name, then by full URI. Keys the schema does not
//! declare are ignored and absent attributes are skipped; required-ness is
//! the validation engine's concern.

use crate::attribute::{
    Attribute, AttributeValue, ComplexAttribute, MultiValuedAttribute, SimpleAttribute,
};
use crate::config::DATE_TIME_FORMAT;
use crate::error::{ScimError, ScimResult};
use crate::resource::Resource;
use crate::schema::types::{AttributeSchema, AttributeType, ResourceTypeSchema};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use log::{debug, trace, warn};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Decodes SCIM JSON payloads into [`Resource`]s.
pub struct Decoder;

impl Decoder {
    /// Parse JSON text and decode it against `schema`.
    pub fn decode(json: &str, schema: Arc<ResourceTypeSchema>) -> ScimResult<Resource> {
        let value: Value = serde_json::from_str(json)?;
        Self::decode_value(&value, schema)
    }

    /// Decode an already parsed JSON document against `schema`.
    pub fn decode_value(value: &Value, schema: Arc<ResourceTypeSchema>) -> ScimResult<Resource> {
        let object = value.as_object().ok_or_else(|| {
            ScimError::malformed(format!(
                "{} payload must be a JSON object, got {}",
                schema.name(),
                json_type(value)
            ))
        })?;
        debug!("Decoding {} payload with {} members", schema.name(), object.len());

        let mut resource = Resource::new(Arc::clone(&schema));
        if let Some(schemas) = object.get("schemas") {
            resource.set_schemas(Self::decode_schemas(schemas)?);
        }

        for attribute_schema in schema.attributes() {
            let Some(value) = lookup(object, attribute_schema) else {
                continue;
            };
            if let Some(attribute) = Self::decode_attribute(attribute_schema, value)? {
                resource.set_attribute(attribute)?;
            }
        }
        Ok(resource)
    }

    fn decode_schemas(value: &Value) -> ScimResult<Vec<String>> {
        let items = value
            .as_array()
            .ok_or_else(|| ScimError::malformed("'schemas' must be an array of URIs"))?;
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| ScimError::malformed("'schemas' must be an array of URIs"))
            })
            .collect()
    }

    /// Decode one attribute; `None` for JSON null.
    pub fn decode_attribute(schema: &AttributeSchema, value: &Value) -> ScimResult<Option<Attribute>> {
        if value.is_null() {
            trace!("Skipping null '{}'", schema.uri());
            return Ok(None);
        }

        let attribute = match (schema.data_type(), schema.is_multi_valued()) {
            (AttributeType::Complex, false) => {
                Attribute::Complex(Self::decode_complex(schema, value, schema.name())?)
            }
            (AttributeType::Complex, true) => {
                let mut multi = MultiValuedAttribute::new_complex(schema.name());
                for item in expect_array(schema, value)? {
                    if item.is_null() {
                        warn!("Dropping null entry of '{}'", schema.uri());
                        continue;
                    }
                    multi.add_entry(Self::decode_complex(schema, item, schema.name())?)?;
                }
                Attribute::MultiValued(multi)
            }
            (_, false) => Attribute::Simple(SimpleAttribute::new(
                schema.name(),
                Self::decode_scalar(schema, value)?,
            )),
            (_, true) => {
                let mut values = Vec::new();
                for item in expect_array(schema, value)? {
                    if item.is_null() {
                        warn!("Dropping null value of '{}'", schema.uri());
                        continue;
                    }
                    values.push(Self::decode_scalar(schema, item)?);
                }
                Attribute::MultiValued(MultiValuedAttribute::new_primitive(schema.name(), values))
            }
        };
        Ok(Some(attribute))
    }

    fn decode_complex(
        schema: &AttributeSchema,
        value: &Value,
        name: &str,
    ) -> ScimResult<ComplexAttribute> {
        let object = value.as_object().ok_or_else(|| mismatch(schema, value))?;
        let mut complex = ComplexAttribute::new(name);
        for sub_schema in schema.sub_attributes() {
            let Some(sub_value) = lookup(object, sub_schema) else {
                continue;
            };
            if let Some(sub) = Self::decode_attribute(sub_schema, sub_value)? {
                complex.set_sub_attribute(sub);
            }
        }
        Ok(complex)
    }

    /// Decode a JSON scalar as a value of the schema's data type.
    pub fn decode_scalar(schema: &AttributeSchema, value: &Value) -> ScimResult<AttributeValue> {
        let decoded = match (schema.data_type(), value) {
            (AttributeType::String, Value::String(s)) => Some(AttributeValue::String(s.clone())),
            (AttributeType::Reference, Value::String(s)) => {
                Some(AttributeValue::Reference(s.clone()))
            }
            (AttributeType::Boolean, Value::Bool(b)) => Some(AttributeValue::Boolean(*b)),
            (AttributeType::Integer, Value::Number(n)) => n.as_i64().map(AttributeValue::Integer),
            (AttributeType::Decimal, Value::Number(n)) => n.as_f64().map(AttributeValue::Decimal),
            (AttributeType::DateTime, Value::String(s)) => {
                parse_date_time(s).map(AttributeValue::DateTime)
            }
            (AttributeType::Binary, Value::String(s)) => {
                BASE64.decode(s).ok().map(AttributeValue::Binary)
            }
            (AttributeType::Complex, _) => {
                return Err(ScimError::internal(format!(
                    "complex attribute '{}' decoded as a scalar",
                    schema.uri()
                )));
            }
            _ => None,
        };
        decoded.ok_or_else(|| mismatch(schema, value))
    }
}

/// Value of `schema`'s attribute in `object`: short name, then URI, then
/// a case-insensitive match on either.
fn lookup<'v>(object: &'v Map<String, Value>, schema: &AttributeSchema) -> Option<&'v Value> {
    object
        .get(schema.name())
        .or_else(|| object.get(schema.uri()))
        .or_else(|| {
            object
                .iter()
                .find(|(key, _)| schema.matches(key))
                .map(|(_, value)| value)
        })
}

fn expect_array<'v>(schema: &AttributeSchema, value: &'v Value) -> ScimResult<&'v Vec<Value>> {
    value.as_array().ok_or_else(|| mismatch(schema, value))
}

/// Timestamps use the fixed wire pattern; RFC 3339 is accepted as well.
/// Sub-second precision is discarded.
pub(crate) fn parse_date_time(text: &str) -> Option<DateTime<Utc>> {
    let parsed = NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(text).map(|dt| dt.with_timezone(&Utc)))
        .ok()?;
    Some(parsed.with_nanosecond(0).unwrap_or(parsed))
}

fn mismatch(schema: &AttributeSchema, value: &Value) -> ScimError {
    let expected = match (schema.data_type(), schema.is_multi_valued()) {
        (data_type, true) => format!("an array of {}", data_type.as_str()),
        (data_type, false) => data_type.as_str().to_string(),
    };
    ScimError::malformed(format!(
        "attribute '{}' expects {}, got {}",
        schema.uri(),
        expected,
        json_type(value)
    ))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
