//! Response attribute selection.
//!
//! Applies the `returned` characteristic and the `attributes` /
//! `excludedAttributes` query parameters to a resource on its way out.
//! Pruning happens in place; multi-valued entries keep the identity names
//! they had before pruning.

use crate::attribute::{Attribute, ComplexAttribute};
use crate::resource::Resource;
use crate::schema::types::{AttributeSchema, ResourceTypeSchema, Returned};
use log::debug;
use std::collections::{HashMap, HashSet};

/// Attribute paths requested or excluded by a client.
///
/// Paths may be short names (`userName`), dotted sub-attribute paths
/// (`name.givenName`) or full URIs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeProjection {
    attributes: Vec<String>,
    excluded_attributes: Vec<String>,
}

/// A resolved path: top-level attribute name plus optional sub-attribute.
type ResolvedPath = (String, Option<String>);

impl AttributeProjection {
    pub fn new(attributes: Vec<String>, excluded_attributes: Vec<String>) -> Self {
        Self {
            attributes,
            excluded_attributes,
        }
    }

    /// Build from comma separated query parameter values.
    pub fn from_query(attributes: Option<&str>, excluded_attributes: Option<&str>) -> Self {
        let split = |list: Option<&str>| -> Vec<String> {
            list.map(|l| {
                l.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
        };
        Self::new(split(attributes), split(excluded_attributes))
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn excluded_attributes(&self) -> &[String] {
        &self.excluded_attributes
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.excluded_attributes.is_empty()
    }

    /// Prune `resource` to what this projection selects.
    ///
    /// `returned: always` attributes survive any projection. `returned:
    /// request` attributes survive only when explicitly requested.
    pub fn apply(&self, resource: &mut Resource) {
        let schema = resource.schema_handle();
        let requested = group(&schema, &self.attributes);
        let excluded = group(&schema, &self.excluded_attributes);

        for attribute_schema in schema.attributes() {
            let name = attribute_schema.name();
            if !resource.has_attribute(name) || attribute_schema.returned() == Returned::Always {
                continue;
            }

            let keep = if requested.is_empty() {
                attribute_schema.returned() != Returned::Request
            } else {
                requested.contains_key(name)
            };
            if !keep {
                resource.remove_attribute(name);
                continue;
            }

            if let Some(Some(subs)) = requested.get(name) {
                retain_sub_attributes(resource, attribute_schema, |sub| {
                    sub.returned() == Returned::Always || subs.contains(sub.name())
                });
            }
            match excluded.get(name) {
                Some(None) => {
                    resource.remove_attribute(name);
                }
                Some(Some(subs)) => {
                    retain_sub_attributes(resource, attribute_schema, |sub| {
                        sub.returned() == Returned::Always || !subs.contains(sub.name())
                    });
                }
                None => {}
            }
        }
        debug!(
            "Projected {} with {} requested and {} excluded paths",
            resource.resource_type(),
            self.attributes.len(),
            self.excluded_attributes.len()
        );
    }
}

/// Remove attributes and sub-attributes whose `returned` is `never`.
pub fn remove_never_returned(resource: &mut Resource) {
    let schema = resource.schema_handle();
    for attribute_schema in schema.attributes() {
        if attribute_schema.returned() == Returned::Never {
            resource.remove_attribute(attribute_schema.name());
        } else if !attribute_schema.sub_attributes().is_empty() {
            retain_sub_attributes(resource, attribute_schema, |sub| {
                sub.returned() != Returned::Never
            });
        }
    }
}

/// Group resolved paths by top-level attribute. `None` selects the whole
/// attribute; `Some(names)` only the listed sub-attributes.
fn group(schema: &ResourceTypeSchema, paths: &[String]) -> HashMap<String, Option<HashSet<String>>> {
    let mut grouped: HashMap<String, Option<HashSet<String>>> = HashMap::new();
    for path in paths {
        let Some((top, sub)) = resolve_path(schema, path) else {
            debug!("Ignoring unknown attribute path '{}'", path);
            continue;
        };
        match sub {
            None => {
                grouped.insert(top, None);
            }
            Some(sub) => {
                // a whole-attribute selection already covers the sub-attribute
                if let Some(subs) = grouped.entry(top).or_insert_with(|| Some(HashSet::new())) {
                    subs.insert(sub);
                }
            }
        }
    }
    grouped
}

fn resolve_path(schema: &ResourceTypeSchema, path: &str) -> Option<ResolvedPath> {
    if let Some(attribute) = schema.resolve_attribute(path) {
        return Some((attribute.name().to_string(), None));
    }
    for attribute in schema.attributes() {
        if let Some(sub) = attribute
            .sub_attributes()
            .iter()
            .find(|sub| sub.uri().eq_ignore_ascii_case(path))
        {
            return Some((attribute.name().to_string(), Some(sub.name().to_string())));
        }
    }
    let (parent, child) = path.rsplit_once('.')?;
    let attribute = schema.resolve_attribute(parent)?;
    let sub = attribute.resolve_sub_attribute(child)?;
    Some((attribute.name().to_string(), Some(sub.name().to_string())))
}

fn retain_sub_attributes<F>(resource: &mut Resource, schema: &AttributeSchema, keep: F)
where
    F: Fn(&AttributeSchema) -> bool,
{
    let prune = |complex: &mut ComplexAttribute| {
        for sub in schema.sub_attributes() {
            if !keep(sub) {
                complex.remove_sub_attribute(sub.name());
            }
        }
    };
    match resource.attribute_mut(schema.name()) {
        Some(Attribute::Complex(complex)) => prune(complex),
        Some(Attribute::MultiValued(multi)) => multi.entries_mut().iter_mut().for_each(prune),
        _ => {}
    }
}
