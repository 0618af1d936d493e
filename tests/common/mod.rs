//! Shared utilities for the integration suite.
//!
//! Provides logging setup, registry and payload fixtures, and an in-memory
//! [`ResourceHandler`] that stands in for a host's persistence layer.

use scim_core::endpoint::ResourceHandler;
use scim_core::error::{ScimError, ScimResult};
use scim_core::resource::Resource;
use scim_core::schema::SchemaRegistry;
use std::collections::HashMap;
use std::sync::RwLock;

pub mod fixtures;

/// Route crate logging through the test harness.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Registry with the core schemas and the enterprise User extension.
pub fn registry() -> SchemaRegistry {
    init_logging();
    SchemaRegistry::new().expect("default registry should build")
}

/// Resources keyed by resource type and id.
#[derive(Debug, Default)]
pub struct InMemoryHandler {
    resources: RwLock<HashMap<(String, String), Resource>>,
}

impl InMemoryHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, resource_type: &str) -> usize {
        self.resources
            .read()
            .expect("lock poisoned")
            .keys()
            .filter(|(kind, _)| kind == resource_type)
            .count()
    }

    fn key(resource: &Resource) -> ScimResult<(String, String)> {
        let id = resource
            .id()
            .ok_or_else(|| ScimError::internal("stored resource has no id"))?;
        Ok((resource.resource_type().to_string(), id.to_string()))
    }
}

impl ResourceHandler for InMemoryHandler {
    fn create(&self, resource: Resource) -> ScimResult<Resource> {
        let key = Self::key(&resource)?;
        self.resources
            .write()
            .expect("lock poisoned")
            .insert(key, resource.clone());
        Ok(resource)
    }

    fn get(&self, resource_type: &str, id: &str) -> ScimResult<Option<Resource>> {
        Ok(self
            .resources
            .read()
            .expect("lock poisoned")
            .get(&(resource_type.to_string(), id.to_string()))
            .cloned())
    }

    fn update(&self, resource: Resource) -> ScimResult<Resource> {
        let key = Self::key(&resource)?;
        let mut resources = self.resources.write().expect("lock poisoned");
        if !resources.contains_key(&key) {
            return Err(ScimError::not_found(format!("{} '{}'", key.0, key.1)));
        }
        resources.insert(key, resource.clone());
        Ok(resource)
    }

    fn delete(&self, resource_type: &str, id: &str) -> ScimResult<bool> {
        Ok(self
            .resources
            .write()
            .expect("lock poisoned")
            .remove(&(resource_type.to_string(), id.to_string()))
            .is_some())
    }

    /// Supports `userName eq "<value>"` and nothing else.
    fn list(&self, resource_type: &str, filter: Option<&str>) -> ScimResult<Vec<Resource>> {
        let wanted = match filter {
            Some(filter) => Some(parse_user_name_filter(filter)?),
            None => None,
        };
        let resources = self.resources.read().expect("lock poisoned");
        let mut matches: Vec<Resource> = resources
            .iter()
            .filter(|((kind, _), _)| kind == resource_type)
            .map(|(_, resource)| resource)
            .filter(|resource| match &wanted {
                Some(user_name) => resource
                    .get_attribute("userName")
                    .and_then(|attribute| attribute.as_simple())
                    .and_then(|simple| simple.value().as_str())
                    .is_some_and(|value| value.eq_ignore_ascii_case(user_name)),
                None => true,
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.created().cmp(&b.created()).then(a.id().cmp(&b.id())));
        Ok(matches)
    }
}

fn parse_user_name_filter(filter: &str) -> ScimResult<String> {
    let mut parts = filter.splitn(3, ' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(attribute), Some(op), Some(value))
            if attribute.eq_ignore_ascii_case("userName") && op.eq_ignore_ascii_case("eq") =>
        {
            Ok(value.trim_matches('"').to_string())
        }
        _ => Err(ScimError::malformed(format!("unsupported filter '{}'", filter))),
    }
}
