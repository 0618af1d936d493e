//! Glue between wire payloads, the validation engine and persistence.
//!
//! [`ResourceEndpoint`] runs every request through the same pipeline:
//! decode against the endpoint's resource type schema, apply server-side
//! validation, hand the tree to the host's [`ResourceHandler`], then encode
//! the stored resource for the client. Failures become SCIM error bodies.

use crate::codec::{Decoder, Encoder};
use crate::config::ScimConfig;
use crate::error::{ScimError, ScimResult};
use crate::protocol::{
    BulkMethod, BulkOperation, BulkOperationHandler, BulkOutcome, ErrorResponse, ListResponse,
    SearchRequest,
};
use crate::resource::Resource;
use crate::schema::{ResourceTypeSchema, SchemaRegistry};
use crate::validation::{AttributeProjection, ServerSideValidator};
use log::{debug, info, warn};
use serde_json::{Value, json};
use std::sync::Arc;

/// Persistence port implemented by the host application.
///
/// Resources handed to `create` and `update` have passed validation and
/// carry their final `id` and `meta`.
pub trait ResourceHandler {
    fn create(&self, resource: Resource) -> ScimResult<Resource>;

    fn get(&self, resource_type: &str, id: &str) -> ScimResult<Option<Resource>>;

    fn update(&self, resource: Resource) -> ScimResult<Resource>;

    /// Returns `false` when no such resource exists.
    fn delete(&self, resource_type: &str, id: &str) -> ScimResult<bool>;

    /// All resources of a type matching `filter`. Filter evaluation belongs
    /// to the handler; `None` lists everything.
    fn list(&self, resource_type: &str, filter: Option<&str>) -> ScimResult<Vec<Resource>>;
}

/// Status and body of one endpoint response.
#[derive(Debug, Clone, PartialEq)]
pub struct ScimResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl ScimResponse {
    fn ok(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    fn no_content() -> Self {
        Self {
            status: 204,
            body: None,
        }
    }

    fn from_result(result: ScimResult<Self>) -> Self {
        result.unwrap_or_else(|error| Self::error(&error))
    }

    pub fn error(error: &ScimError) -> Self {
        debug!("Request failed: {}", error);
        Self {
            status: error.status(),
            body: Some(error_body(ErrorResponse::from(error))),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Serialized error body; a bare `{schemas, status, detail}` object when
/// serialization fails.
fn error_body(response: ErrorResponse) -> Value {
    serde_json::to_value(&response).unwrap_or_else(|e| {
        warn!("Failed to serialize error response: {}", e);
        json!({
            "schemas": response.schemas,
            "status": response.status,
            "detail": response.detail,
        })
    })
}

/// Resource CRUD over JSON payloads.
pub struct ResourceEndpoint<H> {
    registry: SchemaRegistry,
    validator: ServerSideValidator,
    handler: H,
}

impl<H: ResourceHandler> ResourceEndpoint<H> {
    pub fn new(registry: SchemaRegistry, config: ScimConfig, handler: H) -> Self {
        info!(
            "Serving resource types {:?} at {}",
            registry.resource_type_names(),
            config.base_url
        );
        Self {
            registry,
            validator: ServerSideValidator::new(config),
            handler,
        }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// `POST <endpoint>`
    pub fn create(&self, endpoint: &str, body: &str) -> ScimResponse {
        ScimResponse::from_result(
            self.create_resource(endpoint, body)
                .and_then(|stored| Ok(ScimResponse::ok(201, self.render(stored, None)?))),
        )
    }

    /// `GET <endpoint>/<id>`
    pub fn get(&self, endpoint: &str, id: &str, projection: Option<&AttributeProjection>) -> ScimResponse {
        ScimResponse::from_result(
            self.find(endpoint, id)
                .and_then(|stored| Ok(ScimResponse::ok(200, self.render(stored, projection)?))),
        )
    }

    /// `PUT <endpoint>/<id>`
    pub fn update(&self, endpoint: &str, id: &str, body: &str) -> ScimResponse {
        ScimResponse::from_result(
            self.replace_resource(endpoint, id, body)
                .and_then(|stored| Ok(ScimResponse::ok(200, self.render(stored, None)?))),
        )
    }

    /// `DELETE <endpoint>/<id>`
    pub fn delete(&self, endpoint: &str, id: &str) -> ScimResponse {
        ScimResponse::from_result(
            self.delete_resource(endpoint, id)
                .map(|()| ScimResponse::no_content()),
        )
    }

    /// `GET <endpoint>` or `POST <endpoint>/.search`
    pub fn list(&self, endpoint: &str, request: &SearchRequest) -> ScimResponse {
        ScimResponse::from_result(self.list_resources(endpoint, request))
    }

    fn schema_for(&self, endpoint: &str) -> ScimResult<Arc<ResourceTypeSchema>> {
        self.registry.get_resource_schema_by_endpoint(endpoint)
    }

    fn create_resource(&self, endpoint: &str, body: &str) -> ScimResult<Resource> {
        let schema = self.schema_for(endpoint)?;
        let mut resource = Decoder::decode(body, schema)?;
        self.validator.validate_create(&mut resource)?;
        self.handler.create(resource)
    }

    fn find(&self, endpoint: &str, id: &str) -> ScimResult<Resource> {
        let schema = self.schema_for(endpoint)?;
        self.handler
            .get(schema.name(), id)?
            .ok_or_else(|| ScimError::not_found(format!("{} '{}'", schema.name(), id)))
    }

    fn replace_resource(&self, endpoint: &str, id: &str, body: &str) -> ScimResult<Resource> {
        let old = self.find(endpoint, id)?;
        let mut resource = Decoder::decode(body, old.schema_handle())?;
        self.validator.validate_update(&old, &mut resource)?;
        self.handler.update(resource)
    }

    fn delete_resource(&self, endpoint: &str, id: &str) -> ScimResult<()> {
        let schema = self.schema_for(endpoint)?;
        if self.handler.delete(schema.name(), id)? {
            Ok(())
        } else {
            Err(ScimError::not_found(format!("{} '{}'", schema.name(), id)))
        }
    }

    fn list_resources(&self, endpoint: &str, request: &SearchRequest) -> ScimResult<ScimResponse> {
        request.validate()?;
        let schema = self.schema_for(endpoint)?;
        let matches = self.handler.list(schema.name(), request.filter.as_deref())?;
        let total = matches.len();

        let start_index = request.start_index.unwrap_or(1).max(1);
        let count = request.count.unwrap_or(total);
        let projection = request.projection();
        let page = matches
            .into_iter()
            .skip(start_index - 1)
            .take(count)
            .map(|resource| self.render(resource, Some(&projection)))
            .collect::<ScimResult<Vec<_>>>()?;

        let list = ListResponse::new(page, total, start_index);
        Ok(ScimResponse::ok(200, serde_json::to_value(list)?))
    }

    fn render(&self, mut resource: Resource, projection: Option<&AttributeProjection>) -> ScimResult<Value> {
        self.validator.validate_retrieve(&mut resource, projection);
        Encoder::encode_value(&resource)
    }
}

/// Splits `/Users/123` into `("/Users", Some("123"))`.
fn split_path(path: &str) -> (String, Option<String>) {
    let trimmed = path.trim_matches('/');
    match trimmed.split_once('/') {
        Some((endpoint, id)) if !id.is_empty() => (format!("/{}", endpoint), Some(id.to_string())),
        Some((endpoint, _)) => (format!("/{}", endpoint), None),
        None => (format!("/{}", trimmed), None),
    }
}

fn outcome(status: u16, resource: &Resource) -> BulkOutcome {
    BulkOutcome {
        status,
        id: resource.id().map(str::to_string),
        location: resource.location().map(str::to_string),
        version: resource.version().map(str::to_string),
    }
}

impl<H: ResourceHandler> BulkOperationHandler for ResourceEndpoint<H> {
    fn handle(&self, operation: &BulkOperation) -> ScimResult<BulkOutcome> {
        let (endpoint, id) = split_path(&operation.path);
        let body = || -> ScimResult<String> {
            let data = operation.data.as_ref().ok_or_else(|| {
                ScimError::malformed(format!("bulk {:?} requires data", operation.method))
            })?;
            Ok(data.to_string())
        };
        let id = || {
            id.clone().ok_or_else(|| {
                ScimError::malformed(format!("bulk path '{}' names no resource", operation.path))
            })
        };

        match operation.method {
            BulkMethod::Post => {
                let created = self.create_resource(&endpoint, &body()?)?;
                Ok(outcome(201, &created))
            }
            BulkMethod::Put => {
                let updated = self.replace_resource(&endpoint, &id()?, &body()?)?;
                Ok(outcome(200, &updated))
            }
            BulkMethod::Delete => {
                let id = id()?;
                self.delete_resource(&endpoint, &id)?;
                Ok(BulkOutcome {
                    status: 204,
                    id: Some(id),
                    location: None,
                    version: None,
                })
            }
            BulkMethod::Patch => Err(ScimError::malformed(
                "PATCH operations are not executed by this endpoint",
            )),
        }
    }
}
