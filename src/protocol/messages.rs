//! SCIM API message shapes (RFC 7644).
//!
//! Resources inside these envelopes stay as `serde_json::Value`; they are
//! produced and consumed by the [`codec`](crate::codec).

use crate::error::{ScimError, ScimResult};
use crate::validation::AttributeProjection;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const LIST_RESPONSE_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:ListResponse";
pub const SEARCH_REQUEST_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:SearchRequest";
pub const PATCH_OP_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";
pub const BULK_REQUEST_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:BulkRequest";
pub const BULK_RESPONSE_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:BulkResponse";
pub const ERROR_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:Error";

/// List response envelope (RFC 7644 Section 3.4.2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub schemas: Vec<String>,
    pub total_results: usize,
    pub items_per_page: usize,
    pub start_index: usize,
    #[serde(rename = "Resources", default)]
    pub resources: Vec<Value>,
}

impl ListResponse {
    /// Page of `resources` out of `total_results` matches, starting at the
    /// 1-based `start_index`.
    pub fn new(resources: Vec<Value>, total_results: usize, start_index: usize) -> Self {
        Self {
            schemas: vec![LIST_RESPONSE_SCHEMA.to_string()],
            total_results,
            items_per_page: resources.len(),
            start_index,
            resources,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Query sent to `/.search` (RFC 7644 Section 3.4.3).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub schemas: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_attributes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl SearchRequest {
    pub fn new() -> Self {
        Self {
            schemas: vec![SEARCH_REQUEST_SCHEMA.to_string()],
            ..Self::default()
        }
    }

    /// A search request names exactly one schema.
    pub fn validate(&self) -> ScimResult<()> {
        if self.schemas.len() != 1 {
            return Err(ScimError::malformed(format!(
                "search request must name exactly one schema, got {}",
                self.schemas.len()
            )));
        }
        Ok(())
    }

    /// Attribute selection requested by this search.
    pub fn projection(&self) -> AttributeProjection {
        AttributeProjection::new(self.attributes.clone(), self.excluded_attributes.clone())
    }
}

/// PATCH operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    #[serde(alias = "Add", alias = "ADD")]
    Add,
    #[serde(alias = "Remove", alias = "REMOVE")]
    Remove,
    #[serde(alias = "Replace", alias = "REPLACE")]
    Replace,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// PATCH request body (RFC 7644 Section 3.5.2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchRequest {
    #[serde(default)]
    pub schemas: Vec<String>,
    #[serde(rename = "Operations")]
    pub operations: Vec<PatchOperation>,
}

impl PatchRequest {
    pub fn new(operations: Vec<PatchOperation>) -> Self {
        Self {
            schemas: vec![PATCH_OP_SCHEMA.to_string()],
            operations,
        }
    }

    /// `remove` needs a path; `add` and `replace` need a value.
    pub fn validate(&self) -> ScimResult<()> {
        if self.operations.is_empty() {
            return Err(ScimError::malformed("patch request has no operations"));
        }
        for (index, operation) in self.operations.iter().enumerate() {
            match operation.op {
                PatchOp::Remove if operation.path.is_none() => {
                    return Err(ScimError::malformed(format!(
                        "remove operation at index {} requires a path",
                        index
                    )));
                }
                PatchOp::Add | PatchOp::Replace if operation.value.is_none() => {
                    return Err(ScimError::malformed(format!(
                        "{:?} operation at index {} requires a value",
                        operation.op, index
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// HTTP method of one bulk operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BulkMethod {
    Post,
    Put,
    Patch,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOperation {
    pub method: BulkMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulk_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Bulk request body (RFC 7644 Section 3.7).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRequest {
    #[serde(default)]
    pub schemas: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on_errors: Option<usize>,
    #[serde(rename = "Operations")]
    pub operations: Vec<BulkOperation>,
}

impl BulkRequest {
    pub fn new(operations: Vec<BulkOperation>, fail_on_errors: Option<usize>) -> Self {
        Self {
            schemas: vec![BULK_REQUEST_SCHEMA.to_string()],
            fail_on_errors,
            operations,
        }
    }

    /// Every path targets `/Users` or `/Groups`; every POST carries a bulkId.
    pub fn validate(&self) -> ScimResult<()> {
        for (index, operation) in self.operations.iter().enumerate() {
            if !operation.path.contains("/Users") && !operation.path.contains("/Groups") {
                return Err(ScimError::malformed(format!(
                    "bulk operation {} targets unsupported path '{}'",
                    index, operation.path
                )));
            }
            if operation.method == BulkMethod::Post && operation.bulk_id.is_none() {
                return Err(ScimError::malformed(format!(
                    "bulk POST operation {} requires a bulkId",
                    index
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOperationResponse {
    pub method: BulkMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulk_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

impl BulkOperationResponse {
    pub fn is_error(&self) -> bool {
        !self.status.starts_with('2')
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkResponse {
    pub schemas: Vec<String>,
    #[serde(rename = "Operations")]
    pub operations: Vec<BulkOperationResponse>,
}

impl BulkResponse {
    pub fn new(operations: Vec<BulkOperationResponse>) -> Self {
        Self {
            schemas: vec![BULK_RESPONSE_SCHEMA.to_string()],
            operations,
        }
    }
}

/// Error body (RFC 7644 Section 3.12).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub schemas: Vec<String>,
    pub status: String,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scim_type: Option<String>,
}

impl From<&ScimError> for ErrorResponse {
    fn from(error: &ScimError) -> Self {
        Self {
            schemas: vec![ERROR_SCHEMA.to_string()],
            status: error.status().to_string(),
            detail: error.to_string(),
            scim_type: error.scim_type().map(str::to_string),
        }
    }
}
