//! Bulk request processing.
//!
//! [`BulkProcessor`] walks the operations of a [`BulkRequest`] in order,
//! hands each one to a [`BulkOperationHandler`] and collects one
//! sub-response per operation. Processing stops only once the number of
//! failed operations exceeds `failOnErrors`; the overall response is a
//! success envelope either way.

use super::messages::{
    BulkMethod, BulkOperation, BulkOperationResponse, BulkRequest, BulkResponse, ErrorResponse,
};
use crate::error::{ScimError, ScimResult};
use log::{debug, warn};
use serde_json::Value;
use std::collections::HashMap;

const BULK_ID_PREFIX: &str = "bulkId:";

/// Result of one successfully executed bulk operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkOutcome {
    pub status: u16,
    /// Id of the resource created or modified
    pub id: Option<String>,
    pub location: Option<String>,
    pub version: Option<String>,
}

/// Executes single bulk operations.
pub trait BulkOperationHandler {
    fn handle(&self, operation: &BulkOperation) -> ScimResult<BulkOutcome>;
}

/// Runs bulk requests against a [`BulkOperationHandler`].
pub struct BulkProcessor;

impl BulkProcessor {
    pub fn process<H>(handler: &H, request: &BulkRequest) -> ScimResult<BulkResponse>
    where
        H: BulkOperationHandler + ?Sized,
    {
        request.validate()?;

        let mut created_ids: HashMap<String, String> = HashMap::new();
        let mut responses = Vec::with_capacity(request.operations.len());
        let mut error_count = 0usize;

        for operation in &request.operations {
            let operation = substitute_bulk_ids(operation, &created_ids);
            match handler.handle(&operation) {
                Ok(outcome) => {
                    if let (BulkMethod::Post, Some(bulk_id), Some(id)) =
                        (operation.method, &operation.bulk_id, &outcome.id)
                    {
                        created_ids.insert(bulk_id.clone(), id.clone());
                    }
                    responses.push(BulkOperationResponse {
                        method: operation.method,
                        bulk_id: operation.bulk_id.clone(),
                        version: outcome.version,
                        location: outcome.location,
                        status: outcome.status.to_string(),
                        response: None,
                    });
                }
                Err(error) => {
                    error_count += 1;
                    warn!(
                        "Bulk {:?} {} failed: {}",
                        operation.method, operation.path, error
                    );
                    responses.push(error_response(&operation, &error)?);
                    if request.fail_on_errors.is_some_and(|limit| error_count > limit) {
                        debug!("Aborting bulk request after {} errors", error_count);
                        break;
                    }
                }
            }
        }

        Ok(BulkResponse::new(responses))
    }
}

fn error_response(operation: &BulkOperation, error: &ScimError) -> ScimResult<BulkOperationResponse> {
    Ok(BulkOperationResponse {
        method: operation.method,
        bulk_id: operation.bulk_id.clone(),
        version: None,
        location: None,
        status: error.status().to_string(),
        response: Some(serde_json::to_value(ErrorResponse::from(error))?),
    })
}

/// Replace `bulkId:<id>` references with ids created earlier in the request.
fn substitute_bulk_ids(operation: &BulkOperation, created: &HashMap<String, String>) -> BulkOperation {
    let mut operation = operation.clone();
    if created.is_empty() {
        return operation;
    }
    operation.path = substitute_text(&operation.path, created);
    if let Some(data) = operation.data.as_mut() {
        substitute_value(data, created);
    }
    operation
}

fn substitute_value(value: &mut Value, created: &HashMap<String, String>) {
    match value {
        Value::String(text) => *text = substitute_text(text, created),
        Value::Array(items) => items.iter_mut().for_each(|item| substitute_value(item, created)),
        Value::Object(members) => members
            .values_mut()
            .for_each(|member| substitute_value(member, created)),
        _ => {}
    }
}

fn substitute_text(text: &str, created: &HashMap<String, String>) -> String {
    if !text.contains(BULK_ID_PREFIX) {
        return text.to_string();
    }
    created.iter().fold(text.to_string(), |acc, (bulk_id, id)| {
        acc.replace(&format!("{}{}", BULK_ID_PREFIX, bulk_id), id)
    })
}
