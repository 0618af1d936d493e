//! SCIM API messages and bulk processing.

pub mod bulk;
pub mod messages;

pub use bulk::{BulkOperationHandler, BulkOutcome, BulkProcessor};
pub use messages::{
    BULK_REQUEST_SCHEMA, BULK_RESPONSE_SCHEMA, BulkMethod, BulkOperation, BulkOperationResponse,
    BulkRequest, BulkResponse, ERROR_SCHEMA, ErrorResponse, LIST_RESPONSE_SCHEMA, ListResponse,
    PATCH_OP_SCHEMA, PatchOp, PatchOperation, PatchRequest, SEARCH_REQUEST_SCHEMA, SearchRequest,
    SortOrder,
};
