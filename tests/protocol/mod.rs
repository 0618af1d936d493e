//! Endpoint request flow and bulk processing over the in-memory handler.

use crate::common::{
    InMemoryHandler,
    fixtures::{self, USER_URI},
    registry,
};
use scim_core::config::ScimConfig;
use scim_core::endpoint::{ResourceEndpoint, ResourceHandler};
use scim_core::protocol::{
    BulkMethod, BulkOperation, BulkProcessor, BulkRequest, ERROR_SCHEMA, LIST_RESPONSE_SCHEMA,
    SearchRequest,
};
use serde_json::{Value, json};

fn endpoint() -> ResourceEndpoint<InMemoryHandler> {
    ResourceEndpoint::new(
        registry(),
        ScimConfig::new("https://scim.example.com"),
        InMemoryHandler::new(),
    )
}

fn body(value: &Value) -> String {
    value.to_string()
}

fn created_id(response: &scim_core::ScimResponse) -> String {
    response.body.as_ref().unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string()
}

#[test]
fn test_create_get_update_delete() {
    let endpoint = endpoint();

    let created = endpoint.create("/Users", &body(&fixtures::enterprise_user()));
    assert_eq!(created.status, 201);
    let id = created_id(&created);
    let created_body = created.body.unwrap();
    assert_eq!(
        created_body["meta"]["location"],
        format!("https://scim.example.com/v2/Users/{}", id)
    );
    assert_eq!(created_body["meta"]["resourceType"], "User");
    assert!(created_body["meta"]["version"].as_str().unwrap().starts_with("W/\""));

    let fetched = endpoint.get("/Users", &id, None);
    assert_eq!(fetched.status, 200);
    assert_eq!(fetched.body.as_ref().unwrap()["userName"], "bjensen@example.com");

    let updated = endpoint.update(
        "/Users",
        &id,
        &body(&json!({"schemas": [USER_URI], "userName": "bjensen@example.com", "title": "Tour Guide"})),
    );
    assert_eq!(updated.status, 200);
    let updated_body = updated.body.unwrap();
    assert_eq!(updated_body["id"], id.as_str());
    assert_eq!(updated_body["title"], "Tour Guide");
    assert_eq!(updated_body["meta"]["created"], created_body["meta"]["created"]);
    assert_eq!(updated_body["schemas"], json!([USER_URI]));

    assert_eq!(endpoint.delete("/Users", &id).status, 204);
    assert_eq!(endpoint.get("/Users", &id, None).status, 404);
    assert_eq!(endpoint.delete("/Users", &id).status, 404);
}

#[test]
fn test_errors_become_scim_error_bodies() {
    let endpoint = endpoint();

    let malformed = endpoint.create("/Users", "{not json");
    assert_eq!(malformed.status, 400);
    let error = malformed.body.unwrap();
    assert_eq!(error["schemas"], json!([ERROR_SCHEMA]));
    assert_eq!(error["scimType"], "invalidSyntax");

    let missing = endpoint.create("/Users", &body(&json!({"schemas": [USER_URI]})));
    assert_eq!(missing.status, 400);
    assert_eq!(missing.body.unwrap()["scimType"], "invalidValue");

    assert_eq!(endpoint.create("/Widgets", "{}").status, 404);
    assert_eq!(endpoint.handler().count("User"), 0);
}

#[test]
fn test_list_with_filter_and_paging() {
    let endpoint = endpoint();
    for name in ["ann", "bob", "cy"] {
        assert!(endpoint.create("/Users", &body(&fixtures::minimal_user(name))).is_success());
    }

    let mut request = SearchRequest::new();
    request.start_index = Some(2);
    request.count = Some(1);
    let page = endpoint.list("/Users", &request).body.unwrap();
    assert_eq!(page["schemas"], json!([LIST_RESPONSE_SCHEMA]));
    assert_eq!(page["totalResults"], 3);
    assert_eq!(page["itemsPerPage"], 1);
    assert_eq!(page["startIndex"], 2);

    let mut request = SearchRequest::new();
    request.filter = Some("userName eq \"bob\"".to_string());
    request.attributes = vec!["userName".to_string()];
    let filtered = endpoint.list("/Users", &request).body.unwrap();
    assert_eq!(filtered["totalResults"], 1);
    let bob = &filtered["Resources"][0];
    assert_eq!(bob["userName"], "bob");
    assert!(bob.get("id").is_some());
    assert!(bob.get("meta").is_none());
}

#[test]
fn test_bulk_continues_until_errors_exceed_limit() {
    let endpoint = endpoint();
    let post = |bulk_id: &str, data: Value| BulkOperation {
        method: BulkMethod::Post,
        bulk_id: Some(bulk_id.to_string()),
        version: None,
        path: "/Users".to_string(),
        data: Some(data),
    };
    let request = BulkRequest::new(
        vec![
            post("broken", json!({"schemas": [USER_URI], "displayName": "no user name"})),
            post("good", fixtures::minimal_user("grace")),
        ],
        Some(1),
    );

    let response = BulkProcessor::process(&endpoint, &request).unwrap();

    assert_eq!(response.operations.len(), 2);
    assert!(response.operations[0].is_error());
    assert_eq!(response.operations[0].status, "400");
    assert!(!response.operations[1].is_error());
    assert_eq!(response.operations[1].status, "201");
    assert!(response.operations[1].location.is_some());
    assert_eq!(endpoint.handler().count("User"), 1);
}

#[test]
fn test_bulk_group_references_created_user() {
    let endpoint = endpoint();
    let request: BulkRequest = serde_json::from_value(json!({
        "schemas": ["urn:ietf:params:scim:api:messages:2.0:BulkRequest"],
        "Operations": [
            {"method": "POST", "bulkId": "qwerty", "path": "/Users", "data": fixtures::minimal_user("alice")},
            {
                "method": "POST",
                "bulkId": "ytrewq",
                "path": "/Groups",
                "data": {
                    "schemas": [fixtures::GROUP_URI],
                    "displayName": "Tour Guides",
                    "members": [{"type": "User", "value": "bulkId:qwerty"}]
                }
            }
        ]
    }))
    .unwrap();

    let response = BulkProcessor::process(&endpoint, &request).unwrap();
    assert!(response.operations.iter().all(|op| !op.is_error()));

    let user_id = endpoint
        .handler()
        .list("User", None)
        .unwrap()
        .remove(0)
        .id()
        .unwrap()
        .to_string();
    let group_location = response.operations[1].location.clone().unwrap();
    let group_id = group_location.rsplit('/').next().unwrap();
    let group = endpoint.get("/Groups", group_id, None).body.unwrap();
    assert_eq!(group["members"][0]["value"], user_id);
}
