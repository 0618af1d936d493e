//! Payload fixtures modeled on the RFC 7643 examples.

use serde_json::{Value, json};

pub const USER_URI: &str = "urn:ietf:params:scim:schemas:core:2.0:User";
pub const GROUP_URI: &str = "urn:ietf:params:scim:schemas:core:2.0:Group";
pub const ENTERPRISE_URI: &str = "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";
pub const ROLE_URI: &str = "urn:ietf:params:scim:schemas:extension:2.0:Role";
pub const CUSTOM_URI: &str = "urn:ietf:params:scim:schemas:extension:custom:2.0:User";

/// Custom User extension covering the scalar types the core schemas lack.
pub const CUSTOM_EXTENSION: &str = r#"[
  {
    "attributeURI": "urn:ietf:params:scim:schemas:extension:custom:2.0:User",
    "attributeName": "urn:ietf:params:scim:schemas:extension:custom:2.0:User",
    "dataType": "complex",
    "subAttributes": ["score", "since", "token", "badge"]
  },
  {
    "attributeURI": "urn:ietf:params:scim:schemas:extension:custom:2.0:User:score",
    "attributeName": "score",
    "dataType": "decimal"
  },
  {
    "attributeURI": "urn:ietf:params:scim:schemas:extension:custom:2.0:User:since",
    "attributeName": "since",
    "dataType": "dateTime"
  },
  {
    "attributeURI": "urn:ietf:params:scim:schemas:extension:custom:2.0:User:token",
    "attributeName": "token",
    "dataType": "binary"
  },
  {
    "attributeURI": "urn:ietf:params:scim:schemas:extension:custom:2.0:User:badge",
    "attributeName": "badge",
    "dataType": "complex",
    "subAttributes": ["code", "awarded"]
  },
  {
    "attributeURI": "urn:ietf:params:scim:schemas:extension:custom:2.0:User:badge.code",
    "attributeName": "code",
    "dataType": "string"
  },
  {
    "attributeURI": "urn:ietf:params:scim:schemas:extension:custom:2.0:User:badge.awarded",
    "attributeName": "awarded",
    "dataType": "dateTime"
  }
]"#;

pub fn minimal_user(user_name: &str) -> Value {
    json!({
        "schemas": [USER_URI],
        "userName": user_name
    })
}

/// Full user with core multi-valued data and the enterprise extension.
pub fn enterprise_user() -> Value {
    json!({
        "schemas": [USER_URI, ENTERPRISE_URI],
        "externalId": "701984",
        "userName": "bjensen@example.com",
        "name": {
            "formatted": "Ms. Barbara J Jensen, III",
            "familyName": "Jensen",
            "givenName": "Barbara"
        },
        "displayName": "Babs Jensen",
        "active": true,
        "emails": [
            {"value": "bjensen@example.com", "type": "work", "primary": true},
            {"value": "babs@jensen.org", "type": "home"}
        ],
        "phoneNumbers": [
            {"value": "555-555-5555", "type": "work"}
        ],
        ENTERPRISE_URI: {
            "employeeNumber": "701984",
            "costCenter": "4130",
            "organization": "Universal Studios",
            "department": "Tour Operations",
            "manager": {
                "value": "26118915-6090-4610-87e4-49d8ca9f808d",
                "displayName": "John Smith"
            }
        }
    })
}

/// User payload carrying server-owned data a client must not set.
pub fn user_with_client_meta() -> Value {
    json!({
        "schemas": [USER_URI],
        "id": "client-chosen",
        "userName": "mallory",
        "meta": {
            "resourceType": "User",
            "created": "2001-01-01T00:00:00",
            "location": "https://evil.example.com/Users/client-chosen"
        }
    })
}

pub fn group(display_name: &str) -> Value {
    json!({
        "schemas": [GROUP_URI],
        "displayName": display_name
    })
}
