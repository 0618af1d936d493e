//! Embedded SCIM schemas.
//!
//! The core User, Group and Role schemas are embedded as RFC 7643 schema
//! documents. The default enterprise extension is embedded in the
//! extension attribute configuration format consumed by
//! [`ExtensionSchemaBuilder`](super::extension::ExtensionSchemaBuilder).
//! Keys left out of a document take the serde defaults of
//! [`AttributeDefinition`](super::types::AttributeDefinition).

/// URI of the core User schema.
pub const USER_SCHEMA_URI: &str = "urn:ietf:params:scim:schemas:core:2.0:User";
/// URI of the core Group schema.
pub const GROUP_SCHEMA_URI: &str = "urn:ietf:params:scim:schemas:core:2.0:Group";
/// URI of the Role schema.
pub const ROLE_SCHEMA_URI: &str = "urn:ietf:params:scim:schemas:extension:2.0:Role";
/// URI of the enterprise User extension.
pub const ENTERPRISE_USER_SCHEMA_URI: &str =
    "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";

/// Returns the core User schema as a JSON string.
pub fn core_user_schema() -> &'static str {
    r#"{
  "id": "urn:ietf:params:scim:schemas:core:2.0:User",
  "name": "User",
  "description": "User Account",
  "attributes": [
    {
      "name": "id",
      "type": "string",
      "multiValued": false,
      "required": false,
      "caseExact": true,
      "mutability": "readOnly",
      "returned": "always",
      "uniqueness": "server"
    },
    {
      "name": "externalId",
      "type": "string",
      "multiValued": false,
      "required": false,
      "caseExact": true,
      "mutability": "readWrite",
      "returned": "default",
      "uniqueness": "none"
    },
    {
      "name": "meta",
      "type": "complex",
      "multiValued": false,
      "required": false,
      "mutability": "readOnly",
      "returned": "default",
      "subAttributes": [
        { "name": "resourceType", "type": "string", "caseExact": true, "mutability": "readOnly" },
        { "name": "created", "type": "dateTime", "mutability": "readOnly" },
        { "name": "lastModified", "type": "dateTime", "mutability": "readOnly" },
        { "name": "location", "type": "reference", "caseExact": true, "mutability": "readOnly", "referenceTypes": ["uri"] },
        { "name": "version", "type": "string", "caseExact": true, "mutability": "readOnly" },
        { "name": "attributes", "type": "string", "multiValued": true, "mutability": "readOnly" }
      ]
    },
    {
      "name": "userName",
      "type": "string",
      "multiValued": false,
      "required": true,
      "caseExact": false,
      "mutability": "readWrite",
      "returned": "default",
      "uniqueness": "server"
    },
    {
      "name": "name",
      "type": "complex",
      "multiValued": false,
      "required": false,
      "mutability": "readWrite",
      "returned": "default",
      "subAttributes": [
        { "name": "formatted", "type": "string" },
        { "name": "familyName", "type": "string" },
        { "name": "givenName", "type": "string" },
        { "name": "middleName", "type": "string" },
        { "name": "honorificPrefix", "type": "string" },
        { "name": "honorificSuffix", "type": "string" }
      ]
    },
    {
      "name": "displayName",
      "type": "string",
      "multiValued": false,
      "required": false,
      "caseExact": false,
      "mutability": "readWrite",
      "returned": "default",
      "uniqueness": "none"
    },
    {
      "name": "nickName",
      "type": "string",
      "multiValued": false,
      "required": false,
      "caseExact": false,
      "mutability": "readWrite",
      "returned": "default",
      "uniqueness": "none"
    },
    {
      "name": "profileUrl",
      "type": "reference",
      "multiValued": false,
      "required": false,
      "caseExact": false,
      "mutability": "readWrite",
      "returned": "default",
      "uniqueness": "none",
      "referenceTypes": ["external"]
    },
    {
      "name": "title",
      "type": "string",
      "multiValued": false,
      "required": false,
      "mutability": "readWrite",
      "returned": "default"
    },
    {
      "name": "userType",
      "type": "string",
      "multiValued": false,
      "required": false,
      "mutability": "readWrite",
      "returned": "default"
    },
    {
      "name": "preferredLanguage",
      "type": "string",
      "multiValued": false,
      "required": false,
      "mutability": "readWrite",
      "returned": "default"
    },
    {
      "name": "locale",
      "type": "string",
      "multiValued": false,
      "required": false,
      "mutability": "readWrite",
      "returned": "default"
    },
    {
      "name": "timezone",
      "type": "string",
      "multiValued": false,
      "required": false,
      "mutability": "readWrite",
      "returned": "default"
    },
    {
      "name": "active",
      "type": "boolean",
      "multiValued": false,
      "required": false,
      "mutability": "readWrite",
      "returned": "default"
    },
    {
      "name": "password",
      "type": "string",
      "multiValued": false,
      "required": false,
      "caseExact": false,
      "mutability": "writeOnly",
      "returned": "never",
      "uniqueness": "none"
    },
    {
      "name": "emails",
      "type": "complex",
      "multiValued": true,
      "required": false,
      "mutability": "readWrite",
      "returned": "default",
      "subAttributes": [
        { "name": "value", "type": "string", "required": true },
        { "name": "display", "type": "string" },
        { "name": "type", "type": "string", "canonicalValues": ["work", "home", "other"] },
        { "name": "primary", "type": "boolean" }
      ]
    },
    {
      "name": "phoneNumbers",
      "type": "complex",
      "multiValued": true,
      "required": false,
      "mutability": "readWrite",
      "returned": "default",
      "subAttributes": [
        { "name": "value", "type": "string", "required": true },
        { "name": "display", "type": "string" },
        { "name": "type", "type": "string", "canonicalValues": ["work", "home", "mobile", "fax", "pager", "other"] },
        { "name": "primary", "type": "boolean" }
      ]
    },
    {
      "name": "ims",
      "type": "complex",
      "multiValued": true,
      "required": false,
      "mutability": "readWrite",
      "returned": "default",
      "subAttributes": [
        { "name": "value", "type": "string" },
        { "name": "display", "type": "string" },
        { "name": "type", "type": "string", "canonicalValues": ["aim", "gtalk", "icq", "xmpp", "msn", "skype", "qq", "yahoo"] },
        { "name": "primary", "type": "boolean" }
      ]
    },
    {
      "name": "photos",
      "type": "complex",
      "multiValued": true,
      "required": false,
      "mutability": "readWrite",
      "returned": "default",
      "subAttributes": [
        { "name": "value", "type": "reference", "referenceTypes": ["external"] },
        { "name": "display", "type": "string" },
        { "name": "type", "type": "string", "canonicalValues": ["photo", "thumbnail"] },
        { "name": "primary", "type": "boolean" }
      ]
    },
    {
      "name": "addresses",
      "type": "complex",
      "multiValued": true,
      "required": false,
      "mutability": "readWrite",
      "returned": "default",
      "subAttributes": [
        { "name": "formatted", "type": "string" },
        { "name": "streetAddress", "type": "string" },
        { "name": "locality", "type": "string" },
        { "name": "region", "type": "string" },
        { "name": "postalCode", "type": "string" },
        { "name": "country", "type": "string" },
        { "name": "type", "type": "string", "canonicalValues": ["work", "home", "other"] },
        { "name": "primary", "type": "boolean" }
      ]
    },
    {
      "name": "groups",
      "type": "complex",
      "multiValued": true,
      "required": false,
      "mutability": "readOnly",
      "returned": "default",
      "subAttributes": [
        { "name": "value", "type": "string", "mutability": "readOnly" },
        { "name": "$ref", "type": "reference", "mutability": "readOnly", "referenceTypes": ["User", "Group"] },
        { "name": "display", "type": "string", "mutability": "readOnly" },
        { "name": "type", "type": "string", "mutability": "readOnly", "canonicalValues": ["direct", "indirect"] }
      ]
    },
    {
      "name": "entitlements",
      "type": "complex",
      "multiValued": true,
      "required": false,
      "mutability": "readWrite",
      "returned": "default",
      "subAttributes": [
        { "name": "value", "type": "string" },
        { "name": "display", "type": "string" },
        { "name": "type", "type": "string" },
        { "name": "primary", "type": "boolean" }
      ]
    },
    {
      "name": "roles",
      "type": "complex",
      "multiValued": true,
      "required": false,
      "mutability": "readWrite",
      "returned": "default",
      "subAttributes": [
        { "name": "value", "type": "string" },
        { "name": "display", "type": "string" },
        { "name": "type", "type": "string" },
        { "name": "primary", "type": "boolean" }
      ]
    },
    {
      "name": "x509Certificates",
      "type": "complex",
      "multiValued": true,
      "required": false,
      "mutability": "readWrite",
      "returned": "default",
      "subAttributes": [
        { "name": "value", "type": "binary" },
        { "name": "display", "type": "string" },
        { "name": "type", "type": "string" },
        { "name": "primary", "type": "boolean" }
      ]
    }
  ]
}"#
}

/// Returns the core Group schema as a JSON string.
pub fn core_group_schema() -> &'static str {
    r#"{
  "id": "urn:ietf:params:scim:schemas:core:2.0:Group",
  "name": "Group",
  "description": "Group",
  "attributes": [
    {
      "name": "id",
      "type": "string",
      "multiValued": false,
      "required": false,
      "caseExact": true,
      "mutability": "readOnly",
      "returned": "always",
      "uniqueness": "server"
    },
    {
      "name": "externalId",
      "type": "string",
      "multiValued": false,
      "required": false,
      "caseExact": true,
      "mutability": "readWrite",
      "returned": "default",
      "uniqueness": "none"
    },
    {
      "name": "meta",
      "type": "complex",
      "multiValued": false,
      "required": false,
      "mutability": "readOnly",
      "returned": "default",
      "subAttributes": [
        { "name": "resourceType", "type": "string", "caseExact": true, "mutability": "readOnly" },
        { "name": "created", "type": "dateTime", "mutability": "readOnly" },
        { "name": "lastModified", "type": "dateTime", "mutability": "readOnly" },
        { "name": "location", "type": "reference", "caseExact": true, "mutability": "readOnly", "referenceTypes": ["uri"] },
        { "name": "version", "type": "string", "caseExact": true, "mutability": "readOnly" },
        { "name": "attributes", "type": "string", "multiValued": true, "mutability": "readOnly" }
      ]
    },
    {
      "name": "displayName",
      "type": "string",
      "multiValued": false,
      "required": true,
      "caseExact": false,
      "mutability": "readWrite",
      "returned": "default",
      "uniqueness": "none"
    },
    {
      "name": "members",
      "type": "complex",
      "multiValued": true,
      "required": false,
      "mutability": "readWrite",
      "returned": "default",
      "subAttributes": [
        { "name": "value", "type": "string", "required": true, "mutability": "immutable" },
        { "name": "$ref", "type": "reference", "mutability": "immutable", "referenceTypes": ["User", "Group"] },
        { "name": "type", "type": "string", "mutability": "immutable", "canonicalValues": ["User", "Group"] },
        { "name": "display", "type": "string", "mutability": "immutable" }
      ]
    }
  ]
}"#
}

/// Returns the Role schema as a JSON string.
pub fn role_schema() -> &'static str {
    r#"{
  "id": "urn:ietf:params:scim:schemas:extension:2.0:Role",
  "name": "Role",
  "description": "Role",
  "attributes": [
    {
      "name": "id",
      "type": "string",
      "caseExact": true,
      "mutability": "readOnly",
      "returned": "always",
      "uniqueness": "server"
    },
    {
      "name": "meta",
      "type": "complex",
      "mutability": "readOnly",
      "subAttributes": [
        { "name": "resourceType", "type": "string", "caseExact": true, "mutability": "readOnly" },
        { "name": "created", "type": "dateTime", "mutability": "readOnly" },
        { "name": "lastModified", "type": "dateTime", "mutability": "readOnly" },
        { "name": "location", "type": "reference", "caseExact": true, "mutability": "readOnly", "referenceTypes": ["uri"] },
        { "name": "version", "type": "string", "caseExact": true, "mutability": "readOnly" },
        { "name": "attributes", "type": "string", "multiValued": true, "mutability": "readOnly" }
      ]
    },
    {
      "name": "displayName",
      "type": "string",
      "required": true,
      "uniqueness": "server"
    },
    {
      "name": "users",
      "type": "complex",
      "multiValued": true,
      "subAttributes": [
        { "name": "value", "type": "string", "required": true },
        { "name": "display", "type": "string" },
        { "name": "$ref", "type": "reference", "referenceTypes": ["User"] }
      ]
    },
    {
      "name": "groups",
      "type": "complex",
      "multiValued": true,
      "subAttributes": [
        { "name": "value", "type": "string", "required": true },
        { "name": "display", "type": "string" },
        { "name": "$ref", "type": "reference", "referenceTypes": ["Group"] }
      ]
    },
    {
      "name": "permissions",
      "type": "string",
      "multiValued": true
    }
  ]
}"#
}

/// Returns the default enterprise User extension as extension attribute
/// configuration records.
pub fn enterprise_user_extension() -> &'static str {
    r#"[
  {
    "attributeURI": "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:employeeNumber",
    "attributeName": "employeeNumber",
    "dataType": "string",
    "description": "Numeric or alphanumeric identifier assigned to a person"
  },
  {
    "attributeURI": "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:costCenter",
    "attributeName": "costCenter",
    "dataType": "string",
    "description": "Identifies the name of a cost center"
  },
  {
    "attributeURI": "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:organization",
    "attributeName": "organization",
    "dataType": "string",
    "description": "Identifies the name of an organization"
  },
  {
    "attributeURI": "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:division",
    "attributeName": "division",
    "dataType": "string",
    "description": "Identifies the name of a division"
  },
  {
    "attributeURI": "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:department",
    "attributeName": "department",
    "dataType": "string",
    "description": "Identifies the name of a department"
  },
  {
    "attributeURI": "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:manager.value",
    "attributeName": "value",
    "dataType": "string",
    "description": "The id of the SCIM resource representing the manager"
  },
  {
    "attributeURI": "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:manager.$ref",
    "attributeName": "$ref",
    "dataType": "reference",
    "referenceTypes": ["User"]
  },
  {
    "attributeURI": "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:manager.displayName",
    "attributeName": "displayName",
    "dataType": "string",
    "mutability": "readOnly"
  },
  {
    "attributeURI": "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:manager",
    "attributeName": "manager",
    "dataType": "complex",
    "description": "The user's manager",
    "subAttributes": ["value", "$ref", "displayName"]
  },
  {
    "attributeURI": "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User",
    "attributeName": "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User",
    "dataType": "complex",
    "description": "Enterprise User",
    "subAttributes": ["employeeNumber", "costCenter", "organization", "division", "department", "manager"]
  }
]"#
}
