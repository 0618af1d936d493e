//! Validation engine tests over decoded payloads.

use crate::common::{
    fixtures::{self, ENTERPRISE_URI, USER_URI},
    registry,
};
use proptest::prelude::*;
use scim_core::attribute::Attribute;
use scim_core::codec::{Decoder, Encoder};
use scim_core::error::{ErrorKind, ScimError, ValidationError};
use scim_core::resource::Resource;
use scim_core::validation::{
    AttributeProjection, ServerSideValidator, check_required, derive_schemas, reconcile_read_only,
};
use serde_json::{Value, json};

fn decode_user(payload: &Value) -> Resource {
    Decoder::decode_value(payload, registry().user_schema().unwrap()).unwrap()
}

fn manager_display_name(resource: &Resource) -> Option<String> {
    resource
        .get_attribute(ENTERPRISE_URI)?
        .as_complex()?
        .sub_attribute("manager")?
        .as_complex()?
        .simple_value("displayName")?
        .as_str()
        .map(str::to_string)
}

#[test]
fn test_created_user_has_identity_named_emails_and_core_schema_only() {
    let mut user = decode_user(&json!({
        "schemas": [USER_URI],
        "userName": "alice",
        "emails": [{"value": "a@b.com", "type": "work"}]
    }));
    ServerSideValidator::default().validate_create(&mut user).unwrap();

    let emails = user
        .get_attribute("emails")
        .and_then(Attribute::as_multi_valued)
        .unwrap();
    assert_eq!(emails.entries().len(), 1);
    assert_eq!(emails.entries()[0].name(), "emails_a@b.com_work");
    assert_eq!(user.schemas(), [USER_URI.to_string()]);
}

#[test]
fn test_create_discards_client_meta() {
    let mut user = decode_user(&fixtures::user_with_client_meta());
    ServerSideValidator::default().validate_create(&mut user).unwrap();

    let encoded = Encoder::encode_value(&user).unwrap();
    assert_ne!(encoded["meta"]["created"], "2001-01-01T00:00:00");
    assert_eq!(encoded["meta"]["created"], encoded["meta"]["lastModified"]);
    assert_ne!(encoded["id"], "client-chosen");
    assert!(
        encoded["meta"]["location"]
            .as_str()
            .unwrap()
            .ends_with(&format!("/v2/Users/{}", user.id().unwrap()))
    );
}

#[test]
fn test_create_strips_read_only_extension_data() {
    let mut user = decode_user(&fixtures::enterprise_user());
    ServerSideValidator::default().validate_create(&mut user).unwrap();

    assert_eq!(manager_display_name(&user), None);
    assert!(user.schemas().contains(&ENTERPRISE_URI.to_string()));
}

#[test]
fn test_update_keeps_read_only_data_of_stored_resource() {
    let validator = ServerSideValidator::default();
    let mut stored = decode_user(&fixtures::minimal_user("bjensen"));
    validator.validate_create(&mut stored).unwrap();

    let mut replacement = decode_user(&json!({
        "schemas": [USER_URI],
        "id": "something-else",
        "userName": "bjensen",
        "displayName": "Babs"
    }));
    validator.validate_update(&stored, &mut replacement).unwrap();

    assert_eq!(replacement.id(), stored.id());
    assert_eq!(replacement.created(), stored.created());
    assert_eq!(replacement.location(), stored.location());
    assert!(replacement.has_attribute("displayName"));
    assert_ne!(replacement.version(), stored.version());
}

#[test]
fn test_required_sub_attribute_missing_in_one_entry() {
    let user = decode_user(&json!({
        "schemas": [USER_URI],
        "userName": "carol",
        "emails": [{"value": "c@example.com"}, {"type": "home"}]
    }));

    match check_required(&user) {
        Err(ValidationError::MissingRequiredSubAttribute {
            attribute,
            sub_attribute,
        }) => {
            assert_eq!(attribute, "emails");
            assert_eq!(sub_attribute, "value");
        }
        other => panic!("Expected MissingRequiredSubAttribute, got {:?}", other),
    }
}

#[test]
fn test_missing_user_name_is_schema_violation() {
    let mut user = decode_user(&json!({"schemas": [USER_URI], "displayName": "nobody"}));
    let error: ScimError = ServerSideValidator::default()
        .validate_create(&mut user)
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::SchemaViolation);
    assert_eq!(error.status(), 400);
}

#[test]
fn test_short_and_full_names_decode_identically() {
    let short = decode_user(&json!({"schemas": [USER_URI], "userName": "dual"}));
    let full = decode_user(&json!({
        "schemas": [USER_URI],
        format!("{}:userName", USER_URI): "dual"
    }));
    assert_eq!(short, full);
}

#[test]
fn test_retrieve_applies_projection() {
    let validator = ServerSideValidator::default();
    let mut user = decode_user(&json!({
        "schemas": [USER_URI],
        "userName": "dave",
        "password": "hunter2",
        "displayName": "Dave",
        "title": "Operator"
    }));
    validator.validate_create(&mut user).unwrap();

    let projection = AttributeProjection::from_query(Some("displayName"), None);
    validator.validate_retrieve(&mut user, Some(&projection));

    assert!(user.has_attribute("displayName"));
    assert!(user.has_attribute("id"));
    assert!(!user.has_attribute("password"));
    assert!(!user.has_attribute("title"));
}

fn schema_uris_strategy() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(
        prop::sample::select(vec![USER_URI, ENTERPRISE_URI, "urn:example:unused"]),
        0..5,
    )
}

proptest! {
    #[test]
    fn prop_schema_derivation_is_idempotent(
        declared in schema_uris_strategy(),
        with_extension in any::<bool>(),
    ) {
        let mut payload = json!({"schemas": declared, "userName": "eve"});
        if with_extension {
            payload[ENTERPRISE_URI] = json!({"costCenter": "4130"});
        }
        let mut user = decode_user(&payload);

        derive_schemas(&mut user);
        let once = user.schemas().to_vec();
        derive_schemas(&mut user);

        prop_assert_eq!(user.schemas(), once.as_slice());
        let mut expected = vec![USER_URI.to_string()];
        if with_extension {
            expected.push(ENTERPRISE_URI.to_string());
        }
        prop_assert_eq!(once, expected);
    }

    #[test]
    fn prop_read_only_values_of_old_resource_win(
        old_id in prop::option::of("[a-f0-9]{8}"),
        new_id in prop::option::of("[a-f0-9]{8}"),
        old_manager in prop::option::of("[A-Z][a-z]{2,8}"),
        new_manager in prop::option::of("[A-Z][a-z]{2,8}"),
    ) {
        let payload = |id: &Option<String>, manager: &Option<String>| {
            let mut payload = json!({
                "schemas": [USER_URI, ENTERPRISE_URI],
                "userName": "frank",
                ENTERPRISE_URI: {"manager": {"value": "m-1"}}
            });
            if let Some(id) = id {
                payload["id"] = json!(id);
            }
            if let Some(manager) = manager {
                payload[ENTERPRISE_URI]["manager"]["displayName"] = json!(manager);
            }
            payload
        };
        let old = decode_user(&payload(&old_id, &old_manager));
        let mut new = decode_user(&payload(&new_id, &new_manager));

        reconcile_read_only(&old, &mut new).unwrap();

        prop_assert_eq!(new.id(), old_id.as_deref());
        prop_assert_eq!(manager_display_name(&new), old_manager);
        prop_assert!(new.has_attribute("userName"));
    }
}
