//! Codec tests against the embedded schemas.
//!
//! Decoding the encoding of a decoded resource must give back the same
//! tree, whatever mix of simple, complex, multi-valued and extension data
//! the payload carries.

use crate::common::{
    fixtures::{self, CUSTOM_EXTENSION, CUSTOM_URI, ENTERPRISE_URI, GROUP_URI, ROLE_URI, USER_URI},
    init_logging, registry,
};
use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use scim_core::attribute::{
    Attribute, AttributeValue, ComplexAttribute, MultiValuedAttribute, SimpleAttribute,
};
use scim_core::codec::{Decoder, Encoder};
use scim_core::error::ErrorKind;
use scim_core::resource::Resource;
use scim_core::schema::{ExtensionKind, ExtensionSchemaBuilder, SchemaRegistry, embedded};
use serde_json::{Value, json};

#[test]
fn test_enterprise_user_round_trip() {
    let registry = registry();
    let schema = registry.user_schema().unwrap();

    let decoded = Decoder::decode_value(&fixtures::enterprise_user(), schema.clone()).unwrap();
    let encoded = Encoder::encode(&decoded).unwrap();
    let again = Decoder::decode(&encoded, schema).unwrap();

    assert_eq!(decoded, again);
}

#[test]
fn test_emails_are_keyed_by_identity() {
    let registry = registry();
    let user = Decoder::decode_value(
        &json!({
            "schemas": [USER_URI],
            "userName": "ab",
            "emails": [{"value": "a@b.com", "type": "work"}]
        }),
        registry.user_schema().unwrap(),
    )
    .unwrap();

    let emails = user
        .get_attribute("emails")
        .and_then(Attribute::as_multi_valued)
        .unwrap();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails.entries()[0].name(), "emails_a@b.com_work");
    assert!(emails.entry("emails_a@b.com_work").is_some());
}

#[test]
fn test_extension_decodes_by_uri_and_encodes_under_uri() {
    let registry = registry();
    let user = Decoder::decode_value(&fixtures::enterprise_user(), registry.user_schema().unwrap())
        .unwrap();

    let extension = user.get_attribute(ENTERPRISE_URI).and_then(Attribute::as_complex);
    assert!(extension.is_some_and(|ext| ext.has_sub_attribute("manager")));

    let encoded = Encoder::encode_value(&user).unwrap();
    assert_eq!(encoded[ENTERPRISE_URI]["manager"]["displayName"], "John Smith");
    assert_eq!(encoded["schemas"][0], USER_URI);
}

#[test]
fn test_duplicate_entries_are_rejected() {
    let registry = registry();
    let result = Decoder::decode_value(
        &json!({
            "schemas": [USER_URI],
            "userName": "dup",
            "emails": [
                {"value": "x@example.com", "type": "work"},
                {"value": "x@example.com", "type": "work", "primary": true}
            ]
        }),
        registry.user_schema().unwrap(),
    );
    assert_eq!(result.unwrap_err().kind(), ErrorKind::SchemaViolation);
}

#[test]
fn test_unknown_members_are_ignored() {
    let registry = registry();
    let user = Decoder::decode_value(
        &json!({"schemas": [USER_URI], "userName": "u", "favouriteColour": "teal"}),
        registry.user_schema().unwrap(),
    )
    .unwrap();
    assert!(!user.has_attribute("favouriteColour"));
    assert_eq!(user.attribute_count(), 1);
}

#[test]
fn test_non_object_payload_is_malformed() {
    let registry = registry();
    let result = Decoder::decode("[1, 2, 3]", registry.user_schema().unwrap());
    assert_eq!(result.unwrap_err().kind(), ErrorKind::MalformedPayload);
}

fn email_strategy() -> impl Strategy<Value = (String, Option<&'static str>, bool)> {
    (
        "[a-z]{1,8}",
        prop::option::of(prop::sample::select(vec!["work", "home", "other"])),
        any::<bool>(),
    )
        .prop_map(|(local, kind, primary)| (local, kind, primary))
}

fn user_payload(
    user_name: &str,
    display_name: Option<&str>,
    active: bool,
    emails: &[(String, Option<&'static str>, bool)],
) -> Value {
    let mut payload = json!({
        "schemas": [USER_URI],
        "userName": user_name,
        "active": active,
    });
    if let Some(display_name) = display_name {
        payload["displayName"] = json!(display_name);
    }
    if !emails.is_empty() {
        let entries: Vec<Value> = emails
            .iter()
            .enumerate()
            .map(|(index, (local, kind, primary))| {
                let mut entry = json!({
                    "value": format!("{}{}@example.com", local, index),
                    "primary": primary,
                });
                if let Some(kind) = kind {
                    entry["type"] = json!(kind);
                }
                entry
            })
            .collect();
        payload["emails"] = Value::Array(entries);
    }
    payload
}

proptest! {
    #[test]
    fn prop_decode_encode_decode_is_stable(
        user_name in "[A-Za-z0-9._@-]{1,24}",
        display_name in prop::option::of("[ A-Za-z\\u{e0}-\\u{ff}]{1,16}"),
        active in any::<bool>(),
        emails in prop::collection::vec(email_strategy(), 0..4),
    ) {
        let registry = registry();
        let schema = registry.user_schema().unwrap();
        let payload = user_payload(&user_name, display_name.as_deref(), active, &emails);

        let first = Decoder::decode_value(&payload, schema.clone()).unwrap();
        let second = Decoder::decode(&Encoder::encode(&first).unwrap(), schema).unwrap();

        prop_assert_eq!(first, second);
    }
}

/// Registry with both the enterprise and the custom User extension.
fn extended_registry() -> SchemaRegistry {
    init_logging();
    let enterprise =
        ExtensionSchemaBuilder::parse_configs(embedded::enterprise_user_extension()).unwrap();
    let custom = ExtensionSchemaBuilder::parse_configs(CUSTOM_EXTENSION).unwrap();
    SchemaRegistry::builder()
        .with_extension(ExtensionKind::Enterprise, enterprise)
        .with_extension(ExtensionKind::Custom, custom)
        .build()
        .unwrap()
}

fn string(value: &str) -> AttributeValue {
    AttributeValue::String(value.to_string())
}

fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_102_444_800, 0u32..1_000_000_000)
        .prop_map(|(secs, nanos)| Utc.timestamp_opt(secs, nanos).unwrap())
}

/// Server-side fields every stored resource carries.
fn stamp(resource: &mut Resource, created: DateTime<Utc>, modified: DateTime<Utc>) {
    let kind = resource.resource_type().to_string();
    resource.set_id("2819c223-7f76-453a-919d-413861904646").unwrap();
    resource.set_meta_resource_type(kind.clone()).unwrap();
    resource.set_created(created).unwrap();
    resource.set_last_modified(modified).unwrap();
    resource
        .set_location(format!("https://example.com/v2/{}s/2819c223", kind))
        .unwrap();
    resource.set_version("W/\"a330bc54f0671c9\"").unwrap();
}

fn entries(name: &str, values: &[String], kind: &str) -> MultiValuedAttribute {
    let mut multi = MultiValuedAttribute::new_complex(name);
    for value in values {
        multi
            .add_entry(
                ComplexAttribute::new(name)
                    .with_sub_attribute(SimpleAttribute::new("value", string(value)))
                    .with_sub_attribute(SimpleAttribute::new("type", string(kind))),
            )
            .unwrap();
    }
    multi
}

fn assert_round_trip(resource: &Resource) -> Result<(), TestCaseError> {
    let encoded = Encoder::encode(resource).unwrap();
    let decoded = Decoder::decode(&encoded, resource.schema_handle()).unwrap();
    prop_assert_eq!(&decoded, resource);
    Ok(())
}

proptest! {
    #[test]
    fn prop_built_trees_survive_encode_then_decode(
        created in instant_strategy(),
        modified in instant_strategy(),
        since in instant_strategy(),
        quarters in -40_000i32..40_000,
        token in prop::collection::vec(any::<u8>(), 0..24),
        certificates in prop::collection::btree_set(prop::collection::vec(any::<u8>(), 1..16), 0..3),
        members in prop::collection::btree_set("[a-f0-9]{8}", 0..4),
        permissions in prop::collection::btree_set("[a-z]{3,10}", 0..4),
    ) {
        let registry = extended_registry();

        let mut user = Resource::new(registry.user_schema().unwrap());
        user.set_schemas([USER_URI, ENTERPRISE_URI, CUSTOM_URI]);
        stamp(&mut user, created, modified);
        user.set_attribute(SimpleAttribute::new("userName", string("bjensen"))).unwrap();
        user.set_attribute(SimpleAttribute::new("active", AttributeValue::Boolean(true))).unwrap();
        if !certificates.is_empty() {
            let mut certs = MultiValuedAttribute::new_complex("x509Certificates");
            for der in &certificates {
                certs
                    .add_entry(ComplexAttribute::new("x509Certificates").with_sub_attribute(
                        SimpleAttribute::new("value", AttributeValue::Binary(der.clone())),
                    ))
                    .unwrap();
            }
            user.set_attribute(certs).unwrap();
        }
        user.set_attribute(
            ComplexAttribute::new(ENTERPRISE_URI).with_sub_attribute(
                ComplexAttribute::new("manager")
                    .with_sub_attribute(SimpleAttribute::new("value", string("26118915")))
                    .with_sub_attribute(SimpleAttribute::new("displayName", string("John Smith"))),
            ),
        )
        .unwrap();
        user.set_attribute(
            ComplexAttribute::new(CUSTOM_URI)
                .with_sub_attribute(SimpleAttribute::new(
                    "score",
                    AttributeValue::Decimal(f64::from(quarters) / 4.0),
                ))
                .with_sub_attribute(SimpleAttribute::new("since", AttributeValue::DateTime(since)))
                .with_sub_attribute(SimpleAttribute::new("token", AttributeValue::Binary(token)))
                .with_sub_attribute(
                    ComplexAttribute::new("badge")
                        .with_sub_attribute(SimpleAttribute::new("code", string("gold")))
                        .with_sub_attribute(SimpleAttribute::new(
                            "awarded",
                            AttributeValue::DateTime(modified),
                        )),
                ),
        )
        .unwrap();
        assert_round_trip(&user)?;

        let members: Vec<String> = members.into_iter().collect();
        let mut group = Resource::new(registry.group_schema().unwrap());
        group.set_schemas([GROUP_URI]);
        stamp(&mut group, created, modified);
        group.set_attribute(SimpleAttribute::new("displayName", string("Tour Guides"))).unwrap();
        if !members.is_empty() {
            group.set_attribute(entries("members", &members, "User")).unwrap();
        }
        assert_round_trip(&group)?;

        let mut role = Resource::new(registry.role_schema().unwrap());
        role.set_schemas([ROLE_URI]);
        stamp(&mut role, created, modified);
        role.set_attribute(SimpleAttribute::new("displayName", string("Auditor"))).unwrap();
        if !permissions.is_empty() {
            role.set_attribute(MultiValuedAttribute::new_primitive(
                "permissions",
                permissions.iter().map(|p| string(p)).collect(),
            ))
            .unwrap();
        }
        assert_round_trip(&role)?;
    }
}

#[test]
fn test_sub_second_timestamps_survive_encode_then_decode() {
    let registry = registry();
    let mut user = Resource::new(registry.user_schema().unwrap());
    user.set_schemas([USER_URI]);
    user.set_attribute(SimpleAttribute::new("userName", string("bjensen"))).unwrap();
    user.set_last_modified(Utc.timestamp_opt(1_700_000_000, 123_000_000).unwrap())
        .unwrap();

    let back = Decoder::decode(&Encoder::encode(&user).unwrap(), user.schema_handle()).unwrap();
    assert_eq!(back, user);
    assert_eq!(back.last_modified(), Some(Utc.timestamp_opt(1_700_000_000, 0).unwrap()));
}
