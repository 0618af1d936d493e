//! Read-only attribute reconciliation.
//!
//! Reconciliation is a three-way merge in which the stored resource always
//! wins for read-only data: a read-only value only the client sent is
//! dropped, one only the stored resource has is copied over, and one both
//! have is replaced by the stored value. Attributes that are not read-only
//! are descended into so read-only sub-attributes get the same treatment;
//! entries of multi-valued complex attributes are paired by identity name at
//! every level.

use crate::attribute::{Attribute, ComplexAttribute, MultiValuedAttribute};
use crate::error::ScimResult;
use crate::resource::Resource;
use crate::schema::types::{AttributeSchema, AttributeType};
use log::{debug, warn};

/// Merge read-only data of `old` into `new`.
pub fn reconcile_read_only(old: &Resource, new: &mut Resource) -> ScimResult<()> {
    let schema = new.schema_handle();
    for attribute_schema in schema.attributes() {
        let name = attribute_schema.name();
        let old_attribute = old.get_attribute(name);

        if attribute_schema.is_read_only() {
            if let Some(dropped) = new.remove_attribute(name) {
                if old_attribute != Some(&dropped) {
                    warn!("Discarding client value of read-only attribute '{}'", name);
                }
            }
            if let Some(kept) = old_attribute {
                new.set_attribute(kept.clone())?;
            }
            continue;
        }

        if attribute_schema.data_type() != AttributeType::Complex {
            continue;
        }
        let merged = match new.remove_attribute(name) {
            Some(Attribute::MultiValued(entries)) => {
                let old_entries = old_attribute.and_then(Attribute::as_multi_valued);
                Some(Attribute::MultiValued(reconcile_entries(
                    attribute_schema,
                    old_entries,
                    entries,
                )?))
            }
            Some(Attribute::Complex(complex)) => reconcile_complex(
                attribute_schema,
                old_attribute.and_then(Attribute::as_complex),
                Some(complex),
            )?
            .map(Attribute::Complex),
            Some(other) => Some(other),
            None if attribute_schema.is_multi_valued() => None,
            None => reconcile_complex(
                attribute_schema,
                old_attribute.and_then(Attribute::as_complex),
                None,
            )?
            .map(Attribute::Complex),
        };
        if let Some(merged) = merged {
            new.set_attribute(merged)?;
        }
    }
    debug!("Reconciled read-only attributes of {}", new.resource_type());
    Ok(())
}

/// Merge one complex value; `None` when nothing is left.
fn reconcile_complex(
    schema: &AttributeSchema,
    old: Option<&ComplexAttribute>,
    new: Option<ComplexAttribute>,
) -> ScimResult<Option<ComplexAttribute>> {
    let mut merged = new.unwrap_or_else(|| ComplexAttribute::new(schema.name()));
    for sub in schema.sub_attributes() {
        let old_sub = old.and_then(|o| o.sub_attribute(sub.name()));
        if sub.is_read_only() {
            if merged.remove_sub_attribute(sub.name()).is_some() && old_sub.is_none() {
                warn!("Discarding client value of read-only '{}'", sub.uri());
            }
            if let Some(kept) = old_sub {
                merged.set_sub_attribute(kept.clone());
            }
            continue;
        }
        if sub.data_type() != AttributeType::Complex {
            continue;
        }
        match merged.remove_sub_attribute(sub.name()) {
            Some(Attribute::MultiValued(entries)) => {
                let old_entries = old_sub.and_then(Attribute::as_multi_valued);
                merged.set_sub_attribute(reconcile_entries(sub, old_entries, entries)?);
            }
            Some(Attribute::Complex(complex)) => {
                let old_sub = old_sub.and_then(Attribute::as_complex);
                if let Some(sub_merged) = reconcile_complex(sub, old_sub, Some(complex))? {
                    merged.set_sub_attribute(sub_merged);
                }
            }
            Some(other) => {
                merged.set_sub_attribute(other);
            }
            None if sub.is_multi_valued() => {}
            None => {
                let old_sub = old_sub.and_then(Attribute::as_complex);
                if let Some(sub_merged) = reconcile_complex(sub, old_sub, None)? {
                    merged.set_sub_attribute(sub_merged);
                }
            }
        }
    }
    Ok((!merged.is_empty()).then_some(merged))
}

/// Pair entries by identity name and merge each pair.
fn reconcile_entries(
    schema: &AttributeSchema,
    old: Option<&MultiValuedAttribute>,
    new: MultiValuedAttribute,
) -> ScimResult<MultiValuedAttribute> {
    if schema.data_type() != AttributeType::Complex {
        return Ok(new);
    }
    let mut merged = MultiValuedAttribute::new_complex(schema.name());
    for entry in new.entries() {
        let partner = old.and_then(|o| o.entry(entry.name()));
        if let Some(entry) = reconcile_complex(schema, partner, Some(entry.clone()))? {
            merged.add_entry(entry)?;
        }
    }
    Ok(merged)
}
