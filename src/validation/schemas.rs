//! Derivation of the `schemas` member.

use crate::resource::Resource;
use log::trace;

/// Recompute the schema-URI list from the attributes present.
///
/// The result holds the owning schema of every present attribute, in
/// schema order and without duplicates, so running it twice is a no-op.
pub fn derive_schemas(resource: &mut Resource) {
    let mut uris: Vec<String> = Vec::new();
    for attribute in resource.schema().attributes() {
        if resource.has_attribute(attribute.name())
            && !uris.iter().any(|uri| uri == attribute.schema_uri())
        {
            uris.push(attribute.schema_uri().to_string());
        }
    }
    trace!("Derived schemas {:?} for {}", uris, resource.resource_type());
    resource.set_schemas(uris);
}
