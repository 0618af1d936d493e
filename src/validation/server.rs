//! Create, update and retrieve processing.

use super::projection::{AttributeProjection, remove_never_returned};
use super::read_only::reconcile_read_only;
use super::required::check_required;
use super::schemas::derive_schemas;
use crate::codec::Encoder;
use crate::config::ScimConfig;
use crate::error::{ScimError, ScimResult};
use crate::resource::{META, META_VERSION, Resource, ResourceVersion};
use chrono::{DateTime, SubsecRound, Utc};
use log::debug;
use uuid::Uuid;

/// Attribute removed from every retrieved resource.
pub const PASSWORD: &str = "password";

/// Applies server-side rules to resources crossing the persistence boundary.
#[derive(Debug, Clone, Default)]
pub struct ServerSideValidator {
    config: ScimConfig,
}

impl ServerSideValidator {
    pub fn new(config: ScimConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScimConfig {
        &self.config
    }

    /// Prepare a client-submitted resource for its first persistence.
    ///
    /// Read-only attributes are stripped, then `id`, `meta.created`,
    /// `meta.lastModified` (same instant), `meta.location`,
    /// `meta.resourceType` and `meta.version` are assigned.
    pub fn validate_create(&self, resource: &mut Resource) -> ScimResult<()> {
        let blank = Resource::new(resource.schema_handle());
        reconcile_read_only(&blank, resource)?;
        check_required(resource)?;

        let id = Uuid::new_v4().to_string();
        let now = now();
        let location = self.config.location_for(resource.schema().endpoint(), &id);
        let resource_type = resource.resource_type().to_string();

        resource.set_id(id)?;
        resource.set_meta_resource_type(resource_type)?;
        resource.set_created(now)?;
        resource.set_last_modified(now)?;
        resource.set_location(location)?;

        derive_schemas(resource);
        refresh_version(resource)?;
        debug!(
            "Validated new {} '{}'",
            resource.resource_type(),
            resource.id().unwrap_or_default()
        );
        Ok(())
    }

    /// Prepare a replacement of `old` for persistence.
    ///
    /// Fails with not-found when `old` carries no `meta`, i.e. it was
    /// never created through [`validate_create`](Self::validate_create).
    pub fn validate_update(&self, old: &Resource, new: &mut Resource) -> ScimResult<()> {
        if old.meta().is_none() {
            return Err(ScimError::not_found(format!(
                "meta of {} '{}'",
                old.resource_type(),
                old.id().unwrap_or_default()
            )));
        }

        reconcile_read_only(old, new)?;
        check_required(new)?;
        derive_schemas(new);
        new.set_last_modified(now())?;
        refresh_version(new)?;
        debug!(
            "Validated update of {} '{}'",
            new.resource_type(),
            new.id().unwrap_or_default()
        );
        Ok(())
    }

    /// Prepare a stored resource for return to a client.
    pub fn validate_retrieve(&self, resource: &mut Resource, projection: Option<&AttributeProjection>) {
        resource.remove_attribute(PASSWORD);
        remove_never_returned(resource);
        if let Some(projection) = projection {
            projection.apply(resource);
        }
        derive_schemas(resource);
    }
}

/// Current instant truncated to the second precision of the wire format.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Version of the resource content, excluding `meta.version` itself.
pub fn compute_version(resource: &Resource) -> ScimResult<ResourceVersion> {
    let mut value = Encoder::encode_value(resource)?;
    if let Some(meta) = value.get_mut(META).and_then(|m| m.as_object_mut()) {
        meta.remove(META_VERSION);
    }
    Ok(ResourceVersion::from_content(&serde_json::to_vec(&value)?))
}

fn refresh_version(resource: &mut Resource) -> ScimResult<()> {
    let version = compute_version(resource)?;
    resource.set_version(version.to_etag())
}
