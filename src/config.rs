//! Configuration for generated resource metadata.
//!
//! The values here feed `meta.location` generation and the wire date
//! format. Hosts typically deserialize [`ScimConfig`] from their own
//! configuration source.

use serde::{Deserialize, Serialize};

/// Wire pattern for every DATE_TIME value (`yyyy-MM-dd'T'HH:mm:ss`).
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Configuration for SCIM endpoint URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScimConfig {
    /// Base URL for the SCIM service (without version or endpoint path).
    /// Examples: "https://scim.example.com", "https://api.company.com"
    pub base_url: String,

    /// SCIM protocol version used in URLs. Defaults to "v2".
    pub scim_version: String,
}

impl Default for ScimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost".to_string(),
            scim_version: "v2".to_string(),
        }
    }
}

impl ScimConfig {
    /// Create a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Location URL of a resource, used for `meta.location`.
    ///
    /// `endpoint` is the resource type endpoint such as `/Users`.
    pub fn location_for(&self, endpoint: &str, resource_id: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let endpoint = endpoint.trim_matches('/');
        if self.scim_version.is_empty() {
            format!("{}/{}/{}", base, endpoint, resource_id)
        } else {
            format!(
                "{}/{}/{}/{}",
                base, self.scim_version, endpoint, resource_id
            )
        }
    }
}
