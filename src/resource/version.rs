//! Content-derived resource versions.
//!
//! `meta.version` carries a weak ETag computed from a SHA-256 hash of the
//! encoded resource. Two resources with identical content always share a
//! version, so hosts can answer conditional requests without storing
//! revision counters.
//!
//! ```rust
//! use scim_core::resource::ResourceVersion;
//!
//! let version = ResourceVersion::from_content(br#"{"userName":"alice"}"#);
//! let etag = version.to_etag();
//! assert!(etag.starts_with("W/\""));
//! assert_eq!(etag.parse::<ResourceVersion>().unwrap(), version);
//! ```

use crate::error::ScimError;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use sha2::{Digest, Sha256};
use std::{fmt, str::FromStr};

/// Opaque version of one resource state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceVersion {
    opaque: String,
}

impl ResourceVersion {
    /// Hash resource content into a version.
    pub fn from_content(content: &[u8]) -> Self {
        let hash = Sha256::digest(content);
        // first 8 bytes keep ETags short
        Self {
            opaque: BASE64.encode(&hash[..8]),
        }
    }

    /// Wrap a version computed elsewhere, such as a storage sequence number.
    pub fn from_hash(hash: impl AsRef<str>) -> Self {
        Self {
            opaque: hash.as_ref().to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.opaque
    }

    /// Weak ETag form, `W/"<opaque>"`, as stored in `meta.version`.
    pub fn to_etag(&self) -> String {
        format!("W/\"{}\"", self.opaque)
    }
}

impl fmt::Display for ResourceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.opaque)
    }
}

/// Accepts weak (`W/"x"`), strong (`"x"`) and bare (`x`) forms.
impl FromStr for ResourceVersion {
    type Err = ScimError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        let unprefixed = trimmed.strip_prefix("W/").unwrap_or(trimmed);
        let opaque = match unprefixed.strip_prefix('"') {
            Some(rest) => rest
                .strip_suffix('"')
                .ok_or_else(|| ScimError::malformed(format!("invalid ETag '{}'", text)))?,
            None => unprefixed,
        };

        if opaque.is_empty() {
            return Err(ScimError::malformed(format!("invalid ETag '{}'", text)));
        }
        Ok(Self::from_hash(opaque))
    }
}
