//! Error types for SCIM attribute model, codec and validation operations.
//!
//! Every failure in this crate is synchronous and terminates the current
//! decode, encode or validate call. Errors fall into four kinds (see
//! [`ErrorKind`]) which decide how a host reports them to clients.

/// Classification of a [`ScimError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// JSON could not be parsed or a value does not fit its declared type.
    MalformedPayload,
    /// A resource breaks its schema contract.
    SchemaViolation,
    /// Schema configuration or an internal invariant is broken.
    InternalConfiguration,
    /// Something an operation relies on is absent.
    NotFound,
}

/// Main error type for SCIM operations.
#[derive(Debug, thiserror::Error)]
pub enum ScimError {
    /// Payload that cannot be parsed or typed
    #[error("Malformed payload: {message}")]
    MalformedPayload { message: String },

    /// JSON text that serde_json refuses to parse
    #[error("Malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Resource data that breaks the schema contract
    #[error("Schema violation: {0}")]
    SchemaViolation(#[from] ValidationError),

    /// Broken schema configuration or internal invariant
    #[error("Internal configuration error: {message}")]
    InternalConfiguration { message: String },

    /// Missing resource, attribute or meta data
    #[error("Not found: {message}")]
    NotFound { message: String },
}

/// Schema violations found while building or validating a resource.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Required attribute is missing
    #[error("Required attribute '{attribute}' is missing")]
    MissingRequiredAttribute { attribute: String },

    /// Required sub-attribute is missing in one occurrence of its parent
    #[error("Attribute '{attribute}' missing required sub-attribute '{sub_attribute}'")]
    MissingRequiredSubAttribute {
        attribute: String,
        sub_attribute: String,
    },

    /// Invalid value for attribute with canonical values
    #[error("Attribute '{attribute}' has invalid value '{value}', allowed values: {allowed:?}")]
    InvalidCanonicalValue {
        attribute: String,
        value: String,
        allowed: Vec<String>,
    },

    /// Single-valued node supplied for a multi-valued attribute
    #[error("Attribute '{attribute}' must be multi-valued")]
    ExpectedMultiValue { attribute: String },

    /// Multi-valued node supplied for a single-valued attribute
    #[error("Attribute '{attribute}' must be single-valued")]
    ExpectedSingleValue { attribute: String },

    /// Node variant does not agree with the schema data type
    #[error("Attribute '{attribute}' has invalid type, expected {expected}, got {actual}")]
    InvalidAttributeType {
        attribute: String,
        expected: String,
        actual: String,
    },

    /// Complex attribute nested deeper than the schema allows
    #[error("Nested complex attributes are not allowed: '{attribute}'")]
    NestedComplexAttribute { attribute: String },

    /// Sub-attribute the schema does not declare
    #[error("Complex attribute '{attribute}' contains unknown sub-attribute '{sub_attribute}'")]
    UnknownSubAttribute {
        attribute: String,
        sub_attribute: String,
    },

    /// Attribute the resource schema does not declare
    #[error("Unknown attribute '{attribute}' for resource type '{resource_type}'")]
    UnknownAttribute {
        attribute: String,
        resource_type: String,
    },

    /// Two multi-valued entries resolve to the same identity name
    #[error("Attribute '{attribute}' already contains an entry identified as '{identity}'")]
    DuplicateMultiValuedEntry { attribute: String, identity: String },

    /// Attribute that may only be assigned once is already present
    #[error("Attribute '{attribute}' is already set and cannot be reassigned")]
    AttributeAlreadySet { attribute: String },

    /// General validation error with custom message
    #[error("Validation failed: {message}")]
    Custom { message: String },
}

impl ScimError {
    /// Create a malformed payload error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            message: message.into(),
        }
    }

    /// Create an internal configuration error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalConfiguration {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedPayload { .. } | Self::Json(_) => ErrorKind::MalformedPayload,
            Self::SchemaViolation(_) => ErrorKind::SchemaViolation,
            Self::InternalConfiguration { .. } => ErrorKind::InternalConfiguration,
            Self::NotFound { .. } => ErrorKind::NotFound,
        }
    }

    /// HTTP status a host should report for this error.
    pub fn status(&self) -> u16 {
        match self.kind() {
            ErrorKind::MalformedPayload | ErrorKind::SchemaViolation => 400,
            ErrorKind::InternalConfiguration => 500,
            ErrorKind::NotFound => 404,
        }
    }

    /// SCIM `scimType` detail code, when one applies.
    pub fn scim_type(&self) -> Option<&'static str> {
        match self {
            Self::MalformedPayload { .. } | Self::Json(_) => Some("invalidSyntax"),
            Self::SchemaViolation(ValidationError::AttributeAlreadySet { .. }) => {
                Some("mutability")
            }
            Self::SchemaViolation(_) => Some("invalidValue"),
            Self::InternalConfiguration { .. } | Self::NotFound { .. } => None,
        }
    }
}

impl ValidationError {
    /// Create a missing required attribute error
    pub fn missing_required(attribute: impl Into<String>) -> Self {
        Self::MissingRequiredAttribute {
            attribute: attribute.into(),
        }
    }

    /// Create a missing required sub-attribute error
    pub fn missing_required_sub(
        attribute: impl Into<String>,
        sub_attribute: impl Into<String>,
    ) -> Self {
        Self::MissingRequiredSubAttribute {
            attribute: attribute.into(),
            sub_attribute: sub_attribute.into(),
        }
    }

    /// Create an invalid type error
    pub fn invalid_type(
        attribute: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidAttributeType {
            attribute: attribute.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a custom validation error
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }
}

// Result type aliases for convenience
pub type ScimResult<T> = Result<T, ScimError>;
pub type ValidationResult<T> = Result<T, ValidationError>;
