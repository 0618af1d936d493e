//! Server-side validation of SCIM resources.
//!
//! Three schema-driven passes make up the engine:
//!
//! - [`check_required`] fails on a missing required attribute or sub-attribute
//! - [`reconcile_read_only`] merges read-only data of a stored resource into its replacement
//! - [`derive_schemas`] recomputes the `schemas` member from the attributes present
//!
//! [`ServerSideValidator`] combines them for create, update and retrieve.
//! Validation fails fast on the first violation.

pub mod projection;
pub mod read_only;
pub mod required;
pub mod schemas;
pub mod server;

pub use projection::{AttributeProjection, remove_never_returned};
pub use read_only::reconcile_read_only;
pub use required::check_required;
pub use schemas::derive_schemas;
pub use server::{PASSWORD, ServerSideValidator, compute_version};
