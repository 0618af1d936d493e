//! SCIM Core Integration Test Suite
//!
//! ## Test Organization
//!
//! - `codec/` - JSON decoding and encoding against the embedded schemas
//! - `validation/` - Create, update and retrieve rules of the validation engine
//! - `protocol/` - Endpoint request flow and bulk processing
//!
//! ## Test Utilities
//!
//! - `common/` - Logging setup, payload fixtures and an in-memory handler
//!
//! ## Usage
//!
//! ```bash
//! cargo test
//! cargo test validation::
//! ```

extern crate scim_core;

pub mod codec;
pub mod common;
pub mod protocol;
pub mod validation;
