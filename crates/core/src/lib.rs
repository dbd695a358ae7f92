//! Core workflow engine for campus-rs.

pub mod services;

pub use services::*;

/// Generate a unique ID for entity rows.
#[must_use]
pub fn generate_id() -> String {
    campus_common::IdGenerator::new().generate()
}
