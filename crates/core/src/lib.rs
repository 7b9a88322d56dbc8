//! Core business logic for mailroom.

pub mod services;

pub use services::*;

/// Generate a unique ID using ULID.
#[must_use]
pub fn generate_id() -> String {
    ulid::Ulid::new().to_string().to_lowercase()
}
