//! Common utilities and shared types for mailroom.
//!
//! This crate provides the foundational pieces used across all mailroom
//! crates:
//!
//! - **Configuration**: application settings via [`Config`]
//! - **Error handling**: unified error types via [`AppError`] and [`AppResult`]
//! - **HTML composition**: appending content to HTML bodies via
//!   [`append_content_to_html`]

pub mod config;
pub mod error;
pub mod html;

pub use config::{Config, DatabaseConfig, MailConfig, MailProviderConfig};
pub use error::{AppError, AppResult};
pub use html::{append_content_to_html, escape_html};
