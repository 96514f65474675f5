//! Request-scoped dependency providers.
//!
//! Each provider is plain Rust: handlers reach them through the extractors in
//! [`crate::api::extract`], which resolve them per request.
//!
//! - [`auth`]: token check yielding the authenticated user
//! - [`settings`]: fixed application settings
//! - [`db`]: scoped database handle with guaranteed release

pub mod auth;
pub mod db;
pub mod settings;

pub use auth::{authenticate, AuthError, User};
pub use db::{DbHandle, DbPool, DbStats};
pub use settings::Settings;
