//! Tutorial HTTP API.
//!
//! A small axum service demonstrating the everyday building blocks of an HTTP
//! API: path and query extraction with declarative constraints, JSON request
//! bodies, response shaping (typed records, HTML, text, custom headers and
//! status codes), and request-scoped dependencies.
//!
//! # Dependencies
//!
//! Handlers receive their dependencies as extractor arguments. The scoped
//! database handle is an RAII guard: it is released when the handler returns,
//! fails, or unwinds.
//!
//! ```text
//! GET /db/
//!   acquire  -> log "open"
//!   handler  -> {"db_status": "fake_db_connection"}
//!   drop     -> log "close"
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Startup error types
//! - [`items`]: Item request/response models
//! - [`deps`]: Authentication, settings and database providers
//! - [`api`]: Routes, handlers, extractors and docs
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod deps;
pub mod error;
pub mod items;
pub mod metrics;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
