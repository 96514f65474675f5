//! HTTP API module: tutorial routes, dependency extractors, docs and
//! operational endpoints.

pub mod docs;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod params;
pub mod routes;
pub mod state;

pub use error::{ApiError, FieldError};
pub use routes::{create_router, ROUTES};
pub use state::AppState;
