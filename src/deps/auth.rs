//! Token-based authentication dependency.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// The authenticated user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Login name.
    pub username: String,
    /// Contact address.
    pub email: String,
}

impl User {
    /// The single user every valid token resolves to.
    pub fn fixed() -> Self {
        Self {
            username: "john_doe".to_string(),
            email: "john@example.com".to_string(),
        }
    }
}

/// Authentication failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No token supplied.
    #[error("invalid token")]
    MissingToken,

    /// Token supplied but not accepted.
    #[error("invalid token")]
    InvalidToken,
}

/// Resolve the user for `token`, accepting only `expected`.
pub fn authenticate(token: Option<&str>, expected: &str) -> Result<User, AuthError> {
    match token {
        None => Err(AuthError::MissingToken),
        Some(token) if token == expected => Ok(User::fixed()),
        Some(_) => Err(AuthError::InvalidToken),
    }
}
