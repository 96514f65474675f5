//! Query parameter records and their declarative constraints.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// `GET /users/` query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct UsersQuery {
    /// Maximum number of users.
    #[serde(default = "default_limit")]
    #[param(default = 10)]
    pub limit: i64,
    /// Only active users.
    #[serde(default = "default_true", deserialize_with = "flexible_bool")]
    #[param(default = true)]
    pub active: bool,
}

/// `GET /search/` query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Search text, 3 to 50 characters.
    #[validate(length(
        min = 3,
        max = 50,
        code = "string_length",
        message = "String should have between 3 and 50 characters"
    ))]
    #[param(min_length = 3, max_length = 50)]
    pub query: String,
}

/// `GET /paginate/` query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// Page number, starting at 1.
    #[serde(default = "default_page")]
    #[validate(range(
        min = 1,
        code = "greater_than_equal",
        message = "Input should be greater than or equal to 1"
    ))]
    #[param(default = 1, minimum = 1)]
    pub page: i64,
    /// Page size, at most 100.
    #[serde(default = "default_size")]
    #[validate(range(
        max = 100,
        code = "less_than_equal",
        message = "Input should be less than or equal to 100"
    ))]
    #[param(default = 10, maximum = 100)]
    pub size: i64,
}

/// Token carried by authenticated endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TokenQuery {
    /// Access token.
    #[serde(default)]
    pub token: Option<String>,
}

fn default_limit() -> i64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    10
}

/// Accept the usual spellings of a boolean query value.
fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "t" | "y" => Ok(true),
        "false" | "0" | "no" | "off" | "f" | "n" => Ok(false),
        _ => Err(serde::de::Error::custom(format!(
            "Input should be a valid boolean, unable to interpret input `{}`",
            raw
        ))),
    }
}
