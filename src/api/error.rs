//! HTTP API error type and its response mapping.
//!
//! Error bodies use a `detail` field: a message string for 400/401/404/503,
//! and a list of field errors for 422.

use axum::extract::path::ErrorKind;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};
use utoipa::ToSchema;
use validator::ValidationErrors;

use crate::deps::AuthError;

/// One failed field in a 422 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    /// Where the value came from, then the field name: `["query", "size"]`.
    pub loc: Vec<String>,
    /// Human-readable message.
    pub msg: String,
    /// Machine-readable error kind.
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    /// Build a field error for `location` (and optional `field`).
    pub fn new(
        location: &str,
        field: Option<&str>,
        msg: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        let mut loc = vec![location.to_string()];
        if let Some(field) = field {
            loc.push(field.to_string());
        }

        Self {
            loc,
            msg: msg.into(),
            kind: kind.into(),
        }
    }
}

/// Request-level API errors.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or out-of-range input value (400).
    #[error("{0}")]
    BadRequest(String),

    /// Missing or incorrect credentials (401).
    #[error("{0}")]
    Unauthorized(String),

    /// Constraint or schema violation (422).
    #[error("validation failed: {} error(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// No route matched (404).
    #[error("Not Found")]
    NotFound,

    /// A backing facility is not available (503).
    #[error("{0}")]
    Unavailable(String),
}

impl ApiError {
    /// Create a BadRequest error with a custom message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Convert `validator` errors raised on values from `location`.
    pub fn from_validation(location: &str, errors: &ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| {
                    let msg = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field));
                    FieldError::new(location, Some(field), msg, err.code.to_string())
                })
            })
            .collect();
        fields.sort_by(|a, b| a.loc.cmp(&b.loc));

        Self::Validation(fields)
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Unauthorized(err.to_string())
    }
}

/// Field named by a serde "missing field `x`" or "unknown field `x`" message.
///
/// Value parse failures from the query string carry no field name, so those
/// errors keep the bare `["query"]` location.
fn field_in_message(msg: &str) -> Option<&str> {
    let start = msg
        .find("missing field `")
        .or_else(|| msg.find("unknown field `"))?
        + "missing field `".len();
    let rest = &msg[start..];
    rest.find('`').map(|end| &rest[..end])
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        let msg = rejection.body_text();
        let field = field_in_message(&msg).map(str::to_string);

        ApiError::Validation(vec![FieldError::new(
            "query",
            field.as_deref(),
            msg,
            "query_invalid",
        )])
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        let field = match &rejection {
            PathRejection::FailedToDeserializePathParams(err) => match err.kind() {
                ErrorKind::ParseErrorAtKey { key, .. }
                | ErrorKind::InvalidUtf8InPathParam { key } => Some(key.clone()),
                _ => None,
            },
            _ => None,
        };

        ApiError::Validation(vec![FieldError::new(
            "path",
            field.as_deref(),
            rejection.body_text(),
            "path_invalid",
        )])
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let kind = match &rejection {
            JsonRejection::JsonDataError(_) => "json_data",
            JsonRejection::JsonSyntaxError(_) => "json_invalid",
            JsonRejection::MissingJsonContentType(_) => "content_type",
            _ => "body_invalid",
        };

        ApiError::Validation(vec![FieldError::new(
            "body",
            None,
            rejection.body_text(),
            kind,
        )])
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            ApiError::Validation(fields) => {
                debug!(errors = fields.len(), "Request failed validation");
                json!({ "detail": fields })
            }
            ApiError::Unauthorized(message) => {
                warn!(%message, "Rejected unauthenticated request");
                json!({ "detail": message })
            }
            ApiError::Unavailable(message) => {
                warn!(%message, "Service facility unavailable");
                json!({ "detail": message })
            }
            other => {
                debug!(error = %other, status = status.as_u16(), "Client error");
                json!({ "detail": other.to_string() })
            }
        };

        (status, Json(body)).into_response()
    }
}
