//! Custom extractors.
//!
//! Wrappers around axum's `Query`, `Path` and `Json` that turn every rejection
//! and constraint violation into [`ApiError::Validation`], plus the dependency
//! extractors (`CurrentUser`, `AppSettings`, `Db`).

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use tracing::debug;
use validator::Validate;

use super::error::ApiError;
use super::params::TokenQuery;
use super::state::AppState;
use crate::deps::{authenticate, DbHandle, Settings, User};

/// Query string deserialized into `T` and checked against its constraints.
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        value
            .validate()
            .map_err(|errors| ApiError::from_validation("query", &errors))?;
        Ok(Self(value))
    }
}

/// Path parameters whose parse failures become 422s.
#[derive(Debug, Clone)]
pub struct PathParam<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for PathParam<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// JSON request body whose rejections become 422s.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Authenticated user resolved from the `token` query parameter.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ValidatedQuery(TokenQuery { token }) =
            ValidatedQuery::<TokenQuery>::from_request_parts(parts, state).await?;

        let user = authenticate(token.as_deref(), &state.config.auth_token)?;
        debug!(username = %user.username, "Authenticated request");

        Ok(Self(user))
    }
}

/// Settings dependency.
#[derive(Debug, Clone)]
pub struct AppSettings(pub Settings);

#[async_trait]
impl FromRequestParts<AppState> for AppSettings {
    type Rejection = ApiError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(state.settings()))
    }
}

/// Scoped database handle, released when the handler finishes.
#[derive(Debug)]
pub struct Db(pub DbHandle);

#[async_trait]
impl FromRequestParts<AppState> for Db {
    type Rejection = ApiError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(state.db.acquire()))
    }
}
