//! HTTP API handlers.
//!
//! Every handler is a stateless function of its extracted inputs. Constraint
//! checking happens in the extractors before a handler body runs.

use axum::extract::State;
use axum::http::{header::HeaderName, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde::Serialize;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use super::error::ApiError;
use super::extract::{AppSettings, CurrentUser, Db, JsonBody, PathParam, ValidatedQuery};
use super::params::{PaginationQuery, SearchQuery, TokenQuery, UsersQuery};
use super::state::AppState;
use crate::deps::{Settings, User};
use crate::items::{Item, ItemReply};

/// Header attached by `GET /custom-header/`.
pub const CUSTOM_HEADER_NAME: &str = "x-custom-header";
/// Value of [`CUSTOM_HEADER_NAME`].
pub const CUSTOM_HEADER_VALUE: &str = "Custom value";

/// Body of `GET /html/`.
pub const HTML_BODY: &str = "<h1>Hello, FastAPI HTML!</h1>";
/// Body of `GET /text/`.
pub const TEXT_BODY: &str = "Hello, FastAPI plain text!";

/// Root greeting.
#[derive(Debug, Serialize, ToSchema)]
pub struct Greeting {
    /// Always "World".
    #[serde(rename = "Hello")]
    pub hello: String,
}

/// Echo of a valid item id.
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemIdResponse {
    /// The requested id.
    pub item_id: i64,
}

/// Echo of a valid product id.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductIdResponse {
    /// The requested id.
    pub product_id: i64,
}

/// Body of `GET /custom-header/`.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Informational message.
    pub message: String,
}

/// Settings and user resolved together.
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemDetails {
    /// Settings dependency value.
    pub settings: Settings,
    /// Authenticated user.
    pub user: User,
}

/// Database dependency status.
#[derive(Debug, Serialize, ToSchema)]
pub struct DbStatusResponse {
    /// The handle value the dependency yielded.
    pub db_status: String,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: String,
}

/// Fixed greeting.
#[utoipa::path(get, path = "/", tag = "basics", responses((status = 200, body = Greeting)))]
pub async fn read_root() -> Json<Greeting> {
    Json(Greeting {
        hello: "World".to_string(),
    })
}

/// Echo `limit` and `active` query parameters.
#[utoipa::path(
    get,
    path = "/users/",
    tag = "query",
    params(UsersQuery),
    responses((status = 200, body = UsersQuery), (status = 422, body = [super::error::FieldError]))
)]
pub async fn read_users(ValidatedQuery(query): ValidatedQuery<UsersQuery>) -> Json<UsersQuery> {
    Json(query)
}

/// Create an item; the reply shape depends on the configured mode.
#[utoipa::path(
    post,
    path = "/items/",
    tag = "items",
    request_body = Item,
    responses((status = 200, body = ItemReply), (status = 422, body = [super::error::FieldError]))
)]
pub async fn create_item(
    State(state): State<AppState>,
    JsonBody(item): JsonBody<Item>,
) -> Json<ItemReply> {
    let mode = state.config.items_response;
    debug!(name = %item.name, %mode, is_offer = item.is_offer(), "Creating item");
    Json(ItemReply::for_mode(mode, &item))
}

/// Echo a non-negative item id.
#[utoipa::path(
    get,
    path = "/items/{item_id}",
    tag = "items",
    params(("item_id" = i64, Path, description = "Item id, must not be negative")),
    responses(
        (status = 200, body = ItemIdResponse),
        (status = 400, description = "Invalid ID: must be positive."),
        (status = 422, body = [super::error::FieldError])
    )
)]
pub async fn read_item(
    PathParam(item_id): PathParam<i64>,
) -> Result<Json<ItemIdResponse>, ApiError> {
    if item_id < 0 {
        return Err(ApiError::bad_request("Invalid ID: must be positive."));
    }
    Ok(Json(ItemIdResponse { item_id }))
}

/// Echo a search string of 3 to 50 characters.
#[utoipa::path(
    get,
    path = "/search/",
    tag = "query",
    params(SearchQuery),
    responses((status = 200, body = SearchQuery), (status = 422, body = [super::error::FieldError]))
)]
pub async fn search_items(
    ValidatedQuery(query): ValidatedQuery<SearchQuery>,
) -> Json<SearchQuery> {
    Json(query)
}

/// Echo bounded pagination parameters.
#[utoipa::path(
    get,
    path = "/paginate/",
    tag = "query",
    params(PaginationQuery),
    responses((status = 200, body = PaginationQuery), (status = 422, body = [super::error::FieldError]))
)]
pub async fn paginate(
    ValidatedQuery(query): ValidatedQuery<PaginationQuery>,
) -> Json<PaginationQuery> {
    Json(query)
}

/// Echo a positive product id.
#[utoipa::path(
    get,
    path = "/products/{product_id}",
    tag = "products",
    params(("product_id" = i64, Path, description = "Product id, must be positive")),
    responses(
        (status = 200, body = ProductIdResponse),
        (status = 400, description = "Invalid product ID"),
        (status = 422, body = [super::error::FieldError])
    )
)]
pub async fn read_product(
    PathParam(product_id): PathParam<i64>,
) -> Result<Json<ProductIdResponse>, ApiError> {
    if product_id <= 0 {
        return Err(ApiError::bad_request("Invalid product ID"));
    }
    Ok(Json(ProductIdResponse { product_id }))
}

/// Return the submitted item with 201 Created.
#[utoipa::path(
    post,
    path = "/products/",
    tag = "products",
    request_body = Item,
    responses((status = 201, body = Item), (status = 422, body = [super::error::FieldError]))
)]
pub async fn create_product(JsonBody(item): JsonBody<Item>) -> (StatusCode, Json<Item>) {
    (StatusCode::CREATED, Json(item))
}

/// Fixed HTML fragment.
#[utoipa::path(
    get,
    path = "/html/",
    tag = "responses",
    responses((status = 200, content_type = "text/html", body = String))
)]
pub async fn get_html() -> Html<&'static str> {
    Html(HTML_BODY)
}

/// Fixed plain text.
#[utoipa::path(
    get,
    path = "/text/",
    tag = "responses",
    responses((status = 200, content_type = "text/plain", body = String))
)]
pub async fn get_text() -> &'static str {
    TEXT_BODY
}

/// Mapping response carrying `X-Custom-Header`.
#[utoipa::path(
    get,
    path = "/custom-header/",
    tag = "responses",
    responses((status = 200, body = MessageResponse, headers(("x-custom-header" = String))))
)]
pub async fn custom_header() -> impl IntoResponse {
    (
        [(
            HeaderName::from_static(CUSTOM_HEADER_NAME),
            HeaderValue::from_static(CUSTOM_HEADER_VALUE),
        )],
        Json(MessageResponse {
            message: "Custom header added".to_string(),
        }),
    )
}

/// Settings and the authenticated user.
#[utoipa::path(
    get,
    path = "/items/details",
    tag = "dependencies",
    params(TokenQuery),
    responses((status = 200, body = ItemDetails), (status = 401, description = "invalid token"))
)]
pub async fn read_item_details(
    AppSettings(settings): AppSettings,
    CurrentUser(user): CurrentUser,
) -> Json<ItemDetails> {
    Json(ItemDetails { settings, user })
}

/// The authenticated user.
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "dependencies",
    params(TokenQuery),
    responses((status = 200, body = User), (status = 401, description = "invalid token"))
)]
pub async fn read_current_user(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

/// Report the value of a scoped database handle.
#[utoipa::path(
    get,
    path = "/db/",
    tag = "dependencies",
    responses((status = 200, body = DbStatusResponse))
)]
#[instrument(skip(db), fields(handle = db.0.id()))]
pub async fn read_db(db: Db) -> Json<DbStatusResponse> {
    let Db(handle) = db;
    Json(DbStatusResponse {
        db_status: handle.connection().to_string(),
    })
}

/// Health check handler - always returns 200.
#[utoipa::path(get, path = "/health", tag = "ops", responses((status = 200, body = HealthResponse)))]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Prometheus text exposition.
pub async fn metrics(State(state): State<AppState>) -> Result<String, ApiError> {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .ok_or_else(|| ApiError::Unavailable("metrics recorder not installed".to_string()))
}

/// Fallback for unmatched routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
