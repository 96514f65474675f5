//! OpenAPI document and interactive docs UI.

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::error::FieldError;
use super::handlers;
use super::handlers::{
    DbStatusResponse, Greeting, HealthResponse, ItemDetails, ItemIdResponse, MessageResponse,
    ProductIdResponse,
};
use super::params::{PaginationQuery, SearchQuery, UsersQuery};
use crate::deps::{Settings, User};
use crate::items::{Item, ItemEcho, ItemReply, ResponseItem};

/// Path of the generated OpenAPI document.
pub const OPENAPI_PATH: &str = "/openapi.json";
/// Path of the docs UI.
pub const DOCS_PATH: &str = "/docs";

/// OpenAPI description of every tutorial route.
#[derive(OpenApi)]
#[openapi(
    info(title = "Tutorial API", description = "Query parsing, bodies, response shaping and dependencies"),
    paths(
        handlers::read_root,
        handlers::read_users,
        handlers::create_item,
        handlers::read_item,
        handlers::search_items,
        handlers::paginate,
        handlers::read_product,
        handlers::create_product,
        handlers::get_html,
        handlers::get_text,
        handlers::custom_header,
        handlers::read_item_details,
        handlers::read_current_user,
        handlers::read_db,
        handlers::health,
    ),
    components(schemas(
        Item,
        ResponseItem,
        ItemEcho,
        ItemReply,
        UsersQuery,
        SearchQuery,
        PaginationQuery,
        Settings,
        User,
        Greeting,
        ItemIdResponse,
        ProductIdResponse,
        MessageResponse,
        ItemDetails,
        DbStatusResponse,
        HealthResponse,
        FieldError,
    ))
)]
pub struct ApiDoc;

/// Swagger UI serving [`ApiDoc`].
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new(DOCS_PATH).url(OPENAPI_PATH, ApiDoc::openapi())
}
