//! HTTP API route definitions.

use axum::extract::{MatchedPath, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use super::docs::swagger_ui;
use super::handlers::{
    create_item, create_product, custom_header, get_html, get_text, health, metrics, not_found,
    paginate, read_current_user, read_db, read_item, read_item_details, read_product, read_root,
    read_users, search_items,
};
use super::state::AppState;
use crate::metrics as telemetry;

/// One row of the route table: method, path, summary.
pub type RouteInfo = (&'static str, &'static str, &'static str);

/// Every route the service answers, in registration order.
pub const ROUTES: &[RouteInfo] = &[
    ("GET", "/", "fixed greeting"),
    ("GET", "/users/", "echo limit and active"),
    ("POST", "/items/", "create an item"),
    ("GET", "/items/details", "settings and authenticated user"),
    ("GET", "/items/{item_id}", "echo a non-negative item id"),
    ("GET", "/search/", "echo a 3-50 character query"),
    ("GET", "/paginate/", "echo bounded page and size"),
    ("GET", "/products/{product_id}", "echo a positive product id"),
    ("POST", "/products/", "return the item with 201 Created"),
    ("GET", "/html/", "HTML fragment"),
    ("GET", "/text/", "plain text"),
    ("GET", "/custom-header/", "mapping with X-Custom-Header"),
    ("GET", "/users/me", "authenticated user"),
    ("GET", "/db/", "scoped database handle status"),
    ("GET", "/health", "liveness probe"),
    ("GET", "/metrics", "Prometheus metrics"),
];

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let docs_enabled = state.config.enable_docs;

    let mut router = Router::new()
        // Basics
        .route("/", get(read_root))
        .route("/users/", get(read_users))
        // Items
        .route("/items/", post(create_item))
        .route("/items/details", get(read_item_details))
        .route("/items/:item_id", get(read_item))
        // Query validation
        .route("/search/", get(search_items))
        .route("/paginate/", get(paginate))
        // Products
        .route("/products/", post(create_product))
        .route("/products/:product_id", get(read_product))
        // Response shaping
        .route("/html/", get(get_html))
        .route("/text/", get(get_text))
        .route("/custom-header/", get(custom_header))
        // Dependencies
        .route("/users/me", get(read_current_user))
        .route("/db/", get(read_db))
        // Operations
        .route("/health", get(health))
        .route("/metrics", get(metrics));

    if docs_enabled {
        router = router.merge(swagger_ui());
    }

    router
        .fallback(not_found)
        .layer(middleware::from_fn(track_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Record a request counter and latency per matched route.
async fn track_requests(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let _timer = telemetry::timer_http_request(path.clone());
    let response = next.run(request).await;
    telemetry::inc_http_requests(&method, &path, response.status().as_u16());

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        send(create_router(AppState::default()), Method::GET, uri, None).await
    }

    #[tokio::test]
    async fn root_returns_greeting() {
        let (status, body) = get_json("/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"Hello": "World"}));
    }

    #[tokio::test]
    async fn users_echo_defaults_and_overrides() {
        assert_eq!(get_json("/users/").await.1, json!({"limit": 10, "active": true}));
        assert_eq!(
            get_json("/users/?limit=3&active=false").await.1,
            json!({"limit": 3, "active": false})
        );
    }

    #[tokio::test]
    async fn users_reject_non_integer_limit() {
        let (status, body) = get_json("/users/?limit=many").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"][0]["loc"], json!(["query"]));
    }

    #[tokio::test]
    async fn item_ids_split_at_zero() {
        for n in [0, 1, 42, i64::MAX] {
            let (status, body) = get_json(&format!("/items/{}", n)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({"item_id": n}));
        }

        for n in [-1, -42, i64::MIN] {
            let (status, body) = get_json(&format!("/items/{}", n)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({"detail": "Invalid ID: must be positive."}));
        }
    }

    #[tokio::test]
    async fn non_integer_item_id_is_unprocessable() {
        let (status, body) = get_json("/items/abc").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"][0]["loc"], json!(["path", "item_id"]));

        let (status, body) = get_json("/products/1.5").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"][0]["loc"], json!(["path", "product_id"]));
    }

    #[tokio::test]
    async fn product_ids_split_at_one() {
        for n in [1, 7, i64::MAX] {
            let (status, body) = get_json(&format!("/products/{}", n)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({"product_id": n}));
        }

        for n in [0, -1, i64::MIN] {
            let (status, body) = get_json(&format!("/products/{}", n)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({"detail": "Invalid product ID"}));
        }
    }

    #[tokio::test]
    async fn search_enforces_length_bounds() {
        for len in [3, 4, 25, 50] {
            let query = "q".repeat(len);
            let (status, body) = get_json(&format!("/search/?query={}", query)).await;
            assert_eq!(status, StatusCode::OK, "len {}", len);
            assert_eq!(body, json!({"query": query}));
        }

        for len in [0, 1, 2, 51, 80] {
            let query = "q".repeat(len);
            let (status, body) = get_json(&format!("/search/?query={}", query)).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "len {}", len);
            assert_eq!(body["detail"][0]["loc"], json!(["query", "query"]));
        }
    }

    #[tokio::test]
    async fn search_requires_query() {
        let (status, body) = get_json("/search/").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"][0]["loc"], json!(["query", "query"]));
    }

    #[tokio::test]
    async fn search_decodes_percent_encoding() {
        let (status, body) = get_json("/search/?query=red%20shoes").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"query": "red shoes"}));
    }

    #[tokio::test]
    async fn paginate_defaults_and_bounds() {
        assert_eq!(get_json("/paginate/").await.1, json!({"page": 1, "size": 10}));
        assert_eq!(
            get_json("/paginate/?page=3&size=100").await.1,
            json!({"page": 3, "size": 100})
        );

        let (status, body) = get_json("/paginate/?page=0").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body["detail"][0],
            json!({
                "loc": ["query", "page"],
                "msg": "Input should be greater than or equal to 1",
                "type": "greater_than_equal"
            })
        );

        let (status, body) = get_json("/paginate/?size=101").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"][0]["loc"], json!(["query", "size"]));

        let (status, body) = get_json("/paginate/?page=0&size=101").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn create_item_typed_variant_reports_offer() {
        let app = create_router(AppState::default());
        let (status, body) = send(
            app,
            Method::POST,
            "/items/",
            Some(json!({"name": "a", "price": 10, "tax": 1})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"name": "a", "price": 10.0, "is_offer": true}));

        let app = create_router(AppState::default());
        let (_, body) = send(
            app,
            Method::POST,
            "/items/",
            Some(json!({"name": "a", "price": 10, "tax": 0})),
        )
        .await;
        assert_eq!(body["is_offer"], json!(false));
    }

    #[tokio::test]
    async fn create_item_keeps_tiny_taxes_and_huge_prices() {
        let (status, body) = send(
            create_router(AppState::default()),
            Method::POST,
            "/items/",
            Some(json!({"name": "a", "price": 10, "tax": 1e-30})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_offer"], json!(true));

        let (status, body) = send(
            create_router(AppState::default()),
            Method::POST,
            "/items/",
            Some(json!({"name": "a", "price": 1e30})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"name": "a", "price": 1e30, "is_offer": false}));
    }

    #[tokio::test]
    async fn create_item_echo_variant() {
        let state = AppState::new(Config {
            items_response: crate::items::ItemsResponseMode::Echo,
            ..Config::default()
        });
        let (status, body) = send(
            create_router(state),
            Method::POST,
            "/items/",
            Some(json!({"name": "a", "price": 10, "tax": 1})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"name": "a", "price": 10.0}));
    }

    #[tokio::test]
    async fn create_item_rejects_missing_price() {
        let (status, body) = send(
            create_router(AppState::default()),
            Method::POST,
            "/items/",
            Some(json!({"name": "a"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"][0]["loc"], json!(["body"]));
    }

    #[tokio::test]
    async fn create_product_returns_201_with_defaults_filled() {
        let (status, body) = send(
            create_router(AppState::default()),
            Method::POST,
            "/products/",
            Some(json!({"name": "lamp", "price": 25.5})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            json!({"name": "lamp", "description": null, "price": 25.5, "tax": 0.0})
        );
    }

    #[tokio::test]
    async fn html_and_text_have_their_content_types() {
        let app = create_router(AppState::default());
        let response = app
            .oneshot(Request::builder().uri("/html/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<h1>Hello, FastAPI HTML!</h1>");

        let app = create_router(AppState::default());
        let response = app
            .oneshot(Request::builder().uri("/text/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Hello, FastAPI plain text!");
    }

    #[tokio::test]
    async fn custom_header_is_attached() {
        let app = create_router(AppState::default());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/custom-header/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-custom-header"], "Custom value");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"message": "Custom header added"}));
    }

    #[tokio::test]
    async fn details_route_is_not_captured_by_item_id() {
        let (status, body) = get_json("/items/details?token=valid-token").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "settings": {"app_name": "Awesome API", "items_per_user": 50},
                "user": {"username": "john_doe", "email": "john@example.com"}
            })
        );
    }

    #[tokio::test]
    async fn authenticated_routes_require_the_sentinel_token() {
        for uri in ["/items/details", "/users/me"] {
            for query in ["", "?token=", "?token=nope", "?token=VALID-TOKEN"] {
                let (status, body) = get_json(&format!("{}{}", uri, query)).await;
                assert_eq!(status, StatusCode::UNAUTHORIZED, "{}{}", uri, query);
                assert_eq!(body, json!({"detail": "invalid token"}));
            }
        }

        let (status, body) = get_json("/users/me?token=valid-token").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"username": "john_doe", "email": "john@example.com"}));
    }

    #[tokio::test]
    async fn configured_token_replaces_the_default() {
        let state = AppState::new(Config {
            auth_token: "rotated".to_string(),
            ..Config::default()
        });

        let app = create_router(state.clone());
        assert_eq!(
            send(app, Method::GET, "/users/me?token=valid-token", None).await.0,
            StatusCode::UNAUTHORIZED
        );

        let app = create_router(state);
        assert_eq!(
            send(app, Method::GET, "/users/me?token=rotated", None).await.0,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn db_route_releases_one_handle_per_request() {
        let state = AppState::default();

        for round in 1..=3u64 {
            let (status, body) =
                send(create_router(state.clone()), Method::GET, "/db/", None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({"db_status": "fake_db_connection"}));

            let stats = state.db.stats();
            assert_eq!(stats.opened, round);
            assert_eq!(stats.closed, round);
        }
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let (status, body) = get_json("/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn metrics_without_recorder_is_503() {
        let (status, _) = get_json("/metrics").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn unknown_route_is_404_with_detail() {
        let (status, body) = get_json("/nowhere").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"detail": "Not Found"}));
    }

    #[tokio::test]
    async fn openapi_document_is_served_when_docs_enabled() {
        let (status, body) = get_json("/openapi.json").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/items/{item_id}"].is_object());
    }

    #[tokio::test]
    async fn docs_can_be_disabled() {
        let state = AppState::new(Config {
            enable_docs: false,
            ..Config::default()
        });
        let (status, _) = send(create_router(state), Method::GET, "/openapi.json", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn every_listed_route_is_registered() {
        for (method, path, _) in ROUTES {
            let uri = path
                .replace("{item_id}", "1")
                .replace("{product_id}", "1");
            let method: Method = method.parse().unwrap();
            let (status, _) = send(
                create_router(AppState::default()),
                method.clone(),
                &uri,
                Some(json!({"name": "a", "price": 1})),
            )
            .await;
            assert_ne!(status, StatusCode::NOT_FOUND, "{} {}", method, path);
            assert_ne!(status, StatusCode::METHOD_NOT_ALLOWED, "{} {}", method, path);
        }
    }
}
