//! Black-box tests against a real listener.
//!
//! Each test binds the production router to an ephemeral port and talks to it
//! over HTTP.

use futures::future::join_all;
use metrics_exporter_prometheus::PrometheusBuilder;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tutorial_api::api::{create_router, AppState};
use tutorial_api::config::Config;

struct TestServer {
    base_url: String,
    state: AppState,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(state: AppState) -> Self {
        let app = create_router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            state,
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn tutorial_walkthrough_over_http() {
    let server = TestServer::spawn(AppState::default()).await;
    let client = reqwest::Client::new();

    let root: Value = client.get(server.url("/")).send().await.unwrap().json().await.unwrap();
    assert_eq!(root, json!({"Hello": "World"}));

    let users: Value = client
        .get(server.url("/users/?limit=5"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(users, json!({"limit": 5, "active": true}));

    let res = client
        .post(server.url("/items/"))
        .json(&json!({"name": "a", "price": 10, "tax": 1}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let item: Value = res.json().await.unwrap();
    assert_eq!(item["is_offer"], json!(true));

    let res = client
        .post(server.url("/products/"))
        .json(&json!({"name": "desk", "description": "oak", "price": 120, "tax": 9.6}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let product: Value = res.json().await.unwrap();
    assert_eq!(
        product,
        json!({"name": "desk", "description": "oak", "price": 120.0, "tax": 9.6})
    );

    let res = client.get(server.url("/items/-3")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client.get(server.url("/search/?query=ab")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let res = client.get(server.url("/custom-header/")).send().await.unwrap();
    assert_eq!(res.headers()["x-custom-header"], "Custom value");
}

#[tokio::test]
async fn authentication_over_http() {
    let server = TestServer::spawn(AppState::default()).await;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/users/me")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"detail": "invalid token"}));

    let res = client
        .get(server.url("/items/details"))
        .query(&[("token", "valid-token")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["user"]["username"], json!("john_doe"));
    assert_eq!(body["settings"]["app_name"], json!("Awesome API"));
}

#[tokio::test]
async fn concurrent_db_requests_release_every_handle() {
    let server = TestServer::spawn(AppState::default()).await;
    let client = reqwest::Client::new();

    let requests: Vec<_> = (0..32)
        .map(|_| {
            let client = client.clone();
            let url = server.url("/db/");
            async move { client.get(url).send().await.unwrap().status() }
        })
        .collect();

    let statuses = join_all(requests).await;
    assert!(statuses.iter().all(|s| *s == StatusCode::OK));

    let stats = server.state.db.stats();
    assert_eq!(stats.opened, 32);
    assert_eq!(stats.closed, 32);
    assert_eq!(stats.in_use(), 0);
}

#[tokio::test]
async fn custom_config_flows_through_every_dependency() {
    let config = Config::from_vars(vec![
        ("APP_NAME".to_string(), "Inventory".to_string()),
        ("AUTH_TOKEN".to_string(), "letmein".to_string()),
        ("ITEMS_RESPONSE".to_string(), "echo".to_string()),
        ("DB_CONNECTION".to_string(), "postgres://fake".to_string()),
    ])
    .unwrap();
    let server = TestServer::spawn(AppState::new(config)).await;
    let client = reqwest::Client::new();

    let details: Value = client
        .get(server.url("/items/details?token=letmein"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(details["settings"]["app_name"], json!("Inventory"));

    let item: Value = client
        .post(server.url("/items/"))
        .json(&json!({"name": "a", "price": 10, "tax": 1}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(item, json!({"name": "a", "price": 10.0}));

    let db: Value = client
        .get(server.url("/db/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(db, json!({"db_status": "postgres://fake"}));
}

#[tokio::test]
async fn metrics_endpoint_renders_with_a_handle() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let state = AppState::default().with_metrics(recorder.handle());
    let server = TestServer::spawn(state).await;

    let res = reqwest::get(server.url("/metrics")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
