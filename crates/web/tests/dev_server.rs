use axum::body::Bytes;
use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::{Json, Router};
use order_entry_web::{dev_router, preview_router, WebConfig};
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(app: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Backend that echoes what it received
fn echo_backend() -> Router {
    Router::new().fallback(|request: Request| async move {
        let (parts, body) = request.into_parts();
        let body: Bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        Json(json!({
            "method": parts.method.as_str(),
            "uri": parts.uri.to_string(),
            "host": parts.headers.get(header::HOST).and_then(|v| v.to_str().ok()),
            "content_type": parts.headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            "body": String::from_utf8_lossy(&body),
        }))
    })
}

fn site() -> (TempDir, WebConfig) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("public");
    fs::create_dir_all(root.join("assets")).unwrap();
    fs::write(root.join("index.html"), "<h1>orders</h1>").unwrap();
    fs::write(root.join("assets/app.js"), "export {}").unwrap();

    let mut config = WebConfig {
        root,
        ..WebConfig::default()
    };
    config.build.out_dir = dir.path().join("dist");
    (dir, config)
}

#[tokio::test]
async fn api_requests_are_forwarded_with_path_and_query() {
    let backend = TestServer::spawn(echo_backend()).await;
    let (_dir, mut config) = site();
    config.proxy.target = backend.base_url.clone();
    let dev = TestServer::spawn(dev_router(&config).unwrap()).await;

    let reply: Value = reqwest::Client::new()
        .post(format!(
            "{}/api/orders/create/lookup_customer?page=2&customer_name=Ac",
            dev.base_url
        ))
        .header(header::CONTENT_TYPE, "application/json")
        .body(r#"{"x":1}"#)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(reply["method"], "POST");
    assert_eq!(
        reply["uri"],
        "/api/orders/create/lookup_customer?page=2&customer_name=Ac"
    );
    assert_eq!(reply["content_type"], "application/json");
    assert_eq!(reply["body"], r#"{"x":1}"#);
    // change-origin: the backend sees its own host
    assert_eq!(reply["host"], backend.base_url.trim_start_matches("http://"));
}

#[tokio::test]
async fn upstream_status_is_passed_through() {
    let backend = TestServer::spawn(
        Router::new().fallback(|| async { (StatusCode::NOT_FOUND, "missing") }),
    )
    .await;
    let (_dir, mut config) = site();
    config.proxy.target = backend.base_url.clone();
    let dev = TestServer::spawn(dev_router(&config).unwrap()).await;

    let response = reqwest::get(format!("{}/api/unknown", dev.base_url))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.text().await.unwrap(), "missing");
}

#[tokio::test]
async fn unreachable_backend_is_bad_gateway() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (_dir, mut config) = site();
    config.proxy.target = format!("http://{addr}");
    let dev = TestServer::spawn(dev_router(&config).unwrap()).await;

    let response = reqwest::get(format!("{}/api/test", dev.base_url))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn static_files_and_spa_fallback() {
    let (_dir, config) = site();
    let dev = TestServer::spawn(dev_router(&config).unwrap()).await;

    let index = reqwest::get(format!("{}/", dev.base_url)).await.unwrap();
    assert_eq!(index.status(), StatusCode::OK);
    assert_eq!(index.text().await.unwrap(), "<h1>orders</h1>");

    let script = reqwest::get(format!("{}/assets/app.js", dev.base_url))
        .await
        .unwrap();
    assert_eq!(
        script.headers()[header::CONTENT_TYPE],
        "text/javascript; charset=utf-8"
    );
    assert_eq!(script.text().await.unwrap(), "export {}");

    let route = reqwest::get(format!("{}/orders/new", dev.base_url))
        .await
        .unwrap();
    assert_eq!(route.text().await.unwrap(), "<h1>orders</h1>");

    let missing = reqwest::get(format!("{}/assets/missing.css", dev.base_url))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn preview_serves_build_output() {
    let (_dir, config) = site();
    order_entry_web::build(&config).unwrap();
    let preview = TestServer::spawn(preview_router(&config).unwrap()).await;

    let env = reqwest::get(format!("{}/env.js", preview.base_url))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(env.contains("window.__API_URL__ = \"http://localhost:8080\";"));
}
