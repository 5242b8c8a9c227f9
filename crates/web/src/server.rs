//! Dev and preview HTTP servers
//!
//! Both servers share one fallback handler: paths under the proxy prefix go
//! to the backend, everything else is read from a static directory with an
//! `index.html` fallback for client-side routes.

use crate::config::WebConfig;
use crate::error::{WebError, WebResult};
use crate::proxy::Proxy;
use axum::extract::{Request, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info};

#[derive(Clone)]
struct AppState {
    proxy: Proxy,
    static_dir: Arc<PathBuf>,
}

/// Router for the dev server: proxy plus the static source root
pub fn dev_router(config: &WebConfig) -> WebResult<Router> {
    router(config, config.root.clone())
}

/// Router for the preview server: proxy plus the build output
pub fn preview_router(config: &WebConfig) -> WebResult<Router> {
    router(config, config.build.out_dir.clone())
}

fn router(config: &WebConfig, static_dir: PathBuf) -> WebResult<Router> {
    let state = AppState {
        proxy: Proxy::new(config.proxy.clone())?,
        static_dir: Arc::new(static_dir),
    };
    Ok(Router::new().fallback(dispatch).with_state(state))
}

/// Bind `host:port` and serve `router` until Ctrl-C
pub async fn serve(router: Router, host: &str, port: u16) -> WebResult<()> {
    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| WebError::io(&addr, e))?;
    let local = listener.local_addr().map_err(|e| WebError::io(&addr, e))?;

    info!(address = %local, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| WebError::io(&addr, e))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}

async fn dispatch(State(state): State<AppState>, request: Request) -> Response {
    if state.proxy.matches(request.uri().path()) {
        return state.proxy.forward(request).await;
    }

    if request.method() != Method::GET && request.method() != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    serve_static(&state.static_dir, request.uri().path()).await
}

async fn serve_static(root: &Path, uri_path: &str) -> Response {
    let Some(relative) = sanitize_path(uri_path) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let mut file = root.join(&relative);
    if tokio::fs::metadata(&file)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
    {
        file = file.join("index.html");
    }

    match tokio::fs::read(&file).await {
        Ok(bytes) => file_response(&file, bytes),
        // Extension-less paths are client-side routes
        Err(_) if relative.extension().is_none() => {
            let index = root.join("index.html");
            match tokio::fs::read(&index).await {
                Ok(bytes) => file_response(&index, bytes),
                Err(_) => StatusCode::NOT_FOUND.into_response(),
            }
        }
        Err(e) => {
            debug!(path = %file.display(), error = %e, "static file not found");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

fn file_response(path: &Path, bytes: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, content_type(path))], bytes).into_response()
}

/// Turn a URI path into a relative filesystem path, rejecting traversal
fn sanitize_path(uri_path: &str) -> Option<PathBuf> {
    let mut relative = PathBuf::new();
    for component in Path::new(uri_path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(relative)
}

/// MIME type by file extension
fn content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("js" | "mjs") => "text/javascript; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("json" | "map") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("txt") => "text/plain; charset=utf-8",
        Some("wasm") => "application/wasm",
        _ => "application/octet-stream",
    }
}
