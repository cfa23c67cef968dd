//! Static form assets.
//!
//! # Responsibilities
//! - Serve `index.html`, `script.js`, `styles.css` from the configured directory
//! - Force `text/css` and `application/javascript` content types
//! - Optional directory listing for debugging deployments

use std::path::Path;

use axum::extract::{Request, State};
use axum::http::{header::CONTENT_TYPE, HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::services::ServeDir;

use crate::http::server::AppState;

/// Fallback router serving files from `dir`. `/` maps to `index.html`.
pub fn router(dir: &str) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(middleware::from_fn(asset_content_type))
}

/// Content type forced for a request path, if any.
pub fn content_type_for(path: &str) -> Option<&'static str> {
    if path.ends_with(".css") {
        Some("text/css")
    } else if path.ends_with(".js") {
        Some("application/javascript")
    } else {
        None
    }
}

async fn asset_content_type(request: Request, next: Next) -> Response {
    let content_type = content_type_for(request.uri().path());
    let mut response = next.run(request).await;

    if let Some(content_type) = content_type {
        if response.status().is_success() {
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
    }
    response
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryListing {
    pub directory: String,
    pub files: Vec<String>,
    pub css_exists: bool,
    pub js_exists: bool,
}

/// `GET /debug/files`
pub async fn debug_files(State(state): State<AppState>) -> Response {
    let dir = Path::new(&state.config.static_files.dir);

    match list_directory(dir).await {
        Ok(listing) => Json(listing).into_response(),
        Err(e) => {
            tracing::error!(directory = %dir.display(), error = %e, "Failed to list static directory");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

pub async fn list_directory(dir: &Path) -> std::io::Result<DirectoryListing> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        files.push(entry.file_name().to_string_lossy().into_owned());
    }
    files.sort();

    let directory = tokio::fs::canonicalize(dir)
        .await
        .unwrap_or_else(|_| dir.to_path_buf());

    Ok(DirectoryListing {
        directory: directory.display().to_string(),
        css_exists: tokio::fs::try_exists(dir.join("styles.css")).await.unwrap_or(false),
        js_exists: tokio::fs::try_exists(dir.join("script.js")).await.unwrap_or(false),
        files,
    })
}
