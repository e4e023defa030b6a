//! HTTP delivery of the classification
//!
//! - `GET /api/items`: full report, recomputed on every request
//! - `GET /health`: liveness
//! - everything else: static files from the public directory, which is where
//!   resolved images are copied

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use scrapyard::{build_report, DataLayout, Heuristics, ItemsReport};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

// =============================================================================
// App State
// =============================================================================

pub struct AppState {
    pub layout: DataLayout,
    pub heuristics: Heuristics,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn fetch_failed() -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Failed to fetch items",
        }),
    )
}

// =============================================================================
// Handlers
// =============================================================================

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn list_items(State(state): State<Arc<AppState>>) -> Result<Json<ItemsReport>, ApiError> {
    let task_state = Arc::clone(&state);
    let result =
        tokio::task::spawn_blocking(move || build_report(&task_state.layout, &task_state.heuristics))
            .await;

    match result {
        Ok(Ok(report)) => Ok(Json(report)),
        Ok(Err(e)) => {
            tracing::error!("Error fetching items: {}", e);
            Err(fetch_failed())
        }
        Err(e) => {
            tracing::error!("Classification task failed: {}", e);
            Err(fetch_failed())
        }
    }
}

// =============================================================================
// Server
// =============================================================================

pub fn router(state: Arc<AppState>, public_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/items", get(list_items))
        .fallback_service(ServeDir::new(public_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(state: Arc<AppState>, public_dir: PathBuf, bind: &str, port: u16) -> Result<()> {
    let app = router(state, &public_dir);

    let bind_addr = format!("{}:{}", bind, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    tracing::info!("Starting server on http://{}", bind_addr);
    tracing::info!("Serving static files from {}", public_dir.display());

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

/// Handle the serve command
pub fn handle(
    layout: DataLayout,
    heuristics: Heuristics,
    public_dir: PathBuf,
    bind: &str,
    port: u16,
) -> Result<()> {
    let state = Arc::new(AppState { layout, heuristics });
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(run(state, public_dir, bind, port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::fs;
    use tower::ServiceExt;

    fn app(root: &Path) -> Router {
        let layout = DataLayout::new(root.join("data"), root.join("public"));
        let state = Arc::new(AppState {
            layout,
            heuristics: Heuristics::default(),
        });
        router(state, &root.join("public"))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let temp = tempfile::tempdir().unwrap();
        let (status, body) = get_json(app(temp.path()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_items_endpoint() {
        let temp = tempfile::tempdir().unwrap();
        let items = temp.path().join("data").join("items");
        fs::create_dir_all(&items).unwrap();
        fs::write(
            items.join("stuff.json"),
            json!([
                {"id": "wires", "value": 200, "type": "Material"},
                {"id": "dust", "value": 0}
            ])
            .to_string(),
        )
        .unwrap();

        let (status, body) = get_json(app(temp.path()), "/api/items").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["categorized"]["sell"], json!(["wires"]));
        assert_eq!(body["categorized"]["keep"], json!(["dust"]));
        assert_eq!(body["types"], json!(["Material"]));
        assert_eq!(body["items"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_items_failure() {
        let temp = tempfile::tempdir().unwrap();
        let data = temp.path().join("data");
        fs::create_dir_all(&data).unwrap();
        fs::write(data.join("items"), b"not a directory").unwrap();

        let (status, body) = get_json(app(temp.path()), "/api/items").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to fetch items"}));
    }

    #[tokio::test]
    async fn test_static_files() {
        let temp = tempfile::tempdir().unwrap();
        let public = temp.path().join("public");
        fs::create_dir_all(&public).unwrap();
        fs::write(public.join("manifest.json"), br#"{"ok":true}"#).unwrap();

        let (status, body) = get_json(app(temp.path()), "/manifest.json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }
}
