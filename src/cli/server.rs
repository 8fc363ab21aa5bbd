//! HTTP server mode: trigger a scrape with a POST request

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::config::ScraperConfig;
use crate::engine::ScrapeEngine;
use crate::error::{Error, Result};
use crate::pagination::ScrapeStatus;

/// Server configuration
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Scraper configuration used for every request
    pub scraper: ScraperConfig,
    /// Per-request scrape deadline
    pub deadline: Option<Duration>,
}

/// App state shared across handlers
#[derive(Debug)]
struct AppState {
    engine: ScrapeEngine,
    deadline: Option<Duration>,
}

/// Request body for the scrape endpoint
#[derive(Debug, Deserialize)]
struct ScrapeRequest {
    /// Business review page URL
    #[serde(default)]
    url: Option<String>,
    /// Page size hint
    #[serde(default)]
    page_size_hint: Option<u32>,
}

/// Response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiResponse<()> {
    fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Build the router
pub fn router(config: ServerConfig) -> Router {
    let state = AppState {
        engine: ScrapeEngine::new(config.scraper),
        deadline: config.deadline,
    };

    // Build CORS layer - allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", post(scrape))
        .route("/scrape", post(scrape))
        .route("/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the HTTP server
pub async fn serve(config: ServerConfig, port: u16) -> Result<()> {
    let app = router(config);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Scrape every review of the business behind `url`.
///
/// Dropping the request (client disconnect) drops the run and its session.
async fn scrape(State(state): State<Arc<AppState>>, Json(req): Json<ScrapeRequest>) -> Response {
    let Some(url) = req.url.as_deref() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("URL to scrape argument is missing")),
        )
            .into_response();
    };

    let target = match state.engine.target_from_url(url) {
        Ok(target) => target,
        Err(e) => {
            debug!("Rejected scrape url {}: {}", url, e);
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("URL to scrape argument is not valid")),
            )
                .into_response();
        }
    };

    let result = state
        .engine
        .scrape_with_deadline(
            &target,
            req.page_size_hint,
            state.deadline,
            &CancellationToken::new(),
        )
        .await;

    let (status, error) = match &result.status {
        ScrapeStatus::Complete | ScrapeStatus::PossiblyIncomplete { .. } => (StatusCode::OK, None),
        ScrapeStatus::Cancelled => (
            StatusCode::GATEWAY_TIMEOUT,
            Some("Scrape deadline exceeded".to_string()),
        ),
        ScrapeStatus::Error { cause } => (StatusCode::BAD_GATEWAY, Some(cause.clone())),
    };

    let body = ApiResponse {
        success: status == StatusCode::OK,
        data: Some(result),
        error,
    };
    (status, Json(body)).into_response()
}
