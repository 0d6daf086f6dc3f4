//! HTTP API Server
//!
//! Serves the backend API consumed by the web UI:
//!
//! - `POST /api/chat` — answer a conversation
//! - `GET /api/settings` — the stored settings document (404 until first save)
//! - `PUT /api/settings` — replace the settings document (204)
//! - `GET /api/settings/keys/current` — how the backend authenticates
//! - `GET /api/download?u=` — relay a download through the server
//!
//! CORS is wide open; the UI dev server runs on a different origin.

mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tokio::sync::{oneshot, Mutex};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::models::conversation::DEFAULT_TEMPERATURE;
use crate::services::chat::ChatBackend;
use crate::services::system_prompt::SystemPromptBuilder;
use crate::storage::SettingsStore;
use crate::utils::error::{AppError, AppResult};

/// Server shared state
pub struct AppState {
    /// Settings persistence, locked so compare-then-write stays atomic
    pub store: Mutex<SettingsStore>,
    /// The configured completion backend
    pub backend: Arc<dyn ChatBackend>,
    /// System prompt assembly
    pub prompt_builder: SystemPromptBuilder,
    /// Temperature used when a request carries none
    pub default_temperature: f64,
    /// HTTP client for the download relay
    pub client: reqwest::Client,
}

impl AppState {
    pub fn new(store: SettingsStore, backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            store: Mutex::new(store),
            backend,
            prompt_builder: SystemPromptBuilder::new(),
            default_temperature: DEFAULT_TEMPERATURE,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_prompt_builder(mut self, prompt_builder: SystemPromptBuilder) -> Self {
        self.prompt_builder = prompt_builder;
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("request failed: {}", self);
        }

        (status, self.to_string()).into_response()
    }
}

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/chat", post(handlers::chat))
        .route(
            "/api/settings",
            get(handlers::get_settings).put(handlers::update_settings),
        )
        .route(
            "/api/settings/keys/current",
            get(handlers::api_key_settings),
        )
        .route("/api/download", get(handlers::download))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the shutdown signal fires.
pub async fn run(
    addr: SocketAddr,
    state: Arc<AppState>,
    shutdown_rx: oneshot::Receiver<()>,
) -> AppResult<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("server started on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            shutdown_rx.await.ok();
        })
        .await?;

    info!("server stopped");
    Ok(())
}
