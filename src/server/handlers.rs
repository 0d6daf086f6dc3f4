//! API request handlers.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};

use crate::models::api::{ApiKeySettings, ChatRequest, ChatResponse};
use crate::models::settings::Settings;
use crate::utils::error::{AppError, AppResult};

use super::AppState;

/// `POST /api/chat`
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    let temperature = request.temperature.unwrap_or(state.default_temperature);
    let system_prompt = state.prompt_builder.build(request.system_prompt.as_deref());

    debug!(
        turns = request.conversation.len(),
        temperature, "chat request"
    );

    let answer = state
        .backend
        .complete(&system_prompt, temperature, &request.conversation)
        .await?;

    Ok(Json(ChatResponse {
        answer,
        time: Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
    }))
}

/// `GET /api/settings`
///
/// 404 until the first settings document has been saved.
pub async fn get_settings(State(state): State<Arc<AppState>>) -> AppResult<Json<Settings>> {
    let store = state.store.lock().await;
    if !store.exists() {
        return Err(AppError::not_found("No settings have been saved yet"));
    }

    Ok(Json(store.load()?))
}

/// `PUT /api/settings`
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<Settings>,
) -> AppResult<StatusCode> {
    let store = state.store.lock().await;
    if store.save_if_changed(&settings)? {
        info!(path = %store.path().display(), "settings updated");
    }

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/settings/keys/current`
pub async fn api_key_settings(State(state): State<Arc<AppState>>) -> Json<ApiKeySettings> {
    Json(ApiKeySettings {
        access_type: state.backend.access_type(),
        error: String::new(),
    })
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    #[serde(default)]
    u: String,
}

/// Prefix schemeless URLs with https.
fn normalize_download_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

/// `GET /api/download?u=`
///
/// Relays an external download through the server so the UI never hits
/// foreign origins directly. Status and content headers are passed
/// through from upstream.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DownloadQuery>,
) -> AppResult<Response> {
    let url = normalize_download_url(&query.u);
    debug!(url = %url, "download relay");

    let upstream = state.client.get(&url).send().await?;

    let status =
        StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE.as_str())
        .and_then(|value| HeaderValue::from_bytes(value.as_bytes()).ok());
    let content_disposition = upstream
        .headers()
        .get(header::CONTENT_DISPOSITION.as_str())
        .and_then(|value| HeaderValue::from_bytes(value.as_bytes()).ok());

    let body = upstream.bytes().await?;

    let mut response = Response::builder().status(status);
    if let Some(value) = content_type {
        response = response.header(header::CONTENT_TYPE, value);
    }
    if let Some(value) = content_disposition {
        response = response.header(header::CONTENT_DISPOSITION, value);
    }

    response
        .body(Body::from(body.to_vec()))
        .map_err(|err| AppError::internal(err.to_string()))
        .map(IntoResponse::into_response)
}
