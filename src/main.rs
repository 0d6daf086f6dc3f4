//! promptdeck server binary.
//!
//! Configuration is environment-driven:
//!
//! - `PROMPTDECK_HOST` / `PROMPTDECK_PORT` — bind address (default 127.0.0.1:8080)
//! - `OPENAI_API_KEY` — answer through OpenAI
//! - `CHAT_API_URL` / `CHAT_API_KEY` / `CHAT_API_KEY_HEADER` — answer through a
//!   chat API proxy; without any credentials the echo backend is used
//! - `CHAT_MAX_CONVERSATION_SIZE` — conversation window sent upstream (default 40)
//! - `CHAT_SYSTEM_PROMPT` — override the built-in system prompt
//! - `RUST_LOG` — log filter (default `info`)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::oneshot;
use tracing::info;
use tracing_subscriber::EnvFilter;

use promptdeck::server::{self, AppState};
use promptdeck::services::chat::{
    max_conversation_size_from_env, ChatBackend, EchoBackend, OpenAiBackend, ProxyBackend,
};
use promptdeck::services::system_prompt::SystemPromptBuilder;
use promptdeck::storage::SettingsStore;

fn env_trimmed(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn bind_addr() -> anyhow::Result<SocketAddr> {
    let host = env_trimmed("PROMPTDECK_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let port = match env_trimmed("PROMPTDECK_PORT") {
        Some(value) => value
            .parse::<u16>()
            .with_context(|| format!("invalid PROMPTDECK_PORT: {value}"))?,
        None => 8080,
    };

    format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid bind address {host}:{port}"))
}

fn select_backend() -> Arc<dyn ChatBackend> {
    if let Some(api_key) = env_trimmed("OPENAI_API_KEY") {
        info!("using OpenAI chat backend");
        return Arc::new(
            OpenAiBackend::new(api_key)
                .with_max_conversation_size(max_conversation_size_from_env()),
        );
    }

    if let (Some(api_url), Some(api_key)) = (env_trimmed("CHAT_API_URL"), env_trimmed("CHAT_API_KEY"))
    {
        info!("using chat API proxy backend");
        let mut backend = ProxyBackend::new(api_url, api_key)
            .with_max_conversation_size(max_conversation_size_from_env());
        if let Some(header) = env_trimmed("CHAT_API_KEY_HEADER") {
            backend = backend.with_api_key_header(header);
        }
        return Arc::new(backend);
    }

    info!("no API credentials configured, using echo chat backend");
    Arc::new(EchoBackend::new())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = bind_addr()?;
    let store = SettingsStore::default_path().context("resolving settings path")?;
    info!(path = %store.path().display(), "settings store ready");

    let mut prompt_builder = SystemPromptBuilder::new().with_time_info(true);
    if let Some(prompt) = env_trimmed("CHAT_SYSTEM_PROMPT") {
        prompt_builder = prompt_builder.with_custom_prompt(prompt);
    }

    let state = Arc::new(
        AppState::new(store, select_backend()).with_prompt_builder(prompt_builder),
    );

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(());
        }
    });

    server::run(addr, state, shutdown_rx)
        .await
        .context("server error")?;

    Ok(())
}
