//! Chat Backends
//!
//! Implements the `ChatBackend` trait for the completion providers the
//! server can answer with: a deterministic echo backend for offline
//! development, plus an OpenAI chat-completions backend and an
//! API-key-authenticated proxy backend over reqwest HTTP transport.
//!
//! ## Conversation shape
//!
//! A conversation is a flat list of raw message contents. Even indices
//! are user turns, odd indices assistant turns, so a valid conversation
//! has odd length and ends with the user's latest message. The system
//! prompt travels separately and is prepended by the backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::api::AccessType;
use crate::utils::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// OpenAI chat completions endpoint.
const OPENAI_CHAT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default completion model.
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Maximum number of tokens to generate per answer.
const MAX_TOKENS: i64 = 2048;

/// Fallback when `CHAT_MAX_CONVERSATION_SIZE` is unset or unparseable.
const DEFAULT_MAX_CONVERSATION_SIZE: usize = 40;

/// Smallest accepted conversation window (one user/assistant exchange).
const MIN_CONVERSATION_SIZE: usize = 2;

/// Default header carrying the proxy API key.
const DEFAULT_PROXY_KEY_HEADER: &str = "x-api-key";

// ---------------------------------------------------------------------------
// Backend trait
// ---------------------------------------------------------------------------

/// A provider that can answer a chat conversation.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Generate the next assistant answer for `conversation`.
    async fn complete(
        &self,
        system_prompt: &str,
        temperature: f64,
        conversation: &[String],
    ) -> AppResult<String>;

    /// How this backend authenticates, reported to the UI.
    fn access_type(&self) -> AccessType;
}

/// Check the alternating-turns shape: non-empty, odd length.
fn validate_conversation(conversation: &[String]) -> AppResult<()> {
    if conversation.is_empty() {
        return Err(AppError::validation(
            "Conversation must have at least one element",
        ));
    }
    if conversation.len() % 2 == 0 {
        return Err(AppError::validation(
            "Number of conversation elements must be odd",
        ));
    }
    Ok(())
}

/// Keep only the newest `max` entries, preserving turn parity: when the
/// tail would start on an assistant turn, one more entry is dropped so
/// the window still begins with a user message.
fn clamp_conversation(conversation: &[String], max: usize) -> &[String] {
    if conversation.len() <= max {
        return conversation;
    }

    let mut start = conversation.len() - max;
    if start % 2 == 1 {
        start += 1;
    }
    &conversation[start..]
}

/// Parse a `CHAT_MAX_CONVERSATION_SIZE` value.
fn parse_max_conversation_size(value: Option<&str>) -> usize {
    match value.map(str::trim).and_then(|v| v.parse::<usize>().ok()) {
        Some(size) if size >= MIN_CONVERSATION_SIZE => size,
        Some(_) => MIN_CONVERSATION_SIZE,
        None => DEFAULT_MAX_CONVERSATION_SIZE,
    }
}

/// Read the conversation window size from `CHAT_MAX_CONVERSATION_SIZE`.
pub fn max_conversation_size_from_env() -> usize {
    parse_max_conversation_size(std::env::var("CHAT_MAX_CONVERSATION_SIZE").ok().as_deref())
}

// ---------------------------------------------------------------------------
// Echo backend
// ---------------------------------------------------------------------------

/// Offline backend that echoes the latest user message.
///
/// Used for UI development without credentials; its answers are
/// deterministic and instant.
#[derive(Debug, Default, Clone)]
pub struct EchoBackend;

impl EchoBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChatBackend for EchoBackend {
    async fn complete(
        &self,
        _system_prompt: &str,
        _temperature: f64,
        conversation: &[String],
    ) -> AppResult<String> {
        validate_conversation(conversation)?;

        // odd length, so the last entry is the newest user turn
        let last = conversation.last().map(String::as_str).unwrap_or_default();
        Ok(format!("Your prompt: {}", last))
    }

    fn access_type(&self) -> AccessType {
        AccessType::None
    }
}

// ---------------------------------------------------------------------------
// OpenAI backend
// ---------------------------------------------------------------------------

/// One message in the OpenAI wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct OpenAiMessage {
    content: String,
    role: String,
}

/// Request body of the chat completions API.
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    frequency_penalty: f64,
    max_tokens: i64,
    messages: Vec<OpenAiMessage>,
    model: String,
    presence_penalty: f64,
    temperature: f64,
    top_p: f64,
    stop: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

/// Backend answering through OpenAI's chat completions API.
///
/// # Thread Safety
///
/// `Send + Sync` — the reqwest `Client` is internally arc'd and
/// clone-safe, and all fields are immutable after construction.
pub struct OpenAiBackend {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    max_conversation_size: usize,
}

impl OpenAiBackend {
    /// Create a backend with the default model and conversation window.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: OPENAI_CHAT_API_URL.to_string(),
            max_conversation_size: DEFAULT_MAX_CONVERSATION_SIZE,
        }
    }

    /// Override the conversation window (floored to one exchange).
    pub fn with_max_conversation_size(mut self, size: usize) -> Self {
        self.max_conversation_size = size.max(MIN_CONVERSATION_SIZE);
        self
    }

    /// Point at an OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Prepend the system prompt and assign alternating roles.
    fn build_messages(system_prompt: &str, conversation: &[String]) -> Vec<OpenAiMessage> {
        let mut messages = Vec::with_capacity(conversation.len() + 1);
        messages.push(OpenAiMessage {
            content: system_prompt.to_string(),
            role: "system".to_string(),
        });

        for (index, content) in conversation.iter().enumerate() {
            let role = if index % 2 == 1 { "assistant" } else { "user" };
            messages.push(OpenAiMessage {
                content: content.clone(),
                role: role.to_string(),
            });
        }

        messages
    }
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    async fn complete(
        &self,
        system_prompt: &str,
        temperature: f64,
        conversation: &[String],
    ) -> AppResult<String> {
        if self.api_key.trim().is_empty() {
            return Err(AppError::config("OpenAI API key is not configured"));
        }

        let conversation = clamp_conversation(conversation, self.max_conversation_size);
        validate_conversation(conversation)?;

        let payload = OpenAiRequest {
            frequency_penalty: 0.0,
            max_tokens: MAX_TOKENS,
            messages: Self::build_messages(system_prompt, conversation),
            model: self.model.clone(),
            presence_penalty: 0.0,
            temperature,
            top_p: 0.0,
            stop: None,
        };

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(AppError::chat(format!("Unexpected response: {}", status)));
        }

        let body: OpenAiResponse = response.json().await?;

        Ok(body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default())
    }

    fn access_type(&self) -> AccessType {
        AccessType::OpenAiKey
    }
}

// ---------------------------------------------------------------------------
// API proxy backend
// ---------------------------------------------------------------------------

/// Request body of the proxy chat API.
#[derive(Debug, Serialize)]
struct ProxyRequest<'a> {
    conversation: &'a [String],
    #[serde(rename = "systemPrompt")]
    system_prompt: &'a str,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ProxyResponse {
    #[serde(default)]
    data: ProxyResponseData,
}

#[derive(Debug, Default, Deserialize)]
struct ProxyResponseData {
    #[serde(default)]
    answer: String,
}

/// Backend answering through an API-key-authenticated chat proxy.
///
/// The proxy takes the whole request body including the system prompt
/// and returns `{ success, data: { answer } }`.
pub struct ProxyBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    api_key_header: String,
    max_conversation_size: usize,
}

impl ProxyBackend {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
            api_key_header: DEFAULT_PROXY_KEY_HEADER.to_string(),
            max_conversation_size: DEFAULT_MAX_CONVERSATION_SIZE,
        }
    }

    /// Override the header carrying the API key.
    pub fn with_api_key_header(mut self, header: impl Into<String>) -> Self {
        self.api_key_header = header.into();
        self
    }

    /// Override the conversation window (floored to one exchange).
    pub fn with_max_conversation_size(mut self, size: usize) -> Self {
        self.max_conversation_size = size.max(MIN_CONVERSATION_SIZE);
        self
    }
}

#[async_trait]
impl ChatBackend for ProxyBackend {
    async fn complete(
        &self,
        system_prompt: &str,
        temperature: f64,
        conversation: &[String],
    ) -> AppResult<String> {
        let conversation = clamp_conversation(conversation, self.max_conversation_size);
        validate_conversation(conversation)?;

        let payload = ProxyRequest {
            conversation,
            system_prompt,
            temperature,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header(self.api_key_header.as_str(), self.api_key.as_str())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(AppError::chat(format!("Unexpected response: {}", status)));
        }

        let body: ProxyResponse = response.json().await?;
        Ok(body.data.answer)
    }

    fn access_type(&self) -> AccessType {
        AccessType::ProxyApiKey
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation(turns: &[&str]) -> Vec<String> {
        turns.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_echo_answers_last_user_turn() {
        let backend = EchoBackend::new();
        let answer = backend
            .complete(
                "ignored",
                0.7,
                &conversation(&["hello", "hi there", "what is rust?"]),
            )
            .await
            .unwrap();
        assert_eq!(answer, "Your prompt: what is rust?");
    }

    #[tokio::test]
    async fn test_echo_rejects_empty_conversation() {
        let backend = EchoBackend::new();
        assert!(backend.complete("", 0.7, &[]).await.is_err());
    }

    #[tokio::test]
    async fn test_echo_rejects_even_conversation() {
        let backend = EchoBackend::new();
        let result = backend
            .complete("", 0.7, &conversation(&["hello", "hi"]))
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_echo_access_type() {
        assert_eq!(EchoBackend::new().access_type(), AccessType::None);
    }

    #[test]
    fn test_openai_access_type() {
        assert_eq!(
            OpenAiBackend::new("sk-test").access_type(),
            AccessType::OpenAiKey
        );
    }

    #[test]
    fn test_proxy_access_type() {
        let backend = ProxyBackend::new("https://proxy.example.com/chat", "key");
        assert_eq!(backend.access_type(), AccessType::ProxyApiKey);
        assert_eq!(backend.api_key_header, "x-api-key");
    }

    #[tokio::test]
    async fn test_openai_without_key_fails() {
        let backend = OpenAiBackend::new("  ");
        let result = backend.complete("", 0.7, &conversation(&["hi"])).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_build_messages_roles_alternate() {
        let messages =
            OpenAiBackend::build_messages("be brief", &conversation(&["q1", "a1", "q2"]));

        let roles: Vec<&str> = messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
        assert_eq!(messages[0].content, "be brief");
        assert_eq!(messages[3].content, "q2");
    }

    #[test]
    fn test_clamp_keeps_short_conversations() {
        let turns = conversation(&["a", "b", "c"]);
        assert_eq!(clamp_conversation(&turns, 40), turns.as_slice());
    }

    #[test]
    fn test_clamp_takes_newest_window() {
        let turns: Vec<String> = (0..9).map(|i| format!("m{i}")).collect();
        let clamped = clamp_conversation(&turns, 5);

        // window starts on a user turn (even index) and keeps the tail
        assert_eq!(clamped.len(), 5);
        assert_eq!(clamped.first().map(String::as_str), Some("m4"));
        assert_eq!(clamped.last().map(String::as_str), Some("m8"));
    }

    #[test]
    fn test_clamp_preserves_turn_parity() {
        let turns: Vec<String> = (0..9).map(|i| format!("m{i}")).collect();
        let clamped = clamp_conversation(&turns, 6);

        // a 6-wide tail would start on an assistant turn; one more is dropped
        assert_eq!(clamped.len(), 5);
        assert_eq!(clamped.first().map(String::as_str), Some("m4"));
    }

    #[test]
    fn test_max_conversation_size_parsing() {
        assert_eq!(parse_max_conversation_size(None), 40);
        assert_eq!(parse_max_conversation_size(Some("oops")), 40);
        assert_eq!(parse_max_conversation_size(Some(" 12 ")), 12);
        assert_eq!(parse_max_conversation_size(Some("1")), 2);
        assert_eq!(parse_max_conversation_size(Some("0")), 2);
    }
}
