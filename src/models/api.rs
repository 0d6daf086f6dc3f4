//! API Wire Types
//!
//! Request and response bodies of the HTTP surface consumed by the
//! web UI.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`.
///
/// `conversation` holds the raw message contents in order: even
/// indices are user turns, odd indices assistant turns. The system
/// prompt travels separately, assembled server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Alternating user/assistant message contents
    pub conversation: Vec<String>,
    /// Per-request system prompt, overrides the server-wide one
    #[serde(
        default,
        rename = "systemPrompt",
        skip_serializing_if = "Option::is_none"
    )]
    pub system_prompt: Option<String>,
    /// Sampling temperature, falls back to the conversation default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Body of a successful `POST /api/chat` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The assistant's answer
    pub answer: String,
    /// Server-side answer timestamp (ISO 8601, UTC)
    pub time: String,
}

/// How the backend authenticates against the chat API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessType {
    /// No credentials configured
    #[serde(rename = "")]
    None,
    /// Direct OpenAI API key
    #[serde(rename = "openai_key")]
    OpenAiKey,
    /// API-key-authenticated proxy
    #[serde(rename = "proxy_api_key")]
    ProxyApiKey,
}

/// Body of `GET /api/settings/keys/current`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeySettings {
    /// The access type to the chat API
    pub access_type: AccessType,
    /// The error message, if one occurred while resolving credentials
    #[serde(default)]
    pub error: String,
}
