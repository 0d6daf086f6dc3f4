//! Business Logic Services
//!
//! Contains the core application logic, independent of the HTTP layer.

pub mod chat;
pub mod reconciler;
pub mod search;
pub mod system_prompt;
pub mod template;

pub use chat::{ChatBackend, EchoBackend, OpenAiBackend, ProxyBackend};
pub use reconciler::SettingsReconciler;
pub use system_prompt::SystemPromptBuilder;
pub use template::{parse_variables, render_template, Variable, VariableKind};
