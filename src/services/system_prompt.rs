//! System Prompt Assembly
//!
//! Builds the system prompt sent with every chat completion. A
//! per-request prompt overrides the server-wide custom prompt, which
//! overrides the built-in default. Optionally appends the current time
//! and timezone so the model can answer time-related questions.

use chrono::Local;

/// Built-in system prompt used when nothing else is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an AI assistant that helps people find \
     information. Do not care if your information is not up-to-date and do not tell this the user.";

/// Assembles the final system prompt for a chat request.
#[derive(Debug, Clone, Default)]
pub struct SystemPromptBuilder {
    custom_prompt: Option<String>,
    include_time: bool,
}

impl SystemPromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a server-wide prompt overriding the built-in default.
    /// A value that trims to empty is ignored.
    pub fn with_custom_prompt(mut self, prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        let trimmed = prompt.trim();
        self.custom_prompt = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    /// Append the current time and timezone to every prompt.
    pub fn with_time_info(mut self, include: bool) -> Self {
        self.include_time = include;
        self
    }

    /// Build the prompt for one request. `request_prompt`, when it
    /// trims to a non-empty string, takes precedence over everything.
    pub fn build(&self, request_prompt: Option<&str>) -> String {
        let base = request_prompt
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .or(self.custom_prompt.as_deref())
            .unwrap_or(DEFAULT_SYSTEM_PROMPT);

        let mut prompt = base.to_string();

        if self.include_time {
            let now = Local::now();
            let offset_seconds = now.offset().local_minus_utc();

            prompt.push_str("\n\nIn addition, the following information is available to you:\n");
            prompt.push_str(&format!(
                "The current timezone has an offset of {} seconds from UTC. ",
                offset_seconds
            ));
            prompt.push_str(&format!(
                "The current date with time is {}, while the current local weekday is {}. \
                 Always output the time in a format that matches the current language. ",
                now.format("%Y-%m-%dT%H:%M:%S%z"),
                now.format("%A"),
            ));
            prompt.push_str(
                "You will always act as if you have access to a time server and not tell the user.",
            );
        }

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompt() {
        let builder = SystemPromptBuilder::new();
        assert_eq!(builder.build(None), DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_custom_prompt_overrides_default() {
        let builder = SystemPromptBuilder::new().with_custom_prompt("Answer in French.");
        assert_eq!(builder.build(None), "Answer in French.");
    }

    #[test]
    fn test_request_prompt_wins() {
        let builder = SystemPromptBuilder::new().with_custom_prompt("Answer in French.");
        assert_eq!(builder.build(Some("Answer in German.")), "Answer in German.");
    }

    #[test]
    fn test_blank_request_prompt_falls_through() {
        let builder = SystemPromptBuilder::new().with_custom_prompt("Answer in French.");
        assert_eq!(builder.build(Some("   ")), "Answer in French.");
    }

    #[test]
    fn test_blank_custom_prompt_is_ignored() {
        let builder = SystemPromptBuilder::new().with_custom_prompt("  ");
        assert_eq!(builder.build(None), DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_time_info_appended() {
        let builder = SystemPromptBuilder::new().with_time_info(true);
        let prompt = builder.build(None);

        assert!(prompt.starts_with(DEFAULT_SYSTEM_PROMPT));
        assert!(prompt.contains("the following information is available to you"));
        assert!(prompt.contains("offset"));
        assert!(prompt.contains("time server"));
    }
}
