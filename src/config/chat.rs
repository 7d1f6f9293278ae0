use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

pub const REFUSAL_MESSAGE: &str = "I can only help with health-related questions.";

/// Instruction wrapped around every user message. `{message}` is replaced by
/// the user's text.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "You are Bio Band AI Assistant, a health advisor for Bio Band users. \
You help with health questions only. Use simple English words that anyone can understand.

IMPORTANT: If the question is NOT about health (like math, games, movies, etc.), say EXACTLY: \
\"I can only help with health-related questions.\"

For health questions:
- Give simple, helpful advice
- Use everyday words
- Keep answers short and clear
- Tell them to see a doctor for serious problems

Question: {message}

Remember: Only health questions. Use simple words. Keep it short.";

#[derive(Debug, Deserialize, Clone)]
pub struct ChatSettings {
    pub api_url: String,
    #[serde(default)]
    pub api_key: Option<SecretString>,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_prompt_template")]
    pub prompt_template: String,
}

fn default_max_output_tokens() -> u32 {
    500
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_prompt_template() -> String {
    DEFAULT_PROMPT_TEMPLATE.to_string()
}

impl ChatSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn compose_prompt(&self, message: &str) -> String {
        if self.prompt_template.contains("{message}") {
            self.prompt_template.replace("{message}", message)
        } else {
            format!("{}\n\nQuestion: {}", self.prompt_template, message)
        }
    }
}
