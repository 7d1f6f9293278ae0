use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Body of a `generateContent` call.
#[derive(Debug, Serialize)]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

impl<'a> GenerateContentRequest<'a> {
    pub fn from_prompt(prompt: &'a str, max_output_tokens: u32) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![PromptPart { text: prompt }],
            }],
            generation_config: GenerationConfig { max_output_tokens },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Content<'a> {
    pub parts: Vec<PromptPart<'a>>,
}

#[derive(Debug, Serialize)]
pub struct PromptPart<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ReplyPart>,
}

#[derive(Debug, Deserialize)]
pub struct ReplyPart {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

#[derive(Debug, ThisError)]
pub enum LlmError {
    #[error("AI service not available")]
    NotConfigured,

    #[error("AI service timed out after {0}s")]
    Timeout(u64),

    #[error("AI service unreachable: {0}")]
    Network(#[source] reqwest::Error),

    #[error("AI API Error: {status}")]
    Upstream { status: u16, body: String },

    #[error("Invalid AI response: {0}")]
    InvalidResponse(String),
}
