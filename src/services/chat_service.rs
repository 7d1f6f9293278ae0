use std::time::Instant;

use reqwest::Client;
use secrecy::ExposeSecret;

use crate::config::chat::ChatSettings;
use crate::db::chat::append_message;
use crate::db::client::{DbError, RemoteDb};
use crate::models::chat::{ChatReply, ChatRequest, ChatRole};
use crate::models::llm::{GenerateContentRequest, GenerateContentResponse, LlmError};
use crate::utils::timestamps::now_timestamp;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Database(#[from] DbError),
}

/// Health assistant backed by a hosted `generateContent` endpoint.
#[derive(Clone)]
pub struct ChatService {
    client: Client,
    settings: ChatSettings,
}

impl ChatService {
    pub fn new(settings: ChatSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.settings.api_key.is_some()
    }

    /// Run one chat turn: record the user's message, ask the model, record
    /// the answer. When the model call fails the user's turn stays in the
    /// transcript without a reply.
    pub async fn respond(&self, db: &RemoteDb, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        let session_id = request.session_id.as_str();
        let timestamp = now_timestamp();

        append_message(db, session_id, ChatRole::User, &request.message, &timestamp).await?;

        let response = self.generate_reply(&request.message).await?;

        append_message(db, session_id, ChatRole::Assistant, &response, &now_timestamp()).await?;

        Ok(ChatReply {
            response,
            session_id: session_id.to_string(),
            timestamp,
        })
    }

    /// Wrap `message` in the assistant instructions and return the model's
    /// cleaned-up answer.
    pub async fn generate_reply(&self, message: &str) -> Result<String, LlmError> {
        let api_key = self.settings.api_key.as_ref().ok_or(LlmError::NotConfigured)?;
        let prompt = self.settings.compose_prompt(message);
        let body = GenerateContentRequest::from_prompt(&prompt, self.settings.max_output_tokens);
        let started = Instant::now();

        tracing::debug!("Calling language model at {}", self.settings.api_url);

        let response = self
            .client
            .post(&self.settings.api_url)
            .header("X-goog-api-key", api_key.expose_secret())
            .json(&body)
            .timeout(self.settings.timeout())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Language model request failed: {}",
                    e
                );
                if e.is_timeout() {
                    LlmError::Timeout(self.settings.timeout_secs)
                } else {
                    LlmError::Network(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Language model returned error {}: {}", status, error_text);
            return Err(LlmError::Upstream {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
        let text = parsed
            .first_text()
            .ok_or_else(|| LlmError::InvalidResponse("no candidate text".to_string()))?;

        let reply = clean_reply(text);
        if reply.is_empty() {
            return Err(LlmError::InvalidResponse("Empty content".to_string()));
        }

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Language model replied"
        );
        Ok(reply)
    }
}

/// The mobile client renders plain text, so markdown emphasis is dropped.
fn clean_reply(text: &str) -> String {
    text.trim().replace("**", "").replace('*', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emphasis_markers_are_stripped() {
        assert_eq!(
            clean_reply("  **Drink water** and *rest*.\n"),
            "Drink water and rest."
        );
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_any_request() {
        let service = ChatService::new(ChatSettings {
            api_url: "http://127.0.0.1:1/generate".to_string(),
            api_key: None,
            max_output_tokens: 150,
            timeout_secs: 1,
            prompt_template: "{message}".to_string(),
        });
        assert!(!service.is_configured());
        assert!(matches!(
            service.generate_reply("hello").await,
            Err(LlmError::NotConfigured)
        ));
    }
}
