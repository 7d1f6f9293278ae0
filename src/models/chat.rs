// src/models/chat.rs
use std::fmt;
use serde::{Deserialize, Serialize};

use crate::db::client::DbError;
use crate::db::decode::{FromRow, Row};
use crate::utils::text_fields::{is_padded, padding_error};

pub const DEFAULT_SESSION_ID: &str = "default";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turn of a session transcript
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub message: String,
    pub timestamp: String,
}

impl FromRow for ChatMessage {
    fn from_row(row: &Row<'_>) -> Result<Self, DbError> {
        Ok(Self {
            role: row.get_string("role")?,
            message: row.get_string("message")?,
            timestamp: row.get_string("timestamp")?,
        })
    }
}

/// Request to send a message to the assistant
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default = "default_session_id")]
    pub session_id: String,
}

fn default_session_id() -> String {
    DEFAULT_SESSION_ID.to_string()
}

/// Successful assistant turn
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatReply {
    pub response: String,
    pub session_id: String,
    pub timestamp: String,
}

impl ChatRequest {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let trimmed = self.message.trim();

        if trimmed.is_empty() {
            errors.push("Message cannot be empty".to_string());
        } else if trimmed.chars().count() > 5000 {
            errors.push("Message cannot exceed 5000 characters".to_string());
        }

        // History is read back by the exact path segment
        let session = &self.session_id;
        if session.trim().is_empty() {
            errors.push("session_id cannot be empty".to_string());
        } else if is_padded(session) {
            errors.push(padding_error("session_id"));
        } else if session.len() > 128 {
            errors.push("session_id cannot exceed 128 characters".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
