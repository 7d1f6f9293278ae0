use actix_web::{web, HttpResponse, Result};
use serde_json::json;

use crate::db::chat;
use crate::db::client::RemoteDb;
use crate::handlers::helpers::{database_error_response, db_result, validation_error_response};
use crate::models::chat::ChatRequest;
use crate::models::llm::LlmError;
use crate::ok_or_return;
use crate::services::{ChatError, ChatService};

#[tracing::instrument(
    name = "Chat with assistant",
    skip(request, db, chat_service),
    fields(
        session_id = %request.session_id
    )
)]
pub async fn send_message(
    request: web::Json<ChatRequest>,
    db: web::Data<RemoteDb>,
    chat_service: web::Data<ChatService>,
) -> Result<HttpResponse> {
    if let Err(errors) = request.validate() {
        return Ok(validation_error_response(errors));
    }

    match chat_service.respond(&db, &request).await {
        Ok(reply) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "response": reply.response,
            "session_id": reply.session_id,
            "timestamp": reply.timestamp
        }))),
        Err(e) => Ok(chat_error_response(&e)),
    }
}

#[tracing::instrument(name = "Get chat history", skip(db))]
pub async fn get_history(session_id: String, db: web::Data<RemoteDb>) -> Result<HttpResponse> {
    let history = ok_or_return!(db_result(
        chat::get_history(&db, &session_id).await,
        "Failed to fetch chat history"
    ));

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "session_id": session_id,
        "message_count": history.len(),
        "history": history
    })))
}

fn chat_error_response(error: &ChatError) -> HttpResponse {
    let llm_error = match error {
        ChatError::Database(e) => return database_error_response("Failed to store chat message", e),
        ChatError::Llm(e) => e,
    };

    tracing::error!("Chat request failed: {}", llm_error);
    match llm_error {
        LlmError::Upstream { status, .. } => HttpResponse::BadGateway().json(json!({
            "success": false,
            "error": llm_error.to_string(),
            "upstream_status": status
        })),
        LlmError::InvalidResponse(_) => HttpResponse::BadGateway().json(json!({
            "success": false,
            "error": llm_error.to_string()
        })),
        LlmError::NotConfigured | LlmError::Timeout(_) | LlmError::Network(_) => {
            HttpResponse::ServiceUnavailable().json(json!({
                "success": false,
                "error": llm_error.to_string()
            }))
        }
    }
}
