use actix_web::{get, post, web, HttpResponse, Result};

use crate::db::client::RemoteDb;
use crate::handlers::chat_handler;
use crate::models::chat::ChatRequest;
use crate::services::ChatService;

#[post("/chat")]
async fn send_message(
    chat_form: web::Json<ChatRequest>,
    db: web::Data<RemoteDb>,
    chat_service: web::Data<ChatService>,
) -> Result<HttpResponse> {
    chat_handler::send_message(chat_form, db, chat_service).await
}

#[get("/chat/{session_id}")]
async fn get_history(path: web::Path<String>, db: web::Data<RemoteDb>) -> Result<HttpResponse> {
    let session_id = path.into_inner();
    chat_handler::get_history(session_id, db).await
}
