use crate::db::client::{DbError, RemoteDb, Statement};
use crate::models::chat::{ChatMessage, ChatRole};

/// Append one turn to a session transcript
pub async fn append_message(
    db: &RemoteDb,
    session_id: &str,
    role: ChatRole,
    message: &str,
    timestamp: &str,
) -> Result<(), DbError> {
    db.execute(
        Statement::new(
            "INSERT INTO chat_messages (session_id, role, message, timestamp) VALUES (?, ?, ?, ?)",
        )
        .bind(session_id)
        .bind(role.as_str())
        .bind(message)
        .bind(timestamp),
    )
    .await?;
    Ok(())
}

/// Full transcript of a session, oldest first. Unknown sessions are empty.
pub async fn get_history(db: &RemoteDb, session_id: &str) -> Result<Vec<ChatMessage>, DbError> {
    db.execute(
        Statement::new(
            r#"
            SELECT role, message, timestamp
            FROM chat_messages
            WHERE session_id = ?
            ORDER BY timestamp ASC, id ASC
            "#,
        )
        .bind(session_id),
    )
    .await?
    .decode_all()
}
