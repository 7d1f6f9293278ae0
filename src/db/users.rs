use crate::db::client::{DbError, RemoteDb, Statement};
use crate::models::user::{CreateUserRequest, User};

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Email already exists")]
    EmailExists,

    #[error(transparent)]
    Database(#[from] DbError),
}

/// Insert a user. The store's unique index on `email` is the authority on
/// duplicates, so no lookup happens first.
pub async fn create_user(db: &RemoteDb, request: &CreateUserRequest) -> Result<User, UserError> {
    let result = db
        .execute(
            Statement::new(
                "INSERT INTO users (full_name, email) VALUES (?, ?) \
                 RETURNING id, full_name, email, created_at",
            )
            .bind(request.full_name.trim())
            .bind(request.email.trim()),
        )
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                UserError::EmailExists
            } else {
                tracing::error!("Failed to execute user insert query: {:?}", e);
                UserError::Database(e)
            }
        })?;

    let user = result
        .decode_first::<User>()?
        .ok_or_else(|| DbError::Protocol("user insert returned no row".to_string()))?;
    Ok(user)
}

pub async fn list_users(db: &RemoteDb) -> Result<Vec<User>, DbError> {
    db.execute(Statement::new(
        "SELECT id, full_name, email, created_at FROM users ORDER BY id ASC",
    ))
    .await?
    .decode_all()
}

pub async fn get_user(db: &RemoteDb, user_id: i64) -> Result<Option<User>, DbError> {
    db.execute(
        Statement::new("SELECT id, full_name, email, created_at FROM users WHERE id = ?")
            .bind(user_id),
    )
    .await?
    .decode_first()
}
