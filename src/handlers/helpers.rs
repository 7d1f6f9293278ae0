//! Helpers that turn data-layer outcomes into JSON responses.
//!
//! The repositories only speak [`DbError`]; this module owns the mapping to
//! HTTP status codes so every handler answers failures the same way:
//! - unreachable or timed-out database → 503
//! - database answered with a non-2xx status → 502
//! - foreign key violation → 400
//! - anything else (protocol mismatch, rejected statement) → 500
//!
//! # Usage
//!
//! For handlers returning `Result<HttpResponse>`:
//! ```ignore
//! let user = ok_or_return!(require_record(users::get_user(&db, id).await, "User not found"));
//! ```

use actix_web::error::{InternalError, JsonPayloadError, PathError};
use actix_web::{HttpRequest, HttpResponse};
use serde_json::json;

use crate::db::client::DbError;

/// Macro for handlers returning `Result<HttpResponse>`.
/// Converts a `DbResult<T>` to return `Ok(error_response)` on error.
///
/// # Example
/// ```ignore
/// let users = ok_or_return!(db_result(users::list_users(&db).await, "Failed to fetch users"));
/// ```
#[macro_export]
macro_rules! ok_or_return {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(response) => return Ok(response),
        }
    };
}

/// Result type for database operations that return an HttpResponse on error
pub type DbResult<T> = Result<T, HttpResponse>;

/// Unwrap an optional database result, returning NotFound if None.
pub fn require_record<T>(
    result: Result<Option<T>, DbError>,
    not_found_message: &str,
) -> DbResult<T> {
    match result {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(HttpResponse::NotFound().json(json!({
            "success": false,
            "message": not_found_message
        }))),
        Err(e) => Err(database_error_response("Failed to fetch record", &e)),
    }
}

/// Unwrap a database result, logging `context` on failure.
pub fn db_result<T>(result: Result<T, DbError>, context: &str) -> DbResult<T> {
    result.map_err(|e| database_error_response(context, &e))
}

pub fn database_error_response(context: &str, error: &DbError) -> HttpResponse {
    tracing::error!("{}: {}", context, error);
    match error {
        DbError::Connection { .. } | DbError::Timeout { .. } => {
            HttpResponse::ServiceUnavailable().json(json!({
                "success": false,
                "message": "Database unavailable",
                "error": error.to_string()
            }))
        }
        DbError::RemoteExecution { .. } => HttpResponse::BadGateway().json(json!({
            "success": false,
            "message": "Database error",
            "error": error.to_string()
        })),
        DbError::Statement { .. } if error.is_foreign_key_violation() => {
            HttpResponse::BadRequest().json(json!({
                "success": false,
                "message": "Referenced user or device does not exist"
            }))
        }
        _ => HttpResponse::InternalServerError().json(json!({
            "success": false,
            "message": "Database error"
        })),
    }
}

pub fn validation_error_response(errors: Vec<String>) -> HttpResponse {
    tracing::info!(?errors, "Rejected invalid request");
    HttpResponse::BadRequest().json(json!({
        "success": false,
        "message": "Validation failed",
        "errors": errors
    }))
}

/// Malformed JSON bodies get the same envelope as every other failure.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(json!({
        "success": false,
        "message": "Invalid request body",
        "error": err.to_string()
    }));
    InternalError::from_response(err, response).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(json!({
        "success": false,
        "message": "Invalid path parameter",
        "error": err.to_string()
    }));
    InternalError::from_response(err, response).into()
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "success": false,
        "message": "Resource not found"
    }))
}
