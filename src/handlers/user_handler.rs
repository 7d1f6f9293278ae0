use actix_web::{web, HttpResponse, Result};
use serde_json::json;

use crate::db::client::RemoteDb;
use crate::db::users::{self, UserError};
use crate::handlers::helpers::{database_error_response, db_result, require_record, validation_error_response};
use crate::models::user::CreateUserRequest;
use crate::ok_or_return;

#[tracing::instrument(
    name = "Adding a new user",
    skip(request, db),
    fields(
        email = %request.email
    )
)]
pub async fn create_user(
    request: web::Json<CreateUserRequest>,
    db: web::Data<RemoteDb>,
) -> Result<HttpResponse> {
    if let Err(errors) = request.validate() {
        return Ok(validation_error_response(errors));
    }

    match users::create_user(&db, &request).await {
        Ok(user) => {
            tracing::info!("User {} created", user.id);
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "message": "User created successfully",
                "user": user
            })))
        }
        Err(UserError::EmailExists) => {
            tracing::info!("Registration rejected, email already exists");
            Ok(HttpResponse::Conflict().json(json!({
                "success": false,
                "message": "Email already exists"
            })))
        }
        Err(UserError::Database(e)) => Ok(database_error_response("Failed to create user", &e)),
    }
}

#[tracing::instrument(name = "List users", skip(db))]
pub async fn list_users(db: web::Data<RemoteDb>) -> Result<HttpResponse> {
    let users = ok_or_return!(db_result(users::list_users(&db).await, "Failed to fetch users"));

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "users": users,
        "count": users.len()
    })))
}

#[tracing::instrument(name = "Get user", skip(db))]
pub async fn get_user(user_id: i64, db: web::Data<RemoteDb>) -> Result<HttpResponse> {
    let user = ok_or_return!(require_record(
        users::get_user(&db, user_id).await,
        "User not found"
    ));

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "user": user
    })))
}
