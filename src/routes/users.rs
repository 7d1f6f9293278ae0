use actix_web::{get, post, web, HttpResponse, Result};

use crate::db::client::RemoteDb;
use crate::handlers::user_handler;
use crate::models::user::CreateUserRequest;

#[get("/users")]
async fn list_users(db: web::Data<RemoteDb>) -> Result<HttpResponse> {
    user_handler::list_users(db).await
}

#[post("/users")]
async fn create_user(
    user_form: web::Json<CreateUserRequest>,
    db: web::Data<RemoteDb>,
) -> Result<HttpResponse> {
    user_handler::create_user(user_form, db).await
}

#[get("/users/{user_id}")]
async fn get_user(path: web::Path<i64>, db: web::Data<RemoteDb>) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    user_handler::get_user(user_id, db).await
}
