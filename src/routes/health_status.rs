use actix_web::{get, web, HttpResponse, Result};

use crate::db::client::RemoteDb;
use crate::handlers::health_status_handler;

#[get("/health-status/{device_id}")]
async fn get_health_status(path: web::Path<String>, db: web::Data<RemoteDb>) -> Result<HttpResponse> {
    let device_id = path.into_inner();
    health_status_handler::get_health_status(device_id, db).await
}
