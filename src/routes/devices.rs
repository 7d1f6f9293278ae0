use actix_web::{get, post, web, HttpResponse, Result};

use crate::config::database::DeviceSettings;
use crate::db::client::RemoteDb;
use crate::handlers::device_handler;
use crate::models::device::CreateDeviceRequest;

#[get("/devices")]
async fn list_devices(db: web::Data<RemoteDb>) -> Result<HttpResponse> {
    device_handler::list_devices(db).await
}

#[post("/devices")]
async fn create_device(
    device_form: web::Json<CreateDeviceRequest>,
    db: web::Data<RemoteDb>,
    defaults: web::Data<DeviceSettings>,
) -> Result<HttpResponse> {
    device_handler::create_device(device_form, db, defaults).await
}

#[get("/devices/by-id/{id}")]
async fn get_device_by_id(path: web::Path<i64>, db: web::Data<RemoteDb>) -> Result<HttpResponse> {
    let id = path.into_inner();
    device_handler::get_device_by_id(id, db).await
}

/// Look a device up by its hardware identifier
#[get("/devices/{device_id}")]
async fn get_device(path: web::Path<String>, db: web::Data<RemoteDb>) -> Result<HttpResponse> {
    let device_id = path.into_inner();
    device_handler::get_device(device_id, db).await
}
