use actix_web::{web, HttpResponse, Result};
use serde_json::json;

use crate::config::database::DeviceSettings;
use crate::db::client::RemoteDb;
use crate::db::devices;
use crate::handlers::helpers::{db_result, require_record, validation_error_response};
use crate::models::device::CreateDeviceRequest;
use crate::ok_or_return;

/// Register a device. Registering an existing `device_id` again is not an
/// error; the stored device is returned unchanged.
#[tracing::instrument(
    name = "Register device",
    skip(request, db, defaults),
    fields(
        device_id = %request.device_id
    )
)]
pub async fn create_device(
    request: web::Json<CreateDeviceRequest>,
    db: web::Data<RemoteDb>,
    defaults: web::Data<DeviceSettings>,
) -> Result<HttpResponse> {
    if let Err(errors) = request.validate() {
        return Ok(validation_error_response(errors));
    }

    let ensured = ok_or_return!(db_result(
        devices::ensure_device(
            &db,
            &request.device_id,
            request.user_id,
            request.model.as_deref(),
            &defaults,
        )
        .await,
        "Failed to register device"
    ));

    let message = if ensured.created {
        "Device registered successfully"
    } else {
        "Device already registered"
    };

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": message,
        "device": ensured.device
    })))
}

#[tracing::instrument(name = "List devices", skip(db))]
pub async fn list_devices(db: web::Data<RemoteDb>) -> Result<HttpResponse> {
    let devices = ok_or_return!(db_result(
        devices::list_devices(&db).await,
        "Failed to fetch devices"
    ));

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "devices": devices,
        "count": devices.len()
    })))
}

#[tracing::instrument(name = "Get device by id", skip(db))]
pub async fn get_device_by_id(id: i64, db: web::Data<RemoteDb>) -> Result<HttpResponse> {
    let device = ok_or_return!(require_record(
        devices::get_device(&db, id).await,
        "Device not found"
    ));

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "device": device
    })))
}

#[tracing::instrument(name = "Get device", skip(db))]
pub async fn get_device(device_id: String, db: web::Data<RemoteDb>) -> Result<HttpResponse> {
    let device = ok_or_return!(require_record(
        devices::get_device_by_device_id(&db, &device_id).await,
        "Device not found"
    ));

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "device": device
    })))
}
