use actix_web::{delete, get, post, web, HttpResponse, Result};

use crate::config::database::DeviceSettings;
use crate::db::client::RemoteDb;
use crate::handlers::health_metric_handler;
use crate::models::health_metric::CreateHealthMetricRequest;

/// All readings, newest first
#[get("/health-metrics")]
async fn list_health_metrics(db: web::Data<RemoteDb>) -> Result<HttpResponse> {
    health_metric_handler::list_health_metrics(db).await
}

/// Record a reading, registering the device on first sight
#[post("/health-metrics")]
async fn create_health_metric(
    metric_form: web::Json<CreateHealthMetricRequest>,
    db: web::Data<RemoteDb>,
    defaults: web::Data<DeviceSettings>,
) -> Result<HttpResponse> {
    health_metric_handler::create_health_metric(metric_form, db, defaults).await
}

/// Purge stored readings outside the physiological ranges
#[delete("/health-metrics/invalid")]
async fn delete_invalid_health_metrics(db: web::Data<RemoteDb>) -> Result<HttpResponse> {
    health_metric_handler::delete_invalid_health_metrics(db).await
}

#[get("/health-metrics/device/{device_id}")]
async fn list_device_health_metrics(
    path: web::Path<String>,
    db: web::Data<RemoteDb>,
) -> Result<HttpResponse> {
    let device_id = path.into_inner();
    health_metric_handler::list_device_health_metrics(device_id, db).await
}

#[get("/health-metrics/{metric_id}")]
async fn get_health_metric(path: web::Path<i64>, db: web::Data<RemoteDb>) -> Result<HttpResponse> {
    let metric_id = path.into_inner();
    health_metric_handler::get_health_metric(metric_id, db).await
}
