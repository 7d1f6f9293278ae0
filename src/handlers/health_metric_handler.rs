use actix_web::{web, HttpResponse, Result};
use serde_json::json;

use crate::config::database::DeviceSettings;
use crate::db::client::RemoteDb;
use crate::db::health_metrics;
use crate::handlers::helpers::{db_result, require_record, validation_error_response};
use crate::models::health_metric::CreateHealthMetricRequest;
use crate::ok_or_return;

#[tracing::instrument(
    name = "Record health metric",
    skip(request, db, defaults),
    fields(
        device_id = %request.device_id
    )
)]
pub async fn create_health_metric(
    request: web::Json<CreateHealthMetricRequest>,
    db: web::Data<RemoteDb>,
    defaults: web::Data<DeviceSettings>,
) -> Result<HttpResponse> {
    // Out-of-range readings never reach the database
    if let Err(errors) = request.validate() {
        return Ok(validation_error_response(errors));
    }

    let metric = ok_or_return!(db_result(
        health_metrics::create_health_metric(&db, &request, &defaults).await,
        "Failed to record health metric"
    ));
    tracing::info!("Health metric {} recorded", metric.id);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Health metric recorded successfully",
        "data": metric
    })))
}

#[tracing::instrument(name = "List health metrics", skip(db))]
pub async fn list_health_metrics(db: web::Data<RemoteDb>) -> Result<HttpResponse> {
    let metrics = ok_or_return!(db_result(
        health_metrics::list_health_metrics(&db).await,
        "Failed to fetch health metrics"
    ));

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "health_metrics": metrics,
        "count": metrics.len()
    })))
}

#[tracing::instrument(name = "Get health metric", skip(db))]
pub async fn get_health_metric(metric_id: i64, db: web::Data<RemoteDb>) -> Result<HttpResponse> {
    let metric = ok_or_return!(require_record(
        health_metrics::get_health_metric(&db, metric_id).await,
        "Health metric not found"
    ));

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": metric
    })))
}

#[tracing::instrument(name = "List device health metrics", skip(db))]
pub async fn list_device_health_metrics(
    device_id: String,
    db: web::Data<RemoteDb>,
) -> Result<HttpResponse> {
    let metrics = ok_or_return!(db_result(
        health_metrics::list_by_device(&db, &device_id).await,
        "Failed to fetch device health metrics"
    ));

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "device_id": device_id,
        "health_metrics": metrics,
        "count": metrics.len()
    })))
}

#[tracing::instrument(name = "Delete out-of-range health metrics", skip(db))]
pub async fn delete_invalid_health_metrics(db: web::Data<RemoteDb>) -> Result<HttpResponse> {
    let deleted = ok_or_return!(db_result(
        health_metrics::delete_out_of_range(&db).await,
        "Failed to delete invalid health metrics"
    ));

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": format!("Deleted {} invalid health metrics", deleted),
        "deleted": deleted
    })))
}
