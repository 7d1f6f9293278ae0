use actix_web::{web, HttpResponse, Result};
use chrono::Utc;
use serde_json::json;

use crate::db::client::RemoteDb;
use crate::db::health_metrics;
use crate::handlers::helpers::require_record;
use crate::models::health_status::MetricSnapshot;
use crate::ok_or_return;
use crate::utils::health_status::evaluate;

/// Classify the latest reading of a device.
#[tracing::instrument(name = "Get health status", skip(db))]
pub async fn get_health_status(device_id: String, db: web::Data<RemoteDb>) -> Result<HttpResponse> {
    let latest = ok_or_return!(require_record(
        health_metrics::latest_for_device(&db, &device_id).await,
        "No health data found for this device"
    ));

    let assessment = evaluate(&MetricSnapshot::from(&latest), Utc::now());
    tracing::info!(status = %assessment.status, alerts = assessment.alerts.len(), "Evaluated health status");

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "device_id": device_id,
        "connection_status": assessment.connection,
        "health_status": assessment.status,
        "alerts": assessment.alerts,
        "current_metrics": {
            "heart_rate": latest.heart_rate,
            "spo2": latest.spo2,
            "temperature": latest.temperature,
            "steps": latest.steps,
            "calories": latest.calories,
            "activity": latest.activity
        },
        "last_updated": latest.timestamp
    })))
}
