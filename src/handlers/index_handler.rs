use actix_web::HttpResponse;
use serde_json::json;

/// Service banner listing the public endpoints.
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Bio Band Health Monitoring API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "Users": {
                "GET /users": "List users",
                "POST /users": "Register a user",
                "GET /users/{id}": "Get a user"
            },
            "Devices": {
                "GET /devices": "List devices",
                "POST /devices": "Register a device",
                "GET /devices/by-id/{id}": "Get a device by row id",
                "GET /devices/{device_id}": "Get a device by hardware id"
            },
            "Health Metrics": {
                "GET /health-metrics": "List readings, newest first",
                "POST /health-metrics": "Record a reading",
                "GET /health-metrics/{id}": "Get a reading",
                "GET /health-metrics/device/{device_id}": "Readings of one device",
                "DELETE /health-metrics/invalid": "Delete out-of-range readings",
                "GET /health-status/{device_id}": "Health status of a device"
            },
            "Chat": {
                "POST /chat": "Ask the health assistant",
                "GET /chat/{session_id}": "Chat history"
            }
        }
    }))
}
