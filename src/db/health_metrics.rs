use crate::config::database::DeviceSettings;
use crate::db::client::{DbError, RemoteDb, Statement};
use crate::db::devices::ensure_device;
use crate::models::health_metric::{
    CreateHealthMetricRequest, HealthMetric, CALORIES_RANGE, DEFAULT_ACTIVITY, HEART_RATE_RANGE,
    SPO2_RANGE, STEPS_RANGE, TEMPERATURE_RANGE,
};
use crate::utils::timestamps::now_timestamp;

const METRIC_COLUMNS: &str =
    "id, device_id, user_id, heart_rate, spo2, temperature, steps, calories, activity, timestamp";

/// Stored timestamps mix RFC 3339 (with any offset) and SQLite's
/// space-separated form, so they are compared as instants, not as text.
pub const NEWEST_FIRST: &str = "ORDER BY julianday(timestamp) DESC, id DESC";

/// Store one reading. An unknown device is registered on the fly, owned by
/// the configured fallback user, and the reading is attributed to the
/// device's owner.
pub async fn create_health_metric(
    db: &RemoteDb,
    request: &CreateHealthMetricRequest,
    defaults: &DeviceSettings,
) -> Result<HealthMetric, DbError> {
    let ensured = ensure_device(db, &request.device_id, None, None, defaults).await?;
    let owner_id = ensured.device.user_id.unwrap_or(defaults.fallback_owner_id);
    let timestamp = request.timestamp.clone().unwrap_or_else(now_timestamp);
    let activity = request.activity.as_deref().unwrap_or(DEFAULT_ACTIVITY);

    let result = db
        .execute(
            Statement::new(format!(
                "INSERT INTO health_metrics \
                 (device_id, user_id, heart_rate, spo2, temperature, steps, calories, activity, timestamp) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {}",
                METRIC_COLUMNS
            ))
            .bind(ensured.device.device_id.as_str())
            .bind(owner_id)
            .bind(request.heart_rate)
            .bind(request.spo2)
            .bind(request.temperature)
            .bind(request.steps)
            .bind(request.calories)
            .bind(activity)
            .bind(timestamp),
        )
        .await?;

    result
        .decode_first::<HealthMetric>()?
        .ok_or_else(|| DbError::Protocol("health metric insert returned no row".to_string()))
}

pub async fn list_health_metrics(db: &RemoteDb) -> Result<Vec<HealthMetric>, DbError> {
    db.execute(Statement::new(format!(
        "SELECT {} FROM health_metrics {}",
        METRIC_COLUMNS, NEWEST_FIRST
    )))
    .await?
    .decode_all()
}

pub async fn get_health_metric(db: &RemoteDb, id: i64) -> Result<Option<HealthMetric>, DbError> {
    db.execute(
        Statement::new(format!(
            "SELECT {} FROM health_metrics WHERE id = ?",
            METRIC_COLUMNS
        ))
        .bind(id),
    )
    .await?
    .decode_first()
}

pub async fn list_by_device(db: &RemoteDb, device_id: &str) -> Result<Vec<HealthMetric>, DbError> {
    db.execute(
        Statement::new(format!(
            "SELECT {} FROM health_metrics WHERE device_id = ? {}",
            METRIC_COLUMNS, NEWEST_FIRST
        ))
        .bind(device_id),
    )
    .await?
    .decode_all()
}

pub async fn latest_for_device(
    db: &RemoteDb,
    device_id: &str,
) -> Result<Option<HealthMetric>, DbError> {
    db.execute(
        Statement::new(format!(
            "SELECT {} FROM health_metrics WHERE device_id = ? {} LIMIT 1",
            METRIC_COLUMNS, NEWEST_FIRST
        ))
        .bind(device_id),
    )
    .await?
    .decode_first()
}

/// Remove stored readings with any field outside its accepted domain, e.g.
/// rows written before validation existed. Returns the number deleted.
pub async fn delete_out_of_range(db: &RemoteDb) -> Result<u64, DbError> {
    let result = db
        .execute(
            Statement::new(
                "DELETE FROM health_metrics WHERE \
                 (heart_rate IS NOT NULL AND (heart_rate < ? OR heart_rate > ?)) \
                 OR (spo2 IS NOT NULL AND (spo2 < ? OR spo2 > ?)) \
                 OR (temperature IS NOT NULL AND (temperature < ? OR temperature > ?)) \
                 OR (steps IS NOT NULL AND (steps < ? OR steps > ?)) \
                 OR (calories IS NOT NULL AND (calories < ? OR calories > ?))",
            )
            .bind(*HEART_RATE_RANGE.start())
            .bind(*HEART_RATE_RANGE.end())
            .bind(*SPO2_RANGE.start())
            .bind(*SPO2_RANGE.end())
            .bind(*TEMPERATURE_RANGE.start())
            .bind(*TEMPERATURE_RANGE.end())
            .bind(*STEPS_RANGE.start())
            .bind(*STEPS_RANGE.end())
            .bind(*CALORIES_RANGE.start())
            .bind(*CALORIES_RANGE.end()),
        )
        .await?;

    let deleted = result.affected_row_count();
    tracing::info!(deleted, "Removed out-of-range health metrics");
    Ok(deleted)
}
