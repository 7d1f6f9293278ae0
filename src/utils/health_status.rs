use chrono::{DateTime, Duration, Utc};

use crate::models::health_status::{ConnectionStatus, HealthAssessment, MetricSnapshot};
use crate::utils::timestamps::parse_timestamp;

pub const STATUS_GOOD: &str = "Good";

const HEART_RATE_LOW: i64 = 60;
const HEART_RATE_HIGH: i64 = 100;
const SPO2_LOW: i64 = 95;
const FEVER_ABOVE: f64 = 37.5;
const HYPOTHERMIA_BELOW: f64 = 35.5;

/// A device counts as connected if its latest sample is younger than this.
pub fn connection_window() -> Duration {
    Duration::minutes(5)
}

/// Classify a device's latest reading. Rules run in a fixed order (heart
/// rate, SpO2, temperature); every triggered rule adds an alert and the last
/// one triggered sets the status.
pub fn evaluate(snapshot: &MetricSnapshot, now: DateTime<Utc>) -> HealthAssessment {
    let mut status = STATUS_GOOD;
    let mut alerts = Vec::new();

    if let Some(heart_rate) = snapshot.heart_rate {
        if heart_rate < HEART_RATE_LOW {
            status = "Low Heart Rate";
            alerts.push("Heart rate is below normal (60-100 BPM)".to_string());
        } else if heart_rate > HEART_RATE_HIGH {
            status = "High Heart Rate";
            alerts.push("Heart rate is above normal (60-100 BPM)".to_string());
        }
    }

    if let Some(spo2) = snapshot.spo2 {
        if spo2 < SPO2_LOW {
            status = "Low Oxygen";
            alerts.push("Blood oxygen level is below normal (95-100%)".to_string());
        }
    }

    if let Some(temperature) = snapshot.temperature {
        if temperature > FEVER_ABOVE {
            status = "Fever";
            alerts.push("Body temperature is elevated (normal: 36-37°C)".to_string());
        } else if temperature < HYPOTHERMIA_BELOW {
            status = "Low Temperature";
            alerts.push("Body temperature is below normal (normal: 36-37°C)".to_string());
        }
    }

    HealthAssessment {
        status: status.to_string(),
        alerts,
        connection: connection_status(snapshot.timestamp.as_deref(), now),
    }
}

pub fn connection_status(timestamp: Option<&str>, now: DateTime<Utc>) -> ConnectionStatus {
    match timestamp.and_then(parse_timestamp) {
        Some(sampled_at) if now - sampled_at < connection_window() => ConnectionStatus::Connected,
        Some(_) => ConnectionStatus::Disconnected,
        None => ConnectionStatus::Unknown,
    }
}
