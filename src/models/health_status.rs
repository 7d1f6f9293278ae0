use serde::{Deserialize, Serialize};

use crate::models::health_metric::HealthMetric;

/// The readings the status evaluation looks at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSnapshot {
    pub heart_rate: Option<i64>,
    pub spo2: Option<i64>,
    pub temperature: Option<f64>,
    pub timestamp: Option<String>,
}

impl From<&HealthMetric> for MetricSnapshot {
    fn from(metric: &HealthMetric) -> Self {
        Self {
            heart_rate: metric.heart_rate,
            spo2: metric.spo2,
            temperature: metric.temperature,
            timestamp: Some(metric.timestamp.clone()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Unknown,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct HealthAssessment {
    pub status: String,
    pub alerts: Vec<String>,
    pub connection: ConnectionStatus,
}
