use std::ops::RangeInclusive;
use serde::{Deserialize, Serialize};

use crate::db::client::DbError;
use crate::db::decode::{FromRow, Row};
use crate::models::device::validate_device_id;
use crate::utils::text_fields::{is_padded, padding_error};
use crate::utils::timestamps::parse_timestamp;

pub const HEART_RATE_RANGE: RangeInclusive<i64> = 30..=220;
pub const SPO2_RANGE: RangeInclusive<i64> = 70..=100;
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 30.0..=45.0;
pub const STEPS_RANGE: RangeInclusive<i64> = 0..=100_000;
pub const CALORIES_RANGE: RangeInclusive<i64> = 0..=10_000;

pub const DEFAULT_ACTIVITY: &str = "Walking";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HealthMetric {
    pub id: i64,
    pub device_id: String,
    pub user_id: Option<i64>,
    pub heart_rate: Option<i64>,
    pub spo2: Option<i64>,
    pub temperature: Option<f64>,
    pub steps: Option<i64>,
    pub calories: Option<i64>,
    pub activity: Option<String>,
    pub timestamp: String,
}

impl FromRow for HealthMetric {
    fn from_row(row: &Row<'_>) -> Result<Self, DbError> {
        Ok(Self {
            id: row.get_i64("id")?,
            device_id: row.get_string("device_id")?,
            user_id: row.get_opt_i64("user_id")?,
            heart_rate: row.get_opt_i64("heart_rate")?,
            spo2: row.get_opt_i64("spo2")?,
            temperature: row.get_opt_f64("temperature")?,
            steps: row.get_opt_i64("steps")?,
            calories: row.get_opt_i64("calories")?,
            activity: row.get_opt_string("activity")?,
            timestamp: row.get_string("timestamp")?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateHealthMetricRequest {
    pub device_id: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub heart_rate: Option<i64>,
    #[serde(default)]
    pub spo2: Option<i64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub steps: Option<i64>,
    #[serde(default)]
    pub calories: Option<i64>,
    #[serde(default)]
    pub activity: Option<String>,
}

impl CreateHealthMetricRequest {
    /// Check every field against its domain and report all violations at once.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(e) = validate_device_id(&self.device_id) {
            errors.push(e);
        }

        check_range(&mut errors, "heart_rate", self.heart_rate, &HEART_RATE_RANGE, " BPM");
        check_range(&mut errors, "spo2", self.spo2, &SPO2_RANGE, "%");
        check_range(&mut errors, "temperature", self.temperature, &TEMPERATURE_RANGE, "°C");
        check_range(&mut errors, "steps", self.steps, &STEPS_RANGE, "");
        check_range(&mut errors, "calories", self.calories, &CALORIES_RANGE, "");

        if let Some(timestamp) = &self.timestamp {
            if is_padded(timestamp) {
                errors.push(padding_error("timestamp"));
            } else if parse_timestamp(timestamp).is_none() {
                errors.push(format!(
                    "timestamp must be an ISO-8601 date-time (got {:?})",
                    timestamp
                ));
            }
        }

        if let Some(activity) = &self.activity {
            if activity.trim().is_empty() {
                errors.push("activity cannot be empty".to_string());
            } else if is_padded(activity) {
                errors.push(padding_error("activity"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check_range<T>(
    errors: &mut Vec<String>,
    field: &str,
    value: Option<T>,
    range: &RangeInclusive<T>,
    unit: &str,
) where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if let Some(value) = value {
        if !range.contains(&value) {
            errors.push(format!(
                "{} must be between {} and {}{} (got {})",
                field,
                range.start(),
                range.end(),
                unit,
                value
            ));
        }
    }
}
