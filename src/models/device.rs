use serde::{Deserialize, Serialize};

use crate::db::client::DbError;
use crate::db::decode::{FromRow, Row};
use crate::utils::text_fields::{is_padded, padding_error};

pub const DEFAULT_DEVICE_STATUS: &str = "active";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Device {
    pub id: i64,
    pub device_id: String,
    pub user_id: Option<i64>,
    pub model: Option<String>,
    pub status: Option<String>,
    pub registered_at: Option<String>,
}

impl FromRow for Device {
    fn from_row(row: &Row<'_>) -> Result<Self, DbError> {
        Ok(Self {
            id: row.get_i64("id")?,
            device_id: row.get_string("device_id")?,
            user_id: row.get_opt_i64("user_id")?,
            model: row.get_opt_string("model")?,
            status: row.get_opt_string("status")?,
            registered_at: row.get_opt_string("registered_at")?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateDeviceRequest {
    pub device_id: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub model: Option<String>,
}

impl CreateDeviceRequest {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(e) = validate_device_id(&self.device_id) {
            errors.push(e);
        }
        if let Some(user_id) = self.user_id {
            if user_id <= 0 {
                errors.push("user_id must be a positive integer".to_string());
            }
        }
        if let Some(model) = &self.model {
            if model.trim().is_empty() {
                errors.push("model cannot be empty".to_string());
            } else if is_padded(model) {
                errors.push(padding_error("model"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Device ids are stored and looked up byte for byte.
pub fn validate_device_id(device_id: &str) -> Result<(), String> {
    if device_id.trim().is_empty() {
        return Err("device_id is required".to_string());
    }
    if is_padded(device_id) {
        return Err(padding_error("device_id"));
    }
    if device_id.len() > 64 {
        return Err("device_id cannot exceed 64 characters".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_and_model_are_optional() {
        let request = CreateDeviceRequest {
            device_id: "BB001".to_string(),
            user_id: None,
            model: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn rejects_blank_device_id_and_bad_owner() {
        let request = CreateDeviceRequest {
            device_id: " ".to_string(),
            user_id: Some(0),
            model: Some(String::new()),
        };
        assert_eq!(request.validate().unwrap_err().len(), 3);
    }

    #[test]
    fn padded_device_id_and_model_are_rejected() {
        let request = CreateDeviceRequest {
            device_id: " BB001".to_string(),
            user_id: None,
            model: Some("BioBand Pro\n".to_string()),
        };
        assert_eq!(
            request.validate().unwrap_err(),
            vec![
                "device_id cannot have leading or trailing whitespace".to_string(),
                "model cannot have leading or trailing whitespace".to_string(),
            ]
        );
    }

    #[test]
    fn inner_spaces_are_part_of_the_id() {
        assert!(validate_device_id("BB 001").is_ok());
        assert!(validate_device_id("BB001 ").is_err());
    }
}
