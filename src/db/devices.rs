use crate::config::database::DeviceSettings;
use crate::db::client::{DbError, RemoteDb, Statement};
use crate::models::device::{Device, DEFAULT_DEVICE_STATUS};

const DEVICE_COLUMNS: &str = "id, device_id, user_id, model, status, registered_at";

/// Outcome of a register-if-absent call.
#[derive(Debug, Clone)]
pub struct EnsuredDevice {
    pub device: Device,
    pub created: bool,
}

/// Return the device registered under `device_id`, creating it first if
/// nobody has yet.
///
/// The lookup and the insert are separate round trips, so two requests can
/// both see the device as missing. The insert is `ON CONFLICT DO NOTHING`:
/// the loser gets no row back and re-reads the one the winner stored.
pub async fn ensure_device(
    db: &RemoteDb,
    device_id: &str,
    owner_id: Option<i64>,
    model: Option<&str>,
    defaults: &DeviceSettings,
) -> Result<EnsuredDevice, DbError> {
    if let Some(device) = get_device_by_device_id(db, device_id).await? {
        return Ok(EnsuredDevice {
            device,
            created: false,
        });
    }

    let owner_id = owner_id.unwrap_or(defaults.fallback_owner_id);
    let model = model.unwrap_or(defaults.default_model.as_str());

    let inserted = db
        .execute(
            Statement::new(format!(
                "INSERT INTO devices (device_id, user_id, model, status) VALUES (?, ?, ?, ?) \
                 ON CONFLICT(device_id) DO NOTHING RETURNING {}",
                DEVICE_COLUMNS
            ))
            .bind(device_id)
            .bind(owner_id)
            .bind(model)
            .bind(DEFAULT_DEVICE_STATUS),
        )
        .await?
        .decode_first::<Device>()?;

    match inserted {
        Some(device) => {
            tracing::info!(device_id = %device.device_id, owner_id, "Registered device");
            Ok(EnsuredDevice {
                device,
                created: true,
            })
        }
        None => {
            tracing::info!(device_id, "Device registered concurrently, reading it back");
            let device = get_device_by_device_id(db, device_id).await?.ok_or_else(|| {
                DbError::Protocol(format!(
                    "device {} was neither inserted nor found",
                    device_id
                ))
            })?;
            Ok(EnsuredDevice {
                device,
                created: false,
            })
        }
    }
}

pub async fn list_devices(db: &RemoteDb) -> Result<Vec<Device>, DbError> {
    db.execute(Statement::new(format!(
        "SELECT {} FROM devices ORDER BY id ASC",
        DEVICE_COLUMNS
    )))
    .await?
    .decode_all()
}

pub async fn get_device(db: &RemoteDb, id: i64) -> Result<Option<Device>, DbError> {
    db.execute(
        Statement::new(format!("SELECT {} FROM devices WHERE id = ?", DEVICE_COLUMNS)).bind(id),
    )
    .await?
    .decode_first()
}

pub async fn get_device_by_device_id(
    db: &RemoteDb,
    device_id: &str,
) -> Result<Option<Device>, DbError> {
    db.execute(
        Statement::new(format!(
            "SELECT {} FROM devices WHERE device_id = ?",
            DEVICE_COLUMNS
        ))
        .bind(device_id),
    )
    .await?
    .decode_first()
}
