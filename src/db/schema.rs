use crate::config::database::DeviceSettings;
use crate::db::client::{DbError, RemoteDb, Statement};
use crate::db::users::get_user;

/// Idempotent schema, applied in one pipeline request at startup.
///
/// Foreign keys stay enforced: readings reference devices by their natural
/// key, and devices are registered on demand before a reading is stored.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        full_name TEXT NOT NULL,
        email TEXT UNIQUE NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS devices (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        device_id TEXT UNIQUE NOT NULL,
        user_id INTEGER,
        model TEXT DEFAULT 'BioBand Pro',
        status TEXT DEFAULT 'active',
        registered_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (user_id) REFERENCES users (id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS health_metrics (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        device_id TEXT NOT NULL,
        user_id INTEGER,
        heart_rate INTEGER,
        spo2 INTEGER,
        temperature REAL,
        steps INTEGER,
        calories INTEGER,
        activity TEXT DEFAULT 'Walking',
        timestamp TEXT NOT NULL,
        FOREIGN KEY (device_id) REFERENCES devices (device_id),
        FOREIGN KEY (user_id) REFERENCES users (id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_health_metrics_device_time ON health_metrics (device_id, timestamp)",
    r#"
    CREATE TABLE IF NOT EXISTS chat_messages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        session_id TEXT NOT NULL,
        role TEXT NOT NULL,
        message TEXT NOT NULL,
        timestamp TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_chat_session ON chat_messages (session_id)",
];

pub const FALLBACK_OWNER_NAME: &str = "Bio Band Unassigned";

pub fn schema_statements() -> Vec<Statement> {
    SCHEMA.iter().map(|sql| Statement::new(sql.trim())).collect()
}

/// Auto-registered devices reference the fallback owner, so that user must
/// exist before the first reading arrives. Leaves an existing row untouched.
pub fn seed_fallback_owner(defaults: &DeviceSettings) -> Statement {
    Statement::new(
        "INSERT INTO users (id, full_name, email) VALUES (?, ?, ?) ON CONFLICT DO NOTHING",
    )
    .bind(defaults.fallback_owner_id)
    .bind(FALLBACK_OWNER_NAME)
    .bind(format!("unassigned+{}@bioband.local", defaults.fallback_owner_id))
}

pub async fn run_migrations(db: &RemoteDb, defaults: &DeviceSettings) -> Result<(), DbError> {
    let mut statements = schema_statements();
    statements.push(seed_fallback_owner(defaults));
    db.batch(&statements).await?;
    tracing::info!(statements = statements.len(), "Database schema is up to date");
    Ok(())
}

/// Whether the configured fallback owner exists. Checked at startup, since
/// the seed only runs with the schema bootstrap.
pub async fn fallback_owner_exists(db: &RemoteDb, defaults: &DeviceSettings) -> Result<bool, DbError> {
    Ok(get_user(db, defaults.fallback_owner_id).await?.is_some())
}
