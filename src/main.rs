use std::net::TcpListener;

use bioband_backend::config::settings::get_config;
use bioband_backend::db::client::RemoteDb;
use bioband_backend::db::schema::{fallback_owner_exists, run_migrations};
use bioband_backend::run;
use bioband_backend::services::ChatService;
use bioband_backend::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = match get_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to read the config: {}", e);
            std::process::exit(1);
        }
    };

    let subscriber = get_subscriber(
        "bioband-backend".into(),
        config.application.log_level.clone(),
        std::io::stdout
    );
    init_subscriber(subscriber);

    let db = match RemoteDb::new(&config.database) {
        Ok(db) => {
            tracing::info!("Database client targets {}", db.pipeline_url());
            db
        }
        Err(e) => {
            tracing::error!("❌ Failed to create database client: {}", e);
            std::process::exit(1);
        }
    };

    if config.database.run_migrations {
        match run_migrations(&db, &config.devices).await {
            Ok(()) => tracing::info!("✅ Database schema is up to date"),
            Err(e) => {
                tracing::error!("❌ Failed to apply database schema: {}", e);
                std::process::exit(1);
            }
        }
    }

    // Readings from unseen devices are owned by this user
    match fallback_owner_exists(&db, &config.devices).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::error!(
                "❌ Fallback device owner {} does not exist. Create that user or set devices.fallback_owner_id.",
                config.devices.fallback_owner_id
            );
            std::process::exit(1);
        }
        Err(e) => tracing::warn!("Could not verify the fallback device owner: {}", e),
    }

    let chat_service = ChatService::new(config.chat.clone());
    if !chat_service.is_configured() {
        tracing::warn!("GEMINI_API_KEY is not set. Chat requests will be answered with 503.");
    }

    let address = format!("{}:{}", config.application.host, config.application.port);
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Listening on {}", address);

    run(
        listener,
        db,
        chat_service,
        config.devices.clone()
    )?.await
}
