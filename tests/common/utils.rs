use once_cell::sync::Lazy;
use secrecy::SecretString;
use std::net::TcpListener;
use wiremock::MockServer;

use bioband_backend::config::settings::{get_config, Settings};
use bioband_backend::db::client::RemoteDb;
use bioband_backend::run;
use bioband_backend::services::ChatService;
use bioband_backend::telemetry::{get_subscriber, init_subscriber};

pub const TEST_DB_TOKEN: &str = "test-db-token";
pub const TEST_LLM_KEY: &str = "test-llm-key";
pub const LLM_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::stdout
        );
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::sink
        );
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    /// Stands in for the hosted database's `/v2/pipeline` endpoint
    pub db_server: MockServer,
    /// Stands in for the language model API
    pub llm_server: MockServer,
}

impl TestApp {
    /// Number of pipeline requests the app sent to the database
    pub async fn db_request_count(&self) -> usize {
        self.db_server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Spawn the app with settings pointed at fresh mock servers. `customize`
/// runs last and may override anything.
pub async fn spawn_app_with(customize: impl FnOnce(&mut Settings)) -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    Lazy::force(&TRACING);

    let db_server = MockServer::start().await;
    let llm_server = MockServer::start().await;

    let listener = TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    // Get port assigned by the OS
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let mut configuration = get_config().expect("Failed to read configuration.");
    configuration.database.url = db_server.uri();
    configuration.database.auth_token = SecretString::new(TEST_DB_TOKEN.into());
    configuration.database.query_timeout_secs = 2;
    configuration.database.batch_timeout_secs = 2;
    configuration.chat.api_url = format!("{}{}", llm_server.uri(), LLM_PATH);
    configuration.chat.api_key = Some(SecretString::new(TEST_LLM_KEY.into()));
    configuration.chat.timeout_secs = 2;
    customize(&mut configuration);

    let db = RemoteDb::new(&configuration.database)
        .expect("Failed to create database client.");
    let chat_service = ChatService::new(configuration.chat.clone());

    let server = run(
        listener,
        db,
        chat_service,
        configuration.devices.clone(),
    )
        .expect("Failed to bind address");
    // Launch the server as a background task
    // tokio::spawn returns a handle to the spawned future,
    // but we have no use for it here, hence the non-binding let
    let _ = tokio::spawn(server);

    TestApp {
        address,
        db_server,
        llm_server,
    }
}
