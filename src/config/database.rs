use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub auth_token: SecretString,
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u64,
    #[serde(default = "default_batch_timeout_secs")]
    pub batch_timeout_secs: u64,
    #[serde(default)]
    pub run_migrations: bool,
}

fn default_query_timeout_secs() -> u64 {
    10
}

fn default_batch_timeout_secs() -> u64 {
    30
}

impl DatabaseSettings {
    /// Endpoint of the HTTP pipeline API. `libsql://` URLs, as handed out by
    /// the hosting dashboard, are served over HTTPS.
    pub fn pipeline_url(&self) -> Result<Url, url::ParseError> {
        let base = match self.url.strip_prefix("libsql://") {
            Some(host) => format!("https://{}", host),
            None => self.url.clone(),
        };
        Url::parse(&format!("{}/v2/pipeline", base.trim_end_matches('/')))
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    pub fn batch_timeout(&self) -> Duration {
        Duration::from_secs(self.batch_timeout_secs)
    }
}

/// Defaults applied when a device is registered implicitly.
#[derive(Debug, Deserialize, Clone)]
pub struct DeviceSettings {
    pub fallback_owner_id: i64,
    pub default_model: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(url: &str) -> DatabaseSettings {
        DatabaseSettings {
            url: url.to_string(),
            auth_token: SecretString::new("token".into()),
            query_timeout_secs: default_query_timeout_secs(),
            batch_timeout_secs: default_batch_timeout_secs(),
            run_migrations: false,
        }
    }

    #[test]
    fn libsql_scheme_is_rewritten_to_https() {
        let url = settings("libsql://bioband.turso.io").pipeline_url().unwrap();
        assert_eq!(url.as_str(), "https://bioband.turso.io/v2/pipeline");
    }

    #[test]
    fn trailing_slash_is_tolerated() {
        let url = settings("http://127.0.0.1:8080/").pipeline_url().unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/v2/pipeline");
    }

    #[test]
    fn garbage_url_is_rejected() {
        assert!(settings("not a url").pipeline_url().is_err());
    }
}
