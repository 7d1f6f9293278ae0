//! HTTP client for the hosted libSQL database.
//!
//! Every statement travels to `{base_url}/v2/pipeline` as an `execute`
//! request with positional, type-tagged arguments. The remote engine does
//! the binding; SQL text is never assembled from request data.

use std::time::{Duration, Instant};

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use url::Url;

use crate::config::database::DatabaseSettings;
use crate::db::decode::ResultSet;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Invalid database configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Database unreachable at {target}: {source}")]
    Connection {
        target: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Database request to {target} timed out after {elapsed_ms}ms")]
    Timeout { target: String, elapsed_ms: u128 },

    #[error("Database returned HTTP {status}: {body}")]
    RemoteExecution { status: u16, body: String },

    #[error("Unexpected database response: {0}")]
    Protocol(String),

    #[error("Statement failed: {message}")]
    Statement {
        message: String,
        code: Option<String>,
    },
}

impl DbError {
    /// The database could not be reached at all; callers may retry later.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, DbError::Connection { .. } | DbError::Timeout { .. })
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DbError::Statement { message, .. } if message.contains("UNIQUE constraint failed"))
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self, DbError::Statement { message, .. } if message.contains("FOREIGN KEY constraint failed"))
    }
}

/// A positional statement argument in its wire form.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Serialize for SqlValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self {
            SqlValue::Null => {
                map.serialize_entry("type", "null")?;
            }
            // Integers travel as decimal strings so 64-bit values survive JSON
            SqlValue::Integer(value) => {
                map.serialize_entry("type", "integer")?;
                map.serialize_entry("value", &value.to_string())?;
            }
            SqlValue::Float(value) => {
                map.serialize_entry("type", "float")?;
                map.serialize_entry("value", value)?;
            }
            SqlValue::Text(value) => {
                map.serialize_entry("type", "text")?;
                map.serialize_entry("value", value)?;
            }
        }
        map.end()
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Integer(value.into())
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&String> for SqlValue {
    fn from(value: &String) -> Self {
        SqlValue::Text(value.clone())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Statement {
    sql: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    args: Vec<SqlValue>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            args: Vec::new(),
        }
    }

    pub fn bind(mut self, value: impl Into<SqlValue>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }
}

#[derive(Serialize)]
struct PipelineRequest<'a> {
    requests: Vec<StreamRequest<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum StreamRequest<'a> {
    Execute { stmt: &'a Statement },
}

#[derive(Deserialize)]
struct PipelineResponse {
    results: Option<Vec<StreamResult>>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum StreamResult {
    Ok { response: StreamResponse },
    Error { error: RemoteError },
}

#[derive(Deserialize)]
struct StreamResponse {
    result: Option<WireResultSet>,
}

#[derive(Deserialize)]
struct RemoteError {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

#[derive(Deserialize)]
struct WireResultSet {
    cols: Vec<WireColumn>,
    rows: Vec<Vec<Value>>,
    #[serde(default)]
    affected_row_count: u64,
    #[serde(default)]
    last_insert_rowid: Option<Value>,
}

// Newer servers describe columns as objects, older ones as bare names.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireColumn {
    Described { name: Option<String> },
    Bare(String),
}

impl WireResultSet {
    fn into_result_set(self) -> ResultSet {
        let columns = self
            .cols
            .into_iter()
            .map(|col| match col {
                WireColumn::Described { name } => name.unwrap_or_default(),
                WireColumn::Bare(name) => name,
            })
            .collect();
        let last_insert_rowid = match self.last_insert_rowid {
            Some(Value::String(id)) => id.parse().ok(),
            Some(Value::Number(id)) => id.as_i64(),
            _ => None,
        };
        ResultSet::new(columns, self.rows, self.affected_row_count, last_insert_rowid)
    }
}

/// Shared handle on the remote database, cheap to clone.
#[derive(Clone)]
pub struct RemoteDb {
    client: Client,
    pipeline_url: Url,
    auth_token: SecretString,
    query_timeout: Duration,
    batch_timeout: Duration,
}

impl RemoteDb {
    pub fn new(settings: &DatabaseSettings) -> Result<Self, DbError> {
        let pipeline_url = settings
            .pipeline_url()
            .map_err(|e| DbError::InvalidConfiguration(format!("database url: {}", e)))?;

        Ok(Self {
            client: Client::new(),
            pipeline_url,
            auth_token: settings.auth_token.clone(),
            query_timeout: settings.query_timeout(),
            batch_timeout: settings.batch_timeout(),
        })
    }

    pub fn pipeline_url(&self) -> &Url {
        &self.pipeline_url
    }

    /// Execute a single statement.
    pub async fn execute(&self, statement: Statement) -> Result<ResultSet, DbError> {
        let mut results = self
            .send(std::slice::from_ref(&statement), self.query_timeout)
            .await?;
        results
            .pop()
            .ok_or_else(|| DbError::Protocol("pipeline returned no result".to_string()))
    }

    /// Execute several statements in one round trip. The first statement the
    /// remote engine rejects is reported as the error.
    pub async fn batch(&self, statements: &[Statement]) -> Result<Vec<ResultSet>, DbError> {
        if statements.is_empty() {
            return Ok(Vec::new());
        }
        self.send(statements, self.batch_timeout).await
    }

    async fn send(
        &self,
        statements: &[Statement],
        timeout: Duration,
    ) -> Result<Vec<ResultSet>, DbError> {
        let started = Instant::now();
        let request = PipelineRequest {
            requests: statements
                .iter()
                .map(|stmt| StreamRequest::Execute { stmt })
                .collect(),
        };

        tracing::debug!(
            statements = statements.len(),
            sql = %statements[0].sql(),
            "Sending pipeline request"
        );

        let response = self
            .client
            .post(self.pipeline_url.clone())
            .bearer_auth(self.auth_token.expose_secret())
            .json(&request)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e, started))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                target_url = %self.pipeline_url,
                status = status.as_u16(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Database rejected pipeline request"
            );
            return Err(DbError::RemoteExecution {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e, started))?;
        let parsed: PipelineResponse = serde_json::from_slice(&body)
            .map_err(|e| DbError::Protocol(format!("invalid pipeline response: {}", e)))?;
        let results = parsed
            .results
            .ok_or_else(|| DbError::Protocol("pipeline response has no results".to_string()))?;

        if results.len() != statements.len() {
            return Err(DbError::Protocol(format!(
                "expected {} results, got {}",
                statements.len(),
                results.len()
            )));
        }

        tracing::debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Pipeline request completed"
        );

        results
            .into_iter()
            .zip(statements)
            .map(|(result, statement)| match result {
                StreamResult::Ok { response } => response
                    .result
                    .map(WireResultSet::into_result_set)
                    .ok_or_else(|| DbError::Protocol("execute response has no result".to_string())),
                StreamResult::Error { error } => {
                    tracing::warn!(
                        sql = %statement.sql(),
                        code = ?error.code,
                        "Statement rejected: {}",
                        error.message
                    );
                    Err(DbError::Statement {
                        message: error.message,
                        code: error.code,
                    })
                }
            })
            .collect()
    }

    fn transport_error(&self, error: reqwest::Error, started: Instant) -> DbError {
        let target = self.pipeline_url.to_string();
        let elapsed_ms = started.elapsed().as_millis();
        if error.is_timeout() {
            tracing::error!(target_url = %target, elapsed_ms = elapsed_ms as u64, "Database request timed out");
            DbError::Timeout { target, elapsed_ms }
        } else {
            tracing::error!(target_url = %target, elapsed_ms = elapsed_ms as u64, "Database request failed: {}", error);
            DbError::Connection {
                target,
                source: error,
            }
        }
    }
}
