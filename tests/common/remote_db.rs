//! Builders for fake `/v2/pipeline` traffic.

use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Match, Mock, MockBuilder, Request, Respond, ResponseTemplate};

pub const PIPELINE_PATH: &str = "/v2/pipeline";

pub const USER_COLUMNS: [&str; 4] = ["id", "full_name", "email", "created_at"];
pub const DEVICE_COLUMNS: [&str; 6] = ["id", "device_id", "user_id", "model", "status", "registered_at"];
pub const METRIC_COLUMNS: [&str; 10] = [
    "id", "device_id", "user_id", "heart_rate", "spo2", "temperature", "steps", "calories",
    "activity", "timestamp",
];
pub const CHAT_COLUMNS: [&str; 3] = ["role", "message", "timestamp"];

pub fn integer(value: i64) -> Value {
    json!({"type": "integer", "value": value.to_string()})
}

pub fn float(value: f64) -> Value {
    json!({"type": "float", "value": value})
}

pub fn text(value: &str) -> Value {
    json!({"type": "text", "value": value})
}

pub fn null() -> Value {
    json!({"type": "null"})
}

pub fn result_set(columns: &[&str], rows: Vec<Vec<Value>>) -> Value {
    let cols: Vec<Value> = columns
        .iter()
        .map(|name| json!({"name": name, "decltype": null}))
        .collect();
    json!({
        "cols": cols,
        "rows": rows,
        "affected_row_count": 0,
        "last_insert_rowid": null,
        "replication_index": null
    })
}

pub fn ok_result(result: Value) -> Value {
    json!({"type": "ok", "response": {"type": "execute", "result": result}})
}

pub fn error_result(message: &str) -> Value {
    json!({"type": "error", "error": {"message": message, "code": "SQLITE_CONSTRAINT"}})
}

pub fn pipeline(results: Vec<Value>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "baton": null,
        "base_url": null,
        "results": results
    }))
}

/// A pipeline answer carrying one result set
pub fn rows(columns: &[&str], rows: Vec<Vec<Value>>) -> ResponseTemplate {
    pipeline(vec![ok_result(result_set(columns, rows))])
}

pub fn affected(count: u64) -> ResponseTemplate {
    let mut result = result_set(&[], vec![]);
    result["affected_row_count"] = json!(count);
    pipeline(vec![ok_result(result)])
}

pub fn statement_error(message: &str) -> ResponseTemplate {
    pipeline(vec![error_result(message)])
}

pub fn user_row(id: i64, full_name: &str, email: &str) -> Vec<Value> {
    vec![integer(id), text(full_name), text(email), text("2025-10-03 07:00:00")]
}

pub fn device_row(id: i64, device_id: &str, user_id: i64, model: &str) -> Vec<Value> {
    vec![
        integer(id),
        text(device_id),
        integer(user_id),
        text(model),
        text("active"),
        text("2025-10-03 07:00:00"),
    ]
}

pub fn metric_row(
    id: i64,
    device_id: &str,
    heart_rate: i64,
    spo2: i64,
    temperature: f64,
    timestamp: &str,
) -> Vec<Value> {
    vec![
        integer(id),
        text(device_id),
        integer(1),
        integer(heart_rate),
        integer(spo2),
        float(temperature),
        integer(4000),
        integer(180),
        text("Walking"),
        text(timestamp),
    ]
}

/// A pipeline POST, before any statement-specific matcher is added
pub fn pipeline_call() -> MockBuilder {
    Mock::given(method("POST")).and(path(PIPELINE_PATH))
}

/// `(sql, args)` of every statement in a pipeline request
pub fn statements(request: &Request) -> Vec<(String, Vec<Value>)> {
    let body: Value = match serde_json::from_slice(&request.body) {
        Ok(body) => body,
        Err(_) => return Vec::new(),
    };
    body["requests"]
        .as_array()
        .map(|requests| {
            requests
                .iter()
                .map(|r| {
                    let sql = r["stmt"]["sql"].as_str().unwrap_or_default().to_string();
                    let args = r["stmt"]["args"].as_array().cloned().unwrap_or_default();
                    (sql, args)
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Matches pipeline requests whose first statement contains the fragment
pub struct SqlContains(pub &'static str);

impl Match for SqlContains {
    fn matches(&self, request: &Request) -> bool {
        statements(request)
            .first()
            .map(|(sql, _)| sql.contains(self.0))
            .unwrap_or(false)
    }
}

/// Matches when positional argument `index` of the first statement equals `value`
pub struct ArgEquals(pub usize, pub Value);

impl Match for ArgEquals {
    fn matches(&self, request: &Request) -> bool {
        statements(request)
            .first()
            .and_then(|(_, args)| args.get(self.0).cloned())
            .map(|arg| arg == self.1)
            .unwrap_or(false)
    }
}

struct StoredDevice {
    id: i64,
    device_id: String,
    user_id: i64,
    model: String,
}

impl StoredDevice {
    fn row(&self) -> Vec<Value> {
        device_row(self.id, &self.device_id, self.user_id, &self.model)
    }
}

/// In-memory `devices` table honouring the unique `device_id` key.
#[derive(Clone, Default)]
pub struct FakeDeviceTable {
    devices: Arc<Mutex<Vec<StoredDevice>>>,
}

impl FakeDeviceTable {
    pub fn with_device(device_id: &str, user_id: i64, model: &str) -> Self {
        let table = Self::default();
        table.devices.lock().unwrap().push(StoredDevice {
            id: 1,
            device_id: device_id.to_string(),
            user_id,
            model: model.to_string(),
        });
        table
    }

    pub fn len(&self) -> usize {
        self.devices.lock().unwrap().len()
    }

    pub async fn mount(&self, server: &wiremock::MockServer) {
        pipeline_call()
            .and(SqlContains("devices"))
            .respond_with(self.clone())
            .mount(server)
            .await;
    }
}

fn text_arg(args: &[Value], index: usize) -> String {
    args.get(index)
        .and_then(|arg| arg["value"].as_str())
        .unwrap_or_default()
        .to_string()
}

impl Respond for FakeDeviceTable {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let statements = statements(request);
        let (sql, args) = match statements.first() {
            Some(statement) => statement,
            None => return ResponseTemplate::new(400),
        };
        let mut devices = self.devices.lock().unwrap();

        if sql.starts_with("SELECT") {
            let found: Vec<Vec<Value>> = if args.is_empty() {
                devices.iter().map(StoredDevice::row).collect()
            } else {
                let device_id = text_arg(args, 0);
                devices
                    .iter()
                    .filter(|d| d.device_id == device_id)
                    .map(StoredDevice::row)
                    .collect()
            };
            return rows(&DEVICE_COLUMNS, found);
        }

        if sql.starts_with("INSERT INTO devices") {
            let device_id = text_arg(args, 0);
            if devices.iter().any(|d| d.device_id == device_id) {
                // ON CONFLICT DO NOTHING: no row comes back
                return rows(&DEVICE_COLUMNS, vec![]);
            }
            let stored = StoredDevice {
                id: devices.len() as i64 + 1,
                device_id,
                user_id: text_arg(args, 1).parse().unwrap_or_default(),
                model: text_arg(args, 2),
            };
            let row = stored.row();
            devices.push(stored);
            return rows(&DEVICE_COLUMNS, vec![row]);
        }

        ResponseTemplate::new(400)
    }
}

/// Answers a health metric `INSERT ... RETURNING` with the bound arguments,
/// the way the database would.
pub struct EchoMetricInsert {
    pub id: i64,
}

impl Respond for EchoMetricInsert {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let statements = statements(request);
        let args = match statements.first() {
            Some((_, args)) if args.len() == 9 => args.clone(),
            _ => return ResponseTemplate::new(400),
        };
        let mut row = vec![integer(self.id)];
        row.extend(args);
        rows(&METRIC_COLUMNS, vec![row])
    }
}
