use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

mod common;
use common::remote_db::{pipeline_call, rows, text, ArgEquals, SqlContains, CHAT_COLUMNS};
use common::utils::{spawn_app, spawn_app_with, TestApp, LLM_PATH, TEST_LLM_KEY};

async fn expect_transcript_insert(test_app: &TestApp, role: &str, times: u64) {
    pipeline_call()
        .and(SqlContains("INSERT INTO chat_messages"))
        .and(ArgEquals(0, text("s1")))
        .and(ArgEquals(1, text(role)))
        .respond_with(rows(&[], vec![]))
        .expect(times)
        .mount(&test_app.db_server)
        .await;
}

#[tokio::test]
async fn chat_reply_is_cleaned_and_stored() {
    let test_app = spawn_app().await;
    let client = Client::new();

    expect_transcript_insert(&test_app, "user", 1).await;
    expect_transcript_insert(&test_app, "assistant", 1).await;

    Mock::given(method("POST"))
        .and(path(LLM_PATH))
        .and(header("X-goog-api-key", TEST_LLM_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"parts": [{"text": "  **Drink water** and rest.\n"}]}
            }]
        })))
        .expect(1)
        .mount(&test_app.llm_server)
        .await;

    let response = client
        .post(&format!("{}/chat", &test_app.address))
        .json(&json!({"message": "I have a headache", "session_id": "s1"}))
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.expect("Cannot turn into a json.");
    assert_eq!(body["success"], true);
    assert_eq!(body["response"], "Drink water and rest.");
    assert_eq!(body["session_id"], "s1");
    assert!(body["timestamp"].is_string());

    // The prompt wraps the user's message
    let requests = test_app.llm_server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = sent["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("I have a headache"));
    assert_eq!(sent["generationConfig"]["maxOutputTokens"], 500);
}

#[tokio::test]
async fn upstream_failure_keeps_only_the_user_turn() {
    let test_app = spawn_app().await;
    let client = Client::new();

    expect_transcript_insert(&test_app, "user", 1).await;
    expect_transcript_insert(&test_app, "assistant", 0).await;

    Mock::given(method("POST"))
        .and(path(LLM_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .mount(&test_app.llm_server)
        .await;

    let response = client
        .post(&format!("{}/chat", &test_app.address))
        .json(&json!({"message": "I have a headache", "session_id": "s1"}))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 502);
    let body: serde_json::Value = response.json().await.expect("Cannot turn into a json.");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "AI API Error: 500");
    assert_eq!(body["upstream_status"], 500);
}

#[tokio::test]
async fn missing_api_key_is_503() {
    let test_app = spawn_app_with(|config| {
        config.chat.api_key = None;
    })
    .await;
    let client = Client::new();

    pipeline_call()
        .and(SqlContains("INSERT INTO chat_messages"))
        .respond_with(rows(&[], vec![]))
        .mount(&test_app.db_server)
        .await;

    let response = client
        .post(&format!("{}/chat", &test_app.address))
        .json(&json!({"message": "Is 72 BPM normal?"}))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 503);
    let body: serde_json::Value = response.json().await.expect("Cannot turn into a json.");
    assert_eq!(body, json!({"success": false, "error": "AI service not available"}));
    assert!(test_app.llm_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_message_is_rejected() {
    let test_app = spawn_app().await;
    let client = Client::new();

    let response = client
        .post(&format!("{}/chat", &test_app.address))
        .json(&json!({"message": "   "}))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(test_app.db_request_count().await, 0);
}

#[tokio::test]
async fn padded_session_id_is_rejected() {
    let test_app = spawn_app().await;
    let client = Client::new();

    let response = client
        .post(&format!("{}/chat", &test_app.address))
        .json(&json!({"message": "hi", "session_id": "s1 "}))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.expect("Cannot turn into a json.");
    assert_eq!(
        body["errors"],
        json!(["session_id cannot have leading or trailing whitespace"])
    );
    assert_eq!(test_app.db_request_count().await, 0);
    assert!(test_app.llm_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn history_is_returned_oldest_first() {
    let test_app = spawn_app().await;
    let client = Client::new();

    pipeline_call()
        .and(SqlContains("FROM chat_messages"))
        .and(ArgEquals(0, text("s1")))
        .respond_with(rows(&CHAT_COLUMNS, vec![
            vec![text("user"), text("I have a headache"), text("2025-10-03T07:00:00.000Z")],
            vec![text("assistant"), text("Drink water and rest."), text("2025-10-03T07:00:01.000Z")],
        ]))
        .mount(&test_app.db_server)
        .await;
    pipeline_call()
        .and(SqlContains("FROM chat_messages"))
        .and(ArgEquals(0, text("unknown")))
        .respond_with(rows(&CHAT_COLUMNS, vec![]))
        .mount(&test_app.db_server)
        .await;

    let body: serde_json::Value = client
        .get(&format!("{}/chat/s1", &test_app.address))
        .send()
        .await
        .expect("Failed to execute request.")
        .json()
        .await
        .expect("Cannot turn into a json.");
    assert_eq!(body["message_count"], 2);
    assert_eq!(body["history"][0]["role"], "user");
    assert_eq!(body["history"][1]["message"], "Drink water and rest.");

    let empty = client
        .get(&format!("{}/chat/unknown", &test_app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert!(empty.status().is_success());
    let empty: serde_json::Value = empty.json().await.expect("Cannot turn into a json.");
    assert_eq!(empty["history"], json!([]));
    assert_eq!(empty["message_count"], 0);
}
