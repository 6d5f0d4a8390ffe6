//! Common test utilities for integration tests.

#![allow(dead_code)]

use aiengine_client::{EngineClient, Session, SessionOptions};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Session id handed out by [`create_session`].
pub const SESSION_ID: &str = "s1";

/// Function group used by [`create_session`].
pub const GROUP_ID: &str = "g1";

/// Path of the poll endpoint for [`SESSION_ID`].
pub const POLL_PATH: &str = "/v1beta1/engine/chat/sessions/s1/new-messages";

/// Path of the submit endpoint for [`SESSION_ID`].
pub const SUBMIT_PATH: &str = "/v1beta1/engine/chat/sessions/s1/submit";

/// Build a client pointed at a mock server.
pub fn client_for(server: &MockServer) -> EngineClient {
    EngineClient::builder()
        .base_url(server.uri())
        .api_key("test-key")
        .build()
        .expect("client builds")
}

/// Mount the create-session endpoint and create a session through it.
pub async fn create_session(server: &MockServer) -> Session {
    Mock::given(method("POST"))
        .and(path("/v1beta1/engine/chat/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"session_id": SESSION_ID})))
        .mount(server)
        .await;

    client_for(server)
        .sessions()
        .create(GROUP_ID, SessionOptions::default())
        .await
        .expect("session created")
}

/// Accept every submit with an empty JSON object.
pub async fn accept_submits(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(SUBMIT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(server)
        .await;
}

/// Wrap raw messages the way the poll endpoint does: each one JSON-encoded as a string.
pub fn poll_body(messages: &[Value]) -> Value {
    let encoded: Vec<String> = messages.iter().map(Value::to_string).collect();
    json!({ "agent_response": encoded })
}

pub fn agent_message(id: &str, text: &str) -> Value {
    json!({
        "message_id": id,
        "session_id": SESSION_ID,
        "timestamp": "2024-05-01T10:00:00Z",
        "type": "agent_message",
        "score": 0,
        "agent_message": text
    })
}

pub fn agent_info(id: &str, text: &str) -> Value {
    json!({
        "message_id": id,
        "timestamp": "2024-05-01T10:00:00Z",
        "type": "agent_info",
        "agent_info": text
    })
}

pub fn task_list(id: &str) -> Value {
    json!({
        "message_id": id,
        "timestamp": "2024-05-01T10:00:00Z",
        "type": "agent_json",
        "agent_json": {
            "type": "task_list",
            "text": "Which task?",
            "options": [{"key": 1, "value": "Book flight"}, {"key": 2, "value": "Book hotel"}]
        }
    })
}

pub fn confirmation(id: &str) -> Value {
    json!({
        "message_id": id,
        "timestamp": "2024-05-01T10:00:00Z",
        "type": "agent_json",
        "agent_json": {
            "type": "CONFIRMATION",
            "text": "Book the 10:00 flight?",
            "context_json": {"digest": "model:flight", "args": {"to": "Warsaw"}}
        }
    })
}

pub fn stop(id: &str) -> Value {
    json!({
        "message_id": id,
        "timestamp": "2024-05-01T10:05:00Z",
        "type": "stop"
    })
}
