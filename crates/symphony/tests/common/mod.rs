#![allow(dead_code)]

use std::time::Duration;

use serde_json::{json, Value};
use symphony::{SymConfig, WorkerSettings};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const BOT_ID: i64 = 42;

/// Config pointing every endpoint at the mock server, with fast retries.
pub fn config(server: &MockServer) -> SymConfig {
    SymConfig::new(server.uri(), server.uri()).with_workers(WorkerSettings {
        datafeed_retry_delay_ms: 50,
        presence_poll_interval_ms: 50,
        connections_poll_interval_ms: 50,
        room_sync_interval_ms: 50,
        ..WorkerSettings::default()
    })
}

pub async fn mount_auth(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/sessionauth/v1/authenticate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"name": "sessionToken", "token": "st-1"})),
        )
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/keyauth/v1/authenticate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"name": "keyManagerToken", "token": "km-1"})),
        )
        .mount(server)
        .await;
}

/// Auth, session info and logout: everything `connect` and `shutdown` call.
pub async fn mount_session(server: &MockServer) {
    mount_auth(server).await;
    Mock::given(method("GET"))
        .and(path("/pod/v2/sessioninfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": BOT_ID,
            "username": "echo-bot",
            "displayName": "Echo Bot"
        })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/sessionauth/v1/logout"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

pub fn message(id: &str, author: i64, stream_id: &str, stream_type: &str, ts: i64) -> Value {
    json!({
        "messageId": id,
        "timestamp": ts,
        "message": format!("<div data-format=\"PresentationML\">text {id}</div>"),
        "user": {"userId": author, "displayName": format!("user {author}")},
        "stream": {"streamId": stream_id, "streamType": stream_type}
    })
}

pub fn message_sent(id: &str, author: i64, stream_id: &str, stream_type: &str, ts: i64) -> Value {
    json!({
        "id": format!("ev-{id}"),
        "messageId": id,
        "timestamp": ts,
        "type": "MESSAGESENT",
        "initiator": {"user": {"userId": author}},
        "payload": {"messageSent": {"message": message(id, author, stream_id, stream_type, ts)}}
    })
}

/// Poll `check` until it holds or five seconds pass.
pub async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}
