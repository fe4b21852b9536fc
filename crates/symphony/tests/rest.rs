mod common;

use std::time::{Duration, Instant};

use serde_json::json;
use symphony::{
    ConnectionStatus, OutboundMessage, PresenceCategory, StreamType, SymBotClient,
    SymRoomAttributes,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{config, message, mount_auth};

#[tokio::test]
async fn calls_carry_both_tokens() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    let bot = SymBotClient::new(config(&server)).expect("failed to create bot");

    Mock::given(method("GET"))
        .and(path("/pod/v2/streams/s1/info"))
        .and(header("sessionToken", "st-1"))
        .and(header("keyManagerToken", "km-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "s1",
            "crossPod": false,
            "active": true,
            "streamType": {"type": "IM"},
            "streamAttributes": {"members": [42, 7]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let info = bot.streams().stream_info("s1").await.expect("stream_info failed");
    assert_eq!(info.stream_type.stream_type, StreamType::Im);
    assert_eq!(info.stream_attributes.unwrap().members, vec![42, 7]);
}

#[tokio::test]
async fn rejected_session_is_refreshed_once() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    let bot = SymBotClient::new(config(&server)).expect("failed to create bot");

    Mock::given(method("GET"))
        .and(path("/pod/v2/sessioninfo"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pod/v2/sessioninfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42})))
        .expect(1)
        .mount(&server)
        .await;

    let session = bot.users().session_user().await.expect("session_user failed");
    assert_eq!(session.id, 42);
}

#[tokio::test]
async fn persistent_rejection_surfaces_as_auth_error() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    let bot = SymBotClient::new(config(&server)).expect("failed to create bot");

    Mock::given(method("GET"))
        .and(path("/pod/v2/sessioninfo"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": 401,
            "message": "Invalid session"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let err = bot.users().session_user().await.unwrap_err();
    assert!(err.is_auth_rejection());
    assert!(err.to_string().contains("Invalid session"));
}

#[tokio::test]
async fn send_message_posts_multipart_to_agent() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    let bot = SymBotClient::new(config(&server)).expect("failed to create bot");

    Mock::given(method("POST"))
        .and(path("/agent/v4/stream/s1/message/create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(message("m1", 42, "s1", "IM", 5)))
        .expect(1)
        .mount(&server)
        .await;

    let sent = bot
        .messages()
        .send_message("s1", &OutboundMessage::text("hello").with_data("{}"))
        .await
        .expect("send_message failed");
    assert_eq!(sent.message_id, "m1");

    let requests = server.received_requests().await.unwrap();
    let create = requests
        .iter()
        .find(|r| r.url.path() == "/agent/v4/stream/s1/message/create")
        .unwrap();
    let body = String::from_utf8_lossy(&create.body);
    assert!(body.contains("name=\"message\""));
    assert!(body.contains("<messageML>hello</messageML>"));
    assert!(body.contains("name=\"data\""));
}

#[tokio::test]
async fn attachments_are_base64_decoded() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    let bot = SymBotClient::new(config(&server)).expect("failed to create bot");

    Mock::given(method("GET"))
        .and(path("/agent/v1/stream/s1/attachment"))
        .and(query_param("fileId", "f1"))
        .and(query_param("messageId", "m1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("aGVsbG8="))
        .expect(1)
        .mount(&server)
        .await;

    let bytes = bot
        .messages()
        .get_attachment("s1", "f1", "m1")
        .await
        .expect("get_attachment failed");
    assert_eq!(bytes, b"hello");
}

#[tokio::test]
async fn user_lookups_are_cached() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    let bot = SymBotClient::new(config(&server)).expect("failed to create bot");

    Mock::given(method("GET"))
        .and(path("/pod/v3/users"))
        .and(query_param("uid", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{"id": 7, "emailAddress": "Alice@Example.com", "displayName": "Alice"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let first = bot.users().user_by_id(7, true).await.expect("lookup failed");
    let second = bot.users().user_by_id(7, true).await.expect("lookup failed");
    assert_eq!(first, second);

    // Same user by email comes from the cache too.
    let by_email = bot
        .users()
        .user_by_email("alice@example.com", true)
        .await
        .expect("email lookup failed");
    assert_eq!(by_email.id, 7);
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    let bot = SymBotClient::new(config(&server)).expect("failed to create bot");

    Mock::given(method("GET"))
        .and(path("/pod/v3/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"users": []})))
        .mount(&server)
        .await;

    let err = bot.users().user_by_id(99, false).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn user_streams_follows_pages() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    let bot = SymBotClient::new(config(&server)).expect("failed to create bot");

    let full_page: Vec<_> = (0..100)
        .map(|i| json!({"id": format!("r{i}"), "streamType": {"type": "ROOM"}}))
        .collect();
    Mock::given(method("POST"))
        .and(path("/pod/v1/streams/list"))
        .and(query_param("skip", "0"))
        .and(body_json(json!({
            "streamTypes": [{"type": "ROOM"}],
            "includeInactiveStreams": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(full_page)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/pod/v1/streams/list"))
        .and(query_param("skip", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "last", "streamType": {"type": "ROOM"}, "roomAttributes": {"name": "ops"}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let streams = bot
        .streams()
        .user_streams(&[StreamType::Room], false)
        .await
        .expect("user_streams failed");
    assert_eq!(streams.len(), 101);
    assert_eq!(streams[100].room_attributes.as_ref().unwrap().name.as_deref(), Some("ops"));
}

#[tokio::test]
async fn room_lifecycle_endpoints() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    let bot = SymBotClient::new(config(&server)).expect("failed to create bot");

    let detail = json!({
        "roomAttributes": {"name": "ops", "description": "operations"},
        "roomSystemInfo": {"id": "r1", "active": true, "createdByUserId": 42}
    });
    Mock::given(method("POST"))
        .and(path("/pod/v3/room/create"))
        .and(body_json(json!({"name": "ops"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/pod/v1/room/r1/membership/add"))
        .and(body_json(json!({"id": 7})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"format": "TEXT", "message": "Member added"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let room = bot
        .room_service()
        .create_room(&SymRoomAttributes::named("ops"))
        .await
        .expect("create_room failed");
    assert_eq!(room.stream_id, "r1");
    assert_eq!(room.name.as_deref(), Some("ops"));
    assert!(bot.room_service().room("r1").is_some());

    bot.streams().add_member("r1", 7).await.expect("add_member failed");
}

#[tokio::test]
async fn presence_and_connections_endpoints() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    let bot = SymBotClient::new(config(&server)).expect("failed to create bot");

    Mock::given(method("POST"))
        .and(path("/pod/v2/user/presence"))
        .and(body_json(json!({"category": "BUSY"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"category": "BUSY", "userId": 42})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pod/v1/connection/list"))
        .and(query_param("status", "PENDING_INCOMING"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"userId": 5, "status": "PENDING_INCOMING", "firstRequestedAt": 1}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let presence = bot
        .presence()
        .set_presence(PresenceCategory::Busy)
        .await
        .expect("set_presence failed");
    assert_eq!(presence.category, PresenceCategory::Busy);

    let pending = bot
        .connections()
        .pending_connections()
        .await
        .expect("pending_connections failed");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].status, ConnectionStatus::PendingIncoming);
}

#[tokio::test]
async fn empty_feed_read_is_an_empty_batch() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    let bot = SymBotClient::new(config(&server)).expect("failed to create bot");

    Mock::given(method("POST"))
        .and(path("/agent/v4/datafeed/create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "df-1"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/agent/v4/datafeed/df-1/read"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let id = bot.feeds().create_datafeed().await.expect("create failed");
    assert_eq!(id, "df-1");
    let events = bot.feeds().read_datafeed(&id).await.expect("read failed");
    assert!(events.is_empty());
}

#[tokio::test]
async fn signal_subscribe_passes_pushed_flag() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    let bot = SymBotClient::new(config(&server)).expect("failed to create bot");

    Mock::given(method("POST"))
        .and(path("/agent/v1/signals/sig-1/subscribe"))
        .and(query_param("pushed", "true"))
        .and(body_json(json!([7, 8])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "requestedSubscription": 2,
            "successfulSubscription": 2,
            "failedSubscription": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = bot
        .signals()
        .subscribe("sig-1", &[7, 8], true)
        .await
        .expect("subscribe failed");
    assert_eq!(result.successful_subscription, 2);
}

#[tokio::test]
async fn server_errors_are_retried_with_backoff() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    let bot = SymBotClient::new(config(&server)).expect("failed to create bot");

    Mock::given(method("GET"))
        .and(path("/pod/v2/sessioninfo"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pod/v2/sessioninfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42})))
        .expect(1)
        .mount(&server)
        .await;

    let started = Instant::now();
    let session = bot.users().session_user().await.expect("session_user failed");
    assert_eq!(session.id, 42);
    // 200 ms then 400 ms before the third attempt.
    assert!(started.elapsed() >= Duration::from_millis(600));
}

#[tokio::test]
async fn server_errors_give_up_after_three_retries() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    let bot = SymBotClient::new(config(&server)).expect("failed to create bot");

    Mock::given(method("GET"))
        .and(path("/pod/v2/sessioninfo"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({
            "code": 502,
            "message": "Bad gateway"
        })))
        .expect(4)
        .mount(&server)
        .await;

    let started = Instant::now();
    let err = bot.users().session_user().await.unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert!(err.is_retryable());
    assert!(started.elapsed() >= Duration::from_millis(1_400));
}
