mod common;

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use symphony::{
    ConnectionsListener, DataFeedListener, ElementsActionPayload, FirehoseListener, Room,
    RoomServiceListener, SymBotClient, SymConfig, SymEvent, SymUser,
};

use common::{message_sent, BOT_ID};

fn offline_bot() -> SymBotClient {
    let config = SymConfig::new("https://pod.example.com", "https://agent.example.com");
    let bot = SymBotClient::new(config).expect("failed to create bot");
    bot.dispatcher().set_own_id(BOT_ID);
    bot
}

fn event(value: Value) -> SymEvent {
    serde_json::from_value(value).expect("invalid event fixture")
}

fn member_event(kind: &str, payload_key: &str, room: &str, user: i64) -> SymEvent {
    event(json!({
        "id": format!("{kind}-{room}-{user}"),
        "type": kind,
        "initiator": {"user": {"userId": 1}},
        "payload": {payload_key: {
            "stream": {"streamId": room, "streamType": "ROOM", "roomName": "ops"},
            "affectedUser": {"userId": user}
        }}
    }))
}

#[derive(Default)]
struct RoomLog {
    entries: Mutex<Vec<String>>,
}

impl RoomLog {
    fn push(&self, entry: String) {
        self.entries.lock().push(entry);
    }

    fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }
}

#[async_trait]
impl RoomServiceListener for RoomLog {
    async fn on_new_room(&self, room: &Room) {
        self.push(format!("new {}", room.stream_id));
    }

    async fn on_room_deactivated(&self, room: &Room) {
        self.push(format!("deactivated {} active={}", room.stream_id, room.active));
    }

    async fn on_room_reactivated(&self, room: &Room) {
        self.push(format!("reactivated {} active={}", room.stream_id, room.active));
    }

    async fn on_user_joined(&self, room: &Room, user: &SymUser) {
        self.push(format!("joined {} {}", room.stream_id, user.id));
    }

    async fn on_user_left(&self, room: &Room, user: &SymUser) {
        self.push(format!("left {} {}", room.stream_id, user.id));
    }

    async fn on_member_promoted(&self, room: &Room, user: &SymUser) {
        self.push(format!("promoted {} {}", room.stream_id, user.id));
    }
}

#[tokio::test]
async fn bot_membership_drives_room_registry() {
    let bot = offline_bot();
    let log = Arc::new(RoomLog::default());
    bot.room_service().add_listener(log.clone());
    let dispatcher = bot.dispatcher();

    let bot_joined = member_event("USERJOINEDROOM", "userJoinedRoom", "r1", BOT_ID);
    assert!(dispatcher.dispatch(&bot_joined).await);
    assert!(bot.room_service().room("r1").is_some());

    dispatcher
        .dispatch(&member_event("USERJOINEDROOM", "userJoinedRoom", "r1", 7))
        .await;
    dispatcher
        .dispatch(&member_event(
            "ROOMMEMBERPROMOTEDTOOWNER",
            "roomMemberPromotedToOwner",
            "r1",
            7,
        ))
        .await;
    dispatcher
        .dispatch(&event(json!({
            "id": "d1",
            "type": "ROOMDEACTIVATED",
            "payload": {"roomDeactivated": {"stream": {"streamId": "r1", "streamType": "ROOM"}}}
        })))
        .await;
    assert!(!bot.room_service().room("r1").unwrap().active);
    dispatcher
        .dispatch(&event(json!({
            "id": "d2",
            "type": "ROOMREACTIVATED",
            "payload": {"roomReactivated": {"stream": {"streamId": "r1", "streamType": "ROOM"}}}
        })))
        .await;

    dispatcher
        .dispatch(&member_event("USERLEFTROOM", "userLeftRoom", "r1", BOT_ID))
        .await;
    assert!(bot.room_service().room("r1").is_none());

    assert_eq!(
        log.entries(),
        vec![
            "new r1".to_string(),
            format!("joined r1 {BOT_ID}"),
            "joined r1 7".to_string(),
            "promoted r1 7".to_string(),
            "deactivated r1 active=false".to_string(),
            "reactivated r1 active=true".to_string(),
            format!("left r1 {BOT_ID}"),
        ]
    );
}

#[tokio::test]
async fn other_users_leaving_keeps_the_room() {
    let bot = offline_bot();
    let dispatcher = bot.dispatcher();
    dispatcher
        .dispatch(&member_event("USERJOINEDROOM", "userJoinedRoom", "r2", BOT_ID))
        .await;
    dispatcher
        .dispatch(&member_event("USERLEFTROOM", "userLeftRoom", "r2", 9))
        .await;
    assert!(bot.room_service().room("r2").is_some());
}

#[derive(Default)]
struct RawLog {
    events: Mutex<Vec<String>>,
    actions: Mutex<Vec<(Option<i64>, Option<String>)>>,
}

#[async_trait]
impl DataFeedListener for RawLog {
    async fn on_event(&self, event: &SymEvent) {
        self.events.lock().push(event.id.clone());
    }

    async fn on_elements_action(
        &self,
        initiator: Option<&SymUser>,
        action: &ElementsActionPayload,
    ) {
        self.actions
            .lock()
            .push((initiator.map(|u| u.id), action.form_id.clone()));
    }
}

#[async_trait]
impl FirehoseListener for RawLog {
    async fn on_event(&self, event: &SymEvent) {
        self.events.lock().push(event.id.clone());
    }
}

#[tokio::test]
async fn raw_listeners_see_filtered_events_and_form_actions() {
    let bot = offline_bot();
    let raw = Arc::new(RawLog::default());
    bot.add_datafeed_listener(raw.clone());
    let dispatcher = bot.dispatcher();

    assert!(!dispatcher.dispatch(&event(message_sent("own", BOT_ID, "s1", "IM", 1))).await);
    assert!(dispatcher.dispatch(&event(message_sent("m1", 7, "s1", "IM", 2))).await);
    assert!(!dispatcher.dispatch(&event(message_sent("m1", 7, "s1", "IM", 2))).await);
    assert!(
        dispatcher
            .dispatch(&event(json!({
                "id": "form-1",
                "type": "SYMPHONYELEMENTSACTION",
                "initiator": {"user": {"userId": 7}},
                "payload": {"symphonyElementsAction": {
                    "stream": {"streamId": "s1", "streamType": "IM"},
                    "formMessageId": "fm1",
                    "formId": "approve",
                    "formValues": {"action": "yes"}
                }}
            })))
            .await
    );

    assert_eq!(*raw.events.lock(), vec!["ev-m1", "form-1"]);
    assert_eq!(*raw.actions.lock(), vec![(Some(7), Some("approve".to_string()))]);
    assert_eq!(bot.chat_service().chat("s1").unwrap().remote_users.len(), 1);
}

#[tokio::test]
async fn firehose_listeners_skip_own_messages() {
    let bot = offline_bot();
    let raw = Arc::new(RawLog::default());
    bot.add_firehose_listener(raw.clone());
    let dispatcher = bot.dispatcher();

    let own = event(message_sent("own", BOT_ID, "s1", "ROOM", 1));
    assert!(!dispatcher.dispatch_firehose(&own).await);
    assert!(dispatcher.dispatch_firehose(&event(message_sent("m1", 3, "s9", "ROOM", 2))).await);
    assert_eq!(*raw.events.lock(), vec!["ev-m1"]);
}

#[derive(Default)]
struct ConnectionLog {
    requested: Mutex<Vec<i64>>,
    accepted: Mutex<Vec<i64>>,
}

#[async_trait]
impl ConnectionsListener for ConnectionLog {
    async fn on_connection_requested(&self, user_id: i64) {
        self.requested.lock().push(user_id);
    }

    async fn on_connection_accepted(&self, user_id: i64) {
        self.accepted.lock().push(user_id);
    }
}

#[tokio::test]
async fn connection_requests_are_announced_once() {
    let bot = offline_bot();
    let log = Arc::new(ConnectionLog::default());
    bot.connections_service().add_listener(log.clone());
    let dispatcher = bot.dispatcher();

    let request = |id: &str, from: i64, to: i64| {
        event(json!({
            "id": id,
            "type": "CONNECTIONREQUESTED",
            "initiator": {"user": {"userId": from}},
            "payload": {"connectionRequested": {"toUser": {"userId": to}}}
        }))
    };
    dispatcher.dispatch(&request("c1", 5, BOT_ID)).await;
    dispatcher.dispatch(&request("c2", 5, BOT_ID)).await;
    // Outgoing request made by the bot.
    dispatcher.dispatch(&request("c3", BOT_ID, 6)).await;
    dispatcher
        .dispatch(&event(json!({
            "id": "c4",
            "type": "CONNECTIONACCEPTED",
            "payload": {"connectionAccepted": {"fromUser": {"userId": 6}}}
        })))
        .await;

    assert_eq!(*log.requested.lock(), vec![5]);
    assert_eq!(*log.accepted.lock(), vec![6]);
}

#[tokio::test]
async fn recovered_messages_share_the_dedup_window() {
    let bot = offline_bot();
    let dispatcher = bot.dispatcher();
    let original = event(message_sent("m1", 7, "s1", "IM", 10));
    let message = original.payload.message_sent.clone().unwrap().message;

    assert!(dispatcher.dispatch(&original).await);
    assert!(!dispatcher.dispatch_recovered(message.clone()).await);

    let mut later = message;
    later.message_id = "m2".to_string();
    later.timestamp = 20;
    assert!(dispatcher.dispatch_recovered(later).await);
    assert_eq!(dispatcher.last_message_ts(), 20);
}

#[tokio::test]
async fn bot_is_not_a_remote_user_of_its_chats() {
    let bot = offline_bot();
    let dispatcher = bot.dispatcher();
    dispatcher
        .dispatch(&event(json!({
            "id": "im-created",
            "type": "INSTANTMESSAGECREATED",
            "initiator": {"user": {"userId": 7}},
            "payload": {"instantMessageCreated": {"stream": {
                "streamId": "im-9",
                "streamType": "IM",
                "members": [{"userId": BOT_ID}, {"userId": 7}]
            }}}
        })))
        .await;

    let chat = bot.chat_service().chat("im-9").unwrap();
    let ids: Vec<i64> = chat.remote_users.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![7]);
    assert!(bot.chat_service().chats_for_user(BOT_ID).is_empty());
    assert_eq!(bot.chat_service().chats_for_user(7).len(), 1);
}

#[tokio::test]
async fn own_messages_do_not_add_the_bot_when_not_filtered() {
    let mut config = SymConfig::new("https://pod.example.com", "https://agent.example.com");
    config.workers.ignore_own_messages = false;
    let bot = SymBotClient::new(config).expect("failed to create bot");
    bot.dispatcher().set_own_id(BOT_ID);

    let dispatcher = bot.dispatcher();
    assert!(dispatcher.dispatch(&event(message_sent("own", BOT_ID, "im-3", "IM", 1))).await);
    assert!(dispatcher.dispatch(&event(message_sent("m2", 7, "im-3", "IM", 2))).await);

    let chat = bot.chat_service().chat("im-3").unwrap();
    assert_eq!(chat.remote_users.iter().map(|u| u.id).collect::<Vec<_>>(), vec![7]);
    assert_eq!(chat.last_message_ts, 2);
}

#[tokio::test]
async fn every_path_that_tracks_a_room_announces_it_once() {
    let bot = offline_bot();
    let log = Arc::new(RoomLog::default());
    bot.room_service().add_listener(log.clone());
    let dispatcher = bot.dispatcher();

    dispatcher
        .dispatch(&member_event("USERJOINEDROOM", "userJoinedRoom", "r5", 7))
        .await;
    dispatcher
        .dispatch(&member_event("USERJOINEDROOM", "userJoinedRoom", "r5", 8))
        .await;
    dispatcher
        .dispatch(&member_event(
            "ROOMMEMBERPROMOTEDTOOWNER",
            "roomMemberPromotedToOwner",
            "r6",
            7,
        ))
        .await;
    dispatcher
        .dispatch(&event(json!({
            "id": "d7",
            "type": "ROOMDEACTIVATED",
            "payload": {"roomDeactivated": {"stream": {"streamId": "r7", "streamType": "ROOM"}}}
        })))
        .await;

    assert_eq!(
        log.entries(),
        vec![
            "new r5".to_string(),
            "joined r5 7".to_string(),
            "joined r5 8".to_string(),
            "new r6".to_string(),
            "promoted r6 7".to_string(),
            "new r7".to_string(),
            "deactivated r7 active=false".to_string(),
        ]
    );
}
