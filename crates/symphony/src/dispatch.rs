//! Event classification and fan-out.
//!
//! Workers hand every event they read to the [`Dispatcher`], which turns it
//! into a [`FeedEvent`], drops the bot's own messages and repeats, notifies
//! raw feed listeners and then routes it to the chat, room and connection
//! services.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, RwLock};

use crate::dedup::DedupWindow;
use crate::listeners::{DataFeedListener, FirehoseListener};
use crate::services::{ChatService, ConnectionsService, RoomService};
use crate::types::*;

/// A feed event reduced to what the services act on.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    ChatMessage(SymMessage),
    RoomMessage(SymMessage),
    ChatCreated(SymStream),
    RoomCreated {
        stream: SymStream,
        properties: Option<SymRoomProperties>,
    },
    RoomUpdated {
        stream: SymStream,
        properties: Option<SymRoomProperties>,
    },
    RoomDeactivated(SymStream),
    RoomReactivated(SymStream),
    UserJoinedRoom {
        stream: SymStream,
        user: SymUser,
    },
    UserLeftRoom {
        stream: SymStream,
        user: SymUser,
    },
    MemberPromoted {
        stream: SymStream,
        user: SymUser,
    },
    MemberDemoted {
        stream: SymStream,
        user: SymUser,
    },
    JoinRequested {
        stream: SymStream,
        requester: Option<SymUser>,
        users: Vec<SymUser>,
    },
    ConnectionRequested {
        from: Option<UserId>,
        to: UserId,
    },
    ConnectionAccepted {
        user: UserId,
    },
    ElementsAction {
        initiator: Option<SymUser>,
        action: ElementsActionPayload,
    },
    MessageSuppressed {
        message_id: String,
        stream: Option<SymStream>,
    },
    /// Known or unknown type with nothing to route.
    Unhandled(EventType),
}

impl FeedEvent {
    /// The message carried by message events.
    pub fn message(&self) -> Option<&SymMessage> {
        match self {
            Self::ChatMessage(m) | Self::RoomMessage(m) => Some(m),
            _ => None,
        }
    }
}

/// Classify an event. `own_id` is the bot's user id when its own messages
/// should be dropped; such messages, and events whose payload is missing,
/// yield `None`.
pub fn classify(event: &SymEvent, own_id: Option<UserId>) -> Option<FeedEvent> {
    let payload = &event.payload;
    let classified = match event.event_type {
        EventType::MessageSent => {
            message_event(event.event_type, &payload.message_sent.as_ref()?.message)
        }
        EventType::SharedPost => {
            message_event(event.event_type, &payload.shared_post.as_ref()?.message)
        }
        EventType::InstantMessageCreated => {
            FeedEvent::ChatCreated(payload.instant_message_created.as_ref()?.stream.clone())
        }
        EventType::RoomCreated => {
            let p = payload.room_created.as_ref()?;
            FeedEvent::RoomCreated {
                stream: p.stream.clone(),
                properties: p.room_properties.clone(),
            }
        }
        EventType::RoomUpdated => {
            let p = payload.room_updated.as_ref()?;
            FeedEvent::RoomUpdated {
                stream: p.stream.clone(),
                properties: p.new_room_properties.clone(),
            }
        }
        EventType::RoomDeactivated => {
            FeedEvent::RoomDeactivated(payload.room_deactivated.as_ref()?.stream.clone())
        }
        EventType::RoomReactivated => {
            FeedEvent::RoomReactivated(payload.room_reactivated.as_ref()?.stream.clone())
        }
        EventType::UserJoinedRoom => {
            let p = payload.user_joined_room.as_ref()?;
            FeedEvent::UserJoinedRoom {
                stream: p.stream.clone(),
                user: p.affected_user.clone(),
            }
        }
        EventType::UserLeftRoom => {
            let p = payload.user_left_room.as_ref()?;
            FeedEvent::UserLeftRoom {
                stream: p.stream.clone(),
                user: p.affected_user.clone(),
            }
        }
        EventType::RoomMemberPromotedToOwner => {
            let p = payload.room_member_promoted_to_owner.as_ref()?;
            FeedEvent::MemberPromoted {
                stream: p.stream.clone(),
                user: p.affected_user.clone(),
            }
        }
        EventType::RoomMemberDemotedFromOwner => {
            let p = payload.room_member_demoted_from_owner.as_ref()?;
            FeedEvent::MemberDemoted {
                stream: p.stream.clone(),
                user: p.affected_user.clone(),
            }
        }
        EventType::UserRequestedToJoinRoom => {
            let p = payload.user_requested_to_join_room.as_ref()?;
            FeedEvent::JoinRequested {
                stream: p.stream.clone(),
                requester: event.initiator.user.clone(),
                users: p.affected_users.clone(),
            }
        }
        EventType::ConnectionRequested => FeedEvent::ConnectionRequested {
            from: event.initiator_id(),
            to: payload.connection_requested.as_ref()?.to_user.id,
        },
        EventType::ConnectionAccepted => FeedEvent::ConnectionAccepted {
            user: payload.connection_accepted.as_ref()?.from_user.id,
        },
        EventType::SymphonyElementsAction => FeedEvent::ElementsAction {
            initiator: event.initiator.user.clone(),
            action: payload.symphony_elements_action.clone()?,
        },
        EventType::MessageSuppressed => {
            let p = payload.message_suppressed.as_ref()?;
            FeedEvent::MessageSuppressed {
                message_id: p.message_id.clone(),
                stream: p.stream.clone(),
            }
        }
        EventType::Unknown => FeedEvent::Unhandled(EventType::Unknown),
    };

    if let (Some(own), Some(message)) = (own_id, classified.message()) {
        if message.is_from(own) {
            return None;
        }
    }
    Some(classified)
}

fn message_event(event_type: EventType, message: &SymMessage) -> FeedEvent {
    match message.stream.stream_type {
        StreamType::Im | StreamType::Mim => FeedEvent::ChatMessage(message.clone()),
        StreamType::Room => FeedEvent::RoomMessage(message.clone()),
        StreamType::Post | StreamType::Unknown => FeedEvent::Unhandled(event_type),
    }
}

/// Routes feed events to listeners and services.
pub struct Dispatcher {
    own_id: RwLock<Option<UserId>>,
    ignore_own: bool,
    dedup: Mutex<DedupWindow>,
    last_message_ts: AtomicI64,
    chats: Arc<ChatService>,
    rooms: Arc<RoomService>,
    connections: Arc<ConnectionsService>,
    datafeed_listeners: RwLock<Vec<Arc<dyn DataFeedListener>>>,
    firehose_listeners: RwLock<Vec<Arc<dyn FirehoseListener>>>,
}

impl Dispatcher {
    pub fn new(
        chats: Arc<ChatService>,
        rooms: Arc<RoomService>,
        connections: Arc<ConnectionsService>,
        dedup: DedupWindow,
        ignore_own: bool,
    ) -> Self {
        Self {
            own_id: RwLock::new(None),
            ignore_own,
            dedup: Mutex::new(dedup),
            last_message_ts: AtomicI64::new(0),
            chats,
            rooms,
            connections,
            datafeed_listeners: RwLock::new(Vec::new()),
            firehose_listeners: RwLock::new(Vec::new()),
        }
    }

    /// Set the bot's own user id, used for self-filtering and for noticing
    /// the bot joining or leaving rooms.
    pub fn set_own_id(&self, user_id: UserId) {
        *self.own_id.write() = Some(user_id);
        self.chats.set_own_id(user_id);
    }

    pub fn own_id(&self) -> Option<UserId> {
        *self.own_id.read()
    }

    pub fn add_datafeed_listener(&self, listener: Arc<dyn DataFeedListener>) {
        self.datafeed_listeners.write().push(listener);
    }

    pub fn remove_datafeed_listener(&self, listener: &Arc<dyn DataFeedListener>) -> bool {
        let mut listeners = self.datafeed_listeners.write();
        let before = listeners.len();
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
        listeners.len() != before
    }

    pub fn add_firehose_listener(&self, listener: Arc<dyn FirehoseListener>) {
        self.firehose_listeners.write().push(listener);
    }

    pub fn remove_firehose_listener(&self, listener: &Arc<dyn FirehoseListener>) -> bool {
        let mut listeners = self.firehose_listeners.write();
        let before = listeners.len();
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
        listeners.len() != before
    }

    /// Timestamp of the newest message delivered so far, 0 before the first.
    pub fn last_message_ts(&self) -> i64 {
        self.last_message_ts.load(Ordering::Acquire)
    }

    /// Dedup window length in milliseconds.
    pub(crate) fn dedup_window_ms(&self) -> i64 {
        self.dedup.lock().window().as_millis() as i64
    }

    fn filter_id(&self) -> Option<UserId> {
        if self.ignore_own {
            self.own_id()
        } else {
            None
        }
    }

    /// Deliver one datafeed event. Returns false when it was filtered out.
    pub async fn dispatch(&self, event: &SymEvent) -> bool {
        let Some(classified) = classify(event, self.filter_id()) else {
            tracing::trace!(target = "symphony::dispatch", event_id = %event.id, "event filtered");
            return false;
        };

        if let Some(message) = classified.message() {
            if !self
                .dedup
                .lock()
                .insert_if_new(&message.message_id, Instant::now())
            {
                tracing::debug!(
                    target = "symphony::dispatch",
                    message_id = %message.message_id,
                    "duplicate message dropped"
                );
                return false;
            }
            self.last_message_ts
                .fetch_max(message.timestamp, Ordering::AcqRel);
        }

        let listeners = self.datafeed_listeners.read().clone();
        for listener in &listeners {
            listener.on_event(event).await;
        }
        if let FeedEvent::ElementsAction { initiator, action } = &classified {
            for listener in &listeners {
                listener.on_elements_action(initiator.as_ref(), action).await;
            }
        }

        self.route(classified).await;
        true
    }

    /// Deliver a message fetched outside the feed (recovery reads). It goes
    /// through the same filtering and dedup as a MESSAGESENT event.
    pub async fn dispatch_recovered(&self, message: SymMessage) -> bool {
        let event = SymEvent {
            id: format!("recovered-{}", message.message_id),
            message_id: Some(message.message_id.clone()),
            timestamp: message.timestamp,
            event_type: EventType::MessageSent,
            initiator: SymInitiator {
                user: Some(message.user.clone()),
            },
            payload: SymEventPayload {
                message_sent: Some(MessagePayload { message }),
                ..Default::default()
            },
        };
        self.dispatch(&event).await
    }

    /// Deliver one firehose event to firehose listeners.
    pub async fn dispatch_firehose(&self, event: &SymEvent) -> bool {
        if let Some(own) = self.filter_id() {
            let own_message = matches!(
                event.event_type,
                EventType::MessageSent | EventType::SharedPost
            ) && event.initiator_id() == Some(own);
            if own_message {
                return false;
            }
        }
        let listeners = self.firehose_listeners.read().clone();
        for listener in listeners {
            listener.on_event(event).await;
        }
        true
    }

    async fn route(&self, event: FeedEvent) {
        let own_id = self.own_id();
        let is_own = |user: &SymUser| own_id == Some(user.id);
        match event {
            FeedEvent::ChatMessage(message) => self.chats.handle_message(&message).await,
            FeedEvent::RoomMessage(message) => self.rooms.handle_message(&message).await,
            FeedEvent::ChatCreated(stream) => self.chats.handle_chat_created(&stream).await,
            FeedEvent::RoomCreated { stream, properties } => {
                self.rooms
                    .handle_room_created(&stream, properties.as_ref())
                    .await
            }
            FeedEvent::RoomUpdated { stream, properties } => {
                self.rooms
                    .handle_room_updated(&stream, properties.as_ref())
                    .await
            }
            FeedEvent::RoomDeactivated(stream) => {
                self.rooms.handle_room_active(&stream, false).await
            }
            FeedEvent::RoomReactivated(stream) => {
                self.rooms.handle_room_active(&stream, true).await
            }
            FeedEvent::UserJoinedRoom { stream, user } => {
                self.rooms
                    .handle_user_joined(&stream, &user, is_own(&user))
                    .await
            }
            FeedEvent::UserLeftRoom { stream, user } => {
                self.rooms
                    .handle_user_left(&stream, &user, is_own(&user))
                    .await
            }
            FeedEvent::MemberPromoted { stream, user } => {
                self.rooms.handle_member_role(&stream, &user, true).await
            }
            FeedEvent::MemberDemoted { stream, user } => {
                self.rooms.handle_member_role(&stream, &user, false).await
            }
            FeedEvent::JoinRequested {
                stream,
                requester,
                users,
            } => {
                self.rooms
                    .handle_join_request(&stream, requester.as_ref(), &users)
                    .await
            }
            FeedEvent::ConnectionRequested { from, to } => {
                // Only requests addressed to the bot are incoming.
                if let Some(from) = from {
                    if own_id.map_or(true, |own| own == to) {
                        self.connections.handle_requested(from).await;
                    }
                }
            }
            FeedEvent::ConnectionAccepted { user } => self.connections.handle_accepted(user).await,
            FeedEvent::ElementsAction { .. } | FeedEvent::MessageSuppressed { .. } => {}
            FeedEvent::Unhandled(event_type) => {
                tracing::debug!(target = "symphony::dispatch", ?event_type, "unhandled event");
            }
        }
    }
}
