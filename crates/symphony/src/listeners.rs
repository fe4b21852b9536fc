//! Listener traits the dispatcher fans events out to.
//!
//! Every method has a no-op default so implementors only override what they
//! care about. Callbacks run on the worker task that read the event, in feed
//! order; a slow callback delays the next read.

use async_trait::async_trait;

use crate::services::{Chat, Room};
use crate::types::*;

/// Messages of one chat (IM or MIM).
#[async_trait]
pub trait ChatListener: Send + Sync {
    async fn on_chat_message(&self, _chat: &Chat, _message: &SymMessage) {}
}

/// Chat lifecycle as seen by the chat service.
#[async_trait]
pub trait ChatServiceListener: Send + Sync {
    /// A chat the service did not know about produced its first event.
    /// Listeners added to the chat here receive the triggering message.
    async fn on_new_chat(&self, _chat: &Chat) {}

    async fn on_removed_chat(&self, _chat: &Chat) {}
}

/// Messages of one room.
#[async_trait]
pub trait RoomListener: Send + Sync {
    async fn on_room_message(&self, _room: &Room, _message: &SymMessage) {}
}

/// Room messages and lifecycle events for every room.
#[async_trait]
pub trait RoomServiceListener: Send + Sync {
    async fn on_new_room(&self, _room: &Room) {}

    async fn on_room_message(&self, _room: &Room, _message: &SymMessage) {}

    async fn on_room_created(&self, _room: &Room) {}

    async fn on_room_updated(&self, _room: &Room) {}

    async fn on_room_deactivated(&self, _room: &Room) {}

    async fn on_room_reactivated(&self, _room: &Room) {}

    async fn on_user_joined(&self, _room: &Room, _user: &SymUser) {}

    async fn on_user_left(&self, _room: &Room, _user: &SymUser) {}

    async fn on_member_promoted(&self, _room: &Room, _user: &SymUser) {}

    async fn on_member_demoted(&self, _room: &Room, _user: &SymUser) {}

    async fn on_join_request(
        &self,
        _room: &Room,
        _requester: Option<&SymUser>,
        _users: &[SymUser],
    ) {
    }
}

#[async_trait]
pub trait PresenceListener: Send + Sync {
    async fn on_presence(&self, _presence: &SymPresence) {}
}

#[async_trait]
pub trait ConnectionsListener: Send + Sync {
    /// A user asked to connect with the bot. Announced once per pending request.
    async fn on_connection_requested(&self, _user_id: UserId) {}

    async fn on_connection_accepted(&self, _user_id: UserId) {}
}

/// Raw datafeed events, after self-filtering and deduplication.
#[async_trait]
pub trait DataFeedListener: Send + Sync {
    async fn on_event(&self, _event: &SymEvent) {}

    async fn on_elements_action(
        &self,
        _initiator: Option<&SymUser>,
        _action: &ElementsActionPayload,
    ) {
    }
}

/// Raw firehose events (every event of the pod).
#[async_trait]
pub trait FirehoseListener: Send + Sync {
    async fn on_event(&self, _event: &SymEvent) {}
}
