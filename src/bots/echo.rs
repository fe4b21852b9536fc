use std::sync::Arc;

use async_trait::async_trait;
use symphony::{
    Chat, ChatListener, ChatService, ChatServiceListener, OutboundMessage, Room, RoomService,
    RoomServiceListener, SymMessage,
};

/// Text to send back for a message, or `None` when it has no text.
pub fn reply_text(message: &SymMessage) -> Option<String> {
    let text = message.message_text();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Replies to chat and room messages with their own text.
pub struct EchoBot {
    chats: Arc<ChatService>,
    rooms: Arc<RoomService>,
}

impl EchoBot {
    pub fn new(chats: Arc<ChatService>, rooms: Arc<RoomService>) -> Self {
        Self { chats, rooms }
    }
}

#[async_trait]
impl ChatListener for EchoBot {
    async fn on_chat_message(&self, chat: &Chat, message: &SymMessage) {
        let Some(text) = reply_text(message) else {
            return;
        };
        match self
            .chats
            .send_message(&chat.stream_id, &OutboundMessage::text(&text))
            .await
        {
            Ok(sent) => tracing::debug!(
                target = "symphony_bot::echo",
                stream_id = %chat.stream_id,
                message_id = %sent.message_id,
                "echoed chat message"
            ),
            Err(error) => tracing::warn!(
                target = "symphony_bot::echo",
                stream_id = %chat.stream_id,
                error = %error,
                "failed to echo chat message"
            ),
        }
    }
}

#[async_trait]
impl RoomServiceListener for EchoBot {
    async fn on_room_message(&self, room: &Room, message: &SymMessage) {
        let Some(text) = reply_text(message) else {
            return;
        };
        if let Err(error) = self
            .rooms
            .send_message(&room.stream_id, &OutboundMessage::text(&text))
            .await
        {
            tracing::warn!(
                target = "symphony_bot::echo",
                stream_id = %room.stream_id,
                error = %error,
                "failed to echo room message"
            );
        }
    }
}

/// Attaches a chat listener to every chat as soon as the chat appears.
pub struct AttachToNewChats {
    chats: Arc<ChatService>,
    listener: Arc<dyn ChatListener>,
}

impl AttachToNewChats {
    pub fn new(chats: Arc<ChatService>, listener: Arc<dyn ChatListener>) -> Self {
        Self { chats, listener }
    }
}

#[async_trait]
impl ChatServiceListener for AttachToNewChats {
    async fn on_new_chat(&self, chat: &Chat) {
        self.chats
            .add_chat_listener(&chat.stream_id, self.listener.clone());
    }
}
