use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;
use crate::listeners::{ChatListener, ChatServiceListener};
use crate::messages::MessagesClient;
use crate::streams::StreamsClient;
use crate::types::*;

/// Snapshot of a 1:1 or multi-party chat.
#[derive(Debug, Clone, PartialEq)]
pub struct Chat {
    pub stream_id: String,
    pub stream_type: StreamType,
    /// Participants other than the bot, in order of first appearance.
    pub remote_users: Vec<SymUser>,
    /// Timestamp of the latest message delivered for this chat.
    pub last_message_ts: i64,
}

impl Chat {
    pub fn new(stream_id: impl Into<String>, stream_type: StreamType) -> Self {
        Self {
            stream_id: stream_id.into(),
            stream_type,
            remote_users: Vec::new(),
            last_message_ts: 0,
        }
    }

    pub fn has_user(&self, user_id: UserId) -> bool {
        self.remote_users.iter().any(|u| u.id == user_id)
    }

    fn add_user(&mut self, user: &SymUser) {
        if !self.has_user(user.id) {
            self.remote_users.push(user.clone());
        }
    }
}

struct ChatEntry {
    chat: Chat,
    listeners: Vec<Arc<dyn ChatListener>>,
}

/// Tracks chats by stream id and fans chat messages out to listeners.
pub struct ChatService {
    own_id: RwLock<Option<UserId>>,
    streams: StreamsClient,
    messages: MessagesClient,
    chats: RwLock<HashMap<String, ChatEntry>>,
    listeners: RwLock<Vec<Arc<dyn ChatServiceListener>>>,
}

impl ChatService {
    pub fn new(streams: StreamsClient, messages: MessagesClient) -> Self {
        Self {
            own_id: RwLock::new(None),
            streams,
            messages,
            chats: RwLock::new(HashMap::new()),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// The bot's own user id, never recorded as a remote user.
    pub(crate) fn set_own_id(&self, user_id: UserId) {
        *self.own_id.write() = Some(user_id);
    }

    pub fn add_listener(&self, listener: Arc<dyn ChatServiceListener>) {
        self.listeners.write().push(listener);
    }

    pub fn remove_listener(&self, listener: &Arc<dyn ChatServiceListener>) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
        listeners.len() != before
    }

    /// Attach a listener to one chat. Returns false if the chat is unknown.
    pub fn add_chat_listener(&self, stream_id: &str, listener: Arc<dyn ChatListener>) -> bool {
        match self.chats.write().get_mut(stream_id) {
            Some(entry) => {
                entry.listeners.push(listener);
                true
            }
            None => false,
        }
    }

    pub fn chat(&self, stream_id: &str) -> Option<Chat> {
        self.chats.read().get(stream_id).map(|e| e.chat.clone())
    }

    pub fn chats(&self) -> Vec<Chat> {
        self.chats.read().values().map(|e| e.chat.clone()).collect()
    }

    pub fn chats_for_user(&self, user_id: UserId) -> Vec<Chat> {
        self.chats
            .read()
            .values()
            .filter(|e| e.chat.has_user(user_id))
            .map(|e| e.chat.clone())
            .collect()
    }

    pub fn stream_ids(&self) -> Vec<String> {
        self.chats.read().keys().cloned().collect()
    }

    /// Register a chat. Returns false if the stream was already known.
    pub fn register(&self, chat: Chat) -> bool {
        let mut chats = self.chats.write();
        if chats.contains_key(&chat.stream_id) {
            return false;
        }
        chats.insert(
            chat.stream_id.clone(),
            ChatEntry {
                chat,
                listeners: Vec::new(),
            },
        );
        true
    }

    /// Open (or reuse) an IM / MIM with the given users and register it.
    pub async fn start_chat(&self, user_ids: &[UserId]) -> Result<Chat> {
        let stream_id = self.streams.create_im(user_ids).await?;
        let stream_type = if user_ids.len() > 1 {
            StreamType::Mim
        } else {
            StreamType::Im
        };
        let own_id = *self.own_id.read();
        let mut chat = Chat::new(stream_id, stream_type);
        for id in user_ids.iter().filter(|id| Some(**id) != own_id) {
            chat.add_user(&SymUser {
                id: *id,
                ..Default::default()
            });
        }
        self.register(chat.clone());
        Ok(self.chat(&chat.stream_id).unwrap_or(chat))
    }

    /// Forget a chat and notify service listeners.
    pub async fn remove_chat(&self, stream_id: &str) -> Option<Chat> {
        let removed = self.chats.write().remove(stream_id)?.chat;
        for listener in self.service_listeners() {
            listener.on_removed_chat(&removed).await;
        }
        Some(removed)
    }

    pub async fn send_message(
        &self,
        stream_id: &str,
        message: &OutboundMessage,
    ) -> Result<SymMessage> {
        self.messages.send_message(stream_id, message).await
    }

    pub(crate) async fn handle_chat_created(&self, stream: &SymStream) {
        let own_id = *self.own_id.read();
        let mut chat = Chat::new(stream.stream_id.clone(), stream.stream_type);
        for user in stream.members.iter().flatten() {
            if Some(user.id) != own_id {
                chat.add_user(user);
            }
        }
        if self.register(chat.clone()) {
            self.announce_new(&chat).await;
        }
    }

    pub(crate) async fn handle_message(&self, message: &SymMessage) {
        let stream_id = message.stream_id();
        let is_own = *self.own_id.read() == Some(message.user.id);
        let (chat, is_new) = {
            let mut chats = self.chats.write();
            let is_new = !chats.contains_key(stream_id);
            let entry = chats.entry(stream_id.to_string()).or_insert_with(|| ChatEntry {
                chat: Chat::new(stream_id, message.stream.stream_type),
                listeners: Vec::new(),
            });
            if !is_own {
                entry.chat.add_user(&message.user);
            }
            entry.chat.last_message_ts = entry.chat.last_message_ts.max(message.timestamp);
            (entry.chat.clone(), is_new)
        };

        if is_new {
            self.announce_new(&chat).await;
        }

        // Snapshot after on_new_chat so listeners added there see this message.
        let listeners = self
            .chats
            .read()
            .get(stream_id)
            .map(|e| e.listeners.clone())
            .unwrap_or_default();
        for listener in listeners {
            listener.on_chat_message(&chat, message).await;
        }
    }

    async fn announce_new(&self, chat: &Chat) {
        tracing::debug!(
            target = "symphony::chat",
            stream_id = %chat.stream_id,
            "new chat"
        );
        for listener in self.service_listeners() {
            listener.on_new_chat(chat).await;
        }
    }

    fn service_listeners(&self) -> Vec<Arc<dyn ChatServiceListener>> {
        self.listeners.read().clone()
    }
}
