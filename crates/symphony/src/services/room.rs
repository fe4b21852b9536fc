use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;
use crate::listeners::{RoomListener, RoomServiceListener};
use crate::messages::MessagesClient;
use crate::streams::StreamsClient;
use crate::types::*;

/// Snapshot of a room the bot belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub stream_id: String,
    pub name: Option<String>,
    pub active: bool,
    /// Full attributes, when the room was loaded through the room API.
    pub attributes: Option<SymRoomAttributes>,
}

impl Room {
    pub fn new(stream_id: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
            name: None,
            active: true,
            attributes: None,
        }
    }

    fn from_stream(stream: &SymStream) -> Self {
        Self {
            name: stream.room_name.clone(),
            ..Self::new(stream.stream_id.clone())
        }
    }

    fn from_detail(detail: &SymRoomDetail) -> Self {
        Self {
            stream_id: detail.room_system_info.id.clone(),
            name: detail.room_attributes.name.clone(),
            active: detail.room_system_info.active,
            attributes: Some(detail.room_attributes.clone()),
        }
    }

    fn from_info(info: &SymStreamInfo) -> Self {
        Self {
            stream_id: info.id.clone(),
            name: info.room_attributes.as_ref().and_then(|a| a.name.clone()),
            active: info.active,
            attributes: None,
        }
    }
}

struct RoomEntry {
    room: Room,
    listeners: Vec<Arc<dyn RoomListener>>,
}

/// Outcome of reconciling the tracked rooms with the server's room list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomSync {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

/// Tracks rooms by stream id and fans room events out to listeners.
pub struct RoomService {
    streams: StreamsClient,
    messages: MessagesClient,
    rooms: RwLock<HashMap<String, RoomEntry>>,
    listeners: RwLock<Vec<Arc<dyn RoomServiceListener>>>,
}

impl RoomService {
    pub fn new(streams: StreamsClient, messages: MessagesClient) -> Self {
        Self {
            streams,
            messages,
            rooms: RwLock::new(HashMap::new()),
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn add_listener(&self, listener: Arc<dyn RoomServiceListener>) {
        self.listeners.write().push(listener);
    }

    pub fn remove_listener(&self, listener: &Arc<dyn RoomServiceListener>) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
        listeners.len() != before
    }

    /// Attach a listener to one room. Returns false if the room is unknown.
    pub fn add_room_listener(&self, stream_id: &str, listener: Arc<dyn RoomListener>) -> bool {
        match self.rooms.write().get_mut(stream_id) {
            Some(entry) => {
                entry.listeners.push(listener);
                true
            }
            None => false,
        }
    }

    pub fn room(&self, stream_id: &str) -> Option<Room> {
        self.rooms.read().get(stream_id).map(|e| e.room.clone())
    }

    pub fn rooms(&self) -> Vec<Room> {
        self.rooms.read().values().map(|e| e.room.clone()).collect()
    }

    pub fn stream_ids(&self) -> Vec<String> {
        self.rooms.read().keys().cloned().collect()
    }

    /// Register a room. Returns false if the stream was already known.
    pub fn register(&self, room: Room) -> bool {
        let mut rooms = self.rooms.write();
        if rooms.contains_key(&room.stream_id) {
            return false;
        }
        rooms.insert(
            room.stream_id.clone(),
            RoomEntry {
                room,
                listeners: Vec::new(),
            },
        );
        true
    }

    /// Fetch a room from the pod and start tracking it.
    pub async fn load_room(&self, stream_id: &str) -> Result<Room> {
        let detail = self.streams.room_info(stream_id).await?;
        Ok(self.upsert_detail(&detail))
    }

    /// Create a room and start tracking it.
    pub async fn create_room(&self, attributes: &SymRoomAttributes) -> Result<Room> {
        let detail = self.streams.create_room(attributes).await?;
        Ok(self.upsert_detail(&detail))
    }

    pub async fn send_message(
        &self,
        stream_id: &str,
        message: &OutboundMessage,
    ) -> Result<SymMessage> {
        self.messages.send_message(stream_id, message).await
    }

    fn upsert_detail(&self, detail: &SymRoomDetail) -> Room {
        let room = Room::from_detail(detail);
        let mut rooms = self.rooms.write();
        match rooms.get_mut(&room.stream_id) {
            Some(entry) => entry.room = room.clone(),
            None => {
                rooms.insert(
                    room.stream_id.clone(),
                    RoomEntry {
                        room: room.clone(),
                        listeners: Vec::new(),
                    },
                );
            }
        }
        room
    }

    /// Reconcile with the full list of rooms the bot belongs to: rooms not yet
    /// tracked are registered and announced, tracked rooms missing from the
    /// list are dropped.
    pub async fn sync(&self, listed: &[SymStreamInfo]) -> RoomSync {
        let listed_ids: HashSet<&str> = listed.iter().map(|i| i.id.as_str()).collect();
        let mut outcome = RoomSync::default();
        let mut announce = Vec::new();
        {
            let mut rooms = self.rooms.write();
            rooms.retain(|id, _| {
                let keep = listed_ids.contains(id.as_str());
                if !keep {
                    outcome.removed.push(id.clone());
                }
                keep
            });
            for info in listed {
                match rooms.get_mut(&info.id) {
                    Some(entry) => entry.room.active = info.active,
                    None => {
                        let room = Room::from_info(info);
                        outcome.added.push(room.stream_id.clone());
                        announce.push(room.clone());
                        rooms.insert(
                            room.stream_id.clone(),
                            RoomEntry {
                                room,
                                listeners: Vec::new(),
                            },
                        );
                    }
                }
            }
        }
        for room in &announce {
            self.announce_new(room).await;
        }
        outcome
    }

    pub(crate) async fn handle_message(&self, message: &SymMessage) {
        let stream_id = message.stream_id();
        let (room, is_new) = self.ensure(&message.stream);
        if is_new {
            self.announce_new(&room).await;
        }
        for listener in self.service_listeners() {
            listener.on_room_message(&room, message).await;
        }
        for listener in self.room_listeners(stream_id) {
            listener.on_room_message(&room, message).await;
        }
    }

    pub(crate) async fn handle_room_created(
        &self,
        stream: &SymStream,
        properties: Option<&SymRoomProperties>,
    ) {
        let (room, is_new) = self.apply(stream, |room| {
            if let Some(name) = properties.and_then(|p| p.name.clone()) {
                room.name = Some(name);
            }
        });
        if is_new {
            self.announce_new(&room).await;
        }
        for listener in self.service_listeners() {
            listener.on_room_created(&room).await;
        }
    }

    pub(crate) async fn handle_room_updated(
        &self,
        stream: &SymStream,
        properties: Option<&SymRoomProperties>,
    ) {
        let (room, is_new) = self.apply(stream, |room| {
            if let Some(name) = properties.and_then(|p| p.name.clone()) {
                room.name = Some(name);
            }
        });
        if is_new {
            self.announce_new(&room).await;
        }
        for listener in self.service_listeners() {
            listener.on_room_updated(&room).await;
        }
    }

    pub(crate) async fn handle_room_active(&self, stream: &SymStream, active: bool) {
        let (room, is_new) = self.apply(stream, |room| room.active = active);
        if is_new {
            self.announce_new(&room).await;
        }
        for listener in self.service_listeners() {
            if active {
                listener.on_room_reactivated(&room).await;
            } else {
                listener.on_room_deactivated(&room).await;
            }
        }
    }

    /// `is_self` marks the bot itself joining.
    pub(crate) async fn handle_user_joined(
        &self,
        stream: &SymStream,
        user: &SymUser,
        is_self: bool,
    ) {
        let (room, is_new) = self.ensure(stream);
        if is_self {
            tracing::info!(
                target = "symphony::room",
                stream_id = %room.stream_id,
                "bot joined room"
            );
        }
        if is_new {
            self.announce_new(&room).await;
        }
        for listener in self.service_listeners() {
            listener.on_user_joined(&room, user).await;
        }
    }

    /// The bot leaving a room stops tracking it after listeners are told.
    pub(crate) async fn handle_user_left(&self, stream: &SymStream, user: &SymUser, is_self: bool) {
        let room = self.room(&stream.stream_id).unwrap_or_else(|| Room::from_stream(stream));
        for listener in self.service_listeners() {
            listener.on_user_left(&room, user).await;
        }
        if is_self && self.rooms.write().remove(&stream.stream_id).is_some() {
            tracing::info!(
                target = "symphony::room",
                stream_id = %stream.stream_id,
                "bot left room"
            );
        }
    }

    pub(crate) async fn handle_member_role(
        &self,
        stream: &SymStream,
        user: &SymUser,
        promoted: bool,
    ) {
        let (room, is_new) = self.ensure(stream);
        if is_new {
            self.announce_new(&room).await;
        }
        for listener in self.service_listeners() {
            if promoted {
                listener.on_member_promoted(&room, user).await;
            } else {
                listener.on_member_demoted(&room, user).await;
            }
        }
    }

    pub(crate) async fn handle_join_request(
        &self,
        stream: &SymStream,
        requester: Option<&SymUser>,
        users: &[SymUser],
    ) {
        let room = self.room(&stream.stream_id).unwrap_or_else(|| Room::from_stream(stream));
        for listener in self.service_listeners() {
            listener.on_join_request(&room, requester, users).await;
        }
    }

    /// Track the room if it is unknown; returns the snapshot and whether it was new.
    fn ensure(&self, stream: &SymStream) -> (Room, bool) {
        let mut rooms = self.rooms.write();
        if let Some(entry) = rooms.get_mut(&stream.stream_id) {
            if entry.room.name.is_none() {
                entry.room.name = stream.room_name.clone();
            }
            return (entry.room.clone(), false);
        }
        let room = Room::from_stream(stream);
        rooms.insert(
            room.stream_id.clone(),
            RoomEntry {
                room: room.clone(),
                listeners: Vec::new(),
            },
        );
        (room, true)
    }

    /// Update the room, tracking it first if unknown. Returns the snapshot
    /// and whether it was new.
    fn apply(&self, stream: &SymStream, update: impl FnOnce(&mut Room)) -> (Room, bool) {
        let mut rooms = self.rooms.write();
        let is_new = !rooms.contains_key(&stream.stream_id);
        let entry = rooms
            .entry(stream.stream_id.clone())
            .or_insert_with(|| RoomEntry {
                room: Room::from_stream(stream),
                listeners: Vec::new(),
            });
        update(&mut entry.room);
        (entry.room.clone(), is_new)
    }

    async fn announce_new(&self, room: &Room) {
        tracing::debug!(target = "symphony::room", stream_id = %room.stream_id, "new room");
        for listener in self.service_listeners() {
            listener.on_new_room(room).await;
        }
    }

    fn service_listeners(&self) -> Vec<Arc<dyn RoomServiceListener>> {
        self.listeners.read().clone()
    }

    fn room_listeners(&self, stream_id: &str) -> Vec<Arc<dyn RoomListener>> {
        self.rooms
            .read()
            .get(stream_id)
            .map(|e| e.listeners.clone())
            .unwrap_or_default()
    }
}
