//! Type definitions for the Symphony SDK.
//!
//! One serde model per wire object; field names follow the vendor's
//! camelCase JSON.

use serde::{Deserialize, Serialize};

use crate::messageml;

/// Vendor user identifier.
pub type UserId = i64;

// === Common ===

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdResponse {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyValuePair {
    pub key: String,
    pub value: String,
}

// === Users ===

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SymUser {
    #[serde(alias = "userId")]
    pub id: UserId,
    #[serde(default, alias = "emailAddress")]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub account_type: Option<String>,
}

impl SymUser {
    /// Best human-readable name available.
    pub fn name(&self) -> String {
        self.display_name
            .clone()
            .or_else(|| self.username.clone())
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| self.id.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: UserId,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UserList {
    #[serde(default)]
    pub users: Vec<SymUser>,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserSearchQuery {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<UserSearchFilter>,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserSearchFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSearchResults {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub skip: i64,
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub users: Vec<SymUser>,
}

// === Streams ===

/// Kind of conversation a stream carries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StreamType {
    #[serde(rename = "IM")]
    Im,
    #[serde(rename = "MIM")]
    Mim,
    #[serde(rename = "ROOM")]
    Room,
    #[serde(rename = "POST")]
    Post,
    #[serde(other)]
    Unknown,
}

impl StreamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Im => "IM",
            Self::Mim => "MIM",
            Self::Room => "ROOM",
            Self::Post => "POST",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// 1:1 and multi-party chats.
    pub fn is_chat(&self) -> bool {
        matches!(self, Self::Im | Self::Mim)
    }
}

/// Stream reference carried by messages and events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SymStream {
    pub stream_id: String,
    #[serde(default = "unknown_stream_type")]
    pub stream_type: StreamType,
    #[serde(default)]
    pub room_name: Option<String>,
    #[serde(default)]
    pub members: Option<Vec<SymUser>>,
    #[serde(default)]
    pub external: Option<bool>,
    #[serde(default)]
    pub cross_pod: Option<bool>,
}

fn unknown_stream_type() -> StreamType {
    StreamType::Unknown
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamTypeInfo {
    #[serde(rename = "type")]
    pub stream_type: StreamType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StreamMembers {
    #[serde(default)]
    pub members: Vec<UserId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StreamRoomName {
    #[serde(default)]
    pub name: Option<String>,
}

/// Stream details as returned by stream info and the stream list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SymStreamInfo {
    pub id: String,
    #[serde(default)]
    pub cross_pod: bool,
    #[serde(default = "default_true")]
    pub active: bool,
    pub stream_type: StreamTypeInfo,
    #[serde(default)]
    pub stream_attributes: Option<StreamMembers>,
    #[serde(default)]
    pub room_attributes: Option<StreamRoomName>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StreamFilter {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stream_types: Vec<StreamTypeInfo>,
    pub include_inactive_streams: bool,
}

// === Messages ===

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SymAttachmentInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub size: i64,
}

/// A message as delivered by the agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SymMessage {
    pub message_id: String,
    #[serde(default)]
    pub timestamp: i64,
    /// PresentationML body.
    #[serde(default)]
    pub message: String,
    /// Entity JSON payload, as a raw string.
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub attachments: Vec<SymAttachmentInfo>,
    pub user: SymUser,
    pub stream: SymStream,
    #[serde(default)]
    pub external_recipients: bool,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub original_format: Option<String>,
}

impl SymMessage {
    /// Message body with markup removed.
    pub fn message_text(&self) -> String {
        messageml::to_plain_text(&self.message)
    }

    pub fn stream_id(&self) -> &str {
        &self.stream.stream_id
    }

    pub fn is_from(&self, user_id: UserId) -> bool {
        self.user.id == user_id
    }
}

/// File attached to an outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundAttachment {
    pub file_name: String,
    pub content: Vec<u8>,
    pub mime_type: Option<String>,
}

/// A message to send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutboundMessage {
    /// MessageML body.
    pub message: String,
    pub data: Option<String>,
    pub attachments: Vec<OutboundAttachment>,
}

impl OutboundMessage {
    /// Plain text, escaped and wrapped in `<messageML>`.
    pub fn text(text: &str) -> Self {
        Self {
            message: messageml::wrap(text),
            ..Default::default()
        }
    }

    /// Raw MessageML, sent as-is.
    pub fn ml(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn with_attachment(
        mut self,
        file_name: impl Into<String>,
        content: Vec<u8>,
        mime_type: Option<String>,
    ) -> Self {
        self.attachments.push(OutboundAttachment {
            file_name: file_name.into(),
            content,
            mime_type,
        });
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SymMessageStatus {
    #[serde(default)]
    pub author: Option<SymUser>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub read: Vec<SymUser>,
    #[serde(default)]
    pub delivered: Vec<SymUser>,
    #[serde(default)]
    pub sent: Vec<SymUser>,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MessageSearchQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_type: Option<StreamType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hashtag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cashtag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mention: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<i64>,
}

// === Rooms ===

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SymRoomAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<KeyValuePair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members_can_invite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discoverable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_protected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_pod: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_history: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_lateral_room: Option<bool>,
}

impl SymRoomAttributes {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SymRoomSystemInfo {
    pub id: String,
    #[serde(default)]
    pub creation_date: Option<i64>,
    #[serde(default)]
    pub created_by_user_id: Option<UserId>,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SymRoomDetail {
    #[serde(default)]
    pub room_attributes: SymRoomAttributes,
    pub room_system_info: SymRoomSystemInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SymRoomMember {
    pub id: UserId,
    #[serde(default)]
    pub owner: bool,
    #[serde(default)]
    pub join_date: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserIdRef {
    pub id: UserId,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SymRoomSearchCriteria {
    pub query: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<UserIdRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserIdRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<UserIdRef>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SymRoomSearchResults {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub skip: i64,
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub rooms: Vec<SymRoomDetail>,
}

/// Room properties carried by room lifecycle events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SymRoomProperties {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub creator_user: Option<SymUser>,
    #[serde(default)]
    pub created_date: Option<i64>,
    #[serde(default)]
    pub external: Option<bool>,
    #[serde(default)]
    pub cross_pod: Option<bool>,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub read_only: Option<bool>,
    #[serde(default)]
    pub discoverable: Option<bool>,
    #[serde(default)]
    pub members_can_invite: Option<bool>,
}

// === Presence ===

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PresenceCategory {
    Available,
    Busy,
    Away,
    OnThePhone,
    BeRightBack,
    InAMeeting,
    OutOfOffice,
    OffWork,
    Offline,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SymPresence {
    pub category: PresenceCategory,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

// === Connections ===

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionStatus {
    PendingIncoming,
    PendingOutgoing,
    Accepted,
    Rejected,
    All,
    #[serde(other)]
    Unknown,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingIncoming => "PENDING_INCOMING",
            Self::PendingOutgoing => "PENDING_OUTGOING",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::All => "ALL",
            Self::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SymUserConnection {
    pub user_id: UserId,
    pub status: ConnectionStatus,
    #[serde(default)]
    pub first_requested_at: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<i64>,
    #[serde(default)]
    pub request_counter: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConnectionRequest {
    pub user_id: UserId,
}

// === Signals ===

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SymSignal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub query: String,
    #[serde(default)]
    pub visible_on_profile: bool,
    #[serde(default)]
    pub company_wide: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SymSignalSubscriber {
    #[serde(default)]
    pub subscription_id: Option<String>,
    #[serde(default)]
    pub pushed: bool,
    #[serde(default)]
    pub owner: bool,
    #[serde(default)]
    pub subscriber_name: Option<String>,
    pub user_id: UserId,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SymSignalSubscribers {
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub data: Vec<SymSignalSubscriber>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SymSubscriptionResult {
    #[serde(default)]
    pub requested_subscription: i64,
    #[serde(default)]
    pub successful_subscription: i64,
    #[serde(default)]
    pub failed_subscription: i64,
}

// === Events ===

/// Datafeed / firehose event types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EventType {
    #[serde(rename = "MESSAGESENT")]
    MessageSent,
    #[serde(rename = "SHAREDPOST")]
    SharedPost,
    #[serde(rename = "INSTANTMESSAGECREATED")]
    InstantMessageCreated,
    #[serde(rename = "ROOMCREATED")]
    RoomCreated,
    #[serde(rename = "ROOMUPDATED")]
    RoomUpdated,
    #[serde(rename = "ROOMDEACTIVATED")]
    RoomDeactivated,
    #[serde(rename = "ROOMREACTIVATED")]
    RoomReactivated,
    #[serde(rename = "USERJOINEDROOM")]
    UserJoinedRoom,
    #[serde(rename = "USERLEFTROOM")]
    UserLeftRoom,
    #[serde(rename = "ROOMMEMBERPROMOTEDTOOWNER")]
    RoomMemberPromotedToOwner,
    #[serde(rename = "ROOMMEMBERDEMOTEDFROMOWNER")]
    RoomMemberDemotedFromOwner,
    #[serde(rename = "CONNECTIONREQUESTED")]
    ConnectionRequested,
    #[serde(rename = "CONNECTIONACCEPTED")]
    ConnectionAccepted,
    #[serde(rename = "MESSAGESUPPRESSED")]
    MessageSuppressed,
    #[serde(rename = "SYMPHONYELEMENTSACTION")]
    SymphonyElementsAction,
    #[serde(rename = "USERREQUESTEDTOJOINROOM")]
    UserRequestedToJoinRoom,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SymInitiator {
    #[serde(default)]
    pub user: Option<SymUser>,
}

/// One event read from a datafeed or firehose.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SymEvent {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(default)]
    pub initiator: SymInitiator,
    #[serde(default)]
    pub payload: SymEventPayload,
}

impl SymEvent {
    pub fn initiator_id(&self) -> Option<UserId> {
        self.initiator.user.as_ref().map(|u| u.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessagePayload {
    pub message: SymMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SharedPostPayload {
    pub message: SymMessage,
    #[serde(default)]
    pub shared_message: Option<SymMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamPayload {
    pub stream: SymStream,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomCreatedPayload {
    pub stream: SymStream,
    #[serde(default)]
    pub room_properties: Option<SymRoomProperties>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomUpdatedPayload {
    pub stream: SymStream,
    #[serde(default)]
    pub new_room_properties: Option<SymRoomProperties>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomMemberPayload {
    pub stream: SymStream,
    pub affected_user: SymUser,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequestPayload {
    pub stream: SymStream,
    #[serde(default)]
    pub affected_users: Vec<SymUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRequestedPayload {
    pub to_user: SymUser,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionAcceptedPayload {
    pub from_user: SymUser,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageSuppressedPayload {
    pub message_id: String,
    #[serde(default)]
    pub stream: Option<SymStream>,
}

/// Form submission from an interactive message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElementsActionPayload {
    #[serde(default)]
    pub stream: Option<SymStream>,
    #[serde(default)]
    pub form_message_id: Option<String>,
    #[serde(default)]
    pub form_id: Option<String>,
    #[serde(default)]
    pub form_values: serde_json::Map<String, serde_json::Value>,
}

/// Event payload; exactly one field is set, matching the event type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SymEventPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_sent: Option<MessagePayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_post: Option<SharedPostPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instant_message_created: Option<StreamPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_created: Option<RoomCreatedPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_updated: Option<RoomUpdatedPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_deactivated: Option<StreamPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_reactivated: Option<StreamPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_joined_room: Option<RoomMemberPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_left_room: Option<RoomMemberPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_member_promoted_to_owner: Option<RoomMemberPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_member_demoted_from_owner: Option<RoomMemberPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_requested: Option<ConnectionRequestedPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_accepted: Option<ConnectionAcceptedPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_suppressed: Option<MessageSuppressedPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symphony_elements_action: Option<ElementsActionPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_requested_to_join_room: Option<JoinRequestPayload>,
}
