//! Stream and room operations.

use crate::client::{Host, HttpClient};
use crate::error::Result;
use crate::types::*;

const STREAM_PAGE_SIZE: u32 = 100;

/// Client for rooms, IMs and stream metadata.
#[derive(Clone)]
pub struct StreamsClient {
    client: HttpClient,
}

impl StreamsClient {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    // === Rooms ===

    /// Create a room.
    pub async fn create_room(&self, attributes: &SymRoomAttributes) -> Result<SymRoomDetail> {
        self.client
            .post(Host::Pod, "/pod/v3/room/create", Some(attributes), None)
            .await
    }

    /// Get room attributes and system info.
    pub async fn room_info(&self, room_id: &str) -> Result<SymRoomDetail> {
        self.client
            .get(
                Host::Pod,
                &format!("/pod/v3/room/{}/info", urlencoding::encode(room_id)),
                None,
                None,
            )
            .await
    }

    /// Update room attributes.
    pub async fn update_room(
        &self,
        room_id: &str,
        attributes: &SymRoomAttributes,
    ) -> Result<SymRoomDetail> {
        self.client
            .post(
                Host::Pod,
                &format!("/pod/v3/room/{}/update", urlencoding::encode(room_id)),
                Some(attributes),
                None,
            )
            .await
    }

    /// Activate or deactivate a room.
    pub async fn set_room_active(&self, room_id: &str, active: bool) -> Result<SymRoomDetail> {
        let active = if active { "true" } else { "false" };
        self.client
            .post(
                Host::Pod,
                &format!("/pod/v1/room/{}/setActive", urlencoding::encode(room_id)),
                None::<()>,
                Some([("active", active)].as_slice()),
            )
            .await
    }

    /// Add a user to a room.
    pub async fn add_member(&self, room_id: &str, user_id: UserId) -> Result<()> {
        self.membership_call(room_id, "add", user_id).await
    }

    /// Remove a user from a room.
    pub async fn remove_member(&self, room_id: &str, user_id: UserId) -> Result<()> {
        self.membership_call(room_id, "remove", user_id).await
    }

    /// Promote a member to room owner.
    pub async fn promote_owner(&self, room_id: &str, user_id: UserId) -> Result<()> {
        self.membership_call(room_id, "promoteOwner", user_id).await
    }

    /// Demote a room owner to participant.
    pub async fn demote_owner(&self, room_id: &str, user_id: UserId) -> Result<()> {
        self.membership_call(room_id, "demoteOwner", user_id).await
    }

    async fn membership_call(&self, room_id: &str, action: &str, user_id: UserId) -> Result<()> {
        self.client
            .post_unit(
                Host::Pod,
                &format!(
                    "/pod/v1/room/{}/membership/{}",
                    urlencoding::encode(room_id),
                    action
                ),
                Some(UserIdRef { id: user_id }),
                None,
            )
            .await
    }

    /// List room members.
    pub async fn room_members(&self, room_id: &str) -> Result<Vec<SymRoomMember>> {
        self.client
            .get(
                Host::Pod,
                &format!("/pod/v2/room/{}/membership/list", urlencoding::encode(room_id)),
                None,
                None,
            )
            .await
    }

    /// Search rooms.
    pub async fn search_rooms(
        &self,
        criteria: &SymRoomSearchCriteria,
        skip: u32,
        limit: u32,
    ) -> Result<SymRoomSearchResults> {
        let skip = skip.to_string();
        let limit = limit.to_string();
        let params = [("skip", skip.as_str()), ("limit", limit.as_str())];
        self.client
            .post(Host::Pod, "/pod/v3/room/search", Some(criteria), Some(params.as_slice()))
            .await
    }

    // === IMs and streams ===

    /// Create (or fetch the existing) IM / MIM stream with the given users.
    pub async fn create_im(&self, user_ids: &[UserId]) -> Result<String> {
        let response: IdResponse = self
            .client
            .post(Host::Pod, "/pod/v1/im/create", Some(user_ids), None)
            .await?;
        Ok(response.id)
    }

    /// Get stream details.
    pub async fn stream_info(&self, stream_id: &str) -> Result<SymStreamInfo> {
        self.client
            .get(
                Host::Pod,
                &format!("/pod/v2/streams/{}/info", urlencoding::encode(stream_id)),
                None,
                None,
            )
            .await
    }

    /// List every stream the bot is a member of, following pages until a
    /// short page is returned.
    pub async fn user_streams(
        &self,
        types: &[StreamType],
        include_inactive: bool,
    ) -> Result<Vec<SymStreamInfo>> {
        let mut all = Vec::new();
        let mut skip = 0;
        loop {
            let page = self
                .user_streams_page(types, include_inactive, skip, STREAM_PAGE_SIZE)
                .await?;
            let fetched = page.len() as u32;
            all.extend(page);
            if fetched < STREAM_PAGE_SIZE {
                return Ok(all);
            }
            skip += fetched;
        }
    }

    /// One page of the bot's streams.
    pub async fn user_streams_page(
        &self,
        types: &[StreamType],
        include_inactive: bool,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<SymStreamInfo>> {
        let filter = StreamFilter {
            stream_types: types
                .iter()
                .map(|t| StreamTypeInfo { stream_type: *t })
                .collect(),
            include_inactive_streams: include_inactive,
        };
        let skip = skip.to_string();
        let limit = limit.to_string();
        let params = [("skip", skip.as_str()), ("limit", limit.as_str())];
        let streams: Option<Vec<SymStreamInfo>> = self
            .client
            .post(Host::Pod, "/pod/v1/streams/list", Some(filter), Some(params.as_slice()))
            .await?;
        Ok(streams.unwrap_or_default())
    }
}
