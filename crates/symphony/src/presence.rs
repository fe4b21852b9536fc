//! Presence operations.

use serde_json::json;

use crate::client::{Host, HttpClient};
use crate::error::Result;
use crate::types::*;

/// Client for user presence and presence feeds.
#[derive(Clone)]
pub struct PresenceClient {
    client: HttpClient,
}

impl PresenceClient {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Get a user's presence. `local` restricts the lookup to this pod.
    pub async fn user_presence(&self, user_id: UserId, local: bool) -> Result<SymPresence> {
        let local = if local { "true" } else { "false" };
        self.client
            .get(
                Host::Pod,
                &format!("/pod/v3/user/{user_id}/presence"),
                Some([("local", local)].as_slice()),
                None,
            )
            .await
    }

    /// Set the bot's own presence.
    pub async fn set_presence(&self, category: PresenceCategory) -> Result<SymPresence> {
        self.client
            .post(
                Host::Pod,
                "/pod/v2/user/presence",
                Some(json!({ "category": category })),
                None,
            )
            .await
    }

    /// Register interest in users from other pods so their presence is tracked.
    pub async fn register_interest(&self, user_ids: &[UserId]) -> Result<()> {
        self.client
            .post_unit(
                Host::Pod,
                "/pod/v1/user/presence/register",
                Some(user_ids),
                None,
            )
            .await
    }

    /// Create a presence feed.
    pub async fn create_presence_feed(&self) -> Result<String> {
        let response: IdResponse = self
            .client
            .post(Host::Pod, "/pod/v1/presence/feed/create", None::<()>, None)
            .await?;
        Ok(response.id)
    }

    /// Read presence changes accumulated since the previous read.
    pub async fn read_presence_feed(&self, feed_id: &str) -> Result<Vec<SymPresence>> {
        let changes: Option<Vec<SymPresence>> = self
            .client
            .get(
                Host::Pod,
                &format!("/pod/v1/presence/feed/{}/read", urlencoding::encode(feed_id)),
                None,
                None,
            )
            .await?;
        Ok(changes.unwrap_or_default())
    }

    /// Delete a presence feed.
    pub async fn delete_presence_feed(&self, feed_id: &str) -> Result<()> {
        self.client
            .post_unit(
                Host::Pod,
                &format!("/pod/v1/presence/feed/{}/delete", urlencoding::encode(feed_id)),
                None::<()>,
                None,
            )
            .await
    }
}
