//! Connection (cross-pod contact) operations.

use crate::client::{Host, HttpClient};
use crate::error::Result;
use crate::types::*;

/// Client for connection requests.
#[derive(Clone)]
pub struct ConnectionsClient {
    client: HttpClient,
}

impl ConnectionsClient {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// List incoming requests that await an answer.
    pub async fn pending_connections(&self) -> Result<Vec<SymUserConnection>> {
        self.connections(ConnectionStatus::PendingIncoming, &[]).await
    }

    /// List connections with the given status, optionally restricted to users.
    pub async fn connections(
        &self,
        status: ConnectionStatus,
        user_ids: &[UserId],
    ) -> Result<Vec<SymUserConnection>> {
        let ids = user_ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let mut query = vec![("status", status.as_str())];
        if !ids.is_empty() {
            query.push(("userIds", ids.as_str()));
        }
        let list: Option<Vec<SymUserConnection>> = self
            .client
            .get(Host::Pod, "/pod/v1/connection/list", Some(query.as_slice()), None)
            .await?;
        Ok(list.unwrap_or_default())
    }

    /// Accept an incoming request.
    pub async fn accept(&self, user_id: UserId) -> Result<SymUserConnection> {
        self.client
            .post(
                Host::Pod,
                "/pod/v1/connection/accept",
                Some(ConnectionRequest { user_id }),
                None,
            )
            .await
    }

    /// Reject an incoming request.
    pub async fn reject(&self, user_id: UserId) -> Result<SymUserConnection> {
        self.client
            .post(
                Host::Pod,
                "/pod/v1/connection/reject",
                Some(ConnectionRequest { user_id }),
                None,
            )
            .await
    }

    /// Send a connection request.
    pub async fn request(&self, user_id: UserId) -> Result<SymUserConnection> {
        self.client
            .post(
                Host::Pod,
                "/pod/v1/connection/create",
                Some(ConnectionRequest { user_id }),
                None,
            )
            .await
    }

    /// Get the connection status with a user.
    pub async fn connection_status(&self, user_id: UserId) -> Result<SymUserConnection> {
        self.client
            .get(
                Host::Pod,
                &format!("/pod/v1/connection/user/{user_id}/info"),
                None,
                None,
            )
            .await
    }

    /// Remove an accepted connection.
    pub async fn remove(&self, user_id: UserId) -> Result<()> {
        self.client
            .post_unit(
                Host::Pod,
                &format!("/pod/v1/connection/user/{user_id}/remove"),
                None::<()>,
                None,
            )
            .await
    }
}
