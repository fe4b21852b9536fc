//! Signal (saved search feed) operations.

use crate::client::{Host, HttpClient};
use crate::error::Result;
use crate::types::*;

/// Client for signals.
#[derive(Clone)]
pub struct SignalsClient {
    client: HttpClient,
}

impl SignalsClient {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// List signals visible to the bot.
    pub async fn list_signals(&self, skip: u32, limit: u32) -> Result<Vec<SymSignal>> {
        let skip = skip.to_string();
        let limit = limit.to_string();
        let signals: Option<Vec<SymSignal>> = self
            .client
            .get(
                Host::Agent,
                "/agent/v1/signals/list",
                Some([("skip", skip.as_str()), ("limit", limit.as_str())].as_slice()),
                None,
            )
            .await?;
        Ok(signals.unwrap_or_default())
    }

    /// Get a signal by id.
    pub async fn get_signal(&self, id: &str) -> Result<SymSignal> {
        self.client
            .get(
                Host::Agent,
                &format!("/agent/v1/signals/{}/get", urlencoding::encode(id)),
                None,
                None,
            )
            .await
    }

    /// Create a signal.
    pub async fn create_signal(&self, signal: &SymSignal) -> Result<SymSignal> {
        self.client
            .post(Host::Agent, "/agent/v1/signals/create", Some(signal), None)
            .await
    }

    /// Update a signal.
    pub async fn update_signal(&self, id: &str, signal: &SymSignal) -> Result<SymSignal> {
        self.client
            .post(
                Host::Agent,
                &format!("/agent/v1/signals/{}/update", urlencoding::encode(id)),
                Some(signal),
                None,
            )
            .await
    }

    /// Delete a signal.
    pub async fn delete_signal(&self, id: &str) -> Result<()> {
        self.client
            .post_unit(
                Host::Agent,
                &format!("/agent/v1/signals/{}/delete", urlencoding::encode(id)),
                None::<()>,
                None,
            )
            .await
    }

    /// Subscribe users to a signal. With `pushed` the signal is added to their
    /// workspace without opt-in.
    pub async fn subscribe(
        &self,
        id: &str,
        user_ids: &[UserId],
        pushed: bool,
    ) -> Result<SymSubscriptionResult> {
        let pushed = if pushed { "true" } else { "false" };
        self.client
            .post(
                Host::Agent,
                &format!("/agent/v1/signals/{}/subscribe", urlencoding::encode(id)),
                Some(user_ids),
                Some([("pushed", pushed)].as_slice()),
            )
            .await
    }

    /// Unsubscribe users from a signal.
    pub async fn unsubscribe(
        &self,
        id: &str,
        user_ids: &[UserId],
    ) -> Result<SymSubscriptionResult> {
        self.client
            .post(
                Host::Agent,
                &format!("/agent/v1/signals/{}/unsubscribe", urlencoding::encode(id)),
                Some(user_ids),
                None,
            )
            .await
    }

    /// List the subscribers of a signal.
    pub async fn subscribers(
        &self,
        id: &str,
        skip: u32,
        limit: u32,
    ) -> Result<SymSignalSubscribers> {
        let skip = skip.to_string();
        let limit = limit.to_string();
        self.client
            .get(
                Host::Agent,
                &format!("/agent/v1/signals/{}/subscribers", urlencoding::encode(id)),
                Some([("skip", skip.as_str()), ("limit", limit.as_str())].as_slice()),
                None,
            )
            .await
    }
}
