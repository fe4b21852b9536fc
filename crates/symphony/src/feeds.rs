//! Datafeed and firehose endpoints: the REST half of the polling workers.

use std::time::Duration;

use serde_json::Value;

use crate::client::{Host, HttpClient, RequestOptions};
use crate::error::Result;
use crate::types::{IdResponse, SymEvent};

/// Which server-side queue a feed reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    /// Events addressed to the bot.
    Datafeed,
    /// Every event of the pod.
    Firehose,
}

impl FeedKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Datafeed => "datafeed",
            Self::Firehose => "firehose",
        }
    }
}

/// Client for creating and long-polling feeds.
#[derive(Clone)]
pub struct FeedClient {
    client: HttpClient,
    read_timeout: Duration,
}

impl FeedClient {
    pub fn new(client: HttpClient, read_timeout: Duration) -> Self {
        Self {
            client,
            read_timeout,
        }
    }

    /// Create a feed and return its id.
    pub async fn create(&self, kind: FeedKind) -> Result<String> {
        let response: IdResponse = self
            .client
            .post(
                Host::Agent,
                &format!("/agent/v4/{}/create", kind.as_str()),
                None::<()>,
                None,
            )
            .await?;
        Ok(response.id)
    }

    /// Block until the feed has events or the server's long poll expires.
    /// An expired poll yields an empty batch. Events that do not decode are
    /// logged and skipped; the rest of the batch is still returned.
    pub async fn read(&self, kind: FeedKind, feed_id: &str) -> Result<Vec<SymEvent>> {
        let batch: Option<Vec<Value>> = self
            .client
            .get(
                Host::Agent,
                &format!(
                    "/agent/v4/{}/{}/read",
                    kind.as_str(),
                    urlencoding::encode(feed_id)
                ),
                None,
                Some(RequestOptions::with_timeout(self.read_timeout)),
            )
            .await?;
        Ok(decode_batch(kind, batch.unwrap_or_default()))
    }

    pub async fn create_datafeed(&self) -> Result<String> {
        self.create(FeedKind::Datafeed).await
    }

    pub async fn read_datafeed(&self, feed_id: &str) -> Result<Vec<SymEvent>> {
        self.read(FeedKind::Datafeed, feed_id).await
    }

    pub async fn create_firehose(&self) -> Result<String> {
        self.create(FeedKind::Firehose).await
    }

    pub async fn read_firehose(&self, feed_id: &str) -> Result<Vec<SymEvent>> {
        self.read(FeedKind::Firehose, feed_id).await
    }
}

fn decode_batch(kind: FeedKind, batch: Vec<Value>) -> Vec<SymEvent> {
    batch
        .into_iter()
        .filter_map(|raw| {
            let event_id = raw.get("id").and_then(Value::as_str).map(ToOwned::to_owned);
            match serde_json::from_value::<SymEvent>(raw) {
                Ok(event) => Some(event),
                Err(error) => {
                    tracing::warn!(
                        target = "symphony::feed",
                        feed = kind.as_str(),
                        event_id = event_id.as_deref().unwrap_or(""),
                        error = %error,
                        "skipping undecodable event"
                    );
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{decode_batch, FeedKind};

    #[test]
    fn undecodable_events_are_skipped() {
        let batch = vec![
            json!({"id": "ok-1", "type": "ROOMCREATED"}),
            json!({"id": "no-type"}),
            json!({"id": "no-stream", "type": "MESSAGESENT", "payload": {"messageSent": {
                "message": {"messageId": "m2", "user": {"userId": 7}}
            }}}),
            json!("not an object"),
            json!({"id": "ok-2", "type": "USERJOINEDROOM"}),
        ];
        let ids: Vec<_> = decode_batch(FeedKind::Datafeed, batch)
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["ok-1", "ok-2"]);
    }
}
