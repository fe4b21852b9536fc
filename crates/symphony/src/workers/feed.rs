use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::{is_shutdown, sleep_or_shutdown, with_jitter};
use crate::dispatch::Dispatcher;
use crate::feeds::{FeedClient, FeedKind};
use crate::messages::MessagesClient;
use crate::services::{ChatService, RoomService};

const RECOVERY_PAGE_SIZE: u32 = 100;

/// What a datafeed worker needs to replay messages missed while its feed
/// was down.
#[derive(Clone)]
pub struct Recovery {
    pub messages: MessagesClient,
    pub chats: Arc<ChatService>,
    pub rooms: Arc<RoomService>,
}

/// Long-polls a datafeed or firehose and hands every event to the dispatcher.
pub struct FeedWorker {
    feeds: FeedClient,
    kind: FeedKind,
    dispatcher: Arc<Dispatcher>,
    retry_delay: Duration,
    recovery: Option<Recovery>,
}

impl FeedWorker {
    pub fn new(
        feeds: FeedClient,
        kind: FeedKind,
        dispatcher: Arc<Dispatcher>,
        retry_delay: Duration,
    ) -> Self {
        Self {
            feeds,
            kind,
            dispatcher,
            retry_delay,
            recovery: None,
        }
    }

    /// Replay missed chat and room messages after the feed is re-created.
    /// Only meaningful for the datafeed.
    pub fn with_recovery(mut self, recovery: Recovery) -> Self {
        self.recovery = Some(recovery);
        self
    }

    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let kind = self.kind.as_str();
        let mut feed_id: Option<String> = None;
        let mut needs_recovery = false;

        loop {
            if is_shutdown(&shutdown) {
                break;
            }

            let id = match feed_id.clone() {
                Some(id) => id,
                None => {
                    let created = tokio::select! {
                        result = self.feeds.create(self.kind) => result,
                        _ = shutdown.changed() => break,
                    };
                    match created {
                        Ok(id) => {
                            tracing::info!(
                                target = "symphony::feed",
                                feed = kind,
                                feed_id = %id,
                                "feed created"
                            );
                            feed_id = Some(id.clone());
                            if needs_recovery {
                                needs_recovery = false;
                                tokio::select! {
                                    _ = self.recover() => {}
                                    _ = shutdown.changed() => break,
                                }
                            }
                            id
                        }
                        Err(error) => {
                            tracing::warn!(
                                target = "symphony::feed",
                                feed = kind,
                                error = %error,
                                "failed to create feed"
                            );
                            let delay = with_jitter(self.retry_delay);
                            if sleep_or_shutdown(delay, &mut shutdown).await {
                                break;
                            }
                            continue;
                        }
                    }
                }
            };

            let read = tokio::select! {
                result = self.feeds.read(self.kind, &id) => result,
                _ = shutdown.changed() => break,
            };
            match read {
                Ok(events) => {
                    if !events.is_empty() {
                        tracing::debug!(
                            target = "symphony::feed",
                            feed = kind,
                            count = events.len(),
                            "events received"
                        );
                    }
                    for event in &events {
                        match self.kind {
                            FeedKind::Datafeed => self.dispatcher.dispatch(event).await,
                            FeedKind::Firehose => self.dispatcher.dispatch_firehose(event).await,
                        };
                    }
                }
                Err(error) => {
                    tracing::warn!(
                        target = "symphony::feed",
                        feed = kind,
                        feed_id = %id,
                        error = %error,
                        "feed read failed, re-creating"
                    );
                    feed_id = None;
                    needs_recovery = true;
                    let delay = with_jitter(self.retry_delay);
                    if sleep_or_shutdown(delay, &mut shutdown).await {
                        break;
                    }
                }
            }
        }
    }

    async fn recover(&self) {
        let Some(recovery) = &self.recovery else {
            return;
        };
        let last = self.dispatcher.last_message_ts();
        if last == 0 {
            return;
        }
        let since = last - self.dispatcher.dedup_window_ms();
        let mut streams = recovery.chats.stream_ids();
        streams.extend(recovery.rooms.stream_ids());

        let mut replayed = 0usize;
        for stream_id in &streams {
            let mut skip = 0;
            loop {
                let page = match recovery
                    .messages
                    .get_messages(stream_id, since, Some(skip), Some(RECOVERY_PAGE_SIZE))
                    .await
                {
                    Ok(page) => page,
                    Err(error) => {
                        tracing::warn!(
                            target = "symphony::feed",
                            stream_id = %stream_id,
                            error = %error,
                            "failed to read messages for recovery"
                        );
                        break;
                    }
                };
                let fetched = page.len() as u32;
                for message in page {
                    if self.dispatcher.dispatch_recovered(message).await {
                        replayed += 1;
                    }
                }
                if fetched < RECOVERY_PAGE_SIZE {
                    break;
                }
                skip += fetched;
            }
        }
        tracing::info!(
            target = "symphony::feed",
            streams = streams.len(),
            replayed,
            "recovered missed messages"
        );
    }
}
