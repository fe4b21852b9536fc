use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::{is_shutdown, sleep_or_shutdown, with_jitter};
use crate::services::RoomService;
use crate::streams::StreamsClient;
use crate::types::StreamType;

/// Periodically reconciles the room service with the rooms the bot belongs to.
pub struct RoomWorker {
    streams: StreamsClient,
    rooms: Arc<RoomService>,
    interval: Duration,
    retry_delay: Duration,
}

impl RoomWorker {
    pub fn new(
        streams: StreamsClient,
        rooms: Arc<RoomService>,
        interval: Duration,
        retry_delay: Duration,
    ) -> Self {
        Self {
            streams,
            rooms,
            interval,
            retry_delay,
        }
    }

    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        loop {
            if is_shutdown(&shutdown) {
                break;
            }
            let listed = tokio::select! {
                result = self.streams.user_streams(&[StreamType::Room], false) => result,
                _ = shutdown.changed() => break,
            };
            let delay = match listed {
                Ok(listed) => {
                    let outcome = self.rooms.sync(&listed).await;
                    for stream_id in &outcome.added {
                        // Attributes are not part of the stream list.
                        if let Err(error) = self.rooms.load_room(stream_id).await {
                            tracing::debug!(
                                target = "symphony::room",
                                stream_id = %stream_id,
                                error = %error,
                                "failed to load room info"
                            );
                        }
                    }
                    if !outcome.added.is_empty() || !outcome.removed.is_empty() {
                        tracing::info!(
                            target = "symphony::room",
                            added = outcome.added.len(),
                            removed = outcome.removed.len(),
                            "room list synchronised"
                        );
                    }
                    self.interval
                }
                Err(error) => {
                    tracing::warn!(
                        target = "symphony::room",
                        error = %error,
                        "failed to list rooms"
                    );
                    with_jitter(self.retry_delay)
                }
            };
            if sleep_or_shutdown(delay, &mut shutdown).await {
                break;
            }
        }
    }
}
