use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::{is_shutdown, sleep_or_shutdown, with_jitter};
use crate::presence::PresenceClient;
use crate::services::PresenceService;

/// Polls a presence feed and publishes changes to the presence service.
pub struct PresenceWorker {
    client: PresenceClient,
    service: Arc<PresenceService>,
    interval: Duration,
    retry_delay: Duration,
}

impl PresenceWorker {
    pub fn new(
        client: PresenceClient,
        service: Arc<PresenceService>,
        interval: Duration,
        retry_delay: Duration,
    ) -> Self {
        Self {
            client,
            service,
            interval,
            retry_delay,
        }
    }

    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut feed_id: Option<String> = None;

        loop {
            if is_shutdown(&shutdown) {
                break;
            }

            let id = match feed_id.clone() {
                Some(id) => id,
                None => {
                    let created = tokio::select! {
                        result = self.client.create_presence_feed() => result,
                        _ = shutdown.changed() => break,
                    };
                    match created {
                        Ok(id) => {
                            tracing::info!(
                                target = "symphony::presence",
                                feed_id = %id,
                                "presence feed created"
                            );
                            feed_id = Some(id.clone());
                            id
                        }
                        Err(error) => {
                            tracing::warn!(
                                target = "symphony::presence",
                                error = %error,
                                "failed to create presence feed"
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
                result = self.client.read_presence_feed(&id) => result,
                _ = shutdown.changed() => break,
            };
            let delay = match read {
                Ok(changes) => {
                    for presence in &changes {
                        self.service.publish(presence).await;
                    }
                    self.interval
                }
                Err(error) => {
                    tracing::warn!(
                        target = "symphony::presence",
                        feed_id = %id,
                        error = %error,
                        "presence feed read failed, re-creating"
                    );
                    feed_id = None;
                    with_jitter(self.retry_delay)
                }
            };
            if sleep_or_shutdown(delay, &mut shutdown).await {
                break;
            }
        }

        if let Some(id) = feed_id {
            if let Err(error) = self.client.delete_presence_feed(&id).await {
                tracing::debug!(
                    target = "symphony::presence",
                    feed_id = %id,
                    error = %error,
                    "failed to delete presence feed"
                );
            }
        }
    }
}
