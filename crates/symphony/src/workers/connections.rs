use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::{is_shutdown, sleep_or_shutdown, with_jitter};
use crate::connections::ConnectionsClient;
use crate::services::ConnectionsService;

/// Polls pending incoming connection requests.
pub struct ConnectionsWorker {
    client: ConnectionsClient,
    service: Arc<ConnectionsService>,
    interval: Duration,
    retry_delay: Duration,
}

impl ConnectionsWorker {
    pub fn new(
        client: ConnectionsClient,
        service: Arc<ConnectionsService>,
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
        loop {
            if is_shutdown(&shutdown) {
                break;
            }
            let polled = tokio::select! {
                result = self.client.pending_connections() => result,
                _ = shutdown.changed() => break,
            };
            let delay = match polled {
                Ok(pending) => {
                    let fresh = self.service.handle_pending(&pending).await;
                    if fresh > 0 {
                        tracing::debug!(
                            target = "symphony::connections",
                            fresh,
                            "new connection requests"
                        );
                    }
                    self.interval
                }
                Err(error) => {
                    tracing::warn!(
                        target = "symphony::connections",
                        error = %error,
                        "failed to list pending connections"
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
