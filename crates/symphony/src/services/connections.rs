use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::connections::ConnectionsClient;
use crate::listeners::ConnectionsListener;
use crate::types::*;

/// Announces incoming connection requests once each and optionally accepts them.
pub struct ConnectionsService {
    client: ConnectionsClient,
    auto_accept: AtomicBool,
    notified: Mutex<HashSet<UserId>>,
    listeners: RwLock<Vec<Arc<dyn ConnectionsListener>>>,
}

impl ConnectionsService {
    pub fn new(client: ConnectionsClient, auto_accept: bool) -> Self {
        Self {
            client,
            auto_accept: AtomicBool::new(auto_accept),
            notified: Mutex::new(HashSet::new()),
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn add_listener(&self, listener: Arc<dyn ConnectionsListener>) {
        self.listeners.write().push(listener);
    }

    pub fn remove_listener(&self, listener: &Arc<dyn ConnectionsListener>) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
        listeners.len() != before
    }

    pub fn set_auto_accept(&self, enabled: bool) {
        self.auto_accept.store(enabled, Ordering::Relaxed);
    }

    pub fn auto_accept(&self) -> bool {
        self.auto_accept.load(Ordering::Relaxed)
    }

    /// A request from `user_id` seen on the datafeed.
    pub(crate) async fn handle_requested(&self, user_id: UserId) {
        if !self.notified.lock().insert(user_id) {
            return;
        }
        self.announce(user_id).await;
    }

    /// The current pending-incoming list from a poll. Requests no longer
    /// pending are forgotten so a later request is announced again.
    pub(crate) async fn handle_pending(&self, pending: &[SymUserConnection]) -> usize {
        let fresh: Vec<UserId> = {
            let mut notified = self.notified.lock();
            let pending_ids: HashSet<UserId> = pending.iter().map(|c| c.user_id).collect();
            notified.retain(|id| pending_ids.contains(id));
            pending
                .iter()
                .filter(|c| c.status == ConnectionStatus::PendingIncoming)
                .filter(|c| notified.insert(c.user_id))
                .map(|c| c.user_id)
                .collect()
        };
        for user_id in &fresh {
            self.announce(*user_id).await;
        }
        fresh.len()
    }

    pub(crate) async fn handle_accepted(&self, user_id: UserId) {
        self.notified.lock().remove(&user_id);
        let listeners = self.listeners.read().clone();
        for listener in listeners {
            listener.on_connection_accepted(user_id).await;
        }
    }

    async fn announce(&self, user_id: UserId) {
        tracing::debug!(target = "symphony::connections", user_id, "connection requested");
        let listeners = self.listeners.read().clone();
        for listener in listeners {
            listener.on_connection_requested(user_id).await;
        }
        if self.auto_accept() {
            match self.client.accept(user_id).await {
                Ok(_) => tracing::info!(
                    target = "symphony::connections",
                    user_id,
                    "auto-accepted connection"
                ),
                Err(error) => tracing::warn!(
                    target = "symphony::connections",
                    user_id,
                    error = %error,
                    "failed to auto-accept connection"
                ),
            }
        }
    }
}
