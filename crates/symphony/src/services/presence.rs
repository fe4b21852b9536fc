use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;
use crate::listeners::PresenceListener;
use crate::presence::PresenceClient;
use crate::types::*;

/// Fans presence changes out and remembers the latest one per user.
pub struct PresenceService {
    client: PresenceClient,
    latest: RwLock<HashMap<UserId, SymPresence>>,
    listeners: RwLock<Vec<Arc<dyn PresenceListener>>>,
}

impl PresenceService {
    pub fn new(client: PresenceClient) -> Self {
        Self {
            client,
            latest: RwLock::new(HashMap::new()),
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn add_listener(&self, listener: Arc<dyn PresenceListener>) {
        self.listeners.write().push(listener);
    }

    pub fn remove_listener(&self, listener: &Arc<dyn PresenceListener>) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
        listeners.len() != before
    }

    /// Ask the pod to track users from other pods.
    pub async fn add_interest(&self, user_ids: &[UserId]) -> Result<()> {
        self.client.register_interest(user_ids).await
    }

    /// Last presence seen on the feed for a user.
    pub fn latest(&self, user_id: UserId) -> Option<SymPresence> {
        self.latest.read().get(&user_id).cloned()
    }

    pub(crate) async fn publish(&self, presence: &SymPresence) {
        if let Some(user_id) = presence.user_id {
            self.latest.write().insert(user_id, presence.clone());
        }
        let listeners = self.listeners.read().clone();
        for listener in listeners {
            listener.on_presence(presence).await;
        }
    }
}
