use std::collections::HashSet;

use async_trait::async_trait;
use symphony::{PresenceListener, SymPresence, UserId};

/// Logs presence changes, optionally for a fixed set of users.
pub struct PresenceLogger {
    users: HashSet<UserId>,
}

impl PresenceLogger {
    /// An empty list follows every user.
    pub fn new(users: &[UserId]) -> Self {
        Self {
            users: users.iter().copied().collect(),
        }
    }

    pub fn follows(&self, presence: &SymPresence) -> bool {
        if self.users.is_empty() {
            return true;
        }
        presence
            .user_id
            .is_some_and(|id| self.users.contains(&id))
    }
}

#[async_trait]
impl PresenceListener for PresenceLogger {
    async fn on_presence(&self, presence: &SymPresence) {
        if !self.follows(presence) {
            return;
        }
        tracing::info!(
            target = "symphony_bot::presence",
            user_id = ?presence.user_id,
            category = ?presence.category,
            timestamp = ?presence.timestamp,
            "presence changed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::PresenceLogger;
    use symphony::{PresenceCategory, SymPresence};

    fn presence(user_id: Option<i64>) -> SymPresence {
        SymPresence {
            category: PresenceCategory::Busy,
            user_id,
            timestamp: None,
        }
    }

    #[test]
    fn empty_filter_follows_everyone() {
        let logger = PresenceLogger::new(&[]);
        assert!(logger.follows(&presence(Some(3))));
        assert!(logger.follows(&presence(None)));
    }

    #[test]
    fn filter_limits_to_listed_users() {
        let logger = PresenceLogger::new(&[7, 8]);
        assert!(logger.follows(&presence(Some(7))));
        assert!(!logger.follows(&presence(Some(9))));
        assert!(!logger.follows(&presence(None)));
    }
}
