use std::{
    borrow::Borrow,
    collections::{HashMap, VecDeque},
    hash::Hash,
    time::{Duration, Instant},
};

use parking_lot::Mutex;

use crate::types::{SymUser, UserId};

/// Time- and size-bounded map. Entries expire `ttl` after their last insert;
/// when full, the entry inserted longest ago is evicted first.
///
/// Expiry order is kept in a queue of `(key, inserted)` slots. Refreshing a
/// key leaves its older slot behind; slots that no longer match the entry
/// are skipped on eviction and dropped when the queue is compacted.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    max_entries: usize,
    entries: HashMap<K, (V, Instant)>,
    order: VecDeque<(K, Instant)>,
}

impl<K: Eq + Hash + Clone, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get<Q>(&mut self, key: &Q, now: Instant) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.evict(now);
        self.entries.get(key).map(|(value, _)| value.clone())
    }

    /// Whether `key` is live at `now`.
    pub fn contains<Q>(&mut self, key: &Q, now: Instant) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.evict(now);
        self.entries.contains_key(key)
    }

    /// Insert or refresh `key`.
    pub fn insert(&mut self, key: K, value: V, now: Instant) {
        self.evict(now);
        if self.max_entries == 0 {
            return;
        }
        if let Some((_, inserted)) = self.entries.get(&key) {
            // Same instant: the existing slot still matches, no new one needed.
            if *inserted == now {
                self.entries.insert(key, (value, now));
                return;
            }
        }
        self.entries.insert(key.clone(), (value, now));
        self.order.push_back((key, now));

        while self.entries.len() > self.max_entries {
            let Some((old_key, inserted)) = self.order.pop_front() else {
                break;
            };
            if self.is_live_slot(&old_key, inserted) {
                self.entries.remove(&old_key);
            }
        }
        if self.order.len() > self.entries.len() * 2 + 16 {
            self.compact();
        }
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.remove(key).map(|(value, _)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn is_live_slot(&self, key: &K, inserted: Instant) -> bool {
        self.entries
            .get(key)
            .is_some_and(|(_, ts)| *ts == inserted)
    }

    fn evict(&mut self, now: Instant) {
        while let Some((key, ts)) = self.order.front().cloned() {
            if now.duration_since(ts) < self.ttl {
                break;
            }
            self.order.pop_front();
            if self.is_live_slot(&key, ts) {
                self.entries.remove(&key);
            }
        }
    }

    /// Drop queue slots left behind by refreshed or removed entries.
    fn compact(&mut self) {
        let entries = &self.entries;
        self.order
            .retain(|(key, ts)| entries.get(key).is_some_and(|(_, inserted)| inserted == ts));
    }

    #[cfg(test)]
    fn queued(&self) -> usize {
        self.order.len()
    }
}

/// Shared user lookup cache keyed by id and by lower-cased email.
#[derive(Debug)]
pub struct UserCache {
    by_id: Mutex<TtlCache<UserId, SymUser>>,
    by_email: Mutex<TtlCache<String, SymUser>>,
}

impl UserCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            by_id: Mutex::new(TtlCache::new(ttl, max_entries)),
            by_email: Mutex::new(TtlCache::new(ttl, max_entries)),
        }
    }

    pub fn get_by_id(&self, id: UserId) -> Option<SymUser> {
        self.by_id.lock().get(&id, Instant::now())
    }

    pub fn get_by_email(&self, email: &str) -> Option<SymUser> {
        self.by_email
            .lock()
            .get(&email.to_lowercase(), Instant::now())
    }

    pub fn put(&self, user: &SymUser) {
        let now = Instant::now();
        self.by_id.lock().insert(user.id, user.clone(), now);
        if let Some(email) = &user.email {
            self.by_email
                .lock()
                .insert(email.to_lowercase(), user.clone(), now);
        }
    }

    pub fn invalidate(&self, id: UserId) {
        if let Some(user) = self.by_id.lock().remove(&id) {
            if let Some(email) = user.email {
                self.by_email.lock().remove(&email.to_lowercase());
            }
        }
    }

    pub fn clear(&self) {
        self.by_id.lock().clear();
        self.by_email.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{TtlCache, UserCache};
    use crate::types::SymUser;

    #[test]
    fn expires_after_ttl() {
        let mut cache = TtlCache::new(Duration::from_secs(5), 10);
        let now = Instant::now();
        cache.insert("a", 1, now);
        assert_eq!(cache.get(&"a", now + Duration::from_secs(4)), Some(1));
        assert_eq!(cache.get(&"a", now + Duration::from_secs(6)), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn remains_bounded() {
        let mut cache = TtlCache::new(Duration::from_secs(60), 2);
        let now = Instant::now();
        cache.insert("a", 1, now);
        cache.insert("b", 2, now);
        cache.insert("c", 3, now);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"a", now), None);
        assert_eq!(cache.get(&"c", now), Some(3));
    }

    #[test]
    fn reinsert_refreshes_expiry() {
        let mut cache = TtlCache::new(Duration::from_secs(5), 10);
        let now = Instant::now();
        cache.insert("a", 1, now);
        cache.insert("a", 2, now + Duration::from_secs(4));
        assert_eq!(cache.get(&"a", now + Duration::from_secs(6)), Some(2));
    }

    #[test]
    fn refreshing_a_key_keeps_the_queue_bounded() {
        let mut cache = TtlCache::new(Duration::from_secs(60), 10);
        let start = Instant::now();
        for i in 0..1_000u64 {
            cache.insert("hot", i, start + Duration::from_millis(i));
        }
        assert_eq!(cache.len(), 1);
        assert!(cache.queued() <= 2 * cache.len() + 17);
        assert_eq!(cache.get(&"hot", start + Duration::from_millis(1_000)), Some(999));
    }

    #[test]
    fn user_cache_indexes_email_case_insensitively() {
        let cache = UserCache::new(Duration::from_secs(60), 10);
        let user = SymUser {
            id: 42,
            email: Some("Bot@Example.com".into()),
            ..Default::default()
        };
        cache.put(&user);
        assert_eq!(cache.get_by_email("bot@example.com").map(|u| u.id), Some(42));
        cache.invalidate(42);
        assert!(cache.get_by_id(42).is_none());
        assert!(cache.get_by_email("bot@example.com").is_none());
    }
}
