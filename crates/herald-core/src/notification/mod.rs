//! Append-only notification store.

pub mod model;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{HeraldError, HeraldResult};
use model::Notification;

#[derive(Default)]
struct StoreInner {
    entries: Vec<Arc<Notification>>,
    index: HashMap<String, usize>,
    last_id: u64,
}

/// Ordered, id-indexed notification history.
///
/// Ids are derived from the creation timestamp in nanoseconds and bumped past
/// the previous id when the clock has not advanced, so they are unique and
/// strictly increasing in insertion order.
#[derive(Default)]
pub struct NotificationStore {
    inner: RwLock<StoreInner>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and store a notification.
    pub fn append(&self, title: impl Into<String>, body: impl Into<String>) -> Arc<Notification> {
        let (title, body) = (title.into(), body.into());
        let mut inner = self.inner.write();

        let created_at = Utc::now();
        let id = next_id(inner.last_id, created_at);
        inner.last_id = id;

        let notification = Arc::new(Notification {
            id: id.to_string(),
            title,
            body,
            created_at,
        });

        let position = inner.entries.len();
        let previous = inner.index.insert(notification.id.clone(), position);
        assert!(previous.is_none(), "duplicate notification id {}", notification.id);
        inner.entries.push(Arc::clone(&notification));

        notification
    }

    /// Look up a notification by id.
    pub fn get(&self, id: &str) -> HeraldResult<Arc<Notification>> {
        let inner = self.inner.read();
        inner
            .index
            .get(id)
            .map(|&position| Arc::clone(&inner.entries[position]))
            .ok_or_else(|| HeraldError::NotificationNotFound(id.to_string()))
    }

    /// Snapshot of every notification in insertion order.
    pub fn list(&self) -> Vec<Arc<Notification>> {
        self.inner.read().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn next_id(last: u64, now: DateTime<Utc>) -> u64 {
    let from_clock = now
        .timestamp_nanos_opt()
        .and_then(|nanos| u64::try_from(nanos).ok())
        .unwrap_or(0);
    from_clock.max(last.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn test_append_and_get() {
        let store = NotificationStore::new();
        let created = store.append("T", "B");

        let fetched = store.get(&created.id).unwrap();
        assert_eq!(fetched.title, "T");
        assert_eq!(fetched.body, "B");
        assert_eq!(fetched.created_at, created.created_at);
        assert!(fetched.created_at <= Utc::now());
    }

    #[test]
    fn test_get_unknown_id() {
        let store = NotificationStore::new();
        store.append("T", "B");

        let err = store.get("does-not-exist").unwrap_err();
        assert!(matches!(err, HeraldError::NotificationNotFound(id) if id == "does-not-exist"));
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let store = NotificationStore::new();
        for i in 0..5 {
            store.append(format!("title {}", i), "body");
        }

        let titles: Vec<String> = store.list().iter().map(|n| n.title.clone()).collect();
        assert_eq!(titles, vec!["title 0", "title 1", "title 2", "title 3", "title 4"]);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_list_is_a_snapshot() {
        let store = NotificationStore::new();
        store.append("first", "");
        let snapshot = store.list();
        store.append("second", "");

        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_ids_strictly_increase() {
        let store = NotificationStore::new();
        let ids: Vec<u64> = (0..100)
            .map(|_| store.append("t", "b").id.parse().unwrap())
            .collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_next_id_bumps_past_stalled_clock() {
        let now = Utc::now();
        let first = next_id(0, now);
        assert_eq!(next_id(first, now), first + 1);
        assert_eq!(next_id(u64::MAX - 1, now), u64::MAX);
    }

    #[test]
    fn test_concurrent_appends_lose_nothing() {
        let store = Arc::new(NotificationStore::new());
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..250 {
                        store.append(format!("{}-{}", worker, i), "body");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let all = store.list();
        assert_eq!(all.len(), 2000);

        let ids: HashSet<&str> = all.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids.len(), 2000);

        // Per-worker order survives the interleaving.
        for worker in 0..8 {
            let prefix = format!("{}-", worker);
            let seq: Vec<usize> = all
                .iter()
                .filter_map(|n| n.title.strip_prefix(&prefix))
                .map(|i| i.parse().unwrap())
                .collect();
            assert_eq!(seq, (0..250).collect::<Vec<_>>());
        }
    }
}
