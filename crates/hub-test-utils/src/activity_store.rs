//! In-memory user activity store.
//!
//! Holds one last-activity timestamp per user and answers
//! `count_users_active_since` the way the `users` table does. Every query is
//! recorded so tests can assert how often, and with which cutoff, a collector
//! hit the store.
//!
//! # Example
//!
//! ```rust,ignore
//! let store = InMemoryActivityStore::new()
//!     .with_user_active_at(now - chrono::Duration::minutes(5));
//!
//! store.set_failing(true);
//! assert!(store.count_users_active_since(now).await.is_err());
//! assert_eq!(store.query_count(), 1);
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hub_metrics::errors::MetricsError;
use hub_metrics::repositories::ActivityStore;
use std::sync::{Arc, Mutex};

/// In-memory activity store for collector tests.
///
/// Cheap to clone; clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryActivityStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    /// Last activity per user
    activity: Vec<DateTime<Utc>>,
    /// Cutoffs of every query received, in order
    cutoffs: Vec<DateTime<Utc>>,
    /// Fail every query with a persistence error
    failing: bool,
}

impl InMemoryActivityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one user last active at `at`.
    pub fn with_user_active_at(self, at: DateTime<Utc>) -> Self {
        self.record_activity(at);
        self
    }

    /// Add `count` users last active at `at`.
    pub fn with_users_active_at(self, count: usize, at: DateTime<Utc>) -> Self {
        for _ in 0..count {
            self.record_activity(at);
        }
        self
    }

    /// Add one user last active at `at`.
    pub fn record_activity(&self, at: DateTime<Utc>) {
        self.inner.lock().unwrap().activity.push(at);
    }

    /// Make every subsequent query fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.inner.lock().unwrap().failing = failing;
    }

    /// Number of queries received so far, failed ones included.
    pub fn query_count(&self) -> usize {
        self.inner.lock().unwrap().cutoffs.len()
    }

    /// Cutoffs of every query received so far.
    pub fn cutoffs(&self) -> Vec<DateTime<Utc>> {
        self.inner.lock().unwrap().cutoffs.clone()
    }
}

#[async_trait]
impl ActivityStore for InMemoryActivityStore {
    async fn count_users_active_since(&self, cutoff: DateTime<Utc>) -> Result<u64, MetricsError> {
        let mut inner = self.inner.lock().unwrap();
        inner.cutoffs.push(cutoff);

        if inner.failing {
            return Err(MetricsError::PersistenceQuery(
                "in-memory store configured to fail".to_string(),
            ));
        }

        Ok(inner.activity.iter().filter(|at| **at >= cutoff).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_counts_inclusive_cutoff() {
        let now = Utc::now();
        let store = InMemoryActivityStore::new()
            .with_user_active_at(now)
            .with_users_active_at(2, now - Duration::hours(1))
            .with_user_active_at(now - Duration::days(2));

        assert_eq!(store.count_users_active_since(now).await.unwrap(), 1);
        assert_eq!(
            store
                .count_users_active_since(now - Duration::hours(1))
                .await
                .unwrap(),
            3
        );
        assert_eq!(store.query_count(), 2);
    }

    #[tokio::test]
    async fn test_failing_store_still_records_query() {
        let store = InMemoryActivityStore::new();
        store.set_failing(true);

        let result = store.count_users_active_since(Utc::now()).await;

        assert!(matches!(result, Err(MetricsError::PersistenceQuery(_))));
        assert_eq!(store.query_count(), 1);
    }
}
