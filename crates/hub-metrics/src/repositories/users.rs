//! User activity repository.
//!
//! Answers "how many users were active since T" from the `users` table's
//! `last_activity` column.
//!
//! # Security
//!
//! - Queries are parameterized (SQL injection safe)
//! - Read-only; no user data leaves this module, only counts

use crate::errors::MetricsError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

/// Read-only view of persisted user activity.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Count users whose last activity is at or after `cutoff`.
    async fn count_users_active_since(&self, cutoff: DateTime<Utc>) -> Result<u64, MetricsError>;
}

/// PostgreSQL-backed activity store.
///
/// Query timeouts are the pool's concern (`statement_timeout` on the
/// connection URL, acquire timeout on the pool).
#[derive(Debug, Clone)]
pub struct PgActivityStore {
    pool: PgPool,
}

impl PgActivityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityStore for PgActivityStore {
    #[instrument(skip_all, name = "hub.db.count_active_users", fields(cutoff = %cutoff))]
    async fn count_users_active_since(&self, cutoff: DateTime<Utc>) -> Result<u64, MetricsError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM users
            WHERE last_activity >= $1
            "#,
        )
        .bind(cutoff)
        .fetch_one(&self.pool)
        .await?;

        // COUNT(*) is never negative
        Ok(u64::try_from(count).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pg_store_is_object_safe() {
        fn assert_store<T: ActivityStore + Clone + 'static>() {}
        assert_store::<PgActivityStore>();

        // Collectors hold the store as a trait object
        fn accepts(_: &dyn ActivityStore) {}
        let _ = accepts;
    }
}
