//! Periodic active-user collector.
//!
//! Recomputes `jupyterhub_daily_active_users` (activity in the last 24h) and
//! `jupyterhub_monthly_active_users` (last 30d) from persisted user activity.
//! Both gauges come from one cycle and are published together, so they always
//! describe a consistent snapshot.
//!
//! # Scheduling
//!
//! [`PeriodicMetricsCollector::start`] runs one update inline, then spawns a
//! task that fires once per configured period, stretched or shrunk by a
//! random jitter factor per tick so the query does not line up with other
//! periodic work.
//!
//! Each deadline is computed from the previous deadline, not from the end of
//! the previous cycle, so query time does not accumulate as drift. A cycle
//! that overruns its slot skips the missed ticks.
//!
//! # Failures
//!
//! A failed cycle is logged and the next tick still fires. There is no retry
//! within a cycle.
//!
//! # Graceful Shutdown
//!
//! The task supports graceful shutdown via a cancellation token. When the token
//! is cancelled, the task exits after its current iteration.

use crate::config::CollectorConfig;
use crate::errors::MetricsError;
use crate::observability::HubMetrics;
use crate::repositories::ActivityStore;
use chrono::{DateTime, Utc};
use rand::Rng;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

/// Window for `jupyterhub_daily_active_users`.
pub fn daily_window() -> chrono::Duration {
    chrono::Duration::days(1)
}

/// Window for `jupyterhub_monthly_active_users`.
pub fn monthly_window() -> chrono::Duration {
    chrono::Duration::days(30)
}

/// Latest active-user counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveUserSnapshot {
    pub daily: u64,
    pub monthly: u64,
    pub computed_at: DateTime<Utc>,
}

/// Collector lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorState {
    /// Constructed, timer not armed.
    Idle,
    /// Timer armed.
    Running,
    /// Timer task exited after cancellation. Terminal.
    Stopped,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<CollectorState>,
    latest: Mutex<Option<ActiveUserSnapshot>>,
}

/// Background collector for slowly-changing user gauges.
///
/// Cheap to clone; clones share lifecycle state and the latest snapshot.
#[derive(Clone)]
pub struct PeriodicMetricsCollector {
    config: CollectorConfig,
    store: Arc<dyn ActivityStore>,
    metrics: HubMetrics,
    shared: Arc<Shared>,
}

impl fmt::Debug for PeriodicMetricsCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeriodicMetricsCollector")
            .field("config", &self.config)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl PeriodicMetricsCollector {
    pub fn new(config: CollectorConfig, store: Arc<dyn ActivityStore>, metrics: HubMetrics) -> Self {
        Self {
            config,
            store,
            metrics,
            shared: Arc::new(Shared {
                state: Mutex::new(CollectorState::Idle),
                latest: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    pub fn state(&self) -> CollectorState {
        *self
            .shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Counts published by the most recent successful cycle.
    pub fn last_snapshot(&self) -> Option<ActiveUserSnapshot> {
        *self
            .shared
            .latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Start the periodic update process.
    ///
    /// - Disabled by configuration: no query, no timer, stays `Idle`, returns `None`.
    /// - Otherwise: runs one update before returning (a failure is logged, the
    ///   timer is armed regardless), spawns the tick loop and returns its handle.
    ///
    /// Calling `start` on a collector that already left `Idle` is a no-op.
    pub async fn start(&self, cancel_token: CancellationToken) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            info!(
                target: "hub.task.active_users",
                "Active users metrics disabled, collector not started"
            );
            return None;
        }

        {
            let mut state = self
                .shared
                .state
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if *state != CollectorState::Idle {
                warn!(
                    target: "hub.task.active_users",
                    state = ?*state,
                    "Active users collector already started"
                );
                return None;
            }
            *state = CollectorState::Running;
        }

        if let Err(e) = self.update().await {
            error!(
                target: "hub.task.active_users",
                error = %e,
                "Initial active users update failed"
            );
        }

        let collector = self.clone();
        Some(tokio::spawn(collector.run(cancel_token)))
    }

    /// Recompute and publish both gauges as of now.
    pub async fn update(&self) -> Result<ActiveUserSnapshot, MetricsError> {
        self.update_at(Utc::now()).await
    }

    /// Recompute and publish both gauges as of `now`.
    ///
    /// Read-only with respect to persisted state. Both queries complete before
    /// either gauge is written.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceQuery` if either count fails; the gauges keep their
    /// previous values.
    pub async fn update_at(&self, now: DateTime<Utc>) -> Result<ActiveUserSnapshot, MetricsError> {
        let daily_cutoff = now - daily_window();
        let monthly_cutoff = now - monthly_window();

        let daily = self.store.count_users_active_since(daily_cutoff).await?;
        let monthly = self.store.count_users_active_since(monthly_cutoff).await?;

        let snapshot = ActiveUserSnapshot {
            daily,
            monthly,
            computed_at: now,
        };

        {
            let mut latest = self
                .shared
                .latest
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            self.metrics.set_active_users(daily, monthly);
            *latest = Some(snapshot);
        }

        info!(
            target: "hub.task.active_users",
            daily_active_users = daily,
            "Found {} active users in the last 24h", daily
        );
        info!(
            target: "hub.task.active_users",
            monthly_active_users = monthly,
            "Found {} active users in the last 30d", monthly
        );

        Ok(snapshot)
    }

    #[instrument(skip_all, name = "hub.task.active_users")]
    async fn run(self, cancel_token: CancellationToken) {
        info!(
            target: "hub.task.active_users",
            period_seconds = self.config.period_seconds,
            jitter = self.config.jitter_fraction,
            "Starting active users collector task"
        );

        let mut next = Instant::now();

        loop {
            next += self.next_delay();
            let now = Instant::now();
            if next <= now {
                next = now + self.next_delay();
            }

            tokio::select! {
                _ = tokio::time::sleep_until(next) => {
                    if let Err(e) = self.update().await {
                        // Log error but continue - database might recover
                        error!(
                            target: "hub.task.active_users",
                            error = %e,
                            "Failed to update active users metrics"
                        );
                    }
                }
                _ = cancel_token.cancelled() => {
                    info!(
                        target: "hub.task.active_users",
                        "Active users collector received shutdown signal, exiting"
                    );
                    break;
                }
            }
        }

        *self
            .shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = CollectorState::Stopped;

        info!(
            target: "hub.task.active_users",
            "Active users collector task stopped"
        );
    }

    fn next_delay(&self) -> Duration {
        let sample: f64 = rand::thread_rng().gen();
        jittered_period(self.config.period(), self.config.jitter_fraction, sample)
    }
}

/// Scale `period` by `1 + jitter * (sample - 0.5)`.
///
/// `jitter` is clamped to `[0, 1]` and `sample` to `[0, 1]`; non-finite values
/// disable jitter. The result lies within `period * (1 ± jitter / 2)`. A
/// product that does not fit a `Duration` yields `period` unchanged.
pub fn jittered_period(period: Duration, jitter: f64, sample: f64) -> Duration {
    if !jitter.is_finite() || !sample.is_finite() || jitter <= 0.0 {
        return period;
    }
    let factor = 1.0 + jitter.min(1.0) * (sample.clamp(0.0, 1.0) - 0.5);
    Duration::try_from_secs_f64(period.as_secs_f64() * factor).unwrap_or(period)
}
