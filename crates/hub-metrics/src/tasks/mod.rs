//! Background tasks for the hub metrics.
//!
//! # Tasks
//!
//! - `active_users` - Recomputes the daily and monthly active-user gauges

pub mod active_users;

pub use active_users::{
    jittered_period, ActiveUserSnapshot, CollectorState, PeriodicMetricsCollector,
};
