//! JupyterHub Metrics Library
//!
//! Prometheus instrumentation for the hub process:
//!
//! - A fixed catalog of counters, gauges and histograms under the
//!   `jupyterhub_` namespace
//! - A request hook that observes every completed HTTP request
//! - A periodic collector for daily and monthly active users
//!
//! Serving the text exposition format is left to the host; see
//! [`HubMetrics::install_prometheus`](observability::HubMetrics::install_prometheus).
//!
//! # Startup
//!
//! ```rust,ignore
//! let config = Config::from_env()?;
//! let (metrics, prometheus) = HubMetrics::install_prometheus()?;
//!
//! let collector = PeriodicMetricsCollector::new(
//!     config.collector.clone(),
//!     Arc::new(PgActivityStore::new(pool)),
//!     metrics.clone(),
//! );
//! let collector_handle = collector.start(cancel_token.child_token()).await;
//! ```
//!
//! # Modules
//!
//! - `config` - Collector configuration from environment
//! - `errors` - Registry and persistence errors
//! - `middleware` - Request instrumentation hook
//! - `observability` - Metric registry and hub catalog
//! - `repositories` - Read-only user activity queries
//! - `tasks` - Periodic collectors

pub mod config;
pub mod errors;
pub mod middleware;
pub mod observability;
pub mod repositories;
pub mod tasks;
