//! # Hub Test Utilities
//!
//! Shared test utilities for the hub metrics crate.
//!
//! ## Modules
//!
//! - `activity_store` - In-memory [`ActivityStore`](hub_metrics::repositories::ActivityStore)
//! - `metrics_probe` - Recorder-backed catalog plus snapshot lookups
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hub_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() {
//!     let now = Utc::now();
//!     let store = InMemoryActivityStore::new()
//!         .with_users_active_at(3, now - chrono::Duration::hours(2))
//!         .with_users_active_at(5, now - chrono::Duration::days(10));
//!
//!     let (metrics, probe) = debugging_metrics();
//!     // ... run collector ...
//!     assert_eq!(probe.snapshot().gauge("jupyterhub_daily_active_users"), Some(3.0));
//! }
//! ```

pub mod activity_store;
pub mod metrics_probe;

pub use activity_store::*;
pub use metrics_probe::*;
