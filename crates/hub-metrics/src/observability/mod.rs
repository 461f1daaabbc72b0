//! Observability module for the hub.
//!
//! Provides the metric registry, the hub metric catalog and the closed status
//! enumerations used by `status`-labelled metrics.

pub mod catalog;
pub mod registry;
pub mod status;

pub use catalog::{HubMetrics, CATALOG};
pub use registry::{MetricDefinition, MetricHandle, MetricKind, MetricsRegistry, METRIC_PREFIX};
pub use status::{
    ProxyAddStatus, ProxyDeleteStatus, ServerPollStatus, ServerSpawnStatus, ServerStopStatus,
    StatusLabel,
};
