//! Hub metric catalog.
//!
//! All metrics follow Prometheus naming conventions,
//! `jupyterhub_<noun>_<verb>_<type_suffix>`:
//! - `jupyterhub_` prefix for every hub metric
//! - `_seconds` suffix for duration histograms
//!
//! Names, label schemas and bucket boundaries are part of the scrape contract
//! and must not change.
//!
//! # Cardinality
//!
//! - `status`: closed enums from [`super::status`]
//! - `method`: HTTP methods
//! - `handler`: fully-qualified handler path, bounded by the route table
//! - `code`: HTTP status codes
//!
//! # Startup exposition
//!
//! Status-labelled and label-less series exist from [`HubMetrics::initialize`]
//! on. `jupyterhub_request_duration_seconds` has no series, and therefore no
//! `# HELP` / `# TYPE` lines, until the first request completes.

use super::registry::{MetricDefinition, MetricHandle, MetricKind, MetricsRegistry};
use super::status::{
    ProxyAddStatus, ProxyDeleteStatus, ServerPollStatus, ServerSpawnStatus, ServerStopStatus,
    StatusLabel,
};
use crate::errors::MetricsError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Spawns can take a while, so the default sub-second buckets do not fit.
pub const SERVER_SPAWN_BUCKETS: &[f64] = &[
    0.5,
    1.0,
    2.5,
    5.0,
    10.0,
    15.0,
    30.0,
    60.0,
    120.0,
    f64::INFINITY,
];

pub const REQUEST_DURATION_SECONDS: MetricDefinition = MetricDefinition::histogram(
    "jupyterhub_request_duration_seconds",
    "request duration for all HTTP requests",
    &["method", "handler", "code"],
);

pub const SERVER_SPAWN_DURATION_SECONDS: MetricDefinition = MetricDefinition::histogram(
    "jupyterhub_server_spawn_duration_seconds",
    "time taken for server spawning operation",
    &["status"],
)
.with_buckets(SERVER_SPAWN_BUCKETS);

pub const RUNNING_SERVERS: MetricDefinition = MetricDefinition::gauge(
    "jupyterhub_running_servers",
    "the number of user servers currently running",
    &[],
);

pub const TOTAL_USERS: MetricDefinition =
    MetricDefinition::gauge("jupyterhub_total_users", "total number of users", &[]);

pub const DAILY_ACTIVE_USERS: MetricDefinition = MetricDefinition::gauge(
    "jupyterhub_daily_active_users",
    "number of users who were active in the last 24h",
    &[],
);

pub const MONTHLY_ACTIVE_USERS: MetricDefinition = MetricDefinition::gauge(
    "jupyterhub_monthly_active_users",
    "number of users who were active in the last 30d",
    &[],
);

pub const CHECK_ROUTES_DURATION_SECONDS: MetricDefinition = MetricDefinition::histogram(
    "jupyterhub_check_routes_duration_seconds",
    "Time taken to validate all routes in proxy",
    &[],
);

pub const HUB_STARTUP_DURATION_SECONDS: MetricDefinition = MetricDefinition::histogram(
    "jupyterhub_hub_startup_duration_seconds",
    "Time taken for Hub to start",
    &[],
);

pub const INIT_SPAWNERS_DURATION_SECONDS: MetricDefinition = MetricDefinition::histogram(
    "jupyterhub_init_spawners_duration_seconds",
    "Time taken for spawners to initialize",
    &[],
);

pub const PROXY_POLL_DURATION_SECONDS: MetricDefinition = MetricDefinition::histogram(
    "jupyterhub_proxy_poll_duration_seconds",
    "duration for polling all routes from proxy",
    &[],
);

pub const PROXY_ADD_DURATION_SECONDS: MetricDefinition = MetricDefinition::histogram(
    "jupyterhub_proxy_add_duration_seconds",
    "duration for adding user routes to proxy",
    &["status"],
);

pub const SERVER_POLL_DURATION_SECONDS: MetricDefinition = MetricDefinition::histogram(
    "jupyterhub_server_poll_duration_seconds",
    "time taken to poll if server is running",
    &["status"],
);

pub const SERVER_STOP_DURATION_SECONDS: MetricDefinition = MetricDefinition::histogram(
    "jupyterhub_server_stop_seconds",
    "time taken for server stopping operation",
    &["status"],
);

pub const PROXY_DELETE_DURATION_SECONDS: MetricDefinition = MetricDefinition::histogram(
    "jupyterhub_proxy_delete_duration_seconds",
    "duration for deleting user routes from proxy",
    &["status"],
);

/// Every metric the hub exports.
pub const CATALOG: &[MetricDefinition] = &[
    REQUEST_DURATION_SECONDS,
    SERVER_SPAWN_DURATION_SECONDS,
    RUNNING_SERVERS,
    TOTAL_USERS,
    DAILY_ACTIVE_USERS,
    MONTHLY_ACTIVE_USERS,
    CHECK_ROUTES_DURATION_SECONDS,
    HUB_STARTUP_DURATION_SECONDS,
    INIT_SPAWNERS_DURATION_SECONDS,
    PROXY_POLL_DURATION_SECONDS,
    PROXY_ADD_DURATION_SECONDS,
    SERVER_POLL_DURATION_SECONDS,
    SERVER_STOP_DURATION_SECONDS,
    PROXY_DELETE_DURATION_SECONDS,
];

/// Typed recording surface over the hub catalog.
///
/// The only way to obtain one is [`HubMetrics::initialize`], which defines
/// the catalog and materializes every status series first. Anything holding
/// a `HubMetrics` can therefore rely on all series already existing.
///
/// Cheap to clone; clones share the registry.
#[derive(Debug, Clone)]
pub struct HubMetrics {
    registry: Arc<MetricsRegistry>,
    request_duration: MetricHandle,
    server_spawn: MetricHandle,
    running_servers: MetricHandle,
    total_users: MetricHandle,
    daily_active_users: MetricHandle,
    monthly_active_users: MetricHandle,
    check_routes: MetricHandle,
    hub_startup: MetricHandle,
    init_spawners: MetricHandle,
    proxy_poll: MetricHandle,
    proxy_add: MetricHandle,
    server_poll: MetricHandle,
    server_stop: MetricHandle,
    proxy_delete: MetricHandle,
}

impl HubMetrics {
    /// Define the catalog on `registry` and materialize its series.
    ///
    /// Must run during startup, before the request hook or the periodic
    /// collector can observe anything.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateMetric` if `registry` already holds a catalog name
    /// with a different schema. Initialization must abort in that case.
    pub fn initialize(registry: Arc<MetricsRegistry>) -> Result<Self, MetricsError> {
        let metrics = Self {
            request_duration: registry.define(REQUEST_DURATION_SECONDS)?,
            server_spawn: registry.define(SERVER_SPAWN_DURATION_SECONDS)?,
            running_servers: registry.define(RUNNING_SERVERS)?,
            total_users: registry.define(TOTAL_USERS)?,
            daily_active_users: registry.define(DAILY_ACTIVE_USERS)?,
            monthly_active_users: registry.define(MONTHLY_ACTIVE_USERS)?,
            check_routes: registry.define(CHECK_ROUTES_DURATION_SECONDS)?,
            hub_startup: registry.define(HUB_STARTUP_DURATION_SECONDS)?,
            init_spawners: registry.define(INIT_SPAWNERS_DURATION_SECONDS)?,
            proxy_poll: registry.define(PROXY_POLL_DURATION_SECONDS)?,
            proxy_add: registry.define(PROXY_ADD_DURATION_SECONDS)?,
            server_poll: registry.define(SERVER_POLL_DURATION_SECONDS)?,
            server_stop: registry.define(SERVER_STOP_DURATION_SECONDS)?,
            proxy_delete: registry.define(PROXY_DELETE_DURATION_SECONDS)?,
            registry,
        };

        let mut series = 0;
        series += metrics.materialize::<ServerSpawnStatus>(&metrics.server_spawn)?;
        series += metrics.materialize::<ProxyAddStatus>(&metrics.proxy_add)?;
        series += metrics.materialize::<ServerPollStatus>(&metrics.server_poll)?;
        series += metrics.materialize::<ServerStopStatus>(&metrics.server_stop)?;
        series += metrics.materialize::<ProxyDeleteStatus>(&metrics.proxy_delete)?;

        // Label-less metrics have exactly one series; expose it from the start
        for handle in metrics.unlabelled() {
            metrics.registry.touch(handle, &[])?;
            series += 1;
        }

        info!(
            target: "hub.metrics",
            metrics = CATALOG.len(),
            series,
            "Hub metrics initialized"
        );

        Ok(metrics)
    }

    /// Build a Prometheus-backed registry and initialize the catalog on it.
    ///
    /// The returned handle renders the text exposition format; serving it is
    /// up to the host.
    pub fn install_prometheus() -> Result<(Self, PrometheusHandle), MetricsError> {
        let (registry, handle) = MetricsRegistry::prometheus(CATALOG)?;
        let metrics = Self::initialize(Arc::new(registry))?;
        Ok((metrics, handle))
    }

    pub fn registry(&self) -> &Arc<MetricsRegistry> {
        &self.registry
    }

    fn materialize<S: StatusLabel>(&self, handle: &MetricHandle) -> Result<usize, MetricsError> {
        for status in S::ALL {
            self.registry.touch(handle, &[("status", status.as_str())])?;
        }
        Ok(S::ALL.len())
    }

    fn unlabelled(&self) -> [&MetricHandle; 8] {
        [
            &self.running_servers,
            &self.total_users,
            &self.daily_active_users,
            &self.monthly_active_users,
            &self.check_routes,
            &self.hub_startup,
            &self.init_spawners,
            &self.proxy_poll,
        ]
    }

    // ========================================================================
    // HTTP Request Metrics
    // ========================================================================

    /// Record one completed HTTP request.
    ///
    /// Metric: `jupyterhub_request_duration_seconds`
    /// Labels: `method`, `handler`, `code`
    ///
    /// Unlike the other recorders this returns the error, so the request hook
    /// can decide how to swallow it.
    pub fn record_request(
        &self,
        method: &str,
        handler: &str,
        code: u16,
        seconds: f64,
    ) -> Result<(), MetricsError> {
        let code = code.to_string();
        self.registry.observe(
            &self.request_duration,
            &[("method", method), ("handler", handler), ("code", &code)],
            seconds,
        )
    }

    // ========================================================================
    // Spawner and Proxy Metrics
    // ========================================================================

    /// Metric: `jupyterhub_server_spawn_duration_seconds`
    pub fn record_server_spawn(&self, status: ServerSpawnStatus, duration: Duration) {
        self.observe_status(&self.server_spawn, status, duration);
    }

    /// Metric: `jupyterhub_proxy_add_duration_seconds`
    pub fn record_proxy_add(&self, status: ProxyAddStatus, duration: Duration) {
        self.observe_status(&self.proxy_add, status, duration);
    }

    /// Metric: `jupyterhub_server_poll_duration_seconds`
    pub fn record_server_poll(&self, status: ServerPollStatus, duration: Duration) {
        self.observe_status(&self.server_poll, status, duration);
    }

    /// Metric: `jupyterhub_server_stop_seconds`
    pub fn record_server_stop(&self, status: ServerStopStatus, duration: Duration) {
        self.observe_status(&self.server_stop, status, duration);
    }

    /// Metric: `jupyterhub_proxy_delete_duration_seconds`
    pub fn record_proxy_delete(&self, status: ProxyDeleteStatus, duration: Duration) {
        self.observe_status(&self.proxy_delete, status, duration);
    }

    /// Metric: `jupyterhub_check_routes_duration_seconds`
    pub fn record_check_routes(&self, duration: Duration) {
        self.observe_plain(&self.check_routes, duration);
    }

    /// Metric: `jupyterhub_proxy_poll_duration_seconds`
    pub fn record_proxy_poll(&self, duration: Duration) {
        self.observe_plain(&self.proxy_poll, duration);
    }

    // ========================================================================
    // Lifecycle Metrics
    // ========================================================================

    /// Metric: `jupyterhub_hub_startup_duration_seconds`
    pub fn record_hub_startup(&self, duration: Duration) {
        self.observe_plain(&self.hub_startup, duration);
    }

    /// Metric: `jupyterhub_init_spawners_duration_seconds`
    pub fn record_init_spawners(&self, duration: Duration) {
        self.observe_plain(&self.init_spawners, duration);
    }

    // ========================================================================
    // Gauges
    // ========================================================================

    /// Metric: `jupyterhub_running_servers`
    pub fn set_running_servers(&self, count: u64) {
        report(
            self.running_servers.name(),
            self.registry.set(&self.running_servers, &[], count as f64),
        );
    }

    /// Metric: `jupyterhub_total_users`
    pub fn set_total_users(&self, count: u64) {
        report(
            self.total_users.name(),
            self.registry.set(&self.total_users, &[], count as f64),
        );
    }

    /// Publish both active-user gauges back to back.
    ///
    /// Metrics: `jupyterhub_daily_active_users`, `jupyterhub_monthly_active_users`
    ///
    /// No suspension point sits between the two writes, so an exporter never
    /// sees them from different collector cycles.
    pub fn set_active_users(&self, daily: u64, monthly: u64) {
        report(
            self.daily_active_users.name(),
            self.registry.set(&self.daily_active_users, &[], daily as f64),
        );
        report(
            self.monthly_active_users.name(),
            self.registry
                .set(&self.monthly_active_users, &[], monthly as f64),
        );
    }

    fn observe_status<S: StatusLabel>(&self, handle: &MetricHandle, status: S, duration: Duration) {
        report(
            handle.name(),
            self.registry.observe(
                handle,
                &[("status", status.as_str())],
                duration.as_secs_f64(),
            ),
        );
    }

    fn observe_plain(&self, handle: &MetricHandle, duration: Duration) {
        debug_assert_eq!(handle.kind(), MetricKind::Histogram);
        report(
            handle.name(),
            self.registry.observe(handle, &[], duration.as_secs_f64()),
        );
    }
}

/// Surface a registry error loudly without failing the caller.
///
/// Typed recorders cannot produce schema errors, so any error here is a bug:
/// debug builds stop on it, release builds log it.
fn report(metric: &'static str, result: Result<(), MetricsError>) {
    debug_assert!(result.is_ok(), "failed to record {metric}: {result:?}");
    if let Err(e) = result {
        error!(target: "hub.metrics", metric, error = %e, "Failed to record metric");
    }
}
