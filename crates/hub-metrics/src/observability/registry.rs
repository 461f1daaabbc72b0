//! Metric registry.
//!
//! An explicit, injectable registry of named metric instruments with fixed
//! label schemas. Storage and aggregation are delegated to a `metrics`
//! [`Recorder`]: in production a Prometheus recorder built by
//! [`MetricsRegistry::prometheus`], in tests any recorder the test supplies
//! (typically `metrics_util::debugging::DebuggingRecorder`).
//!
//! The recorder is never installed as the process-global recorder, so every
//! test can construct a fresh registry.
//!
//! # Schema rules
//!
//! - Names carry the [`METRIC_PREFIX`] namespace and are globally unique.
//! - Label names are fixed at definition time. Every observation must supply
//!   exactly that label set, in any order.
//! - Defining the same name twice is idempotent when the schema is identical
//!   and fails with [`MetricsError::DuplicateMetric`] otherwise.

use crate::errors::MetricsError;
use metrics::{Key, KeyName, Label, Level, Metadata, Recorder, SharedString};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// Namespace prefix shared by every hub metric.
pub const METRIC_PREFIX: &str = "jupyterhub_";

/// Bucket boundaries for histograms that declare none.
///
/// Matches the defaults of pull-based metrics client libraries.
pub const DEFAULT_BUCKETS: &[f64] = &[
    0.005,
    0.01,
    0.025,
    0.05,
    0.075,
    0.1,
    0.25,
    0.5,
    0.75,
    1.0,
    2.5,
    5.0,
    7.5,
    10.0,
    f64::INFINITY,
];

static METADATA: Metadata<'static> =
    Metadata::new(module_path!(), Level::INFO, Some(module_path!()));

/// Metric instrument kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
}

impl MetricKind {
    /// Lowercase name as used in the exposition `# TYPE` line.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static schema of one metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricDefinition {
    /// Fully-qualified metric name, including [`METRIC_PREFIX`].
    pub name: &'static str,
    pub kind: MetricKind,
    pub help: &'static str,
    /// Ordered label names.
    pub labels: &'static [&'static str],
    /// Histogram bucket upper bounds. `None` means [`DEFAULT_BUCKETS`].
    pub buckets: Option<&'static [f64]>,
}

impl MetricDefinition {
    pub const fn counter(
        name: &'static str,
        help: &'static str,
        labels: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            kind: MetricKind::Counter,
            help,
            labels,
            buckets: None,
        }
    }

    pub const fn gauge(
        name: &'static str,
        help: &'static str,
        labels: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            kind: MetricKind::Gauge,
            help,
            labels,
            buckets: None,
        }
    }

    pub const fn histogram(
        name: &'static str,
        help: &'static str,
        labels: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            kind: MetricKind::Histogram,
            help,
            labels,
            buckets: None,
        }
    }

    /// Override the bucket boundaries of a histogram definition.
    pub const fn with_buckets(self, buckets: &'static [f64]) -> Self {
        Self {
            buckets: Some(buckets),
            ..self
        }
    }

    /// Bucket boundaries in effect for this definition.
    pub fn effective_buckets(&self) -> &'static [f64] {
        self.buckets.unwrap_or(DEFAULT_BUCKETS)
    }

    fn validate(&self) -> Result<(), MetricsError> {
        let invalid = |reason: String| MetricsError::InvalidDefinition {
            name: self.name.to_string(),
            reason,
        };

        if !self.name.starts_with(METRIC_PREFIX) || self.name.len() == METRIC_PREFIX.len() {
            return Err(invalid(format!("name must start with '{METRIC_PREFIX}'")));
        }

        for (i, label) in self.labels.iter().enumerate() {
            if label.is_empty() {
                return Err(invalid("label names must not be empty".to_string()));
            }
            if self.labels.iter().skip(i + 1).any(|other| other == label) {
                return Err(invalid(format!("label '{label}' declared twice")));
            }
        }

        match (self.kind, self.buckets) {
            (MetricKind::Histogram, Some(buckets)) => {
                if buckets.iter().all(|b| b.is_infinite()) {
                    return Err(MetricsError::InvalidBuckets(format!(
                        "{} declares no finite bucket",
                        self.name
                    )));
                }
                if buckets.windows(2).any(|pair| match pair {
                    [lower, upper] => lower >= upper,
                    _ => false,
                }) {
                    return Err(MetricsError::InvalidBuckets(format!(
                        "{} buckets must be strictly increasing",
                        self.name
                    )));
                }
                Ok(())
            }
            (MetricKind::Histogram, None) => Ok(()),
            (_, Some(_)) => Err(invalid("only histograms take buckets".to_string())),
            (_, None) => Ok(()),
        }
    }
}

/// Handle to a defined metric, returned by [`MetricsRegistry::define`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricHandle {
    definition: MetricDefinition,
}

impl MetricHandle {
    pub fn name(&self) -> &'static str {
        self.definition.name
    }

    pub fn kind(&self) -> MetricKind {
        self.definition.kind
    }

    pub fn labels(&self) -> &'static [&'static str] {
        self.definition.labels
    }

    pub fn definition(&self) -> &MetricDefinition {
        &self.definition
    }
}

/// Process-wide collection of metric instruments.
///
/// Thread-safe: definitions sit behind a lock that is only written during
/// initialization, and series updates go straight to the recorder, which
/// handles concurrent label-tuple updates itself.
pub struct MetricsRegistry {
    recorder: Box<dyn Recorder + Send + Sync>,
    definitions: RwLock<HashMap<&'static str, MetricDefinition>>,
}

impl fmt::Debug for MetricsRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsRegistry")
            .field("definitions", &self.definitions().len())
            .finish_non_exhaustive()
    }
}

impl MetricsRegistry {
    /// Create an empty registry over the given recorder.
    pub fn new<R>(recorder: R) -> Self
    where
        R: Recorder + Send + Sync + 'static,
    {
        Self {
            recorder: Box::new(recorder),
            definitions: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry backed by a Prometheus recorder and define `definitions`.
    ///
    /// Histogram bucket layouts must be known before the recorder is built, so
    /// every histogram has its effective buckets pinned here. Histograms
    /// defined later fall back to [`DEFAULT_BUCKETS`].
    ///
    /// Returns the registry together with a handle that renders the standard
    /// text exposition format.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBuckets` if the exporter rejects a bucket layout, or any
    /// error [`MetricsRegistry::define`] returns.
    pub fn prometheus(
        definitions: &[MetricDefinition],
    ) -> Result<(Self, PrometheusHandle), MetricsError> {
        let mut builder = PrometheusBuilder::new()
            .set_buckets(&finite_bounds(DEFAULT_BUCKETS))
            .map_err(|e| MetricsError::InvalidBuckets(format!("default buckets: {e}")))?;

        for definition in definitions {
            definition.validate()?;
            if definition.kind == MetricKind::Histogram {
                builder = builder
                    .set_buckets_for_metric(
                        Matcher::Full(definition.name.to_string()),
                        &finite_bounds(definition.effective_buckets()),
                    )
                    .map_err(|e| {
                        MetricsError::InvalidBuckets(format!("{}: {e}", definition.name))
                    })?;
            }
        }

        let recorder = builder.build_recorder();
        let handle = recorder.handle();
        let registry = Self::new(recorder);

        for definition in definitions {
            registry.define(*definition)?;
        }

        Ok((registry, handle))
    }

    /// Define a metric and return its handle.
    ///
    /// # Errors
    ///
    /// - `DuplicateMetric` if the name is already defined with another schema
    /// - `InvalidDefinition` / `InvalidBuckets` if the schema itself is malformed
    pub fn define(&self, definition: MetricDefinition) -> Result<MetricHandle, MetricsError> {
        definition.validate()?;

        let mut definitions = self
            .definitions
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = definitions.get(definition.name) {
            if *existing == definition {
                return Ok(MetricHandle { definition });
            }
            return Err(MetricsError::DuplicateMetric {
                name: definition.name.to_string(),
            });
        }

        let key_name = KeyName::from(definition.name);
        let help = SharedString::from(definition.help);
        match definition.kind {
            MetricKind::Counter => self.recorder.describe_counter(key_name, None, help),
            MetricKind::Gauge => self.recorder.describe_gauge(key_name, None, help),
            MetricKind::Histogram => self.recorder.describe_histogram(key_name, None, help),
        }

        definitions.insert(definition.name, definition);

        debug!(
            target: "hub.metrics",
            metric = definition.name,
            kind = %definition.kind,
            labels = ?definition.labels,
            "Defined metric"
        );

        Ok(MetricHandle { definition })
    }

    /// Look up a definition by name.
    pub fn definition(&self, name: &str) -> Option<MetricDefinition> {
        self.definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied()
    }

    /// All definitions, sorted by name.
    pub fn definitions(&self) -> Vec<MetricDefinition> {
        let mut all: Vec<MetricDefinition> = self
            .definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .copied()
            .collect();
        all.sort_by_key(|d| d.name);
        all
    }

    /// Record a histogram observation against the exact label tuple.
    pub fn observe(
        &self,
        handle: &MetricHandle,
        labels: &[(&str, &str)],
        value: f64,
    ) -> Result<(), MetricsError> {
        let key = self.key_for(handle, MetricKind::Histogram, labels)?;
        self.recorder.register_histogram(&key, &METADATA).record(value);
        Ok(())
    }

    /// Overwrite the current gauge value for the label tuple.
    pub fn set(
        &self,
        handle: &MetricHandle,
        labels: &[(&str, &str)],
        value: f64,
    ) -> Result<(), MetricsError> {
        let key = self.key_for(handle, MetricKind::Gauge, labels)?;
        self.recorder.register_gauge(&key, &METADATA).set(value);
        Ok(())
    }

    /// Increment a counter for the label tuple.
    pub fn increment(
        &self,
        handle: &MetricHandle,
        labels: &[(&str, &str)],
        value: u64,
    ) -> Result<(), MetricsError> {
        let key = self.key_for(handle, MetricKind::Counter, labels)?;
        self.recorder.register_counter(&key, &METADATA).increment(value);
        Ok(())
    }

    /// Materialize a series without observing anything.
    ///
    /// Histograms appear with a zero count, counters and gauges with zero.
    pub fn touch(&self, handle: &MetricHandle, labels: &[(&str, &str)]) -> Result<(), MetricsError> {
        let key = self.key_for(handle, handle.kind(), labels)?;
        match handle.kind() {
            MetricKind::Counter => {
                self.recorder.register_counter(&key, &METADATA).increment(0);
            }
            MetricKind::Gauge => {
                self.recorder.register_gauge(&key, &METADATA);
            }
            MetricKind::Histogram => {
                self.recorder.register_histogram(&key, &METADATA);
            }
        }
        Ok(())
    }

    /// Build the recorder key for an operation, validating kind and labels.
    fn key_for(
        &self,
        handle: &MetricHandle,
        expected: MetricKind,
        labels: &[(&str, &str)],
    ) -> Result<Key, MetricsError> {
        let definition = self
            .definition(handle.name())
            .ok_or_else(|| MetricsError::UnknownMetric(handle.name().to_string()))?;

        if definition.kind != expected {
            return Err(MetricsError::KindMismatch {
                name: definition.name.to_string(),
                expected: expected.as_str(),
                actual: definition.kind.as_str(),
            });
        }

        let mismatch = || MetricsError::LabelMismatch {
            name: definition.name.to_string(),
            expected: definition.labels.iter().map(|l| l.to_string()).collect(),
            actual: labels.iter().map(|(name, _)| name.to_string()).collect(),
        };

        if labels.len() != definition.labels.len() {
            return Err(mismatch());
        }

        let mut resolved = Vec::with_capacity(definition.labels.len());
        for declared in definition.labels {
            let mut matching = labels.iter().filter(|(name, _)| name == declared);
            let value = match (matching.next(), matching.next()) {
                (Some((_, value)), None) => *value,
                _ => return Err(mismatch()),
            };
            resolved.push(Label::new(*declared, value.to_string()));
        }

        Ok(Key::from_parts(definition.name, resolved))
    }
}

/// Bucket bounds as handed to the exporter, which appends `+Inf` itself.
fn finite_bounds(buckets: &[f64]) -> Vec<f64> {
    buckets.iter().copied().filter(|b| b.is_finite()).collect()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
    use metrics_util::MetricKind as RecordedKind;

    const SPAWN: MetricDefinition = MetricDefinition::histogram(
        "jupyterhub_test_spawn_seconds",
        "test spawn duration",
        &["status"],
    )
    .with_buckets(&[0.5, 1.0, f64::INFINITY]);

    const USERS: MetricDefinition =
        MetricDefinition::gauge("jupyterhub_test_users", "test users", &[]);

    const REQUESTS: MetricDefinition = MetricDefinition::counter(
        "jupyterhub_test_requests_total",
        "test requests",
        &["method", "code"],
    );

    fn debugging_registry() -> (MetricsRegistry, Snapshotter) {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();
        (MetricsRegistry::new(recorder), snapshotter)
    }

    fn find(
        snapshotter: &Snapshotter,
        kind: RecordedKind,
        name: &str,
        labels: &[(&str, &str)],
    ) -> Option<DebugValue> {
        snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .find(|(key, _, _, _)| {
                let recorded: Vec<(String, String)> = key
                    .key()
                    .labels()
                    .map(|l| (l.key().to_string(), l.value().to_string()))
                    .collect();
                let wanted: Vec<(String, String)> = labels
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();
                key.kind() == kind && key.key().name() == name && recorded == wanted
            })
            .map(|(_, _, _, value)| value)
    }

    #[test]
    fn test_define_is_idempotent_for_identical_schema() {
        let (registry, _) = debugging_registry();

        let first = registry.define(SPAWN).unwrap();
        let second = registry.define(SPAWN).unwrap();

        assert_eq!(first, second);
        assert_eq!(registry.definitions().len(), 1);
    }

    #[test]
    fn test_define_rejects_conflicting_schema() {
        let (registry, _) = debugging_registry();
        registry.define(SPAWN).unwrap();

        let conflicting = MetricDefinition::histogram(
            "jupyterhub_test_spawn_seconds",
            "test spawn duration",
            &["status", "region"],
        );

        let result = registry.define(conflicting);
        assert!(
            matches!(result, Err(MetricsError::DuplicateMetric { name }) if name == "jupyterhub_test_spawn_seconds")
        );
        // The first schema survives
        assert_eq!(
            registry.definition("jupyterhub_test_spawn_seconds"),
            Some(SPAWN)
        );
    }

    #[test]
    fn test_define_rejects_kind_change() {
        let (registry, _) = debugging_registry();
        registry.define(USERS).unwrap();

        let as_counter = MetricDefinition::counter("jupyterhub_test_users", "test users", &[]);
        assert!(matches!(
            registry.define(as_counter),
            Err(MetricsError::DuplicateMetric { .. })
        ));
    }

    #[test]
    fn test_define_rejects_missing_prefix() {
        let (registry, _) = debugging_registry();
        let unprefixed = MetricDefinition::gauge("total_users", "total users", &[]);

        assert!(matches!(
            registry.define(unprefixed),
            Err(MetricsError::InvalidDefinition { name, .. }) if name == "total_users"
        ));
    }

    #[test]
    fn test_define_rejects_repeated_label() {
        let (registry, _) = debugging_registry();
        let repeated =
            MetricDefinition::gauge("jupyterhub_test_repeated", "repeated", &["a", "a"]);

        assert!(matches!(
            registry.define(repeated),
            Err(MetricsError::InvalidDefinition { .. })
        ));
    }

    #[test]
    fn test_define_rejects_unsorted_buckets() {
        let (registry, _) = debugging_registry();
        let unsorted = MetricDefinition::histogram("jupyterhub_test_unsorted", "unsorted", &[])
            .with_buckets(&[1.0, 0.5]);

        assert!(matches!(
            registry.define(unsorted),
            Err(MetricsError::InvalidBuckets(_))
        ));
    }

    #[test]
    fn test_define_rejects_buckets_on_gauge() {
        let (registry, _) = debugging_registry();
        let gauge = USERS.with_buckets(&[1.0]);

        assert!(matches!(
            registry.define(gauge),
            Err(MetricsError::InvalidDefinition { .. })
        ));
    }

    #[test]
    fn test_observe_records_value() {
        let (registry, snapshotter) = debugging_registry();
        let spawn = registry.define(SPAWN).unwrap();

        registry
            .observe(&spawn, &[("status", "success")], 0.75)
            .unwrap();

        let value = find(
            &snapshotter,
            RecordedKind::Histogram,
            "jupyterhub_test_spawn_seconds",
            &[("status", "success")],
        );
        match value {
            Some(DebugValue::Histogram(values)) => {
                assert_eq!(values.len(), 1);
                assert_eq!(values[0].0, 0.75);
            }
            other => panic!("expected histogram, got {other:?}"),
        }
    }

    #[test]
    fn test_labels_are_matched_by_name_not_position() {
        let (registry, snapshotter) = debugging_registry();
        let requests = registry.define(REQUESTS).unwrap();

        registry
            .increment(&requests, &[("code", "200"), ("method", "GET")], 2)
            .unwrap();

        let value = find(
            &snapshotter,
            RecordedKind::Counter,
            "jupyterhub_test_requests_total",
            &[("method", "GET"), ("code", "200")],
        );
        assert!(matches!(value, Some(DebugValue::Counter(2))));
    }

    #[test]
    fn test_observe_rejects_wrong_label_count() {
        let (registry, _) = debugging_registry();
        let spawn = registry.define(SPAWN).unwrap();

        let result = registry.observe(&spawn, &[], 1.0);
        assert!(matches!(
            result,
            Err(MetricsError::LabelMismatch { expected, actual, .. })
                if expected == vec!["status".to_string()] && actual.is_empty()
        ));
    }

    #[test]
    fn test_observe_rejects_wrong_label_name() {
        let (registry, _) = debugging_registry();
        let spawn = registry.define(SPAWN).unwrap();

        let result = registry.observe(&spawn, &[("outcome", "success")], 1.0);
        assert!(matches!(result, Err(MetricsError::LabelMismatch { .. })));
    }

    #[test]
    fn test_increment_rejects_duplicated_label() {
        let (registry, _) = debugging_registry();
        let requests = registry.define(REQUESTS).unwrap();

        let result = registry.increment(&requests, &[("method", "GET"), ("method", "POST")], 1);
        assert!(matches!(result, Err(MetricsError::LabelMismatch { .. })));
    }

    #[test]
    fn test_set_overwrites_gauge() {
        let (registry, snapshotter) = debugging_registry();
        let users = registry.define(USERS).unwrap();

        registry.set(&users, &[], 10.0).unwrap();
        registry.set(&users, &[], 3.0).unwrap();

        let value = find(&snapshotter, RecordedKind::Gauge, "jupyterhub_test_users", &[]);
        match value {
            Some(DebugValue::Gauge(v)) => assert_eq!(v.0, 3.0),
            other => panic!("expected gauge, got {other:?}"),
        }
    }

    #[test]
    fn test_kind_mismatch() {
        let (registry, _) = debugging_registry();
        let users = registry.define(USERS).unwrap();
        let spawn = registry.define(SPAWN).unwrap();

        assert!(matches!(
            registry.observe(&users, &[], 1.0),
            Err(MetricsError::KindMismatch { expected: "histogram", actual: "gauge", .. })
        ));
        assert!(matches!(
            registry.set(&spawn, &[("status", "success")], 1.0),
            Err(MetricsError::KindMismatch { expected: "gauge", actual: "histogram", .. })
        ));
    }

    #[test]
    fn test_handle_from_other_registry_is_unknown() {
        let (registry, _) = debugging_registry();
        let (other, _) = debugging_registry();
        let users = other.define(USERS).unwrap();

        assert!(matches!(
            registry.set(&users, &[], 1.0),
            Err(MetricsError::UnknownMetric(name)) if name == "jupyterhub_test_users"
        ));
    }

    #[test]
    fn test_touch_creates_empty_histogram_series() {
        let (registry, snapshotter) = debugging_registry();
        let spawn = registry.define(SPAWN).unwrap();

        registry.touch(&spawn, &[("status", "failure")]).unwrap();

        let value = find(
            &snapshotter,
            RecordedKind::Histogram,
            "jupyterhub_test_spawn_seconds",
            &[("status", "failure")],
        );
        assert!(matches!(value, Some(DebugValue::Histogram(values)) if values.is_empty()));
    }

    #[test]
    fn test_finite_bounds_drops_infinity() {
        assert_eq!(finite_bounds(&[0.5, 1.0, f64::INFINITY]), vec![0.5, 1.0]);
        assert_eq!(finite_bounds(DEFAULT_BUCKETS).len(), DEFAULT_BUCKETS.len() - 1);
    }

    #[test]
    fn test_prometheus_registry_renders_help_and_buckets() {
        let (registry, handle) = MetricsRegistry::prometheus(&[SPAWN, USERS]).unwrap();
        let spawn = registry.define(SPAWN).unwrap();

        registry
            .observe(&spawn, &[("status", "success")], 0.75)
            .unwrap();

        let rendered = handle.render();
        assert!(rendered.contains("# HELP jupyterhub_test_spawn_seconds test spawn duration"));
        assert!(rendered.contains("jupyterhub_test_spawn_seconds_bucket{status=\"success\",le=\"0.5\"} 0"));
        assert!(rendered.contains("jupyterhub_test_spawn_seconds_bucket{status=\"success\",le=\"1\"} 1"));
        assert!(rendered.contains("jupyterhub_test_spawn_seconds_bucket{status=\"success\",le=\"+Inf\"} 1"));
        assert!(rendered.contains("jupyterhub_test_spawn_seconds_count{status=\"success\"} 1"));
    }

    #[test]
    fn test_effective_buckets() {
        assert_eq!(SPAWN.effective_buckets(), &[0.5, 1.0, f64::INFINITY]);
        let plain = MetricDefinition::histogram("jupyterhub_test_plain_seconds", "plain", &[]);
        assert_eq!(plain.effective_buckets(), DEFAULT_BUCKETS);
    }

    #[test]
    fn test_prometheus_registry_uses_default_buckets() {
        let plain = MetricDefinition::histogram("jupyterhub_test_plain_seconds", "plain", &[]);
        let (registry, handle) = MetricsRegistry::prometheus(&[plain]).unwrap();
        let plain = registry.define(plain).unwrap();

        registry.observe(&plain, &[], 0.02).unwrap();

        let rendered = handle.render();
        assert!(rendered.contains("jupyterhub_test_plain_seconds_bucket{le=\"0.01\"} 0"));
        assert!(rendered.contains("jupyterhub_test_plain_seconds_bucket{le=\"0.025\"} 1"));
    }

    #[test]
    fn test_metric_kind_display() {
        assert_eq!(MetricKind::Counter.to_string(), "counter");
        assert_eq!(MetricKind::Gauge.to_string(), "gauge");
        assert_eq!(MetricKind::Histogram.to_string(), "histogram");
    }
}
