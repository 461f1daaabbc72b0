//! Recorder-backed hub catalog for assertions.
//!
//! [`debugging_metrics`] initializes [`HubMetrics`] on a fresh
//! `DebuggingRecorder` that is never installed globally, so tests can run in
//! parallel without sharing series.

use hub_metrics::observability::{HubMetrics, MetricsRegistry};
use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use metrics_util::{CompositeKey, MetricKind};
use std::sync::Arc;

/// Handle for reading what the catalog recorded.
pub struct MetricsProbe {
    snapshotter: Snapshotter,
}

/// Point-in-time copy of every recorded series.
#[derive(Debug)]
pub struct MetricsSnapshot {
    series: Vec<(CompositeKey, DebugValue)>,
}

/// Build an initialized catalog and a probe over its recorder.
pub fn debugging_metrics() -> (HubMetrics, MetricsProbe) {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let metrics = HubMetrics::initialize(Arc::new(MetricsRegistry::new(recorder)))
        .expect("hub catalog should initialize on a fresh registry");
    (metrics, MetricsProbe { snapshotter })
}

impl MetricsProbe {
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            series: self
                .snapshotter
                .snapshot()
                .into_vec()
                .into_iter()
                .map(|(key, _, _, value)| (key, value))
                .collect(),
        }
    }
}

impl MetricsSnapshot {
    /// Value of an unlabelled gauge.
    pub fn gauge(&self, name: &str) -> Option<f64> {
        self.find(MetricKind::Gauge, name, &[])
            .and_then(|value| match value {
                DebugValue::Gauge(v) => Some(v.0),
                _ => None,
            })
    }

    /// Observations of the histogram series with exactly `labels`.
    pub fn histogram(&self, name: &str, labels: &[(&str, &str)]) -> Option<Vec<f64>> {
        self.find(MetricKind::Histogram, name, labels)
            .and_then(|value| match value {
                DebugValue::Histogram(v) => Some(v.iter().map(|x| x.0).collect()),
                _ => None,
            })
    }

    /// Number of series recorded under `name`.
    pub fn series_count(&self, name: &str) -> usize {
        self.series
            .iter()
            .filter(|(key, _)| key.key().name() == name)
            .count()
    }

    fn find(&self, kind: MetricKind, name: &str, labels: &[(&str, &str)]) -> Option<&DebugValue> {
        self.series
            .iter()
            .find(|(key, _)| {
                key.kind() == kind
                    && key.key().name() == name
                    && key.key().labels().count() == labels.len()
                    && labels.iter().all(|(k, v)| {
                        key.key()
                            .labels()
                            .any(|l| l.key() == *k && l.value() == *v)
                    })
            })
            .map(|(_, value)| value)
    }
}
