//! Request instrumentation hook.
//!
//! Records RED metrics for every completed HTTP request into
//! `jupyterhub_request_duration_seconds`:
//! - Rate: requests per second served
//! - Errors: the `code` label
//! - Duration: the observed value
//!
//! The `handler` label is the fully-qualified Rust path of the handler that
//! served the request, never the URL path, so cardinality is bounded by the
//! route table. The `method` label is likewise limited to the standard HTTP
//! methods plus `OTHER`.
//!
//! Instrumentation must never fail a request: a context with a missing or
//! malformed field is dropped with a debug log.

use crate::observability::HubMetrics;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::borrow::Cow;
use std::fmt;
use std::time::Instant;
use tracing::{debug, error};

/// Handler label for responses no handler claimed (router fallback 404s,
/// rejected methods).
pub const UNROUTED_HANDLER: &str = "unrouted";

/// Method label for anything outside the standard HTTP method set.
pub const OTHER_METHOD: &str = "OTHER";

/// Bound the `method` label to the standard methods. Extension methods are
/// client-controlled and collapse into [`OTHER_METHOD`].
pub fn method_label(method: &str) -> &'static str {
    match method {
        "GET" => "GET",
        "HEAD" => "HEAD",
        "POST" => "POST",
        "PUT" => "PUT",
        "DELETE" => "DELETE",
        "CONNECT" => "CONNECT",
        "OPTIONS" => "OPTIONS",
        "TRACE" => "TRACE",
        "PATCH" => "PATCH",
        _ => OTHER_METHOD,
    }
}

/// Stable identifier for the handler that served a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerIdentity(Cow<'static, str>);

impl HandlerIdentity {
    /// Identity of handler type `H`, e.g. `hub::handlers::HomeHandler`.
    pub fn of<H: ?Sized>() -> Self {
        Self(Cow::Borrowed(std::any::type_name::<H>()))
    }

    /// Identity of a handler value, typically an `async fn` item.
    pub fn of_val<H: ?Sized>(handler: &H) -> Self {
        Self(Cow::Borrowed(std::any::type_name_of_val(handler)))
    }

    /// Identity with an explicit name, for hosts that label handlers themselves.
    pub fn named(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Identity used when no handler tagged the response.
    pub fn unrouted() -> Self {
        Self(Cow::Borrowed(UNROUTED_HANDLER))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HandlerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the HTTP layer knows about a request once it has completed.
///
/// Every accessor is optional; the hook turns any `None` into a no-op.
pub trait RequestContext {
    fn method(&self) -> Option<&str>;
    fn handler(&self) -> Option<&HandlerIdentity>;
    fn status_code(&self) -> Option<u16>;
    /// Elapsed wall time in seconds.
    fn request_time(&self) -> Option<f64>;
}

/// Plain request context, as built by [`http_metrics_middleware`].
#[derive(Debug, Clone, Default)]
pub struct CompletedRequest {
    pub method: Option<String>,
    pub handler: Option<HandlerIdentity>,
    pub status_code: Option<u16>,
    pub request_time: Option<f64>,
}

impl RequestContext for CompletedRequest {
    fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    fn handler(&self) -> Option<&HandlerIdentity> {
        self.handler.as_ref()
    }

    fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    fn request_time(&self) -> Option<f64> {
        self.request_time
    }
}

/// Record one request-duration observation for a completed request.
///
/// Called once per request at completion. Never fails and never blocks:
/// it only touches in-memory registry state.
pub fn prometheus_log_method<C: RequestContext + ?Sized>(metrics: &HubMetrics, request: &C) {
    let (Some(method), Some(handler), Some(code), Some(seconds)) = (
        request.method(),
        request.handler(),
        request.status_code(),
        request.request_time(),
    ) else {
        debug!(target: "hub.http", "Incomplete request context, skipping request metrics");
        return;
    };

    if !seconds.is_finite() || seconds < 0.0 {
        debug!(
            target: "hub.http",
            request_time = seconds,
            "Malformed request duration, skipping request metrics"
        );
        return;
    }

    if let Err(e) = metrics.record_request(method_label(method), handler.as_str(), code, seconds)
    {
        error!(target: "hub.http", error = %e, "Failed to record request metrics");
    }
}

/// Middleware that records request metrics for all responses.
///
/// Applied as the outermost layer so framework-level errors (404, 405, 415)
/// are captured too. Handlers claim their requests with [`tag_handler`];
/// responses nobody claimed are labelled [`UNROUTED_HANDLER`].
pub async fn http_metrics_middleware(
    State(metrics): State<HubMetrics>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();

    let response = next.run(request).await;

    let completed = CompletedRequest {
        method: Some(method),
        handler: Some(
            response
                .extensions()
                .get::<HandlerIdentity>()
                .cloned()
                .unwrap_or_else(HandlerIdentity::unrouted),
        ),
        status_code: Some(response.status().as_u16()),
        request_time: Some(start.elapsed().as_secs_f64()),
    };
    prometheus_log_method(&metrics, &completed);

    response
}

/// Response mapper that stamps a handler's identity onto its responses.
///
/// ```rust,ignore
/// Router::new().route(
///     "/hub/home",
///     get(home).route_layer(middleware::map_response_with_state(
///         HandlerIdentity::of_val(&home),
///         tag_handler,
///     )),
/// )
/// ```
pub async fn tag_handler(
    State(identity): State<HandlerIdentity>,
    mut response: Response,
) -> Response {
    response.extensions_mut().insert(identity);
    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::observability::MetricsRegistry;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct HomeHandler;

    async fn handler_200() -> &'static str {
        "OK"
    }

    async fn handler_500() -> (StatusCode, &'static str) {
        (StatusCode::INTERNAL_SERVER_ERROR, "Error")
    }

    fn debugging_metrics() -> (HubMetrics, Snapshotter) {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();
        let registry = Arc::new(MetricsRegistry::new(recorder));
        (HubMetrics::initialize(registry).unwrap(), snapshotter)
    }

    /// Observations per (method, handler, code) of the request histogram.
    fn request_series(snapshotter: &Snapshotter) -> Vec<((String, String, String), Vec<f64>)> {
        snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .filter(|(key, _, _, _)| key.key().name() == "jupyterhub_request_duration_seconds")
            .map(|(key, _, _, value)| {
                let label = |name: &str| {
                    key.key()
                        .labels()
                        .find(|l| l.key() == name)
                        .map(|l| l.value().to_string())
                        .unwrap_or_default()
                };
                let values = match value {
                    DebugValue::Histogram(v) => v.into_iter().map(|x| x.0).collect(),
                    _ => Vec::new(),
                };
                ((label("method"), label("handler"), label("code")), values)
            })
            .collect()
    }

    fn test_app(metrics: HubMetrics) -> Router {
        Router::new()
            .route(
                "/success",
                get(handler_200).route_layer(middleware::map_response_with_state(
                    HandlerIdentity::of_val(&handler_200),
                    tag_handler,
                )),
            )
            .route(
                "/error",
                get(handler_500).route_layer(middleware::map_response_with_state(
                    HandlerIdentity::of_val(&handler_500),
                    tag_handler,
                )),
            )
            .layer(middleware::from_fn_with_state(
                metrics,
                http_metrics_middleware,
            ))
    }

    #[test]
    fn test_handler_identity_is_fully_qualified() {
        let identity = HandlerIdentity::of::<HomeHandler>();
        assert!(identity.as_str().ends_with("http_metrics::tests::HomeHandler"));
        assert!(identity.as_str().starts_with("hub_metrics::"));

        let from_fn = HandlerIdentity::of_val(&handler_200);
        assert!(from_fn.as_str().ends_with("tests::handler_200"));
        assert_eq!(from_fn, HandlerIdentity::of_val(&handler_200));
    }

    #[test]
    fn test_hook_records_one_observation() {
        let (metrics, snapshotter) = debugging_metrics();
        let request = CompletedRequest {
            method: Some("GET".to_string()),
            handler: Some(HandlerIdentity::named("X.Y")),
            status_code: Some(200),
            request_time: Some(0.25),
        };

        prometheus_log_method(&metrics, &request);

        let series = request_series(&snapshotter);
        assert_eq!(series.len(), 1);
        assert_eq!(
            series[0],
            (
                ("GET".to_string(), "X.Y".to_string(), "200".to_string()),
                vec![0.25]
            )
        );
    }

    #[test]
    fn test_method_label_is_bounded() {
        assert_eq!(method_label("GET"), "GET");
        assert_eq!(method_label("PATCH"), "PATCH");
        assert_eq!(method_label("PROPFIND"), OTHER_METHOD);
        assert_eq!(method_label("get"), OTHER_METHOD);
        assert_eq!(method_label(""), OTHER_METHOD);
    }

    #[test]
    fn test_hook_collapses_extension_methods() {
        let (metrics, snapshotter) = debugging_metrics();
        for method in ["PROPFIND", "X-RANDOM-1", "X-RANDOM-2"] {
            let request = CompletedRequest {
                method: Some(method.to_string()),
                handler: Some(HandlerIdentity::named("X.Y")),
                status_code: Some(405),
                request_time: Some(0.01),
            };
            prometheus_log_method(&metrics, &request);
        }

        let series = request_series(&snapshotter);
        assert_eq!(series.len(), 1);
        let ((method, _, code), values) = &series[0];
        assert_eq!(method, "OTHER");
        assert_eq!(code, "405");
        assert_eq!(values.len(), 3);
    }

    #[tokio::test]
    async fn test_middleware_collapses_extension_method() {
        let (metrics, snapshotter) = debugging_metrics();
        let app = test_app(metrics);

        let request = HttpRequest::builder()
            .method("PURGE")
            .uri("/success")
            .body(Body::empty())
            .expect("request builder should succeed");

        app.oneshot(request).await.expect("request should succeed");

        let series = request_series(&snapshotter);
        assert_eq!(series.len(), 1);
        let ((method, _, _), _) = &series[0];
        assert_eq!(method, "OTHER");
    }

    #[test]
    fn test_hook_skips_missing_duration() {
        let (metrics, snapshotter) = debugging_metrics();
        let request = CompletedRequest {
            method: Some("GET".to_string()),
            handler: Some(HandlerIdentity::of::<HomeHandler>()),
            status_code: Some(200),
            request_time: None,
        };

        prometheus_log_method(&metrics, &request);

        assert!(request_series(&snapshotter).is_empty());
    }

    #[test]
    fn test_hook_skips_malformed_duration() {
        let (metrics, snapshotter) = debugging_metrics();
        for bad in [f64::NAN, f64::INFINITY, -1.0] {
            let request = CompletedRequest {
                method: Some("GET".to_string()),
                handler: Some(HandlerIdentity::of::<HomeHandler>()),
                status_code: Some(200),
                request_time: Some(bad),
            };
            prometheus_log_method(&metrics, &request);
        }

        assert!(request_series(&snapshotter).is_empty());
    }

    #[test]
    fn test_hook_skips_empty_context() {
        let (metrics, snapshotter) = debugging_metrics();

        prometheus_log_method(&metrics, &CompletedRequest::default());

        assert!(request_series(&snapshotter).is_empty());
    }

    #[tokio::test]
    async fn test_middleware_records_success() {
        let (metrics, snapshotter) = debugging_metrics();
        let app = test_app(metrics);

        let request = HttpRequest::builder()
            .method("GET")
            .uri("/success")
            .body(Body::empty())
            .expect("request builder should succeed");

        let response = app.oneshot(request).await.expect("request should succeed");
        assert_eq!(response.status(), StatusCode::OK);

        let series = request_series(&snapshotter);
        assert_eq!(series.len(), 1);
        let ((method, handler, code), values) = &series[0];
        assert_eq!(method, "GET");
        assert!(handler.ends_with("tests::handler_200"));
        assert_eq!(code, "200");
        assert_eq!(values.len(), 1);
    }

    #[tokio::test]
    async fn test_middleware_records_error() {
        let (metrics, snapshotter) = debugging_metrics();
        let app = test_app(metrics);

        let request = HttpRequest::builder()
            .method("GET")
            .uri("/error")
            .body(Body::empty())
            .expect("request builder should succeed");

        let response = app.oneshot(request).await.expect("request should succeed");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let series = request_series(&snapshotter);
        assert_eq!(series.len(), 1);
        let ((_, handler, code), _) = &series[0];
        assert!(handler.ends_with("tests::handler_500"));
        assert_eq!(code, "500");
    }

    #[tokio::test]
    async fn test_middleware_labels_not_found_as_unrouted() {
        let (metrics, snapshotter) = debugging_metrics();
        let app = test_app(metrics);

        let request = HttpRequest::builder()
            .method("GET")
            .uri("/nonexistent/abc123")
            .body(Body::empty())
            .expect("request builder should succeed");

        let response = app.oneshot(request).await.expect("request should succeed");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let series = request_series(&snapshotter);
        assert_eq!(series.len(), 1);
        let ((_, handler, code), _) = &series[0];
        assert_eq!(handler, UNROUTED_HANDLER);
        assert_eq!(code, "404");
    }
}
