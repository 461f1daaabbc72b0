//! HTTP middleware.
//!
//! - `http_metrics` - request instrumentation hook and its axum integration

pub mod http_metrics;

pub use http_metrics::{
    http_metrics_middleware, method_label, prometheus_log_method, tag_handler, CompletedRequest,
    HandlerIdentity, RequestContext, OTHER_METHOD, UNROUTED_HANDLER,
};
