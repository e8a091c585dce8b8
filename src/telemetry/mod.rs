//! Telemetry module for the gateway client.
//!
//! Provides structured logging, span export to the tracing backend, and
//! request metrics. Setup is explicit: the host application calls
//! [`init_observability`] (or [`init_logging`]) once at startup.

mod exporter;
mod logging;
mod metrics;
mod spans;

pub use exporter::{
    build_tracer_provider, init_observability, ObservabilityConfig, ObservabilityError,
    TracerHandle, DEFAULT_AGENT_HOST, DEFAULT_AGENT_PORT, DEFAULT_SERVICE_NAME,
};
pub use logging::{init_logging, LogConfig, LogError, LogFormat};
pub use self::metrics::{
    init_metrics, record_request_failure, record_request_success, REQUESTS_TOTAL,
    REQUEST_FAILURES_TOTAL, REQUEST_LATENCY_MS,
};
pub use spans::{RequestSpan, SpanExt, TracingContext};
