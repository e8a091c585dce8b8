//! Request metrics recorded through the `metrics` facade.
//!
//! No recorder is installed by this crate; the host application decides
//! where metrics go. Without a recorder every call is a no-op.

use ::metrics::{counter, describe_counter, describe_histogram, histogram, Unit};

pub const REQUESTS_TOTAL: &str = "gateway_requests_total";
pub const REQUEST_FAILURES_TOTAL: &str = "gateway_request_failures_total";
pub const REQUEST_LATENCY_MS: &str = "gateway_request_latency_ms";

/// Register metric descriptions with the installed recorder.
pub fn init_metrics() {
    describe_counter!(REQUESTS_TOTAL, Unit::Count, "Generate requests by outcome");
    describe_counter!(
        REQUEST_FAILURES_TOTAL,
        Unit::Count,
        "Failed generate requests by failure kind"
    );
    describe_histogram!(
        REQUEST_LATENCY_MS,
        Unit::Milliseconds,
        "Round-trip latency of generate requests"
    );
}

pub fn record_request_success(latency_ms: u64, output_chars: usize) {
    counter!(REQUESTS_TOTAL, "outcome" => "success").increment(1);
    histogram!(REQUEST_LATENCY_MS, "outcome" => "success").record(latency_ms as f64);
    tracing::trace!(latency_ms, output_chars, "recorded request success");
}

pub fn record_request_failure(kind: &'static str, latency_ms: u64) {
    counter!(REQUESTS_TOTAL, "outcome" => "failure").increment(1);
    counter!(REQUEST_FAILURES_TOTAL, "kind" => kind).increment(1);
    histogram!(REQUEST_LATENCY_MS, "outcome" => "failure").record(latency_ms as f64);
}
