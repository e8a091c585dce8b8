//! Span utilities and extension traits for gateway request tracing.
//!
//! Provides standardized span creation and result recording.

use tracing::{info_span, Span};

use crate::error::RequestFailure;

/// Extension trait for adding context to spans.
pub trait SpanExt {
    /// Record the result of an operation into the span.
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display;

    /// Record a failed request, including its kind and HTTP status if any.
    fn record_failure(&self, failure: &RequestFailure);
}

impl SpanExt for Span {
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display,
    {
        match result {
            Ok(_) => {
                self.record("status", "ok");
            }
            Err(e) => {
                self.record("status", "error");
                self.record("error.message", e.to_string().as_str());
            }
        }
    }

    fn record_failure(&self, failure: &RequestFailure) {
        self.record("status", "error");
        self.record("error.kind", failure.kind().as_str());
        self.record("error.message", failure.to_string().as_str());
        if let Some(code) = failure.status() {
            self.record("http.status_code", code);
        }
    }
}

/// Factory for creating standardized request spans.
pub struct RequestSpan;

impl RequestSpan {
    /// Create a new request span under the current span.
    ///
    /// Fields included:
    /// - `request_id`: Unique identifier for the request
    /// - `endpoint`: URL the request is sent to
    /// - `max_tokens`: Generation budget
    /// - `status`, `error.kind`, `error.message`: Filled in by `SpanExt`
    /// - `http.status_code`: Filled in once a response arrives
    /// - `latency_ms`, `output_chars`: Filled in after completion
    pub fn new(request_id: &str, endpoint: &str, max_tokens: u32) -> Span {
        info_span!(
            "inference_request",
            request_id = %request_id,
            endpoint = %endpoint,
            max_tokens = max_tokens,
            status = tracing::field::Empty,
            error.kind = tracing::field::Empty,
            error.message = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            latency_ms = tracing::field::Empty,
            output_chars = tracing::field::Empty,
        )
    }

    /// Same as [`RequestSpan::new`], parented under `ctx` instead of the
    /// current span.
    pub fn child_of(
        ctx: &TracingContext,
        request_id: &str,
        endpoint: &str,
        max_tokens: u32,
    ) -> Span {
        info_span!(
            parent: ctx.span(),
            "inference_request",
            request_id = %request_id,
            endpoint = %endpoint,
            max_tokens = max_tokens,
            status = tracing::field::Empty,
            error.kind = tracing::field::Empty,
            error.message = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            latency_ms = tracing::field::Empty,
            output_chars = tracing::field::Empty,
        )
    }
}

/// Explicit parent for request spans.
///
/// Callers that manage their own trace hierarchy (for example a chat handler
/// that wants the model call nested under its request span) pass one of these
/// instead of relying on whatever span happens to be current.
#[derive(Debug, Clone)]
pub struct TracingContext {
    span: Span,
}

impl TracingContext {
    pub fn new(span: Span) -> Self {
        Self { span }
    }

    /// Context rooted at the currently entered span.
    pub fn current() -> Self {
        Self::new(Span::current())
    }

    /// Context that records nothing.
    pub fn none() -> Self {
        Self::new(Span::none())
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Default for TracingContext {
    fn default() -> Self {
        Self::current()
    }
}
