//! HTTP client for the ensemble generate endpoint.
//!
//! One call is one POST: build the payload, send it, read `text_output`.
//! There is no retry, streaming, or caching. Failures come back as
//! [`RequestFailure`] with the stage that failed.

mod endpoint;
mod payload;

pub use endpoint::{
    ClientConfig, EndpointConfig, DEFAULT_GATEWAY_HOST, DEFAULT_REQUEST_TIMEOUT, GATEWAY_PORT,
    GENERATE_PATH, MODEL_HOST_HEADER,
};
pub use payload::{InferenceRequest, InferenceResponse, DEFAULT_MAX_TOKENS, SPECIAL_TOKEN_ID};

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::HOST;
use tracing::{debug, info, warn, Instrument, Span};
use uuid::Uuid;

use crate::error::RequestFailure;
use crate::telemetry::{
    record_request_failure, record_request_success, RequestSpan, SpanExt, TracingContext,
};

/// Anything that turns a prompt into generated text.
///
/// [`ModelClient`] is the production implementation; prompt builders depend
/// on this trait so they can be exercised without a server.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, RequestFailure>;
}

/// Client for the model gateway.
///
/// Holds only read-only configuration, so one instance can be shared across
/// tasks.
#[derive(Debug, Clone)]
pub struct ModelClient {
    http: reqwest::Client,
    config: ClientConfig,
    url: String,
}

impl ModelClient {
    pub fn new(config: ClientConfig) -> Result<Self, RequestFailure> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(RequestFailure::from_transport)?;
        let url = config.endpoint.url();
        Ok(Self { http, config, url })
    }

    /// Client configured from `ASM_GATEWAY_IP` and `MODEL_REQUEST_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, RequestFailure> {
        Self::new(crate::config::load().client)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Generate text for `message` with the default budget of 250 tokens.
    pub async fn generate_default(&self, message: &str) -> Result<String, RequestFailure> {
        self.generate(message, DEFAULT_MAX_TOKENS).await
    }

    /// Generate text for `message`, tracing under the current span.
    pub async fn generate(&self, message: &str, max_tokens: u32) -> Result<String, RequestFailure> {
        let request_id = Uuid::new_v4().to_string();
        let span = RequestSpan::new(&request_id, &self.url, max_tokens);
        self.generate_traced(span, message, max_tokens).await
    }

    /// Generate text for `message`, tracing under `ctx`.
    pub async fn generate_in(
        &self,
        ctx: &TracingContext,
        message: &str,
        max_tokens: u32,
    ) -> Result<String, RequestFailure> {
        let request_id = Uuid::new_v4().to_string();
        let span = RequestSpan::child_of(ctx, &request_id, &self.url, max_tokens);
        self.generate_traced(span, message, max_tokens).await
    }

    async fn generate_traced(
        &self,
        span: Span,
        message: &str,
        max_tokens: u32,
    ) -> Result<String, RequestFailure> {
        let started = Instant::now();
        let result = self.send(message, max_tokens).instrument(span.clone()).await;
        let latency_ms = started.elapsed().as_millis() as u64;

        span.record("latency_ms", latency_ms);
        match &result {
            Ok(text) => {
                let output_chars = text.chars().count();
                span.record_result(&result);
                span.record("output_chars", output_chars);
                record_request_success(latency_ms, output_chars);
                info!(parent: &span, latency_ms, output_chars, "generate request completed");
            }
            Err(failure) => {
                span.record_failure(failure);
                record_request_failure(failure.kind().as_str(), latency_ms);
                warn!(
                    parent: &span,
                    kind = %failure.kind(),
                    error = %failure,
                    latency_ms,
                    "generate request failed"
                );
            }
        }
        result
    }

    async fn send(&self, message: &str, max_tokens: u32) -> Result<String, RequestFailure> {
        let payload = InferenceRequest::new(message, max_tokens);
        debug!(prompt_chars = message.chars().count(), max_tokens, "sending generate request");

        let response = self
            .http
            .post(&self.url)
            .header(HOST, self.config.endpoint.host_header.as_str())
            .json(&payload)
            .send()
            .await
            .map_err(RequestFailure::from_transport)?;

        Span::current().record("http.status_code", response.status().as_u16());
        let response = response
            .error_for_status()
            .map_err(RequestFailure::from_transport)?;

        let body = response.bytes().await.map_err(RequestFailure::from_transport)?;
        let parsed: InferenceResponse =
            serde_json::from_slice(&body).map_err(RequestFailure::from_decode)?;
        Ok(parsed.into_text())
    }
}

#[async_trait]
impl TextGenerator for ModelClient {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, RequestFailure> {
        ModelClient::generate(self, prompt, max_tokens).await
    }
}
