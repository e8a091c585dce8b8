//! Span export to the tracing backend.
//!
//! `init_observability` is called once by the host application. It installs
//! the log formatter and, when enabled, an OpenTelemetry layer that ships
//! spans through a batch processor. Nothing here runs at import time.

use std::time::Duration;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use super::logging::{build_filter, fmt_layer, LogConfig, LogError};

pub const DEFAULT_SERVICE_NAME: &str = "chat-service";
pub const DEFAULT_AGENT_HOST: &str = "jaeger-agent.observability.svc.cluster.local";
pub const DEFAULT_AGENT_PORT: u16 = 6831;

/// Instrumentation scope reported on exported spans.
const TRACER_NAME: &str = "llama_gateway_client";

/// Tracing export configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// When false, only logging is installed and no spans leave the process.
    pub enabled: bool,
    pub service_name: String,
    pub agent_host: String,
    pub agent_port: u16,
    /// Upper bound on a single export call.
    pub export_timeout: Duration,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            agent_host: DEFAULT_AGENT_HOST.to_string(),
            agent_port: DEFAULT_AGENT_PORT,
            export_timeout: Duration::from_secs(10),
        }
    }
}

impl ObservabilityConfig {
    /// OTLP/HTTP traces URL on the agent.
    pub fn collector_endpoint(&self) -> String {
        format!("http://{}:{}/v1/traces", self.agent_host, self.agent_port)
    }
}

/// Errors that can occur while setting up span export.
#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("Failed to build span exporter: {0}")]
    Exporter(String),
    #[error("Failed to flush spans: {0}")]
    Flush(String),
    #[error(transparent)]
    Logging(#[from] LogError),
}

/// Owner of the span export pipeline.
///
/// Keep it alive for the lifetime of the process and call
/// [`TracerHandle::shutdown`] before exiting so buffered spans are sent.
pub struct TracerHandle {
    provider: Option<SdkTracerProvider>,
}

impl std::fmt::Debug for TracerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TracerHandle")
            .field("exporting", &self.is_exporting())
            .finish()
    }
}

impl TracerHandle {
    /// Handle that exports nothing.
    pub fn disabled() -> Self {
        Self { provider: None }
    }

    pub fn is_exporting(&self) -> bool {
        self.provider.is_some()
    }

    /// Send any buffered spans now.
    pub fn force_flush(&self) -> Result<(), ObservabilityError> {
        match &self.provider {
            Some(provider) => provider
                .force_flush()
                .map_err(|e| ObservabilityError::Flush(e.to_string())),
            None => Ok(()),
        }
    }

    /// Flush buffered spans and stop the batch processor.
    pub fn shutdown(self) -> Result<(), ObservabilityError> {
        match self.provider {
            Some(provider) => provider
                .shutdown()
                .map_err(|e| ObservabilityError::Flush(e.to_string())),
            None => Ok(()),
        }
    }
}

/// Build a tracer provider exporting to the configured agent.
///
/// No connection is made until the first batch is exported.
pub fn build_tracer_provider(
    config: &ObservabilityConfig,
) -> Result<SdkTracerProvider, ObservabilityError> {
    let exporter = SpanExporter::builder()
        .with_http()
        .with_endpoint(config.collector_endpoint())
        .with_timeout(config.export_timeout)
        .build()
        .map_err(|e| ObservabilityError::Exporter(e.to_string()))?;

    let resource = Resource::builder()
        .with_service_name(config.service_name.clone())
        .build();

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build())
}

/// Install logging and, if enabled, span export.
///
/// Call once at startup, before the async runtime is built: the exporter's
/// HTTP client is blocking and runs on the batch processor's own thread.
pub fn init_observability(
    config: &ObservabilityConfig,
    log: &LogConfig,
) -> Result<TracerHandle, ObservabilityError> {
    let filter = build_filter(log)?;

    if !config.enabled {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer(log)?)
            .try_init()
            .map_err(|_| LogError::AlreadyInitialized)?;
        return Ok(TracerHandle::disabled());
    }

    let provider = build_tracer_provider(config)?;
    let tracer = provider.tracer(TRACER_NAME);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer(log)?)
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .try_init()
        .map_err(|_| LogError::AlreadyInitialized)?;

    tracing::info!(
        endpoint = %config.collector_endpoint(),
        service = %config.service_name,
        "span export enabled"
    );

    Ok(TracerHandle {
        provider: Some(provider),
    })
}
