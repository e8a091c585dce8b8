//! Configuration loading from environment variables.
//!
//! Values are read once at startup with sensible defaults. Invalid values
//! fall back to defaults without crashing.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `ASM_GATEWAY_IP` | localhost | Model gateway host |
//! | `MODEL_REQUEST_TIMEOUT_SECS` | 30 | Generate request timeout (secs) |
//! | `JAEGER_AGENT_HOST` | jaeger-agent.observability.svc.cluster.local | Span collector host |
//! | `JAEGER_AGENT_PORT` | 6831 | Span collector port |
//! | `OTEL_SERVICE_NAME` | chat-service | Service name on exported spans |
//! | `TRACING_ENABLED` | true | Export spans (`false`/`0` disables) |
//! | `RUST_LOG` | info | Log filter |
//! | `LOG_FORMAT` | json | `json` or `pretty` |

use std::time::Duration;

use crate::client::{ClientConfig, EndpointConfig, DEFAULT_GATEWAY_HOST};
use crate::telemetry::{
    LogConfig, LogFormat, ObservabilityConfig, DEFAULT_AGENT_HOST, DEFAULT_AGENT_PORT,
    DEFAULT_SERVICE_NAME,
};

pub const GATEWAY_HOST_ENV: &str = "ASM_GATEWAY_IP";
pub const REQUEST_TIMEOUT_ENV: &str = "MODEL_REQUEST_TIMEOUT_SECS";
pub const AGENT_HOST_ENV: &str = "JAEGER_AGENT_HOST";
pub const AGENT_PORT_ENV: &str = "JAEGER_AGENT_PORT";
pub const SERVICE_NAME_ENV: &str = "OTEL_SERVICE_NAME";
pub const TRACING_ENABLED_ENV: &str = "TRACING_ENABLED";
pub const LOG_LEVEL_ENV: &str = "RUST_LOG";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Effective configuration summary, one entry per variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub gateway_host: String,
    pub endpoint_url: String,
    pub request_timeout_secs: u64,
    pub agent_host: String,
    pub agent_port: u16,
    pub service_name: String,
    pub tracing_enabled: bool,
    pub log_level: String,
    pub log_format: &'static str,
}

impl EffectiveConfig {
    /// `(variable, value)` pairs in documentation order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            (GATEWAY_HOST_ENV, self.gateway_host.clone()),
            (REQUEST_TIMEOUT_ENV, self.request_timeout_secs.to_string()),
            (AGENT_HOST_ENV, self.agent_host.clone()),
            (AGENT_PORT_ENV, self.agent_port.to_string()),
            (SERVICE_NAME_ENV, self.service_name.clone()),
            (TRACING_ENABLED_ENV, self.tracing_enabled.to_string()),
            (LOG_LEVEL_ENV, self.log_level.clone()),
            (LOG_FORMAT_ENV, self.log_format.to_string()),
        ]
    }
}

/// All configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub client: ClientConfig,
    pub observability: ObservabilityConfig,
    pub log: LogConfig,
}

/// Read a non-empty string env var, returning `default` when missing or blank.
fn parse_string(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(val) if !val.trim().is_empty() => val.trim().to_string(),
        _ => default.to_string(),
    }
}

/// Parse a `u64` env var, returning `default` on missing or invalid.
fn parse_u64(key: &str, default: u64) -> u64 {
    match std::env::var(key) {
        Ok(val) => val.trim().parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}

/// Parse a `u16` env var, returning `default` on missing or invalid.
fn parse_u16(key: &str, default: u16) -> u16 {
    match std::env::var(key) {
        Ok(val) => val.trim().parse::<u16>().unwrap_or(default),
        Err(_) => default,
    }
}

/// Parse a boolean env var. Accepts true/false, 1/0, yes/no, on/off.
fn parse_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => match val.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

/// Load client configuration from environment.
fn load_client_config() -> ClientConfig {
    let host = parse_string(GATEWAY_HOST_ENV, DEFAULT_GATEWAY_HOST);
    let timeout_secs = parse_u64(REQUEST_TIMEOUT_ENV, DEFAULT_TIMEOUT_SECS).max(1);
    ClientConfig::new(EndpointConfig::gateway(host)).with_timeout(Duration::from_secs(timeout_secs))
}

/// Load span export configuration from environment.
fn load_observability_config() -> ObservabilityConfig {
    let agent_port = parse_u16(AGENT_PORT_ENV, DEFAULT_AGENT_PORT);
    let agent_port = if agent_port == 0 { DEFAULT_AGENT_PORT } else { agent_port };
    ObservabilityConfig {
        enabled: parse_bool(TRACING_ENABLED_ENV, true),
        service_name: parse_string(SERVICE_NAME_ENV, DEFAULT_SERVICE_NAME),
        agent_host: parse_string(AGENT_HOST_ENV, DEFAULT_AGENT_HOST),
        agent_port,
        ..ObservabilityConfig::default()
    }
}

/// Load logging configuration from environment.
fn load_log_config() -> LogConfig {
    let format = std::env::var(LOG_FORMAT_ENV)
        .ok()
        .and_then(|v| LogFormat::parse(&v))
        .unwrap_or_default();
    LogConfig {
        format,
        level: parse_string(LOG_LEVEL_ENV, "info"),
        output_path: None,
    }
}

/// Load all configuration from environment variables.
///
/// Missing or invalid values fall back to safe defaults without panicking.
pub fn load() -> EnvConfig {
    EnvConfig {
        client: load_client_config(),
        observability: load_observability_config(),
        log: load_log_config(),
    }
}

impl EnvConfig {
    /// Return a summary of all effective values.
    pub fn effective_config(&self) -> EffectiveConfig {
        EffectiveConfig {
            gateway_host: self.client.endpoint.host.clone(),
            endpoint_url: self.client.endpoint.url(),
            request_timeout_secs: self.client.timeout.as_secs(),
            agent_host: self.observability.agent_host.clone(),
            agent_port: self.observability.agent_port,
            service_name: self.observability.service_name.clone(),
            tracing_enabled: self.observability.enabled,
            log_level: self.log.level.clone(),
            log_format: self.log.format.as_str(),
        }
    }
}

/// Effective configuration with no environment overrides.
pub fn defaults() -> EffectiveConfig {
    EnvConfig {
        client: ClientConfig::default(),
        observability: ObservabilityConfig::default(),
        log: LogConfig::default(),
    }
    .effective_config()
}
