//! Address of the ensemble generate endpoint behind the model gateway.

use std::time::Duration;

/// Gateway host used when `ASM_GATEWAY_IP` is unset.
pub const DEFAULT_GATEWAY_HOST: &str = "localhost";

/// The gateway listens on plain HTTP.
pub const GATEWAY_PORT: u16 = 80;

pub const GENERATE_PATH: &str = "/v2/models/ensemble/generate";

/// Virtual host the gateway routes to the model service.
pub const MODEL_HOST_HEADER: &str = "llama.default.example.com";

/// Request timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where generate requests are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub host: String,
    pub port: u16,
    pub path: String,
    pub host_header: String,
}

impl EndpointConfig {
    /// Endpoint on the gateway at `host`, using the fixed port and path.
    pub fn gateway(host: impl Into<String>) -> Self {
        Self::with_port(host, GATEWAY_PORT)
    }

    /// Endpoint on an explicit port. Used to point the client at a local
    /// server, such as a test double.
    pub fn with_port(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            path: GENERATE_PATH.to_string(),
            host_header: MODEL_HOST_HEADER.to_string(),
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}{}", self.host, self.port, self.path)
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self::gateway(DEFAULT_GATEWAY_HOST)
    }
}

/// Everything a [`ModelClient`](super::ModelClient) needs to issue requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: EndpointConfig,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(endpoint: EndpointConfig) -> Self {
        Self {
            endpoint,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(EndpointConfig::default())
    }
}
