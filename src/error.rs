//! Request failure types for the gateway client.
//!
//! Every failure renders as `An error occurred: <cause>` so existing callers
//! that only read the message keep working. The variant tells callers which
//! stage failed: transport, timeout, HTTP status, or body decoding.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Coarse classification of a [`RequestFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Connection could not be established or broke mid-request.
    Network,
    /// The request did not complete within the configured timeout.
    Timeout,
    /// The endpoint answered with a non-2xx status.
    Status,
    /// The body was not valid JSON or had the wrong shape.
    Decode,
}

impl FailureKind {
    /// Stable lowercase label, used for metrics and span fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Status => "status",
            Self::Decode => "decode",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while calling the inference endpoint.
#[derive(Debug, Error)]
pub enum RequestFailure {
    #[error("An error occurred: {message}")]
    Network {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("An error occurred: {message}")]
    Timeout {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("An error occurred: {message}")]
    Status {
        status: u16,
        message: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("An error occurred: {message}")]
    Decode {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RequestFailure {
    /// Classify a transport-level error from the HTTP client.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        let message = error_chain(&err);
        if err.is_timeout() {
            Self::Timeout { message, source: err }
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                message,
                source: err,
            }
        } else {
            Self::Network { message, source: err }
        }
    }

    pub(crate) fn from_decode(err: serde_json::Error) -> Self {
        Self::Decode {
            message: err.to_string(),
            source: err,
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Network { .. } => FailureKind::Network,
            Self::Timeout { .. } => FailureKind::Timeout,
            Self::Status { .. } => FailureKind::Status,
            Self::Decode { .. } => FailureKind::Decode,
        }
    }

    /// HTTP status code, when the endpoint answered with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if retrying the same request could plausibly succeed.
    ///
    /// The client never retries on its own; this is for callers that do.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout { .. } => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Decode { .. } => false,
        }
    }
}

/// Render an error together with its source chain.
///
/// The HTTP client's top-level message omits the OS error ("Connection
/// refused"), which only appears further down the chain.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        current = cause.source();
    }
    message
}
