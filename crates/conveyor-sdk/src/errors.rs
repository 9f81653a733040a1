//! Typed error model for connectors and the emission path.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use conveyor_protocol::EncodeError;

use crate::config::ConfigError;

/// Broad classification of a connector failure.
#[derive(Debug, Clone, Copy, Error, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    #[error("config")]
    Config,
    #[error("auth")]
    Auth,
    #[error("permission")]
    Permission,
    #[error("rate_limit")]
    RateLimit,
    #[error("transient_network")]
    TransientNetwork,
    #[error("data")]
    Data,
    #[error("schema")]
    Schema,
    #[error("internal")]
    Internal,
}

/// Opaque error code following SCREAMING_SNAKE_CASE convention.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ErrorCode(pub String);

impl ErrorCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ErrorCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ErrorCode {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Error returned by a capability implementation.
///
/// The runner never retries these; it surfaces the message (as a LOG
/// envelope, or a FAILED connection status for `check`) and maps the
/// failure to a non-zero exit code.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq)]
#[error("[{category}] {code}: {message}")]
pub struct ConnectorError {
    pub category: ErrorCategory,
    pub code: ErrorCode,
    pub message: String,
}

impl ConnectorError {
    fn new(
        category: ErrorCategory,
        code: impl Into<ErrorCode>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Configuration error: bad or missing settings.
    pub fn config(code: impl Into<ErrorCode>, message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Config, code, message)
    }

    /// Authentication error: credentials rejected.
    pub fn auth(code: impl Into<ErrorCode>, message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Auth, code, message)
    }

    /// Permission error: authenticated but not allowed.
    pub fn permission(code: impl Into<ErrorCode>, message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Permission, code, message)
    }

    /// Rate limit reported by the upstream system.
    pub fn rate_limit(code: impl Into<ErrorCode>, message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::RateLimit, code, message)
    }

    /// Transient network failure.
    pub fn transient_network(code: impl Into<ErrorCode>, message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::TransientNetwork, code, message)
    }

    /// Malformed or unexpected upstream data.
    pub fn data(code: impl Into<ErrorCode>, message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Data, code, message)
    }

    /// Stream schema mismatch.
    pub fn schema(code: impl Into<ErrorCode>, message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Schema, code, message)
    }

    /// Bug or unexpected state inside the connector.
    pub fn internal(code: impl Into<ErrorCode>, message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Internal, code, message)
    }
}

impl From<ConfigError> for ConnectorError {
    fn from(err: ConfigError) -> Self {
        let code = match err {
            ConfigError::Unreadable { .. } => "CONFIG_UNREADABLE",
            ConfigError::Malformed { .. } => "CONFIG_MALFORMED",
        };
        Self::config(code, err.to_string())
    }
}

impl From<EmitError> for ConnectorError {
    fn from(err: EmitError) -> Self {
        Self::internal("EMIT_FAILED", err.to_string())
    }
}

impl From<EncodeError> for ConnectorError {
    fn from(err: EncodeError) -> Self {
        Self::internal("ENCODE_FAILED", err.to_string())
    }
}

/// Failure writing to the shared output sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The sink was closed; no further writes are possible.
    #[error("output sink is closed")]
    Closed,
    /// The underlying writer failed.
    #[error("write to output sink failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure emitting one envelope through the tracker.
#[derive(Debug, Error)]
pub enum EmitError {
    /// Record data must serialize to a JSON object.
    #[error("record for stream '{stream}' did not serialize to a JSON object")]
    NotAnObject { stream: String },
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}
