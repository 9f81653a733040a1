//! The envelope union and its line codec.
//!
//! An [`Envelope`] is one typed message on the protocol stream. The wire
//! form is internally tagged: a `type` discriminator plus exactly one
//! payload key matching it, e.g.
//! `{"type":"RECORD","record":{"stream":"users",...}}`.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{EncodeError, ParseError};
use crate::spec::ConnectorSpecification;

/// Log severity carried in a LOG envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

/// Free-text diagnostic message for the orchestrator's log capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMessage {
    pub level: LogLevel,
    pub message: String,
}

/// One domain record emitted during a sync.
///
/// `(stream, namespace)` identifies the logical stream the record belongs
/// to; `data` is the opaque domain object and must be a JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMessage {
    /// Name of the stream this record belongs to.
    pub stream: String,
    /// Optional namespace qualifying the stream name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Emission time, epoch milliseconds.
    pub emitted_at: i64,
    /// The domain record itself.
    pub data: serde_json::Value,
}

/// Opaque sync-progress checkpoint.
///
/// The orchestrator persists the last STATE it sees and hands it back on
/// the next `read` invocation; this core never interprets the contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateMessage {
    pub data: serde_json::Value,
}

/// Outcome of a configuration check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Succeeded,
    Failed,
}

/// Result of validating connector configuration, as put on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ConnectionStatus {
    pub fn succeeded() -> Self {
        Self {
            status: Status::Succeeded,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: Status::Failed,
            message: Some(message.into()),
        }
    }
}

/// One self-contained message on the protocol stream.
///
/// Invariant: every emitted line decodes to exactly one `Envelope`, and
/// the `type` tag always matches the payload key present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Envelope {
    Log {
        log: LogMessage,
    },
    Record {
        record: RecordMessage,
    },
    State {
        state: StateMessage,
    },
    Catalog {
        catalog: Catalog,
    },
    ConnectionStatus {
        #[serde(rename = "connectionStatus")]
        connection_status: ConnectionStatus,
    },
    Spec {
        spec: ConnectorSpecification,
    },
}

impl Envelope {
    /// Encode to canonical single-line JSON (no trailing newline).
    ///
    /// Compact JSON never contains a raw newline byte (newlines inside
    /// string payloads are escaped), so the result is always safe to
    /// terminate with `\n` and ship as one protocol line.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        serde_json::to_vec(self).map_err(EncodeError::from)
    }

    /// Decode one protocol line (without its newline terminator).
    pub fn decode(bytes: &[u8]) -> Result<Self, ParseError> {
        serde_json::from_slice(bytes).map_err(ParseError::from)
    }
}
