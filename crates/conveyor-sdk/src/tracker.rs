//! Message emission facade.
//!
//! `MessageTracker` is what capability implementations hold: it turns
//! domain calls (`log`, `record`, `state`, ...) into well-formed
//! [`Envelope`] lines and pushes each one through the [`SafeSink`] as a
//! single atomic write.

use std::io::Write;

use chrono::Utc;
use serde::Serialize;

use conveyor_protocol::{
    Catalog, ConnectionStatus, ConnectorSpecification, Envelope, LogLevel, LogMessage,
    RecordMessage, StateMessage,
};

use crate::errors::{EmitError, SinkError};
use crate::sink::SafeSink;

/// Thread-safe emission handle shared by all producers of one invocation.
///
/// The tracker owns the sink and adds no locking of its own: concurrent
/// callers may interleave whole lines in any order (each line is
/// independently valid), but a line can never carry bytes from two
/// calls. Every method emits exactly one line per call.
pub struct MessageTracker {
    sink: SafeSink,
}

impl MessageTracker {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            sink: SafeSink::new(writer),
        }
    }

    /// Tracker writing to the process's stdout, the normal wiring when
    /// run under an orchestrator.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    /// Emit a LOG envelope.
    pub fn log(&self, level: LogLevel, message: impl Into<String>) -> Result<(), EmitError> {
        self.emit(&Envelope::Log {
            log: LogMessage {
                level,
                message: message.into(),
            },
        })
    }

    /// Emit a RECORD envelope stamped with the current time.
    ///
    /// `data` must serialize to a JSON object; anything else fails with
    /// [`EmitError::NotAnObject`] and emits nothing.
    pub fn record<T: Serialize>(
        &self,
        stream: &str,
        namespace: Option<&str>,
        data: &T,
    ) -> Result<(), EmitError> {
        let data = serde_json::to_value(data)
            .map_err(conveyor_protocol::EncodeError::from)?;
        if !data.is_object() {
            return Err(EmitError::NotAnObject {
                stream: stream.to_string(),
            });
        }
        self.emit(&Envelope::Record {
            record: RecordMessage {
                stream: stream.to_string(),
                namespace: namespace.map(str::to_string),
                emitted_at: Utc::now().timestamp_millis(),
                data,
            },
        })
    }

    /// Emit a STATE envelope carrying an opaque checkpoint.
    ///
    /// The orchestrator treats the last state written as authoritative.
    /// Relative to `record` calls from other threads, a state's position
    /// reflects only sink write order, not causality: a caller that
    /// needs "state covers all records emitted so far" must join its
    /// producer threads before checkpointing.
    pub fn state<T: Serialize>(&self, checkpoint: &T) -> Result<(), EmitError> {
        let data = serde_json::to_value(checkpoint)
            .map_err(conveyor_protocol::EncodeError::from)?;
        self.emit(&Envelope::State {
            state: StateMessage { data },
        })
    }

    /// Emit a CATALOG envelope.
    pub fn catalog(&self, catalog: &Catalog) -> Result<(), EmitError> {
        self.emit(&Envelope::Catalog {
            catalog: catalog.clone(),
        })
    }

    /// Emit a CONNECTION_STATUS envelope.
    pub fn connection_status(&self, status: &ConnectionStatus) -> Result<(), EmitError> {
        self.emit(&Envelope::ConnectionStatus {
            connection_status: status.clone(),
        })
    }

    /// Emit a SPEC envelope.
    pub fn spec(&self, specification: &ConnectorSpecification) -> Result<(), EmitError> {
        self.emit(&Envelope::Spec {
            spec: specification.clone(),
        })
    }

    /// Flush and release the sink. Further emission fails.
    pub fn close(&self) -> Result<(), SinkError> {
        self.sink.close()
    }

    fn emit(&self, envelope: &Envelope) -> Result<(), EmitError> {
        let mut line = envelope.encode()?;
        line.push(b'\n');
        self.sink.write(&line)?;
        Ok(())
    }
}
