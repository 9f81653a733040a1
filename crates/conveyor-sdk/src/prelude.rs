//! Convenience re-exports for connector authors.
//!
//! ```ignore
//! use conveyor_sdk::prelude::*;
//! ```

// Capability contract and runner
pub use crate::runner::SourceRunner;
pub use crate::source::Source;

// Emission
pub use crate::tracker::MessageTracker;
pub use conveyor_protocol::LogLevel;

// Errors
pub use crate::errors::{ConnectorError, EmitError, ErrorCategory, SinkError};

// Protocol types — catalogs and streams
pub use conveyor_protocol::{
    Catalog, ConfiguredCatalog, ConfiguredStream, DestinationSyncMode, Stream, SyncMode,
};

// Protocol types — specification form
pub use conveyor_protocol::{
    ConnectionSpecification, ConnectorSpecification, PropType, Properties, PropertySpec,
    PropertyType,
};

// Protocol types — statuses
pub use conveyor_protocol::{ConnectionStatus, Status};

// Helpers
pub use crate::config::load_json;
pub use crate::schema::{infer_from, infer_properties};
