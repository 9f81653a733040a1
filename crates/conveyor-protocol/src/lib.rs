//! Wire protocol types shared between connectors and the host orchestrator.
//!
//! Everything a connector puts on stdout is an [`Envelope`]: one
//! self-contained JSON message per line. This crate holds the envelope
//! union, its payload types, and the line codec. It has no I/O and no
//! concurrency; the emission machinery lives in `conveyor-sdk`.

mod catalog;
mod envelope;
mod error;
mod spec;

pub use catalog::*;
pub use envelope::*;
pub use error::*;
pub use spec::*;
