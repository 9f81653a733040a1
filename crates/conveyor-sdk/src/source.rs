//! The capability contract a connector author implements.

use std::path::Path;

use conveyor_protocol::{Catalog, ConfiguredCatalog, ConnectorSpecification};

use crate::errors::ConnectorError;
use crate::tracker::MessageTracker;

/// The four capabilities of a source connector.
///
/// Implement this trait and hand the value to
/// [`SourceRunner`](crate::runner::SourceRunner); the runner does the
/// rest: command dispatch, envelope emission for your return values,
/// and exit-code mapping.
///
/// The tracker passed to every method is safe to share across threads,
/// so `read` is free to fan out one worker per stream:
///
/// ```ignore
/// fn read(&self, config: &Path, state: Option<&Path>,
///         catalog: &ConfiguredCatalog, tracker: &MessageTracker)
///         -> Result<(), ConnectorError> {
///     std::thread::scope(|scope| {
///         for stream in &catalog.streams {
///             scope.spawn(|| sync_stream(stream, tracker));
///         }
///     });
///     tracker.state(&checkpoint)?;
///     Ok(())
/// }
/// ```
pub trait Source {
    /// Describe the configuration "form" this connector expects.
    fn spec(&self, tracker: &MessageTracker) -> Result<ConnectorSpecification, ConnectorError>;

    /// Verify the configuration at `config_path`, typically credentials
    /// and connectivity. `Ok(())` means usable; the error message of an
    /// `Err` is surfaced to the orchestrator in a FAILED status.
    fn check(&self, config_path: &Path, tracker: &MessageTracker) -> Result<(), ConnectorError>;

    /// Describe the streams available for syncing.
    fn discover(
        &self,
        config_path: &Path,
        tracker: &MessageTracker,
    ) -> Result<Catalog, ConnectorError>;

    /// Sync the selected streams, emitting records and checkpoints
    /// through the tracker. `state_path` points at the last checkpoint
    /// the orchestrator persisted, if any. Returning an error aborts the
    /// sync; returning `Ok(())` ends it successfully, and sources that
    /// support resumption should emit a final state first.
    fn read(
        &self,
        config_path: &Path,
        state_path: Option<&Path>,
        catalog: &ConfiguredCatalog,
        tracker: &MessageTracker,
    ) -> Result<(), ConnectorError>;
}
