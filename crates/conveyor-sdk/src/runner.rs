//! Command dispatch: CLI invocation in, capability call + envelopes out.
//!
//! The orchestrator invokes the compiled connector as a subprocess:
//!
//! ```text
//! <connector> spec
//! <connector> check    --config <path>
//! <connector> discover --config <path>
//! <connector> read     --config <path> --catalog <path> [--state <path>]
//! ```
//!
//! [`SourceRunner`] resolves the command, hands a [`MessageTracker`] to
//! the matching [`Source`] capability, emits the envelope the protocol
//! defines for the result, and maps the outcome to the process exit
//! code. It never retries: re-running a failed sync from the last STATE
//! checkpoint is the orchestrator's job.

use std::ffi::OsString;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};

use conveyor_protocol::{ConfiguredCatalog, ConnectionStatus, LogLevel, Status};

use crate::config;
use crate::errors::ConnectorError;
use crate::source::Source;
use crate::tracker::MessageTracker;

/// Command completed successfully.
pub const EXIT_OK: u8 = 0;
/// A capability failed, or `check` found the configuration invalid.
pub const EXIT_FAILURE: u8 = 1;
/// Arguments did not resolve: bad flags, or an unreadable/malformed
/// input file. Reported before any capability runs.
pub const EXIT_USAGE: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "connector", about = "Run a conveyor source connector")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the connector's configuration specification
    Spec,
    /// Validate the given configuration
    Check {
        /// Path to the connector configuration JSON file
        #[arg(long)]
        config: PathBuf,
    },
    /// List the streams this connector can sync
    Discover {
        /// Path to the connector configuration JSON file
        #[arg(long)]
        config: PathBuf,
    },
    /// Sync records from the source
    Read {
        /// Path to the connector configuration JSON file
        #[arg(long)]
        config: PathBuf,
        /// Path to the configured catalog JSON file
        #[arg(long)]
        catalog: PathBuf,
        /// Path to the last state checkpoint, if a previous sync emitted one
        #[arg(long)]
        state: Option<PathBuf>,
    },
}

/// Protocol execution engine for one connector invocation.
///
/// Owns the tracker (and through it the output sink) for the lifetime
/// of the invocation; the capability implementation only ever borrows
/// it.
pub struct SourceRunner<S> {
    source: S,
    tracker: MessageTracker,
}

impl<S: Source> SourceRunner<S> {
    /// Runner emitting to stdout, the normal wiring.
    pub fn new(source: S) -> Self {
        Self {
            source,
            tracker: MessageTracker::stdout(),
        }
    }

    /// Runner emitting to an arbitrary sink. Lets tests (and embedders)
    /// capture the protocol stream.
    pub fn with_sink<W: Write + Send + 'static>(source: S, sink: W) -> Self {
        Self {
            source,
            tracker: MessageTracker::new(sink),
        }
    }

    /// Parse the process arguments, dispatch, and return the exit code
    /// for `main`.
    pub fn run(self) -> ExitCode {
        ExitCode::from(self.execute(std::env::args_os()))
    }

    /// Like [`run`](Self::run), but over explicit arguments (the first
    /// is the binary name) and returning the raw exit code.
    pub fn execute<I, T>(self, args: I) -> u8
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let code = match Cli::try_parse_from(args) {
            Ok(cli) => self.dispatch(cli.command),
            Err(err) if err.kind() == ErrorKind::DisplayHelp => {
                let _ = err.print();
                EXIT_OK
            }
            Err(err) => {
                // ArgumentError: fatal before any capability runs, but
                // still leave a trail in the orchestrator's log capture.
                let _ = self
                    .tracker
                    .log(LogLevel::Fatal, format!("invalid arguments: {err}"));
                let _ = err.print();
                EXIT_USAGE
            }
        };
        let _ = self.tracker.close();
        code
    }

    fn dispatch(&self, command: Command) -> u8 {
        match command {
            Command::Spec => self.run_spec(),
            Command::Check { config } => self.run_check(&config),
            Command::Discover { config } => self.run_discover(&config),
            Command::Read {
                config,
                catalog,
                state,
            } => self.run_read(&config, &catalog, state.as_deref()),
        }
    }

    fn run_spec(&self) -> u8 {
        tracing::debug!("dispatching spec");
        match self.source.spec(&self.tracker) {
            Ok(specification) => match self.tracker.spec(&specification) {
                Ok(()) => EXIT_OK,
                Err(err) => self.sink_dead("emit connector specification", &err),
            },
            Err(err) => self.capability_failed("spec", &err),
        }
    }

    fn run_check(&self, config: &Path) -> u8 {
        tracing::debug!(config = %config.display(), "dispatching check");
        if let Err(code) = self.require_readable(config) {
            return code;
        }

        // Exactly one CONNECTION_STATUS per check, whatever the outcome.
        let status = match self.source.check(config, &self.tracker) {
            Ok(()) => ConnectionStatus::succeeded(),
            Err(err) => ConnectionStatus::failed(err.to_string()),
        };
        let failed = status.status == Status::Failed;
        if let Err(err) = self.tracker.connection_status(&status) {
            return self.sink_dead("emit connection status", &err);
        }
        if failed {
            let _ = self.tracker.log(
                LogLevel::Error,
                format!(
                    "configuration check failed: {}",
                    status.message.as_deref().unwrap_or_default()
                ),
            );
            EXIT_FAILURE
        } else {
            EXIT_OK
        }
    }

    fn run_discover(&self, config: &Path) -> u8 {
        tracing::debug!(config = %config.display(), "dispatching discover");
        if let Err(code) = self.require_readable(config) {
            return code;
        }
        match self.source.discover(config, &self.tracker) {
            Ok(catalog) => match self.tracker.catalog(&catalog) {
                Ok(()) => EXIT_OK,
                Err(err) => self.sink_dead("emit catalog", &err),
            },
            Err(err) => self.capability_failed("discover", &err),
        }
    }

    fn run_read(&self, config: &Path, catalog_path: &Path, state: Option<&Path>) -> u8 {
        tracing::debug!(
            config = %config.display(),
            catalog = %catalog_path.display(),
            "dispatching read"
        );
        if let Err(code) = self.require_readable(config) {
            return code;
        }
        let catalog: ConfiguredCatalog = match config::load_json(catalog_path) {
            Ok(catalog) => catalog,
            Err(err) => return self.argument_error(format!("configured catalog: {err}")),
        };
        match self.source.read(config, state, &catalog, &self.tracker) {
            Ok(()) => EXIT_OK,
            Err(err) => self.capability_failed("read", &err),
        }
    }

    // Unreadable input files are argument-resolution failures: caught
    // here so no capability ever runs with a path it cannot open.
    fn require_readable(&self, path: &Path) -> Result<(), u8> {
        match File::open(path) {
            Ok(_) => Ok(()),
            Err(err) => Err(self.argument_error(format!("cannot read {}: {err}", path.display()))),
        }
    }

    fn argument_error(&self, message: String) -> u8 {
        tracing::error!("{message}");
        let _ = self.tracker.log(LogLevel::Fatal, message);
        EXIT_USAGE
    }

    fn capability_failed(&self, operation: &str, err: &ConnectorError) -> u8 {
        tracing::error!(operation, "capability failed: {err}");
        let _ = self
            .tracker
            .log(LogLevel::Error, format!("{operation} failed: {err}"));
        EXIT_FAILURE
    }

    // The sink itself is gone; assume every further write fails and get
    // the diagnostic out on stderr instead.
    fn sink_dead(&self, action: &str, err: &dyn std::error::Error) -> u8 {
        tracing::error!("failed to {action}: {err}");
        EXIT_FAILURE
    }
}
