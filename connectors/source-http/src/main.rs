//! Source connector for a paged HTTP API.
//!
//! Illustrates the full capability surface: a configuration form
//! (`spec`), credential verification against a ping endpoint (`check`),
//! stream discovery with inferred schemas (`discover`), and a cursor-
//! checkpointed sync (`read`).

mod client;
mod config;
mod source;

use std::process::ExitCode;

use conveyor_sdk::logging;
use conveyor_sdk::runner::SourceRunner;

use crate::source::SourceHttp;

fn main() -> ExitCode {
    logging::init("info");
    SourceRunner::new(SourceHttp::new()).run()
}
