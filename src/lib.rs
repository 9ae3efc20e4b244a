//! pipegrep: five-stage threaded grep connected by bounded blocking queues.
//!
//! scan → attribute filter → line emitter → substring filter → sink, one thread per stage.

pub mod engine;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

use log::debug;
use std::io::Write;

/// Result alias used by public pipegrep API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: run the pipeline once over `config.root`, writing one
/// `path(lineNumber)` line per match and the summary line to `out`.
///
/// - **`on_skip: None`** → skipped items are only counted (and logged at debug level).
/// - **`on_skip: Some(f)`** → `f` is also called for every skipped item, from the stage thread
///   that dropped it. Keep it fast.
///
/// Returns the run summary and `out` back (e.g. to inspect a `Vec<u8>`).
pub fn run<W>(config: &PipelineConfig, out: W, on_skip: Option<SkipHook>) -> Result<(RunSummary, W)>
where
    W: Write + Send + 'static,
{
    let config_str = format!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        config
    );
    debug!("{}", config_str);
    pipeline::run_pipeline(config, out, on_skip)
}
