//! pipegrep CLI: scan a tree, filter files, print matching lines and the match count.

use anyhow::Result;
use clap::Parser;
use pipegrep::engine::arg_parser::Cli;
use pipegrep::engine::{handle_parse_error, handle_run};
use std::process::ExitCode;
use std::time::Instant;

fn main() -> Result<ExitCode> {
    let start_time = Instant::now();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return Ok(handle_parse_error(e)),
    };
    let code = handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(code)
}
