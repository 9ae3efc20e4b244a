//! CLI handler: build the pipeline config from arguments and settings file, then run once.

use anyhow::{Result, anyhow};
use clap::error::ErrorKind;
use log::{debug, warn};
use std::path::Path;
use std::process::ExitCode;

use crate::PipelineConfig;
use crate::QueueOrder;
use crate::engine::arg_parser::Cli;
use crate::utils::{
    ARGUMENT_ERR_CODE, NO_CONSTRAINT, PipegrepToml, apply_file_to_config, load_pipegrep_toml,
    setup_logging, usage_line,
};

/// Map a `-1`-sentinel argument to `None`; reject other negatives and out-of-range values.
pub fn constraint_from_arg<T: TryFrom<i64>>(value: i64, name: &str) -> Result<Option<T>> {
    if value == NO_CONSTRAINT {
        return Ok(None);
    }
    T::try_from(value).map(Some).map_err(|_| {
        anyhow!(
            "{} must be {} or a non-negative integer in range, got {}",
            name,
            NO_CONSTRAINT,
            value
        )
    })
}

/// Build the run config: defaults, then settings file, then CLI. Validates the result.
pub fn config_from_cli(cli: &Cli, file: Option<&PipegrepToml>) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::default();
    if let Some(file) = file {
        apply_file_to_config(file, &mut config)?;
    }
    config.buffer_capacity = cli.buffsize;
    config.max_file_size = constraint_from_arg(cli.filesize, "filesize")?;
    config.required_uid = constraint_from_arg(cli.uid, "uid")?;
    config.required_gid = constraint_from_arg(cli.gid, "gid")?;
    config.search = cli.string.clone();
    if let Some(ref root) = cli.root {
        config.root = root.clone();
    }
    if cli.lifo {
        config.order = QueueOrder::Lifo;
    }
    config.follow_links |= cli.follow_links;
    config.verbose |= cli.verbose;
    config.validate()?;
    Ok(config)
}

/// Report a clap failure. Help and version go to stdout with success; anything else is an
/// argument error: message and usage on stderr, exit code 1.
pub fn handle_parse_error(err: clap::Error) -> ExitCode {
    // Exiting either way; a failed write to a closed terminal has nowhere to be reported.
    err.print().ok();
    if matches!(
        err.kind(),
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
    ) {
        return ExitCode::SUCCESS;
    }
    eprintln!("{}", usage_line());
    ExitCode::from(ARGUMENT_ERR_CODE)
}

/// Run the pipeline once with stdout as the sink's output.
pub fn handle_run(cli: &Cli) -> Result<ExitCode> {
    let (file, file_err) = match load_pipegrep_toml(Path::new(".")) {
        Ok(f) => (f, None),
        Err(e) => (None, Some(e)),
    };
    let verbose = cli.verbose || file.as_ref().and_then(|f| f.verbose()).unwrap_or(false);
    setup_logging(verbose);
    if let Some(e) = file_err {
        warn!("ignoring settings file: {:#}", e);
    }

    let config = match config_from_cli(cli, file.as_ref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("{}", usage_line());
            return Ok(ExitCode::from(ARGUMENT_ERR_CODE));
        }
    };
    let (summary, _) = crate::run(&config, std::io::stdout(), None)?;
    debug!(
        "{} matches, {} items skipped",
        summary.matches, summary.skipped
    );
    Ok(ExitCode::SUCCESS)
}
