//! Logging setup. Everything goes to stderr; stdout carries only the sink's results.

use colored::Colorize;
use env_logger::{Builder, Target};
use log::{Level, LevelFilter};
use std::io::Write;

/// Short tag for a log target: the stage module for pipeline records
/// (`pipegrep::pipeline::scan` → `scan`), otherwise the target unchanged.
pub fn stage_tag(target: &str) -> &str {
    let crate_prefix = concat!(env!("CARGO_CRATE_NAME"), "::");
    match target.strip_prefix(crate_prefix) {
        Some(rest) => rest.strip_prefix("pipeline::").unwrap_or(rest),
        None => target,
    }
}

fn crate_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

pub fn setup_logging(verbose: bool) {
    Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_CRATE_NAME"), crate_level(verbose))
        .target(Target::Stderr)
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME").cyan();
            let tag = stage_tag(record.target());
            let level = match record.level() {
                Level::Error => Some("ERROR".red()),
                Level::Warn => Some("WARN".yellow()),
                Level::Trace => Some("TRACE".dimmed()),
                Level::Info | Level::Debug => None,
            };
            match level {
                Some(level) => {
                    writeln!(buf, "[{} {} {}] {}", name, level, tag.white(), record.args())
                }
                None => writeln!(buf, "[{} {}] {}", name, tag.white(), record.args()),
            }
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_tag_for_pipeline_modules() {
        assert_eq!(stage_tag("pipegrep::pipeline::scan"), "scan");
        assert_eq!(stage_tag("pipegrep::pipeline::sink"), "sink");
    }

    #[test]
    fn test_stage_tag_other_targets() {
        assert_eq!(stage_tag("pipegrep::engine::cli"), "engine::cli");
        assert_eq!(stage_tag("walkdir"), "walkdir");
    }

    #[test]
    fn test_verbose_raises_crate_level() {
        assert_eq!(crate_level(true), LevelFilter::Debug);
        assert_eq!(crate_level(false), LevelFilter::Info);
    }
}
