use clap::Parser;
use std::path::PathBuf;

/// Five-stage threaded grep over a directory tree.
///
/// Prints `path(lineNumber)` for every line containing STRING in a regular file under the root
/// that passes the size/owner/group filter, then the total number of matches.
#[derive(Clone, Debug, Parser)]
#[command(name = "pipegrep", version)]
#[command(allow_negative_numbers = true)]
pub struct Cli {
    /// Capacity of each queue between stages (positive integer).
    #[arg(value_name = "BUFFSIZE")]
    pub buffsize: usize,

    /// Keep only files strictly larger than this many bytes; -1 for no limit.
    #[arg(value_name = "FILESIZE")]
    pub filesize: i64,

    /// Keep only files owned by this uid; -1 for any owner.
    #[arg(value_name = "UID")]
    pub uid: i64,

    /// Keep only files with this gid; -1 for any group.
    #[arg(value_name = "GID")]
    pub gid: i64,

    /// Case-sensitive text a line must contain (non-empty).
    #[arg(value_name = "STRING")]
    pub string: String,

    /// Directory to scan. Default: current directory (or `root` from .pipegrep.toml).
    #[arg(long, short)]
    pub root: Option<PathBuf>,

    /// Take the most recently queued item first instead of the oldest.
    #[arg(long)]
    pub lifo: bool,

    /// Follow symbolic links while scanning (cycles are skipped).
    #[arg(long, short = 'f')]
    pub follow_links: bool,

    /// Verbose output on stderr: debug logging and the list of skipped paths.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
