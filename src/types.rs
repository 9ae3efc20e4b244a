//! Public and internal types for the pipegrep API and pipeline.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, bail};

/// Removal policy for every inter-stage queue.
///
/// Counts are identical under both orders; only the order of printed matches changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QueueOrder {
    /// Oldest item first (traversal / read order is preserved end to end).
    #[default]
    Fifo,
    /// Most recently inserted item first.
    Lifo,
}

impl FromStr for QueueOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fifo" => Ok(QueueOrder::Fifo),
            "lifo" => Ok(QueueOrder::Lifo),
            other => bail!("unknown queue order '{other}' (expected 'fifo' or 'lifo')"),
        }
    }
}

/// Read-only configuration shared by all five stages for one run.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Capacity of each of the four inter-stage queues. Must be at least 1.
    pub buffer_capacity: usize,
    /// Keep only files strictly larger than this many bytes. `None` = no limit.
    pub max_file_size: Option<u64>,
    /// Keep only files owned by this uid. `None` = any owner.
    pub required_uid: Option<u32>,
    /// Keep only files whose group is this gid. `None` = any group.
    pub required_gid: Option<u32>,
    /// Case-sensitive substring a line must contain. Must be non-empty.
    pub search: String,
    /// Directory to scan.
    pub root: PathBuf,
    /// Queue removal policy.
    pub order: QueueOrder,
    /// Follow symbolic links while scanning (cycles are detected and skipped).
    pub follow_links: bool,
    /// List skipped paths on stderr at the end of the run.
    pub verbose: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: 1,
            max_file_size: None,
            required_uid: None,
            required_gid: None,
            search: String::new(),
            root: PathBuf::from("."),
            order: QueueOrder::default(),
            follow_links: false,
            verbose: false,
        }
    }
}

impl PipelineConfig {
    /// Reject configurations no stage can run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.buffer_capacity == 0 {
            bail!("buffer capacity must be a positive integer");
        }
        if self.search.is_empty() {
            bail!("search string must not be empty");
        }
        Ok(())
    }
}

/// A regular file found by the scanner (stage 1 → 2 → 3).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileRecord {
    /// Path that can be stat'ed and opened (root joined with the relative part).
    pub path: PathBuf,
    /// Root-relative path with `/` separators; what ends up printed.
    pub display: String,
}

/// One numbered line of one file (stage 3 → 4 → 5).
///
/// The wire form is `path:lineNumber:content` (see the [`fmt::Display`] and [`FromStr`] impls).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineRecord {
    pub path: String,
    /// 1-based, local to the file.
    pub line_number: u64,
    pub content: String,
}

impl LineRecord {
    /// The per-match output line: `path(lineNumber)`.
    pub fn location(&self) -> String {
        format!("{}({})", self.path, self.line_number)
    }
}

impl fmt::Display for LineRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.line_number, self.content)
    }
}

impl FromStr for LineRecord {
    type Err = anyhow::Error;

    /// Path is everything before the first colon, the line number sits between the first and
    /// second colon, and the remainder (which may contain colons) is the content.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, rest) = s
            .split_once(':')
            .with_context(|| format!("record has no path separator: {s:?}"))?;
        let (number, content) = rest
            .split_once(':')
            .with_context(|| format!("record has no line number separator: {s:?}"))?;
        let line_number: u64 = number
            .parse()
            .with_context(|| format!("invalid line number {number:?} in record"))?;
        if line_number == 0 {
            bail!("line numbers start at 1: {s:?}");
        }
        Ok(LineRecord {
            path: path.to_string(),
            line_number,
            content: content.to_string(),
        })
    }
}

/// Content segment of a wire record: everything after the last colon.
/// Returns the whole string when there is no colon.
pub fn wire_content(record: &str) -> &str {
    record.rsplit_once(':').map_or(record, |(_, c)| c)
}

/// Where a per-item failure happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipStage {
    /// Directory entry could not be read during the scan.
    Scan,
    /// File metadata could not be read (attribute filter).
    Stat,
    /// File could not be opened (line emitter).
    Open,
    /// Read failed part-way through a file (line emitter).
    Read,
}

impl fmt::Display for SkipStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipStage::Scan => "scan",
            SkipStage::Stat => "stat",
            SkipStage::Open => "open",
            SkipStage::Read => "read",
        };
        f.write_str(s)
    }
}

/// A silently skipped item. Never crosses a queue boundary; reported to the skip hook and log.
#[derive(Clone, Debug)]
pub struct SkipEvent {
    pub stage: SkipStage,
    pub path: Option<PathBuf>,
    pub reason: String,
}

/// Injectable observer invoked once per [`SkipEvent`], from whichever stage thread skipped.
pub type SkipHook = Arc<dyn Fn(&SkipEvent) + Send + Sync>;

/// Outcome of one pipeline run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Matches printed by the sink.
    pub matches: u64,
    /// Items skipped across all stages.
    pub skipped: usize,
}
