//! Stage 1: walk the tree under the root and push every regular file.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::debug;
use walkdir::WalkDir;

use crate::engine::tools::display_path;
use crate::pipeline::context::{PipelineContext, StageGuard};
use crate::pipeline::queue::BoundedQueue;
use crate::{FileRecord, SkipStage};

/// One result from the directory walk.
#[derive(Debug)]
pub enum WalkOutcome {
    /// A regular file.
    File(PathBuf),
    /// Directory, symlink, socket, ... Directories are descended into by the walker itself.
    Other,
    Err { msg: String, path: Option<PathBuf> },
}

/// Convert a walkdir result into [`WalkOutcome`].
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> WalkOutcome {
    match r {
        Ok(entry) if entry.file_type().is_file() => WalkOutcome::File(entry.into_path()),
        Ok(_) => WalkOutcome::Other,
        Err(err) => WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        },
    }
}

// walkdir keeps its own stack of open directories, so depth is bounded by memory, not the call
// stack. Without follow_links, symlinks show up as `Other` and are never descended into.
fn walkdir_iter(ctx: &PipelineContext) -> Box<dyn Iterator<Item = WalkOutcome>> {
    Box::new(
        WalkDir::new(ctx.root())
            .min_depth(1)
            .follow_links(ctx.config.follow_links)
            .into_iter()
            .map(to_outcome_walkdir),
    )
}

pub fn spawn_scan_thread(
    ctx: PipelineContext,
    files: Arc<BoundedQueue<FileRecord>>,
) -> JoinHandle<usize> {
    thread::spawn(move || {
        let iter = walkdir_iter(&ctx);
        run_scan_loop(&ctx, iter, &files)
    })
}

/// Consume `iter`, push each regular file to `files` (blocking under backpressure), record
/// walk errors as skips, then mark `files` finished. Returns the number of files pushed.
pub fn run_scan_loop<I>(ctx: &PipelineContext, iter: I, files: &BoundedQueue<FileRecord>) -> usize
where
    I: Iterator<Item = WalkOutcome>,
{
    let _guard = StageGuard::<FileRecord, _>::new(None, Some(files));
    let mut count = 0_usize;
    for outcome in iter {
        match outcome {
            WalkOutcome::File(path) => {
                let display = display_path(&path, ctx.root());
                if !files.put(FileRecord { path, display }) {
                    debug!("scan: downstream closed, stopping");
                    break;
                }
                count += 1;
            }
            WalkOutcome::Other => {}
            WalkOutcome::Err { msg, path } => ctx.skip(SkipStage::Scan, path, msg),
        }
    }
    files.mark_finished();
    debug!("scan: done, {} files", count);
    count
}
