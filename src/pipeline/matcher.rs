//! Stage 4: forward only the lines whose content contains the search string.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, trace};

use crate::LineRecord;
use crate::pipeline::context::{PipelineContext, StageGuard};
use crate::pipeline::queue::BoundedQueue;

/// Case-sensitive substring test on the content only, never the path or line number.
pub fn line_matches(record: &LineRecord, search: &str) -> bool {
    record.content.contains(search)
}

pub fn spawn_matcher_thread(
    ctx: PipelineContext,
    lines: Arc<BoundedQueue<LineRecord>>,
    matches: Arc<BoundedQueue<LineRecord>>,
) -> JoinHandle<u64> {
    thread::spawn(move || run_substring_filter(&ctx, &lines, &matches))
}

/// Take records until end of stream, forward matches unmodified, drop the rest.
/// Marks `matches` finished on exit. Returns the number forwarded.
pub fn run_substring_filter(
    ctx: &PipelineContext,
    lines: &BoundedQueue<LineRecord>,
    matches: &BoundedQueue<LineRecord>,
) -> u64 {
    let _guard = StageGuard::new(Some(lines), Some(matches));
    let search = ctx.config.search.as_str();
    let mut forwarded = 0_u64;
    while let Some(record) = lines.take() {
        if line_matches(&record, search) {
            trace!("match {}", record);
            if !matches.put(record) {
                debug!("substring filter: downstream closed, stopping");
                break;
            }
            forwarded += 1;
        }
    }
    matches.mark_finished();
    debug!("substring filter: done, {} matches", forwarded);
    forwarded
}
