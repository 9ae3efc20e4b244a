//! Stage 5: print `path(lineNumber)` per match, then the total.

use std::io::{self, Write};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, warn};

use crate::LineRecord;
use crate::pipeline::context::StageGuard;
use crate::pipeline::queue::BoundedQueue;
use crate::utils::config::summary_line;

/// Sink result: match count and the writer handed back, or the first write error.
pub type SinkResult<W> = io::Result<(u64, W)>;

pub fn spawn_sink_thread<W>(
    matches: Arc<BoundedQueue<LineRecord>>,
    out: W,
) -> JoinHandle<SinkResult<W>>
where
    W: Write + Send + 'static,
{
    thread::spawn(move || run_sink(&matches, out))
}

/// Consume `matches` until end of stream, writing one line per record in the order taken and
/// the summary line at the end.
///
/// After a write error nothing more is written, but the queue is still drained so upstream
/// stages finish; the error is returned.
pub fn run_sink<W: Write>(matches: &BoundedQueue<LineRecord>, mut out: W) -> SinkResult<W> {
    let _guard = StageGuard::<_, LineRecord>::new(Some(matches), None);
    let mut count = 0_u64;
    let mut first_error: Option<io::Error> = None;
    while let Some(record) = matches.take() {
        count += 1;
        if first_error.is_none()
            && let Err(e) = writeln!(out, "{}", record.location())
        {
            warn!("sink: output failed, draining remaining matches: {e}");
            first_error = Some(e);
        }
    }
    debug!("sink: done, {} matches", count);
    if let Some(e) = first_error {
        return Err(e);
    }
    writeln!(out, "{}", summary_line(count))?;
    out.flush()?;
    Ok((count, out))
}
