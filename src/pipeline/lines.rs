//! Stage 3: split each kept file into numbered lines.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::debug;

use crate::pipeline::context::{PipelineContext, StageGuard};
use crate::pipeline::queue::BoundedQueue;
use crate::utils::config::LINE_READ_BUFFER_SIZE;
use crate::{FileRecord, LineRecord, SkipStage};

pub fn spawn_line_thread(
    ctx: PipelineContext,
    kept: Arc<BoundedQueue<FileRecord>>,
    lines: Arc<BoundedQueue<LineRecord>>,
) -> JoinHandle<u64> {
    thread::spawn(move || run_line_emitter(&ctx, &kept, &lines))
}

/// Take files until end of stream and push one [`LineRecord`] per line. A file that cannot be
/// opened is skipped and the stage moves on. Marks `lines` finished on exit.
/// Returns the total number of lines pushed.
pub fn run_line_emitter(
    ctx: &PipelineContext,
    kept: &BoundedQueue<FileRecord>,
    lines: &BoundedQueue<LineRecord>,
) -> u64 {
    let _guard = StageGuard::new(Some(kept), Some(lines));
    let mut total = 0_u64;
    while let Some(file) = kept.take() {
        if lines.is_closed() {
            break;
        }
        let handle = match File::open(&file.path) {
            Ok(f) => f,
            Err(e) => {
                ctx.skip(SkipStage::Open, Some(file.path), format!("{e}"));
                continue;
            }
        };
        let reader = BufReader::with_capacity(LINE_READ_BUFFER_SIZE, handle);
        let (emitted, err) = emit_lines(reader, &file.display, lines);
        total += emitted;
        if let Some(e) = err {
            ctx.skip(SkipStage::Read, Some(file.path), format!("{e}"));
        }
    }
    lines.mark_finished();
    debug!("line emitter: done, {} lines", total);
    total
}

/// Push every line of `reader` as a record for `path`, numbering from 1.
///
/// `\n` and `\r\n` terminators are stripped; a last line without a terminator still counts.
/// Invalid UTF-8 is replaced lossily. A read error stops this file; lines already pushed stand.
/// Stops early, without error, if `lines` has been closed by its consumer.
/// Returns the number of lines pushed and the read error, if any.
pub fn emit_lines<R: BufRead>(
    mut reader: R,
    path: &str,
    lines: &BoundedQueue<LineRecord>,
) -> (u64, Option<std::io::Error>) {
    let mut line_number = 0_u64;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => return (line_number, None),
            Ok(_) => {
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                    if buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                }
                line_number += 1;
                let record = LineRecord {
                    path: path.to_string(),
                    line_number,
                    content: String::from_utf8_lossy(&buf).into_owned(),
                };
                if !lines.put(record) {
                    return (line_number - 1, None);
                }
            }
            Err(e) => return (line_number, Some(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QueueOrder;
    use std::io::Cursor;

    fn collect(input: &[u8]) -> Vec<LineRecord> {
        let q = BoundedQueue::new(64, QueueOrder::Fifo);
        let (n, err) = emit_lines(Cursor::new(input.to_vec()), "f.txt", &q);
        assert!(err.is_none());
        q.mark_finished();
        let out: Vec<_> = std::iter::from_fn(|| q.take()).collect();
        assert_eq!(n as usize, out.len());
        out
    }

    #[test]
    fn test_numbers_start_at_one() {
        let out = collect(b"hello\nworld\n");
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].line_number, 1);
        assert_eq!(out[0].content, "hello");
        assert_eq!(out[1].line_number, 2);
        assert_eq!(out[1].content, "world");
        assert_eq!(out[1].path, "f.txt");
    }

    #[test]
    fn test_last_line_without_newline() {
        let out = collect(b"a\nb");
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].content, "b");
    }

    #[test]
    fn test_empty_input_has_no_lines() {
        assert!(collect(b"").is_empty());
    }

    #[test]
    fn test_blank_lines_are_counted() {
        let out = collect(b"\n\nx\n");
        assert_eq!(out.len(), 3);
        assert_eq!(out[2].line_number, 3);
        assert_eq!(out[0].content, "");
    }

    #[test]
    fn test_crlf_is_stripped() {
        let out = collect(b"one\r\ntwo\r\n");
        assert_eq!(out[0].content, "one");
        assert_eq!(out[1].content, "two");
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let out = collect(b"ok\xff\n");
        assert_eq!(out.len(), 1);
        assert!(out[0].content.starts_with("ok"));
    }
}
