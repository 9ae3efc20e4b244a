//! Pipeline context: shared config, skip bookkeeping, and the four inter-stage queues.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use log::debug;

use crate::pipeline::queue::BoundedQueue;
use crate::{FileRecord, LineRecord, PipelineConfig, SkipEvent, SkipHook, SkipStage};

/// Shared context for one run. Cloned into every stage thread; all fields are shared handles.
#[derive(Clone)]
pub struct PipelineContext {
    pub config: Arc<PipelineConfig>,
    pub skipped: Arc<Mutex<Vec<SkipEvent>>>,
    pub on_skip: Option<SkipHook>,
}

impl PipelineContext {
    pub fn new(config: &PipelineConfig, on_skip: Option<SkipHook>) -> Self {
        Self {
            config: Arc::new(config.clone()),
            skipped: Arc::new(Mutex::new(Vec::new())),
            on_skip,
        }
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Record a per-item failure. The item is dropped by the caller; nothing crosses a queue.
    pub fn skip(&self, stage: SkipStage, path: Option<PathBuf>, reason: impl Into<String>) {
        let event = SkipEvent {
            stage,
            path,
            reason: reason.into(),
        };
        debug!(
            "skip ({}): {} ({})",
            event.stage,
            event
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<no path>".to_string()),
            event.reason
        );
        if let Some(hook) = &self.on_skip {
            hook(&event);
        }
        self.skipped
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// The four queues, one per stage boundary. Each is handed to exactly its producer and consumer.
pub struct PipelineQueues {
    /// scan → attribute filter
    pub files: Arc<BoundedQueue<FileRecord>>,
    /// attribute filter → line emitter
    pub kept: Arc<BoundedQueue<FileRecord>>,
    /// line emitter → substring filter
    pub lines: Arc<BoundedQueue<LineRecord>>,
    /// substring filter → sink
    pub matches: Arc<BoundedQueue<LineRecord>>,
}

pub fn create_pipeline_queues(config: &PipelineConfig) -> PipelineQueues {
    let cap = config.buffer_capacity;
    let order = config.order;
    PipelineQueues {
        files: Arc::new(BoundedQueue::new(cap, order)),
        kept: Arc::new(BoundedQueue::new(cap, order)),
        lines: Arc::new(BoundedQueue::new(cap, order)),
        matches: Arc::new(BoundedQueue::new(cap, order)),
    }
}

/// Ends a stage's side of both queues when the stage ends, including by panic.
///
/// Output is marked finished: the downstream consumer sees end of stream instead of waiting
/// forever. Input is closed: the upstream producer's `put` is refused instead of blocking on
/// a queue nobody will drain again, so it can stop too.
pub struct StageGuard<'a, I, O> {
    input: Option<&'a BoundedQueue<I>>,
    output: Option<&'a BoundedQueue<O>>,
}

impl<'a, I, O> StageGuard<'a, I, O> {
    pub fn new(input: Option<&'a BoundedQueue<I>>, output: Option<&'a BoundedQueue<O>>) -> Self {
        Self { input, output }
    }
}

impl<I, O> Drop for StageGuard<'_, I, O> {
    fn drop(&mut self) {
        if let Some(output) = self.output {
            output.mark_finished();
        }
        if let Some(input) = self.input {
            input.close();
        }
    }
}
