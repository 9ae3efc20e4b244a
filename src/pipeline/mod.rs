//! Pipeline components: the bounded queue, the five stages, and the orchestrator.
//!
//! scan → files → attributes → kept → lines → lines → matcher → matches → sink

pub mod attributes;
pub mod context;
pub mod error_handler;
pub mod lines;
pub mod matcher;
pub mod orchestrator;
pub mod queue;
pub mod scan;
pub mod sink;

pub use attributes::{FileAttributes, passes_attribute_filter, spawn_attribute_thread};
pub use context::{PipelineContext, PipelineQueues, StageGuard, create_pipeline_queues};
pub use error_handler::report_skipped_paths;
pub use lines::spawn_line_thread;
pub use matcher::{line_matches, spawn_matcher_thread};
pub use orchestrator::{PipelineHandles, run_pipeline, shutdown_pipeline_handles, spawn_pipeline};
pub use queue::BoundedQueue;
pub use scan::{WalkOutcome, run_scan_loop, spawn_scan_thread, to_outcome_walkdir};
pub use sink::{SinkResult, spawn_sink_thread};
