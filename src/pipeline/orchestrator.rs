use anyhow::{Context, Result, anyhow};
use log::debug;
use std::io::Write;
use std::thread::JoinHandle;

use crate::pipeline::{self, PipelineContext};
use crate::{PipelineConfig, RunSummary, SkipHook};

/// Join handles for the five stage threads. The sink hands its writer back when it finishes.
pub struct PipelineHandles<W> {
    pub scan_handle: JoinHandle<usize>,
    pub attribute_handle: JoinHandle<usize>,
    pub line_handle: JoinHandle<u64>,
    pub matcher_handle: JoinHandle<u64>,
    pub sink_handle: JoinHandle<pipeline::SinkResult<W>>,
}

/// Start the five stages, one thread each, connected by four bounded queues.
/// Caller must join the handles (see [`shutdown_pipeline_handles`]).
pub fn spawn_pipeline<W>(ctx: &PipelineContext, out: W) -> PipelineHandles<W>
where
    W: Write + Send + 'static,
{
    let queues = pipeline::create_pipeline_queues(&ctx.config);
    debug!(
        "starting pipeline: capacity {}, order {:?}",
        ctx.config.buffer_capacity, ctx.config.order
    );

    // Each queue is cloned into exactly its producer and consumer; `queues` is dropped after this.
    PipelineHandles {
        scan_handle: pipeline::spawn_scan_thread(ctx.clone(), queues.files.clone()),
        attribute_handle: pipeline::spawn_attribute_thread(
            ctx.clone(),
            queues.files,
            queues.kept.clone(),
        ),
        line_handle: pipeline::spawn_line_thread(ctx.clone(), queues.kept, queues.lines.clone()),
        matcher_handle: pipeline::spawn_matcher_thread(
            ctx.clone(),
            queues.lines,
            queues.matches.clone(),
        ),
        sink_handle: pipeline::spawn_sink_thread(queues.matches, out),
    }
}

fn join_stage<T>(handle: JoinHandle<T>, name: &str) -> Result<T> {
    handle
        .join()
        .map_err(|_| anyhow!("{} thread panicked", name))
}

/// Join every stage thread (in pipeline order) and return the sink's count and writer.
/// All five are joined even if one failed; the first failure is returned.
pub fn shutdown_pipeline_handles<W>(handles: PipelineHandles<W>) -> Result<(u64, W)> {
    let PipelineHandles {
        scan_handle,
        attribute_handle,
        line_handle,
        matcher_handle,
        sink_handle,
    } = handles;

    let scanned = join_stage(scan_handle, "scan");
    let kept = join_stage(attribute_handle, "attribute filter");
    let lines = join_stage(line_handle, "line emitter");
    let forwarded = join_stage(matcher_handle, "substring filter");
    let sink = join_stage(sink_handle, "sink");

    // Unwrap before logging: log macros skip their arguments when the level is off.
    let (scanned, kept, lines, forwarded) = (scanned?, kept?, lines?, forwarded?);
    let (count, out) = sink?.context("writing results")?;
    debug!(
        "pipeline joined: {} files scanned, {} kept, {} lines, {} matches forwarded",
        scanned, kept, lines, forwarded
    );
    Ok((count, out))
}

/// Main orchestrator: run the pipeline once over `config.root`, writing results to `out`.
/// Returns the summary and the writer.
pub fn run_pipeline<W>(
    config: &PipelineConfig,
    out: W,
    on_skip: Option<SkipHook>,
) -> Result<(RunSummary, W)>
where
    W: Write + Send + 'static,
{
    config.validate()?;
    let ctx = PipelineContext::new(config, on_skip);
    let handles = spawn_pipeline(&ctx, out);
    let (matches, out) = shutdown_pipeline_handles(handles)?;

    pipeline::report_skipped_paths(&ctx);

    Ok((
        RunSummary {
            matches,
            skipped: ctx.skipped_count(),
        },
        out,
    ))
}
