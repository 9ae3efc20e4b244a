use std::collections::BTreeMap;
use std::sync::PoisonError;

use crate::pipeline::PipelineContext;

/// Summarize skipped items after the stages are joined. Quiet by default (debug log only);
/// verbose runs also list each skipped path on stderr.
pub fn report_skipped_paths(ctx: &PipelineContext) {
    let skipped = ctx
        .skipped
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if skipped.is_empty() {
        return;
    }
    let mut by_stage: BTreeMap<String, usize> = BTreeMap::new();
    for event in skipped.iter() {
        *by_stage.entry(event.stage.to_string()).or_default() += 1;
    }
    log::debug!(
        "Skipped {} items due to permission errors or access issues: {:?}",
        skipped.len(),
        by_stage
    );
    if ctx.config.verbose {
        for event in skipped.iter() {
            match &event.path {
                Some(p) => eprintln!(
                    "  skipped ({}): {}: {}",
                    event.stage,
                    p.display(),
                    event.reason
                ),
                None => eprintln!("  skipped ({}): {}", event.stage, event.reason),
            }
        }
    }
}
