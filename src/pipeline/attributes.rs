//! Stage 2: keep files that pass the size / owner / group predicate.

use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::Result;
use log::{debug, trace};

use crate::pipeline::context::{PipelineContext, StageGuard};
use crate::pipeline::queue::BoundedQueue;
use crate::{FileRecord, PipelineConfig, SkipStage};

/// The attributes the filter looks at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileAttributes {
    pub size: u64,
    pub uid: u32,
    pub gid: u32,
}

/// Stat `path` (following symlinks).
#[cfg(unix)]
pub fn file_attributes(path: &Path) -> Result<FileAttributes> {
    use std::os::unix::fs::MetadataExt;
    let meta = std::fs::metadata(path)?;
    Ok(FileAttributes {
        size: meta.size(),
        uid: meta.uid(),
        gid: meta.gid(),
    })
}

// No owner/group on this platform: report 0 so only the size predicate and sentinels matter.
#[cfg(not(unix))]
pub fn file_attributes(path: &Path) -> Result<FileAttributes> {
    let meta = std::fs::metadata(path)?;
    Ok(FileAttributes {
        size: meta.len(),
        uid: 0,
        gid: 0,
    })
}

/// Size is a strict greater-than; `None` on any field means no constraint.
pub fn passes_attribute_filter(config: &PipelineConfig, attrs: &FileAttributes) -> bool {
    config.max_file_size.is_none_or(|max| attrs.size > max)
        && config.required_uid.is_none_or(|uid| attrs.uid == uid)
        && config.required_gid.is_none_or(|gid| attrs.gid == gid)
}

pub fn spawn_attribute_thread(
    ctx: PipelineContext,
    files: Arc<BoundedQueue<FileRecord>>,
    kept: Arc<BoundedQueue<FileRecord>>,
) -> JoinHandle<usize> {
    thread::spawn(move || run_attribute_filter(&ctx, &files, &kept))
}

/// Take paths until end of stream; forward those passing the predicate. A failed stat drops
/// the path. Marks `kept` finished on exit. Returns the number of paths kept.
pub fn run_attribute_filter(
    ctx: &PipelineContext,
    files: &BoundedQueue<FileRecord>,
    kept: &BoundedQueue<FileRecord>,
) -> usize {
    let _guard = StageGuard::new(Some(files), Some(kept));
    let mut count = 0_usize;
    while let Some(file) = files.take() {
        let attrs = match file_attributes(&file.path) {
            Ok(a) => a,
            Err(e) => {
                ctx.skip(SkipStage::Stat, Some(file.path), format!("{e}"));
                continue;
            }
        };
        if passes_attribute_filter(&ctx.config, &attrs) {
            if !kept.put(file) {
                debug!("attribute filter: downstream closed, stopping");
                break;
            }
            count += 1;
        } else {
            trace!("filtered out {} ({:?})", file.display, attrs);
        }
    }
    kept.mark_finished();
    debug!("attribute filter: done, kept {} files", count);
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(size: u64, uid: u32, gid: u32) -> FileAttributes {
        FileAttributes { size, uid, gid }
    }

    #[test]
    fn test_no_constraints_accepts_everything() {
        let config = PipelineConfig::default();
        assert!(passes_attribute_filter(&config, &attrs(0, 0, 0)));
        assert!(passes_attribute_filter(&config, &attrs(u64::MAX, 1000, 1000)));
    }

    #[test]
    fn test_size_is_strictly_greater() {
        let config = PipelineConfig {
            max_file_size: Some(10),
            ..Default::default()
        };
        assert!(!passes_attribute_filter(&config, &attrs(9, 0, 0)));
        assert!(!passes_attribute_filter(&config, &attrs(10, 0, 0)));
        assert!(passes_attribute_filter(&config, &attrs(11, 0, 0)));
    }

    #[test]
    fn test_uid_and_gid_must_match_when_set() {
        let config = PipelineConfig {
            required_uid: Some(1000),
            required_gid: Some(50),
            ..Default::default()
        };
        assert!(passes_attribute_filter(&config, &attrs(1, 1000, 50)));
        assert!(!passes_attribute_filter(&config, &attrs(1, 1001, 50)));
        assert!(!passes_attribute_filter(&config, &attrs(1, 1000, 51)));
    }
}
