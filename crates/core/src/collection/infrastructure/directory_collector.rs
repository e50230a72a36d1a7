use std::fs;
use std::path::Path;

use crate::collection::domain::frame_sequence::{is_image, FrameSequence};
use crate::shared::error::PipelineError;

/// Lists `dir` (non-recursively) and returns its images in file-name order.
///
/// Fails with [`PipelineError::EmptyInput`] when no image is found.
pub fn collect_images(dir: &Path) -> Result<FrameSequence, PipelineError> {
    let io_err = |source| PipelineError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if is_image(&path) {
            files.push(path);
        } else {
            log::debug!("Ignoring non-image file {}", path.display());
        }
    }

    let sequence = FrameSequence::from_paths(dir, files);
    if sequence.is_empty() {
        return Err(PipelineError::EmptyInput {
            dir: dir.to_path_buf(),
        });
    }
    log::info!("Found {} images in {}", sequence.len(), dir.display());
    Ok(sequence)
}
