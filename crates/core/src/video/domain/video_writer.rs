use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Abstracts video encoding so the pipeline can write output without
/// depending on a specific codec library.
pub trait VideoWriter {
    /// Creates the output file. `metadata` fixes the resolution, frame rate
    /// and codec for every subsequent frame.
    fn open(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Appends one frame. Frames must match the resolution given to `open`.
    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Flushes pending packets and finalizes the container. Safe to call
    /// when nothing is open.
    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}
