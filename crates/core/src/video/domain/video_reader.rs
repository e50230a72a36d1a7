use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Reads frames from a video source, with random access by frame index.
///
/// Implementations handle I/O details (codec, container format, etc.)
/// while the pipeline works with the abstract `Frame` and `VideoMetadata`
/// types.
pub trait VideoReader {
    /// Opens a video file and returns its metadata.
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>>;

    /// Positions the reader so the next [`read_frame`](Self::read_frame)
    /// returns the frame at `frame_index`.
    ///
    /// Seeking is best effort on containers with sparse keyframes or
    /// missing timestamps.
    fn seek(&mut self, frame_index: usize) -> Result<(), Box<dyn std::error::Error>>;

    /// Decodes the next frame, or `None` at end of stream.
    fn read_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    /// Releases any resources held by the reader. Safe to call repeatedly.
    fn close(&mut self);
}
