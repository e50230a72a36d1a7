use std::path::Path;

use crate::shared::frame::Frame;

/// Decodes a single still image file.
pub trait ImageReader {
    fn read(&self, path: &Path) -> Result<Frame, Box<dyn std::error::Error>>;
}
