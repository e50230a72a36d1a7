use std::path::PathBuf;

use crate::shared::frame_rate::FrameRate;
use crate::shared::resolution::Resolution;

/// Stream properties reported by a reader on open, or requested from a
/// writer on open.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub frame_rate: FrameRate,
    pub total_frames: usize,
    pub codec: String,
    pub source_path: Option<PathBuf>,
}

impl VideoMetadata {
    pub fn fps(&self) -> f64 {
        self.frame_rate.fps()
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }

    pub fn duration_secs(&self) -> f64 {
        self.frame_rate.timestamp_of(self.total_frames)
    }

    /// A source can be sampled only when both its rate and length are known.
    pub fn is_sampleable(&self) -> bool {
        self.frame_rate.is_known() && self.total_frames > 0
    }
}
