use crate::shared::error::PipelineError;
use crate::shared::frame_rate::FrameRate;

/// One frame chosen for extraction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplePoint {
    /// Zero-based position within the plan.
    pub ordinal: usize,
    pub frame_index: usize,
    /// Seconds from the start of the video: `frame_index / fps`.
    pub timestamp: f64,
}

impl SamplePoint {
    pub fn label(&self) -> String {
        timestamp_label(self.timestamp)
    }
}

/// Evenly spaced frame indices across a video.
///
/// The requested count is clamped to the number of frames. Indices are
/// `i * stride` with `stride = total_frames / count` (integer division), so
/// the tail of the video shorter than one stride is never sampled.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplePlan {
    total_frames: usize,
    requested: usize,
    stride: usize,
    points: Vec<SamplePoint>,
}

impl SamplePlan {
    pub fn new(
        total_frames: usize,
        frame_rate: FrameRate,
        requested: usize,
    ) -> Result<Self, PipelineError> {
        if requested == 0 {
            return Err(PipelineError::InvalidSampleCount);
        }

        let count = requested.min(total_frames);
        let stride = if count == 0 { 0 } else { total_frames / count };
        let points = (0..count)
            .map(|ordinal| {
                let frame_index = ordinal * stride;
                SamplePoint {
                    ordinal,
                    frame_index,
                    timestamp: frame_rate.timestamp_of(frame_index),
                }
            })
            .collect();

        Ok(Self {
            total_frames,
            requested,
            stride,
            points,
        })
    }

    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Number of samples after clamping to the frame count.
    pub fn count(&self) -> usize {
        self.points.len()
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    pub fn was_clamped(&self) -> bool {
        self.count() < self.requested
    }
}

/// Human-facing timestamp with hundredth-of-a-second precision, e.g. `"9.00s:"`.
pub fn timestamp_label(seconds: f64) -> String {
    format!("{seconds:.2}s:")
}
