use crate::shared::constants::{MAX_FRAME_DURATION_SECS, MIN_FRAME_DURATION_SECS};
use crate::shared::error::PipelineError;

/// How long each source image stays on screen in the assembled video.
///
/// Validated on construction: finite, at least one millisecond and at most
/// an hour. Kept at full precision; the frame rate is derived from it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameDuration {
    seconds: f64,
}

impl FrameDuration {
    pub fn new(seconds: f64) -> Result<Self, PipelineError> {
        let invalid = || PipelineError::InvalidFrameDuration {
            value: seconds,
            min: MIN_FRAME_DURATION_SECS,
            max: MAX_FRAME_DURATION_SECS,
        };
        if !seconds.is_finite()
            || seconds < MIN_FRAME_DURATION_SECS
            || seconds > MAX_FRAME_DURATION_SECS
        {
            return Err(invalid());
        }
        Ok(Self { seconds })
    }

    /// Parses user input such as `"0.1"` or `" 2 "`.
    pub fn parse(input: &str) -> Result<Self, PipelineError> {
        let seconds = input
            .trim()
            .parse::<f64>()
            .map_err(|_| PipelineError::InvalidFrameDuration {
                value: f64::NAN,
                min: MIN_FRAME_DURATION_SECS,
                max: MAX_FRAME_DURATION_SECS,
            })?;
        Self::new(seconds)
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }
}
