use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal pipeline failures. None of these are retried; the pipeline stops
/// after releasing any stream it opened.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("no images found in {}", dir.display())]
    EmptyInput { dir: PathBuf },

    #[error("failed to load the first image {}: {source}", path.display())]
    NoValidFrames {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error>,
    },

    #[error("failed to open video file {}: {source}", path.display())]
    UnopenableVideo {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error>,
    },

    #[error("invalid video file {} (fps={fps}, total_frames={total_frames})", path.display())]
    InvalidVideoMetadata {
        path: PathBuf,
        fps: f64,
        total_frames: usize,
    },

    #[error("frame duration must be a finite number of seconds between {min} and {max}, got {value}")]
    InvalidFrameDuration { value: f64, min: f64, max: f64 },

    #[error("sample count must be at least 1")]
    InvalidSampleCount,

    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error>,
    },

    #[error("failed to save document {}: {source}", path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error>,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Per-item problems that skip one image or sample and let the pipeline
/// carry on with the rest of the sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineWarning {
    Decode { path: PathBuf, reason: String },
    Seek { index: usize, reason: String },
    Embed { index: usize, reason: String },
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineWarning::Decode { path, reason } => {
                write!(f, "Failed to load image {}: {reason}", path.display())
            }
            PipelineWarning::Seek { index, reason } => {
                write!(f, "Failed to read frame {index}: {reason}")
            }
            PipelineWarning::Embed { index, reason } => {
                write!(f, "Failed to embed frame {index}: {reason}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_names_directory() {
        let err = PipelineError::EmptyInput {
            dir: PathBuf::from("/tmp/shots"),
        };
        assert_eq!(err.to_string(), "no images found in /tmp/shots");
    }

    #[test]
    fn test_unopenable_video_keeps_source() {
        let err = PipelineError::UnopenableVideo {
            path: PathBuf::from("missing.mp4"),
            source: "No such file or directory".into(),
        };
        assert!(err.to_string().contains("missing.mp4"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_invalid_metadata_reports_values() {
        let err = PipelineError::InvalidVideoMetadata {
            path: PathBuf::from("broken.mp4"),
            fps: 0.0,
            total_frames: 12,
        };
        let text = err.to_string();
        assert!(text.contains("fps=0"));
        assert!(text.contains("total_frames=12"));
    }

    #[test]
    fn test_warning_display() {
        let warning = PipelineWarning::Decode {
            path: PathBuf::from("b.png"),
            reason: "truncated".to_string(),
        };
        assert_eq!(warning.to_string(), "Failed to load image b.png: truncated");

        let warning = PipelineWarning::Embed {
            index: 3,
            reason: "bad image".to_string(),
        };
        assert_eq!(warning.to_string(), "Failed to embed frame 3: bad image");
    }
}
