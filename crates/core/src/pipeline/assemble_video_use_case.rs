use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::collection::domain::frame_sequence::FrameSequence;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::constants::DEFAULT_VIDEO_CODEC;
use crate::shared::error::{PipelineError, PipelineWarning};
use crate::shared::frame::Frame;
use crate::shared::frame_duration::FrameDuration;
use crate::shared::frame_rate::FrameRate;
use crate::shared::resolution::Resolution;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::image_reader::ImageReader;
use crate::video::domain::video_writer::VideoWriter;

/// Outcome of a successful assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyReport {
    pub output: PathBuf,
    pub resolution: Resolution,
    pub frame_rate: FrameRate,
    pub frames_written: usize,
    pub frames_resized: usize,
    pub warnings: Vec<PipelineWarning>,
}

/// Turns an ordered sequence of still images into a video where every image
/// is shown for the same duration.
///
/// The first image fixes the output resolution; later images of a different
/// size are stretched to it. Images that fail to decode are skipped with a
/// warning, except the first, which aborts before any output is created.
pub struct AssembleVideoUseCase {
    image_reader: Box<dyn ImageReader>,
    writer: Box<dyn VideoWriter>,
    logger: Box<dyn PipelineLogger>,
    codec: String,
}

impl AssembleVideoUseCase {
    pub fn new(
        image_reader: Box<dyn ImageReader>,
        writer: Box<dyn VideoWriter>,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            image_reader,
            writer,
            logger,
            codec: DEFAULT_VIDEO_CODEC.to_string(),
        }
    }

    /// Overrides the ffmpeg encoder name (default `mpeg4`).
    pub fn with_codec(mut self, codec: impl Into<String>) -> Self {
        self.codec = codec.into();
        self
    }

    pub fn execute(
        &mut self,
        sequence: &FrameSequence,
        frame_duration: FrameDuration,
        output: &Path,
    ) -> Result<AssemblyReport, PipelineError> {
        let first_path = sequence.first().ok_or_else(|| PipelineError::EmptyInput {
            dir: sequence.dir().to_path_buf(),
        })?;

        let first = self
            .image_reader
            .read(first_path)
            .map_err(|source| PipelineError::NoValidFrames {
                path: first_path.to_path_buf(),
                source,
            })?;

        let resolution = first.resolution();
        let frame_rate = FrameRate::from_frame_duration(frame_duration);
        let metadata = VideoMetadata {
            width: resolution.width,
            height: resolution.height,
            frame_rate,
            total_frames: sequence.len(),
            codec: self.codec.clone(),
            source_path: None,
        };

        self.writer
            .open(output, &metadata)
            .map_err(|source| PipelineError::Encode {
                path: output.to_path_buf(),
                source,
            })?;

        self.logger.info(&format!(
            "Writing {} images to {} at {resolution}, {frame_rate}",
            sequence.len(),
            output.display()
        ));

        let mut report = AssemblyReport {
            output: output.to_path_buf(),
            resolution,
            frame_rate,
            frames_written: 0,
            frames_resized: 0,
            warnings: Vec::new(),
        };

        let written = self.write_frames(sequence, first, &mut report);
        let closed = self.writer.close().map_err(|source| PipelineError::Encode {
            path: output.to_path_buf(),
            source,
        });
        written?;
        closed?;

        self.logger.summary();
        Ok(report)
    }

    fn write_frames(
        &mut self,
        sequence: &FrameSequence,
        first: Frame,
        report: &mut AssemblyReport,
    ) -> Result<(), PipelineError> {
        let total = sequence.len();
        let mut first = Some(first);

        for (position, path) in sequence.iter().enumerate() {
            let frame = match first.take() {
                Some(frame) => frame,
                None => {
                    let start = Instant::now();
                    match self.image_reader.read(path) {
                        Ok(frame) => {
                            self.logger
                                .timing("decode", start.elapsed().as_secs_f64() * 1000.0);
                            frame
                        }
                        Err(e) => {
                            let warning = PipelineWarning::Decode {
                                path: path.to_path_buf(),
                                reason: e.to_string(),
                            };
                            self.logger.warning(&warning);
                            report.warnings.push(warning);
                            self.logger.progress(position + 1, total);
                            continue;
                        }
                    }
                }
            };

            let frame = if frame.resolution() != report.resolution {
                self.logger.info(&format!(
                    "Resizing image {} from {} to {}",
                    path.display(),
                    frame.resolution(),
                    report.resolution
                ));
                let start = Instant::now();
                let resized = frame.resized_to(report.resolution).map_err(|source| {
                    PipelineError::Encode {
                        path: report.output.clone(),
                        source,
                    }
                })?;
                self.logger
                    .timing("resize", start.elapsed().as_secs_f64() * 1000.0);
                report.frames_resized += 1;
                resized
            } else {
                frame
            };

            let start = Instant::now();
            self.writer
                .write(&frame.with_index(report.frames_written))
                .map_err(|source| PipelineError::Encode {
                    path: report.output.clone(),
                    source,
                })?;
            self.logger
                .timing("encode", start.elapsed().as_secs_f64() * 1000.0);

            report.frames_written += 1;
            self.logger.progress(position + 1, total);
        }

        Ok(())
    }
}
