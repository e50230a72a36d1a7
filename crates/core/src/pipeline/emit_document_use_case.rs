use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::document::domain::document_writer::DocumentWriter;
use crate::document::domain::text_style::{styled, TextBlock, TextStyle};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::sample_frames_use_case::SampledFrame;
use crate::shared::constants::{
    DOCUMENT_HEADING, LABEL_FONT_NAME, LABEL_FONT_SIZE_PT, PICTURE_WIDTH_INCHES,
};
use crate::shared::error::{PipelineError, PipelineWarning};
use crate::video::domain::image_writer::ImageWriter;

#[derive(Debug, Clone, PartialEq)]
pub struct EmissionReport {
    pub output: PathBuf,
    /// Label and picture pairs written after the heading.
    pub blocks_written: usize,
    pub warnings: Vec<PipelineWarning>,
}

/// Writes sampled frames into a document: a title, then one timestamp label
/// and picture per frame.
///
/// Frames arrive one at a time through [`append`](Self::append) and are
/// dropped once embedded. Each passes through a temporary JPEG in
/// `scratch_dir`, removed as soon as the picture is embedded or rejected.
pub struct EmitDocumentUseCase {
    document: Box<dyn DocumentWriter>,
    image_writer: Box<dyn ImageWriter>,
    scratch_dir: PathBuf,
    logger: Box<dyn PipelineLogger>,
    label_style: TextStyle,
    heading_written: bool,
    blocks_written: usize,
    warnings: Vec<PipelineWarning>,
}

impl EmitDocumentUseCase {
    pub fn new(
        document: Box<dyn DocumentWriter>,
        image_writer: Box<dyn ImageWriter>,
        scratch_dir: PathBuf,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            document,
            image_writer,
            scratch_dir,
            logger,
            label_style: TextStyle::new(LABEL_FONT_NAME, LABEL_FONT_SIZE_PT),
            heading_written: false,
            blocks_written: 0,
            warnings: Vec::new(),
        }
    }

    /// Appends every sample, pulling the next only after the previous one is
    /// embedded, then saves to `output`.
    pub fn execute<I>(&mut self, samples: I, output: &Path) -> Result<EmissionReport, PipelineError>
    where
        I: IntoIterator<Item = SampledFrame>,
    {
        for sample in samples {
            self.append(sample);
        }
        self.finish(output)
    }

    /// Embeds one sample as a label and picture pair. A sample that cannot be
    /// embedded is skipped with a warning.
    pub fn append(&mut self, sample: SampledFrame) {
        self.ensure_heading();

        let start = Instant::now();
        match self.embed(&sample) {
            Ok(()) => {
                self.logger
                    .timing("embed", start.elapsed().as_secs_f64() * 1000.0);
                self.blocks_written += 1;
            }
            Err(e) => {
                let warning = PipelineWarning::Embed {
                    index: sample.frame_index(),
                    reason: e.to_string(),
                };
                self.logger.warning(&warning);
                self.warnings.push(warning);
            }
        }
    }

    /// Saves the document. The heading is written even when nothing was
    /// appended.
    pub fn finish(&mut self, output: &Path) -> Result<EmissionReport, PipelineError> {
        self.ensure_heading();

        self.document
            .save(output)
            .map_err(|source| PipelineError::Document {
                path: output.to_path_buf(),
                source,
            })?;

        let blocks_written = self.blocks_written;
        self.logger.info(&format!(
            "Saved {blocks_written} frames to {}",
            output.display()
        ));
        self.logger.summary();

        Ok(EmissionReport {
            output: output.to_path_buf(),
            blocks_written,
            warnings: std::mem::take(&mut self.warnings),
        })
    }

    fn ensure_heading(&mut self) {
        if !self.heading_written {
            self.document.add_heading(DOCUMENT_HEADING, 0);
            self.heading_written = true;
        }
    }

    fn embed(&mut self, sample: &SampledFrame) -> Result<(), Box<dyn std::error::Error>> {
        let temp = tempfile::Builder::new()
            .prefix(&format!("frame_{}_", sample.ordinal()))
            .suffix(".jpg")
            .tempfile_in(&self.scratch_dir)?;

        self.image_writer.write(temp.path(), &sample.frame)?;

        let label = styled(TextBlock::plain(sample.point.label()), &self.label_style);
        self.document
            .add_captioned_picture(label, temp.path(), PICTURE_WIDTH_INCHES)
    }
}
