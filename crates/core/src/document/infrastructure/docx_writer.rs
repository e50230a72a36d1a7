use std::fs::File;
use std::io::Cursor;
use std::path::Path;

use docx_rs::{Docx, Paragraph, Pic, Run, RunFonts, Style, StyleType};

use crate::document::domain::document_writer::DocumentWriter;
use crate::document::domain::text_style::{TextBlock, TextStyle};

const EMU_PER_INCH: f64 = 914_400.0;

/// Word (`.docx`) document built with docx-rs.
///
/// Pictures are re-encoded as PNG before embedding, so any format the
/// `image` crate decodes is accepted. `save` hands the built content to the
/// zip packer; the writer is empty afterwards.
pub struct DocxDocumentWriter {
    docx: Docx,
    paragraphs: usize,
    pictures: usize,
}

impl DocxDocumentWriter {
    pub fn new() -> Self {
        let docx = Docx::new()
            .add_style(
                Style::new("Title", StyleType::Paragraph)
                    .name("Title")
                    .size(56),
            )
            .add_style(
                Style::new("Heading1", StyleType::Paragraph)
                    .name("Heading 1")
                    .size(32)
                    .bold(),
            )
            .add_style(
                Style::new("Heading2", StyleType::Paragraph)
                    .name("Heading 2")
                    .size(26)
                    .bold(),
            );
        Self {
            docx,
            paragraphs: 0,
            pictures: 0,
        }
    }

    /// Paragraphs appended so far, headings and picture holders included.
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs
    }

    pub fn picture_count(&self) -> usize {
        self.pictures
    }

    fn append(&mut self, paragraph: Paragraph) {
        let docx = std::mem::replace(&mut self.docx, Docx::new());
        self.docx = docx.add_paragraph(paragraph);
        self.paragraphs += 1;
    }

    fn append_picture(&mut self, pic: Pic) {
        self.append(Paragraph::new().add_run(Run::new().add_image(pic)));
        self.pictures += 1;
    }
}

impl Default for DocxDocumentWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentWriter for DocxDocumentWriter {
    fn add_heading(&mut self, text: &str, level: u8) {
        let style = match level {
            0 => "Title",
            1 => "Heading1",
            _ => "Heading2",
        };
        self.append(
            Paragraph::new()
                .add_run(Run::new().add_text(text))
                .style(style),
        );
    }

    fn add_paragraph(&mut self, block: TextBlock) {
        let run = Run::new().add_text(&block.text);
        let run = match &block.style {
            Some(style) => apply_style(run, style),
            None => run,
        };
        self.append(Paragraph::new().add_run(run));
    }

    fn add_picture(
        &mut self,
        path: &Path,
        width_inches: f32,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let pic = load_picture(path, width_inches)?;
        self.append_picture(pic);
        Ok(())
    }

    fn add_captioned_picture(
        &mut self,
        caption: TextBlock,
        path: &Path,
        width_inches: f32,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let pic = load_picture(path, width_inches)?;
        self.add_paragraph(caption);
        self.append_picture(pic);
        Ok(())
    }

    fn save(&mut self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let file = File::create(path)?;
        let docx = std::mem::replace(&mut self.docx, Docx::new());
        docx.build().pack(file)?;
        Ok(())
    }
}

/// Decodes the picture and re-encodes it as PNG, sized to `width_inches`.
fn load_picture(path: &Path, width_inches: f32) -> Result<Pic, Box<dyn std::error::Error>> {
    if width_inches.is_nan() || width_inches <= 0.0 {
        return Err(format!("picture width must be positive, got {width_inches}").into());
    }

    let bytes = std::fs::read(path)?;
    let img = image::load_from_memory(&bytes)?;
    let (width_px, height_px) = (img.width(), img.height());
    if width_px == 0 || height_px == 0 {
        return Err("picture has no pixels".into());
    }

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;

    let (width_emu, height_emu) = picture_extent(width_px, height_px, width_inches);
    Ok(Pic::new_with_dimensions(png, width_px, height_px).size(width_emu, height_emu))
}

/// Sets the font for every script slot, East Asian included, so CJK labels
/// render in the same face as Latin ones.
fn apply_style(run: Run, style: &TextStyle) -> Run {
    let name = style.font_name.as_str();
    run.fonts(
        RunFonts::new()
            .ascii(name)
            .hi_ansi(name)
            .east_asia(name)
            .cs(name),
    )
    .size(half_points(style.size_pt))
}

/// Word measures font sizes in half-points.
fn half_points(size_pt: f32) -> usize {
    (size_pt * 2.0).round().max(1.0) as usize
}

/// Display size in EMU for a picture `width_inches` wide, keeping aspect.
fn picture_extent(width_px: u32, height_px: u32, width_inches: f32) -> (u32, u32) {
    let width_emu = f64::from(width_inches) * EMU_PER_INCH;
    let height_emu = width_emu * f64::from(height_px) / f64::from(width_px);
    (width_emu.round() as u32, height_emu.round() as u32)
}
