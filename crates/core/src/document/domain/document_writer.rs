use std::path::Path;

use crate::document::domain::text_style::TextBlock;

/// Builds a document in memory, append-only, and persists it on `save`.
pub trait DocumentWriter {
    /// Level 0 is the document title; 1 and up are section headings.
    fn add_heading(&mut self, text: &str, level: u8);

    fn add_paragraph(&mut self, block: TextBlock);

    /// Embeds the image at `path`, scaled to `width_inches` with its aspect
    /// ratio preserved. The file is read immediately; it may be deleted as
    /// soon as this returns.
    fn add_picture(&mut self, path: &Path, width_inches: f32)
        -> Result<(), Box<dyn std::error::Error>>;

    /// Appends `caption` followed by the picture at `path`. Neither is
    /// appended when the picture cannot be embedded.
    fn add_captioned_picture(
        &mut self,
        caption: TextBlock,
        path: &Path,
        width_inches: f32,
    ) -> Result<(), Box<dyn std::error::Error>>;

    fn save(&mut self, path: &Path) -> Result<(), Box<dyn std::error::Error>>;
}
