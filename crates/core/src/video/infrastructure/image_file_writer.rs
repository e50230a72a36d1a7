use std::path::Path;

use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

/// Writes a single frame to an image file using the `image` crate.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let img = frame.clone().into_rgb_image()?;
        img.save(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_frame(width: u32, height: u32, r: u8, g: u8, b: u8) -> Frame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..(width * height) {
            data.push(r);
            data.push(g);
            data.push(b);
        }
        Frame::new(data, width, height, 3, 0)
    }

    #[test]
    fn test_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let frame = make_frame(100, 80, 50, 100, 200);
        let writer = ImageFileWriter::new();
        writer.write(&path, &frame).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_png_preserves_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let frame = make_frame(50, 50, 50, 100, 200);
        ImageFileWriter::new().write(&path, &frame).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (50, 50));
        assert_eq!(img.get_pixel(0, 0).0, [50, 100, 200]);
    }

    #[test]
    fn test_jpeg_extension_writes_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame_1.jpg");
        let frame = make_frame(32, 24, 128, 128, 128);
        ImageFileWriter::new().write(&path, &frame).unwrap();

        let format = image::ImageFormat::from_path(&path).unwrap();
        assert_eq!(format, image::ImageFormat::Jpeg);
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (32, 24));
    }

    #[test]
    fn test_write_invalid_path_returns_error() {
        let frame = make_frame(10, 10, 0, 0, 0);
        let writer = ImageFileWriter::new();
        assert!(writer
            .write(Path::new("/nonexistent/dir/out.png"), &frame)
            .is_err());
    }
}
