use std::path::Path;

use crate::shared::frame::Frame;
use crate::video::domain::image_reader::ImageReader;
use crate::video::infrastructure::ffmpeg_reader::extract_rgb_pixels;

/// Decodes still images (PNG, JPEG) through ffmpeg's image demuxers.
///
/// ffmpeg is noticeably faster than the pure-Rust `image` decoders on large
/// JPEGs, and keeps pixel conversion identical to the video reader's.
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageReader for ImageFileReader {
    fn read(&self, path: &Path) -> Result<Frame, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let mut ictx = ffmpeg_next::format::input(path)?;

        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("No image data found")?;
        let stream_index = stream.index();

        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let mut decoder = codec_ctx.decoder().video()?;

        let width = decoder.width();
        let height = decoder.height();
        if width == 0 || height == 0 {
            return Err("Image has no dimensions".into());
        }

        let mut scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        for (stream, packet) in ictx.packets() {
            if stream.index() != stream_index {
                continue;
            }
            decoder.send_packet(&packet)?;
            if let Some(frame) = try_receive_frame(&mut decoder, &mut scaler, width, height)? {
                return Ok(frame);
            }
        }

        // Some decoders hold the only frame until flushed
        let _ = decoder.send_eof();
        try_receive_frame(&mut decoder, &mut scaler, width, height)?
            .ok_or_else(|| "Failed to decode image".into())
    }
}

fn try_receive_frame(
    decoder: &mut ffmpeg_next::decoder::Video,
    scaler: &mut ffmpeg_next::software::scaling::Context,
    width: u32,
    height: u32,
) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
    let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
    if decoder.receive_frame(&mut decoded).is_err() {
        return Ok(None);
    }
    let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
    scaler.run(&decoded, &mut rgb_frame)?;
    let pixels = extract_rgb_pixels(&rgb_frame, width, height);
    Ok(Some(Frame::new(pixels, width, height, 3, 0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_test_image(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        let mut img = image::RgbImage::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = image::Rgb([50, 100, 200]);
        }
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_read_png_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), "test.png", 100, 80);
        let frame = ImageFileReader::new().read(&path).unwrap();
        assert_eq!(frame.width(), 100);
        assert_eq!(frame.height(), 80);
        assert_eq!(frame.channels(), 3);
        assert_eq!(frame.data().len(), 100 * 80 * 3);
    }

    #[test]
    fn test_read_png_is_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), "test.png", 16, 16);
        let frame = ImageFileReader::new().read(&path).unwrap();
        assert_eq!(&frame.data()[0..3], &[50, 100, 200]);
    }

    #[test]
    fn test_read_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), "test.jpg", 64, 48);
        let frame = ImageFileReader::new().read(&path).unwrap();
        assert_eq!((frame.width(), frame.height()), (64, 48));
    }

    #[test]
    fn test_read_nonexistent_is_error() {
        assert!(ImageFileReader::new()
            .read(Path::new("/nonexistent/test.png"))
            .is_err());
    }

    #[test]
    fn test_read_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(ImageFileReader::new().read(&path).is_err());
    }
}
