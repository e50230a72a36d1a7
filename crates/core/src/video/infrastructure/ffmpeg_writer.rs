use std::path::Path;

use crate::shared::constants::DEFAULT_VIDEO_CODEC;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_writer::VideoWriter;

/// Encodes RGB frames into a video file via ffmpeg-next.
///
/// The encoder time base is the exact inverse of the requested frame rate,
/// so every written frame spans one frame period (e.g. 0.5 s at 2 fps).
/// A writer dropped while still open finalizes the file on a best-effort
/// basis.
pub struct FfmpegWriter {
    output: Option<OpenOutput>,
}

struct OpenOutput {
    octx: ffmpeg_next::format::context::Output,
    encoder: ffmpeg_next::codec::encoder::video::Encoder,
    scaler: ffmpeg_next::software::scaling::Context,
    time_base: ffmpeg_next::Rational,
    width: u32,
    height: u32,
    frame_count: usize,
}

const VIDEO_STREAM_INDEX: usize = 0;

impl FfmpegWriter {
    pub fn new() -> Self {
        Self { output: None }
    }

    /// Number of frames written since `open`, or 0 when closed.
    pub fn frames_written(&self) -> usize {
        self.output.as_ref().map_or(0, |o| o.frame_count)
    }
}

impl Default for FfmpegWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoWriter for FfmpegWriter {
    fn open(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if self.output.is_some() {
            return Err("FfmpegWriter: already open".into());
        }
        if !metadata.frame_rate.is_known() {
            return Err("FfmpegWriter: frame rate is required".into());
        }
        if metadata.width == 0 || metadata.height == 0 {
            return Err("FfmpegWriter: resolution must be non-zero".into());
        }
        ffmpeg_next::init()?;

        let num = i32::try_from(metadata.frame_rate.numerator())?;
        let den = i32::try_from(metadata.frame_rate.denominator())?;
        let time_base = ffmpeg_next::Rational(den, num);

        let mut octx = ffmpeg_next::format::output(path)?;

        let global_header = octx
            .format()
            .flags()
            .contains(ffmpeg_next::format::Flags::GLOBAL_HEADER);

        let codec_name = if metadata.codec.is_empty() {
            DEFAULT_VIDEO_CODEC
        } else {
            metadata.codec.as_str()
        };
        let codec = ffmpeg_next::encoder::find_by_name(codec_name)
            .ok_or_else(|| format!("{codec_name} encoder not found"))?;

        let mut ost = octx.add_stream(Some(codec))?;

        let mut encoder_ctx = ffmpeg_next::codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()?;

        encoder_ctx.set_width(metadata.width);
        encoder_ctx.set_height(metadata.height);
        encoder_ctx.set_format(ffmpeg_next::format::Pixel::YUV420P);
        encoder_ctx.set_time_base(time_base);
        encoder_ctx.set_frame_rate(Some(ffmpeg_next::Rational(num, den)));

        if global_header {
            encoder_ctx.set_flags(ffmpeg_next::codec::Flags::GLOBAL_HEADER);
        }

        let encoder = encoder_ctx.open_with(ffmpeg_next::Dictionary::new())?;
        ost.set_parameters(&encoder);
        ost.set_time_base(time_base);

        octx.write_header()?;

        // RGB -> YUV
        let scaler = ffmpeg_next::software::scaling::Context::get(
            ffmpeg_next::format::Pixel::RGB24,
            metadata.width,
            metadata.height,
            ffmpeg_next::format::Pixel::YUV420P,
            metadata.width,
            metadata.height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        log::debug!(
            "Opened {} for writing: {}x{} at {} ({codec_name})",
            path.display(),
            metadata.width,
            metadata.height,
            metadata.frame_rate
        );

        self.output = Some(OpenOutput {
            octx,
            encoder,
            scaler,
            time_base,
            width: metadata.width,
            height: metadata.height,
            frame_count: 0,
        });

        Ok(())
    }

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let output = self.output.as_mut().ok_or("FfmpegWriter: not opened")?;

        if frame.width() != output.width || frame.height() != output.height {
            return Err(format!(
                "FfmpegWriter: frame is {}x{}, stream is {}x{}",
                frame.width(),
                frame.height(),
                output.width,
                output.height
            )
            .into());
        }
        if frame.channels() != 3 {
            return Err("FfmpegWriter: expected an RGB frame".into());
        }

        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::new(
            ffmpeg_next::format::Pixel::RGB24,
            output.width,
            output.height,
        );

        let stride = rgb_frame.stride(0);
        let row_len = output.width as usize * 3;
        let data = rgb_frame.data_mut(0);
        let src = frame.data();

        // Copy pixel data, respecting stride
        for row in 0..output.height as usize {
            let src_start = row * row_len;
            let dst_start = row * stride;
            data[dst_start..dst_start + row_len]
                .copy_from_slice(&src[src_start..src_start + row_len]);
        }

        let mut yuv_frame = ffmpeg_next::util::frame::video::Video::empty();
        output.scaler.run(&rgb_frame, &mut yuv_frame)?;
        yuv_frame.set_pts(Some(output.frame_count as i64));

        output.encoder.send_frame(&yuv_frame)?;
        output.drain_packets()?;

        output.frame_count += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let Some(mut output) = self.output.take() else {
            return Ok(());
        };

        output.encoder.send_eof()?;
        output.drain_packets()?;
        output.octx.write_trailer()?;

        log::debug!("Finalized video with {} frames", output.frame_count);
        Ok(())
    }
}

impl OpenOutput {
    fn drain_packets(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let ost_time_base = self
            .octx
            .stream(VIDEO_STREAM_INDEX)
            .ok_or("FfmpegWriter: output stream missing")?
            .time_base();

        let mut encoded = ffmpeg_next::Packet::empty();
        while self.encoder.receive_packet(&mut encoded).is_ok() {
            encoded.set_stream(VIDEO_STREAM_INDEX);
            encoded.rescale_ts(self.time_base, ost_time_base);
            encoded.write_interleaved(&mut self.octx)?;
        }
        Ok(())
    }
}

impl Drop for FfmpegWriter {
    fn drop(&mut self) {
        if self.output.is_some() {
            if let Err(e) = self.close() {
                log::warn!("Failed to finalize video on drop: {e}");
            }
        }
    }
}
