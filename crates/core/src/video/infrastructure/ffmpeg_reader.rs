use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::frame_rate::FrameRate;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;

/// Decodes video frames via ffmpeg-next (libavformat + libavcodec).
///
/// Converts each decoded frame to RGB24 and wraps it in a [`Frame`] whose
/// index is derived from the frame's presentation timestamp. Dropping the
/// reader releases the input just like [`VideoReader::close`].
pub struct FfmpegReader {
    stream: Option<OpenStream>,
}

impl FfmpegReader {
    pub fn new() -> Self {
        Self { stream: None }
    }
}

impl Default for FfmpegReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything that lives between `open` and `close`.
struct OpenStream {
    ictx: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: ffmpeg_next::software::scaling::Context,
    stream_index: usize,
    time_base: ffmpeg_next::Rational,
    start_pts: i64,
    frame_rate: FrameRate,
    width: u32,
    height: u32,
    /// Index given to the next frame when it carries no timestamp.
    next_index: usize,
    /// Frames before this index are decoded and dropped after a seek.
    seek_target: Option<usize>,
    flushing: bool,
}

impl VideoReader for FfmpegReader {
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
        self.close();
        ffmpeg_next::init()?;

        let ictx = ffmpeg_next::format::input(path)?;

        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("No video stream found")?;

        let stream_index = stream.index();
        let time_base = stream.time_base();
        let start_pts = match stream.start_time() {
            ffmpeg_next::ffi::AV_NOPTS_VALUE => 0,
            pts => pts,
        };

        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;

        let frame_rate = stream_frame_rate(&stream);
        let total_frames = count_frames(
            stream.frames(),
            stream.duration(),
            time_base,
            ictx.duration(),
            frame_rate,
        );

        let width = decoder.width();
        let height = decoder.height();

        let metadata = VideoMetadata {
            width,
            height,
            frame_rate,
            total_frames,
            codec: decoder
                .codec()
                .map(|c| c.name().to_string())
                .unwrap_or_default(),
            source_path: Some(path.to_path_buf()),
        };

        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        self.stream = Some(OpenStream {
            ictx,
            decoder,
            scaler,
            stream_index,
            time_base,
            start_pts,
            frame_rate,
            width,
            height,
            next_index: 0,
            seek_target: None,
            flushing: false,
        });

        Ok(metadata)
    }

    fn seek(&mut self, frame_index: usize) -> Result<(), Box<dyn std::error::Error>> {
        let stream = self.stream.as_mut().ok_or("FfmpegReader: not opened")?;
        if !stream.frame_rate.is_known() {
            return Err("FfmpegReader: cannot seek without a frame rate".into());
        }

        // Container seeks use AV_TIME_BASE (microseconds) and land on the
        // keyframe at or before the target.
        let av_time_base = f64::from(ffmpeg_next::ffi::AV_TIME_BASE);
        let start_us = stream.start_pts as f64 * f64::from(stream.time_base) * av_time_base;
        let target_us = start_us + stream.frame_rate.timestamp_of(frame_index) * av_time_base;
        let ts = target_us.round() as i64;

        stream.ictx.seek(ts, ..ts)?;
        stream.decoder.flush();
        stream.flushing = false;
        stream.next_index = frame_index;
        stream.seek_target = Some(frame_index);
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let stream = self.stream.as_mut().ok_or("FfmpegReader: not opened")?;

        while let Some(decoded) = stream.next_decoded()? {
            let index = stream.index_of(&decoded);
            if let Some(target) = stream.seek_target {
                if index < target {
                    continue;
                }
                stream.seek_target = None;
            }
            stream.next_index = index + 1;
            return stream.convert(&decoded, index).map(Some);
        }
        Ok(None)
    }

    fn close(&mut self) {
        self.stream = None;
    }
}

impl OpenStream {
    /// Pulls the next decoded picture, feeding packets and finally flushing
    /// the decoder at end of input.
    fn next_decoded(
        &mut self,
    ) -> Result<Option<ffmpeg_next::util::frame::video::Video>, Box<dyn std::error::Error>> {
        loop {
            let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
            if self.decoder.receive_frame(&mut decoded).is_ok() {
                return Ok(Some(decoded));
            }
            if self.flushing {
                return Ok(None);
            }

            match self.ictx.packets().next() {
                Some((stream, packet)) => {
                    if stream.index() != self.stream_index {
                        continue;
                    }
                    if let Err(e) = self.decoder.send_packet(&packet) {
                        log::debug!("Dropping undecodable packet: {e}");
                    }
                }
                None => {
                    let _ = self.decoder.send_eof();
                    self.flushing = true;
                }
            }
        }
    }

    fn index_of(&self, decoded: &ffmpeg_next::util::frame::video::Video) -> usize {
        match decoded.timestamp().or_else(|| decoded.pts()) {
            Some(pts) => pts_to_index(pts, self.start_pts, self.time_base, self.frame_rate)
                .unwrap_or(self.next_index),
            None => self.next_index,
        }
    }

    fn convert(
        &mut self,
        decoded: &ffmpeg_next::util::frame::video::Video,
        index: usize,
    ) -> Result<Frame, Box<dyn std::error::Error>> {
        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
        self.scaler.run(decoded, &mut rgb_frame)?;
        let pixels = extract_rgb_pixels(&rgb_frame, self.width, self.height);
        Ok(Frame::new(pixels, self.width, self.height, 3, index))
    }
}

/// Average frame rate, falling back to the container's base rate.
fn stream_frame_rate(stream: &ffmpeg_next::format::stream::Stream) -> FrameRate {
    let avg = stream.avg_frame_rate();
    let rate = FrameRate::from_ratio(avg.numerator(), avg.denominator());
    if rate.is_known() {
        return rate;
    }
    let base = stream.rate();
    FrameRate::from_ratio(base.numerator(), base.denominator())
}

/// Frame count from the container header, or estimated from the stream or
/// container duration when the header has none.
fn count_frames(
    nb_frames: i64,
    stream_duration: i64,
    time_base: ffmpeg_next::Rational,
    container_duration_us: i64,
    frame_rate: FrameRate,
) -> usize {
    if nb_frames > 0 {
        return nb_frames as usize;
    }
    if !frame_rate.is_known() {
        return 0;
    }

    let seconds = if stream_duration > 0 && time_base.denominator() != 0 {
        stream_duration as f64 * f64::from(time_base)
    } else if container_duration_us > 0 {
        container_duration_us as f64 / f64::from(ffmpeg_next::ffi::AV_TIME_BASE)
    } else {
        return 0;
    };
    (seconds * frame_rate.fps()).round() as usize
}

/// Maps a presentation timestamp to a zero-based frame number.
fn pts_to_index(
    pts: i64,
    start_pts: i64,
    time_base: ffmpeg_next::Rational,
    frame_rate: FrameRate,
) -> Option<usize> {
    if time_base.denominator() == 0 || !frame_rate.is_known() {
        return None;
    }
    let seconds = (pts - start_pts) as f64 * f64::from(time_base);
    let index = (seconds * frame_rate.fps()).round();
    if index < 0.0 {
        Some(0)
    } else {
        Some(index as usize)
    }
}

/// Copies pixel data from an ffmpeg frame into a contiguous RGB buffer.
///
/// ffmpeg frames may have padding bytes at the end of each row (stride > width*3).
/// This function strips that padding to produce a tightly-packed pixel buffer.
pub(crate) fn extract_rgb_pixels(
    rgb_frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let w = width as usize;
    let h = height as usize;

    let mut pixels = Vec::with_capacity(w * h * 3);
    for row in 0..h {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + w * 3]);
    }
    pixels
}
