/// Extensions (lowercase) recognised as source images for video assembly.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

pub const DEFAULT_VIDEO_NAME: &str = "output.mp4";
pub const DEFAULT_DOCUMENT_NAME: &str = "output_frames.docx";
pub const DEFAULT_SAMPLE_COUNT: usize = 10;

/// ffmpeg encoder name for MPEG-4 Part 2 (the `mp4v` FourCC).
pub const DEFAULT_VIDEO_CODEC: &str = "mpeg4";

pub const DOCUMENT_HEADING: &str = "Extracted Frames from Video";
pub const LABEL_FONT_NAME: &str = "Times New Roman";
pub const LABEL_FONT_SIZE_PT: f32 = 12.0;
pub const PICTURE_WIDTH_INCHES: f32 = 2.0;

pub const MIN_FRAME_DURATION_SECS: f64 = 0.001;
pub const MAX_FRAME_DURATION_SECS: f64 = 3600.0;

/// Largest numerator or denominator of a derived frame rate. MPEG-4 Part 2
/// stores the time base in 16 bits.
pub const MAX_RATE_TERM: u32 = 65_535;
