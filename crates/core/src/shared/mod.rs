pub mod constants;
pub mod error;
pub mod frame;
pub mod frame_duration;
pub mod frame_rate;
pub mod resolution;
pub mod video_metadata;
