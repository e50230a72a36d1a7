pub mod assemble_video_use_case;
pub mod emit_document_use_case;
pub mod pipeline_logger;
pub mod sample_frames_use_case;
