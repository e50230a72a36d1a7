pub mod document_writer;
pub mod text_style;
