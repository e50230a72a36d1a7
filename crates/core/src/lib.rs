pub mod collection;
pub mod document;
pub mod pipeline;
pub mod sampling;
pub mod shared;
pub mod video;
