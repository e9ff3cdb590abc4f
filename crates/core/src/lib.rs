//! Speech-to-text for a single media file using whisper.cpp.

pub mod audio;
pub mod pipeline;
pub mod shared;
