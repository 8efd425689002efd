//! Transcription result documents and their output renderings.

pub mod format;
pub mod result;

pub use format::OutputFormat;
pub use result::TranscriptionResult;
