//! Video source abstraction for facestream.
//!
//! Sources produce decoded RGB24 frames one at a time until end-of-stream.
//! The FFmpeg file backend is feature-gated (`ffmpeg`); the synthetic source
//! is always available and is what the test suite runs against.

pub mod error;
pub mod frame;
pub mod source;
pub mod synthetic;

#[cfg(feature = "ffmpeg")]
pub mod ffmpeg;

pub use error::VideoError;
pub use frame::RawFrame;
pub use source::{VideoSource, open_source};
pub use synthetic::SyntheticSource;

#[cfg(feature = "ffmpeg")]
pub use ffmpeg::FfmpegSource;
