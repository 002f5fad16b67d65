//! Face detection capability for facestream.
//!
//! The pipeline only sees the [`Detector`] trait; the production
//! implementation is [`SsdDetector`], an SSD face detector running on ONNX
//! Runtime. [`provision`] fetches the model artifact on first use.

pub mod error;
pub mod provision;
pub mod ssd;

pub use error::DetectError;
pub use ssd::SsdDetector;

use {video::RawFrame, wire::FaceBox};

/// The detection capability: given a decoded frame, the faces in it.
///
/// Implementations are shared read-only across all sessions of the process,
/// so `detect` takes `&self` and must be safe to call from concurrent
/// producer threads.
pub trait Detector: Send + Sync {
    fn detect(&self, frame: &RawFrame) -> Result<Vec<FaceBox>, DetectError>;
}
