use crate::{RawFrame, SyntheticSource, VideoError};

/// A sequential source of decoded frames.
///
/// Implementations are driven from a blocking worker thread: `next_frame`
/// may block while decoding. `Ok(None)` signals end-of-stream.
pub trait VideoSource: Send {
    fn next_frame(&mut self) -> Result<Option<RawFrame>, VideoError>;

    /// Release the underlying handle. Idempotent; reading after release
    /// returns end-of-stream.
    fn release(&mut self);
}

/// Open a source from its path identifier.
///
/// `synthetic://[WxH][/N]` yields a generated test pattern; anything else is
/// treated as a local video file and requires the `ffmpeg` feature.
pub fn open_source(path: &str) -> Result<Box<dyn VideoSource>, VideoError> {
    if let Some(spec) = path.strip_prefix("synthetic://") {
        return Ok(Box::new(SyntheticSource::parse(spec)?));
    }

    #[cfg(feature = "ffmpeg")]
    {
        Ok(Box::new(crate::FfmpegSource::open(path)?))
    }
    #[cfg(not(feature = "ffmpeg"))]
    {
        Err(VideoError::Open(format!(
            "cannot open '{path}': file decoding requires the ffmpeg feature"
        )))
    }
}
