use crate::{RawFrame, VideoError, VideoSource};

const DEFAULT_WIDTH: u32 = 320;
const DEFAULT_HEIGHT: u32 = 240;
const DEFAULT_FRAMES: u32 = 150;

/// Deterministic generated video source.
///
/// Produces `frames` frames of a moving gradient pattern, then end-of-stream.
/// Used by tests and demos so nothing in the pipeline needs a real file or
/// the FFmpeg libraries.
pub struct SyntheticSource {
    width: u32,
    height: u32,
    frames: u32,
    index: u32,
    released: bool,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32, frames: u32) -> Self {
        Self {
            width,
            height,
            frames,
            index: 0,
            released: false,
        }
    }

    /// Parse the part of a `synthetic://` identifier after the scheme:
    /// `""`, `"WxH"`, or `"WxH/N"`.
    pub fn parse(spec: &str) -> Result<Self, VideoError> {
        let (size, count) = match spec.split_once('/') {
            Some((size, count)) => (size, Some(count)),
            None => (spec, None),
        };

        let (width, height) = if size.is_empty() {
            (DEFAULT_WIDTH, DEFAULT_HEIGHT)
        } else {
            let (w, h) = size
                .split_once('x')
                .ok_or_else(|| VideoError::Open(format!("bad synthetic size '{size}'")))?;
            let w = w
                .parse::<u32>()
                .map_err(|_| VideoError::Open(format!("bad synthetic width '{w}'")))?;
            let h = h
                .parse::<u32>()
                .map_err(|_| VideoError::Open(format!("bad synthetic height '{h}'")))?;
            if w == 0 || h == 0 {
                return Err(VideoError::Open("synthetic size must be non-zero".to_string()));
            }
            (w, h)
        };

        let frames = match count {
            Some(count) => count
                .parse::<u32>()
                .map_err(|_| VideoError::Open(format!("bad synthetic frame count '{count}'")))?,
            None => DEFAULT_FRAMES,
        };

        Ok(Self::new(width, height, frames))
    }

    pub fn released(&self) -> bool {
        self.released
    }

    fn render(&self, index: u32) -> RawFrame {
        let (w, h) = (self.width as usize, self.height as usize);
        let mut data = vec![0u8; w * h * 3];
        for y in 0..h {
            for x in 0..w {
                let offset = (y * w + x) * 3;
                data[offset] = ((x + index as usize * 4) % w) as u8;
                data[offset + 1] = (y % 256) as u8;
                data[offset + 2] = (index % 256) as u8;
            }
        }
        RawFrame::new(self.width, self.height, data)
    }
}

impl VideoSource for SyntheticSource {
    fn next_frame(&mut self) -> Result<Option<RawFrame>, VideoError> {
        if self.released || self.index >= self.frames {
            return Ok(None);
        }
        let frame = self.render(self.index);
        self.index += 1;
        Ok(Some(frame))
    }

    fn release(&mut self) {
        self.released = true;
    }
}
