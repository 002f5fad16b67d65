use std::fmt;

#[derive(Debug)]
pub enum VideoError {
    /// The source could not be opened or a bad source spec was given.
    Open(String),
    /// The source failed while decoding mid-stream.
    Decode(String),
    /// A frame could not be encoded for transport.
    Encode(image::ImageError),
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::Open(msg) => write!(f, "open error: {msg}"),
            VideoError::Decode(msg) => write!(f, "decode error: {msg}"),
            VideoError::Encode(err) => write!(f, "encode error: {err}"),
        }
    }
}

impl std::error::Error for VideoError {}

impl From<image::ImageError> for VideoError {
    fn from(err: image::ImageError) -> Self {
        VideoError::Encode(err)
    }
}
