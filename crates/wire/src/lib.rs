//! JSON wire protocol between facestream and its clients.
//!
//! Messages travel as WebSocket text frames. The `"type"` field discriminates
//! the envelope on both directions of the connection.

use {
    base64::{Engine, prelude::BASE64_STANDARD},
    serde::{Deserialize, Serialize},
};

/// One detected face, in pixel coordinates of the original frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub confidence: f32,
}

/// One processed frame as delivered to the client: base64 JPEG bytes, the
/// faces found in it, and the unix capture timestamp in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FramePayload {
    pub frame: String,
    pub faces: Vec<FaceBox>,
    pub timestamp: f64,
}

impl FramePayload {
    pub fn new(jpeg: &[u8], faces: Vec<FaceBox>, timestamp: f64) -> Self {
        Self {
            frame: BASE64_STANDARD.encode(jpeg),
            faces,
            timestamp,
        }
    }

    /// Decode the base64 image back to JPEG bytes.
    pub fn decode_frame(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64_STANDARD.decode(&self.frame)
    }
}

/// Commands a client may send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientCommand {
    StartVideo { video_path: String },
    StopVideo,
}

/// Events the server sends.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    Frame { data: FramePayload },
    Error { message: String },
    Stopped,
}
