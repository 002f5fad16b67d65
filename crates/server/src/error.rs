use std::fmt;

#[derive(Debug)]
pub enum ServerError {
    Io(std::io::Error),
    WebSocket(tokio_websockets::Error),
    Json(serde_json::Error),
    /// The video source could not be opened; no session was created.
    SourceOpen(video::VideoError),
    /// The producer worker died before reporting its open status.
    Worker(String),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Io(err) => write!(f, "io error: {err}"),
            ServerError::WebSocket(err) => write!(f, "websocket error: {err}"),
            ServerError::Json(err) => write!(f, "json error: {err}"),
            ServerError::SourceOpen(err) => write!(f, "cannot open video source: {err}"),
            ServerError::Worker(msg) => write!(f, "worker error: {msg}"),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Io(err)
    }
}

impl From<tokio_websockets::Error> for ServerError {
    fn from(err: tokio_websockets::Error) -> Self {
        ServerError::WebSocket(err)
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        ServerError::Json(err)
    }
}

impl From<video::VideoError> for ServerError {
    fn from(err: video::VideoError) -> Self {
        ServerError::SourceOpen(err)
    }
}
