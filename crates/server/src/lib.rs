//! facestream server: per-connection video sessions over WebSocket.
//!
//! Each connection owns at most one [`Session`]: a blocking producer worker
//! that decodes, detects, and encodes frames into a bounded queue, drained by
//! the connection task and pushed to the client.

mod connection;
mod producer;

pub mod error;
pub mod queue;
pub mod server;
pub mod session;

pub use error::ServerError;
pub use queue::{FrameQueue, FrameReceiver, FrameSender, GetResult, PutResult};
pub use server::Server;
pub use session::Session;
