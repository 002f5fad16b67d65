//! Bounded frame queue between the producer worker and the streamer.
//!
//! This is the backpressure mechanism: a slow consumer makes `put` report
//! `Full` after a bounded wait and the producer drops that frame, instead of
//! stalling decode or buffering without limit.

use {std::time::Duration, tokio::sync::mpsc, wire::FramePayload};

#[derive(Debug, PartialEq, Eq)]
pub enum PutResult {
    Ok,
    /// The queue was full past the bounded wait; the frame was discarded.
    Full,
    /// The consumer is gone.
    Closed,
}

#[derive(Debug)]
pub enum GetResult {
    Frame(FramePayload),
    /// Nothing arrived within the timeout; re-check liveness and retry.
    Empty,
    /// The producer is gone and the queue is drained.
    Closed,
}

pub struct FrameQueue;

impl FrameQueue {
    pub fn bounded(capacity: usize) -> (FrameSender, FrameReceiver) {
        let (tx, rx) = mpsc::channel(capacity);
        (FrameSender { tx }, FrameReceiver { rx })
    }
}

/// Producer half; used from a blocking worker thread.
pub struct FrameSender {
    tx: mpsc::Sender<FramePayload>,
}

impl FrameSender {
    /// Enqueue a frame, waiting at most `timeout` for a free slot.
    ///
    /// A full queue gets one bounded wait and one retry; after that the
    /// frame is dropped. Never blocks past the timeout.
    pub fn put(&self, payload: FramePayload, timeout: Duration) -> PutResult {
        match self.tx.try_send(payload) {
            Ok(()) => PutResult::Ok,
            Err(mpsc::error::TrySendError::Closed(_)) => PutResult::Closed,
            Err(mpsc::error::TrySendError::Full(payload)) => {
                std::thread::sleep(timeout);
                match self.tx.try_send(payload) {
                    Ok(()) => PutResult::Ok,
                    Err(mpsc::error::TrySendError::Full(_)) => PutResult::Full,
                    Err(mpsc::error::TrySendError::Closed(_)) => PutResult::Closed,
                }
            }
        }
    }

    /// Remaining free slots.
    pub fn capacity(&self) -> usize {
        self.tx.capacity()
    }
}

/// Consumer half; used from the connection task.
pub struct FrameReceiver {
    rx: mpsc::Receiver<FramePayload>,
}

impl FrameReceiver {
    /// Wait up to `timeout` for the next frame.
    pub async fn get(&mut self, timeout: Duration) -> GetResult {
        match tokio::time::timeout(timeout, self.rx.recv()).await {
            Ok(Some(payload)) => GetResult::Frame(payload),
            Ok(None) => GetResult::Closed,
            Err(_) => GetResult::Empty,
        }
    }
}
