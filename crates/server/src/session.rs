use {
    crate::{
        ServerError, producer,
        queue::{FrameQueue, FrameReceiver, GetResult},
    },
    detect::Detector,
    std::{
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
        time::Duration,
    },
    tokio::task::JoinHandle,
};

/// Design default queue depth between producer and streamer.
const QUEUE_CAPACITY: usize = 10;

/// One video-processing run: a producer worker feeding a bounded queue.
///
/// A connection owns at most one `Session` at a time. Dropping the session
/// closes the queue; stopping it also joins the producer, which guarantees
/// the video source has been released.
pub struct Session {
    video_path: String,
    running: Arc<AtomicBool>,
    producer: JoinHandle<()>,
    frames: FrameReceiver,
}

impl Session {
    /// Open `video_path` and start producing frames.
    ///
    /// Returns an error without creating a session when the source cannot
    /// be opened.
    pub async fn start(
        video_path: &str,
        detector: Arc<dyn Detector>,
    ) -> Result<Self, ServerError> {
        let (sender, frames) = FrameQueue::bounded(QUEUE_CAPACITY);
        let running = Arc::new(AtomicBool::new(true));
        let producer = producer::spawn(
            video_path.to_string(),
            detector,
            sender,
            Arc::clone(&running),
        )
        .await?;

        log::info!("session started for '{video_path}'");
        Ok(Self {
            video_path: video_path.to_string(),
            running,
            producer,
            frames,
        })
    }

    pub fn video_path(&self) -> &str {
        &self.video_path
    }

    /// Wait up to `timeout` for the next produced frame.
    pub async fn recv(&mut self, timeout: Duration) -> GetResult {
        self.frames.get(timeout).await
    }

    /// Stop the producer and wait for it to finish.
    ///
    /// When this returns, the video source has been released: the join is
    /// the ordering edge that makes stop-then-start safe against the old
    /// and new producer contending for anything.
    pub async fn stop(self) {
        self.running.store(false, Ordering::Relaxed);
        if self.producer.await.is_err() {
            log::warn!("producer worker panicked for '{}'", self.video_path);
        }
        log::info!("session stopped for '{}'", self.video_path);
    }
}
