//! The frame producer: a blocking worker that decodes, detects, encodes,
//! and enqueues frames until end-of-stream or an external stop.

use {
    crate::{
        ServerError,
        queue::{FrameSender, PutResult},
    },
    detect::Detector,
    std::{
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
        thread,
        time::{Duration, Instant, SystemTime, UNIX_EPOCH},
    },
    tokio::{
        sync::oneshot,
        task::{JoinHandle, spawn_blocking},
    },
    video::{RawFrame, VideoSource, open_source},
    wire::FramePayload,
};

/// JPEG quality for transport encoding.
const JPEG_QUALITY: u8 = 80;

/// Target pacing rate for the produce loop.
const TARGET_FPS: u64 = 30;

/// Bounded wait before a frame is dropped on a full queue.
const PUT_TIMEOUT: Duration = Duration::from_millis(100);

/// Spawn the producer worker for `video_path`.
///
/// The source is opened on the worker thread and the result reported back
/// over a oneshot channel, so decoder state never crosses threads and an
/// open failure surfaces here before any session exists.
pub(crate) async fn spawn(
    video_path: String,
    detector: Arc<dyn Detector>,
    frames: FrameSender,
    running: Arc<AtomicBool>,
) -> Result<JoinHandle<()>, ServerError> {
    let (open_tx, open_rx) = oneshot::channel::<Result<(), video::VideoError>>();

    let join = spawn_blocking(move || {
        let mut source = match open_source(&video_path) {
            Ok(source) => source,
            Err(e) => {
                let _ = open_tx.send(Err(e));
                return;
            }
        };
        if open_tx.send(Ok(())).is_err() {
            // the caller went away before the session started
            source.release();
            return;
        }

        run(source.as_mut(), detector.as_ref(), &frames, &running);
        source.release();
    });

    match open_rx.await {
        Ok(Ok(())) => Ok(join),
        Ok(Err(e)) => {
            let _ = join.await;
            Err(ServerError::SourceOpen(e))
        }
        Err(_) => Err(ServerError::Worker(
            "producer worker died during open".to_string(),
        )),
    }
}

fn run(
    source: &mut dyn VideoSource,
    detector: &dyn Detector,
    frames: &FrameSender,
    running: &AtomicBool,
) {
    let interval = Duration::from_millis(1000 / TARGET_FPS);
    let mut sent: u64 = 0;
    let mut dropped: u64 = 0;

    while running.load(Ordering::Relaxed) {
        let tick = Instant::now();

        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                log::info!("end of stream");
                break;
            }
            Err(e) => {
                log::warn!("decode failed, ending stream: {e}");
                break;
            }
        };

        if let Some(payload) = process(&frame, detector) {
            match frames.put(payload, PUT_TIMEOUT) {
                PutResult::Ok => sent += 1,
                // consumer is behind; drop this frame and keep going
                PutResult::Full => dropped += 1,
                // streamer is gone
                PutResult::Closed => break,
            }
        }

        let elapsed = tick.elapsed();
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }

    log::info!("producer stopped ({sent} frames enqueued, {dropped} dropped)");
}

/// Detect, encode, and wrap one frame. Failures here are fatal to this frame
/// only: log and skip, never tear down the loop.
fn process(frame: &RawFrame, detector: &dyn Detector) -> Option<FramePayload> {
    let faces = match detector.detect(frame) {
        Ok(faces) => faces,
        Err(e) => {
            log::warn!("face detection failed, skipping frame: {e}");
            return None;
        }
    };
    let jpeg = match frame.to_jpeg(JPEG_QUALITY) {
        Ok(jpeg) => jpeg,
        Err(e) => {
            log::warn!("jpeg encoding failed, skipping frame: {e}");
            return None;
        }
    };
    Some(FramePayload::new(&jpeg, faces, unix_time()))
}

fn unix_time() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
