use {
    detect::{DetectError, Detector},
    server::{GetResult, Session},
    std::{sync::Arc, time::Duration},
    tokio::time::timeout,
    video::RawFrame,
    wire::FaceBox,
};

struct StubDetector;

impl Detector for StubDetector {
    fn detect(&self, _frame: &RawFrame) -> Result<Vec<FaceBox>, DetectError> {
        Ok(vec![FaceBox {
            x: 8,
            y: 16,
            width: 32,
            height: 24,
            confidence: 0.75,
        }])
    }
}

fn stub() -> Arc<dyn Detector> {
    Arc::new(StubDetector)
}

#[tokio::test]
async fn test_frames_arrive_in_order_until_end_of_stream() {
    let mut session = Session::start("synthetic://64x48/5", stub())
        .await
        .expect("start failed");

    let mut frames = 0;
    let mut last_timestamp = 0.0f64;
    loop {
        match session.recv(Duration::from_secs(2)).await {
            GetResult::Frame(payload) => {
                assert!(payload.timestamp >= last_timestamp);
                last_timestamp = payload.timestamp;
                assert_eq!(payload.faces.len(), 1);
                assert_eq!(payload.faces[0].confidence, 0.75);
                frames += 1;
            }
            GetResult::Empty => {}
            GetResult::Closed => break,
        }
    }

    // a drained consumer sees every frame of a short stream
    assert_eq!(frames, 5);
    session.stop().await;
}

#[tokio::test]
async fn test_open_failure_creates_no_session() {
    assert!(Session::start("synthetic://bogus", stub()).await.is_err());
}

#[tokio::test]
async fn test_stop_mid_stream_completes_within_bound() {
    let mut session = Session::start("synthetic://64x48/100000", stub())
        .await
        .expect("start failed");

    // wait until the producer is demonstrably mid-loop
    loop {
        if let GetResult::Frame(_) = session.recv(Duration::from_secs(2)).await {
            break;
        }
    }

    timeout(Duration::from_secs(2), session.stop())
        .await
        .expect("stop did not complete in time");
}

#[tokio::test]
async fn test_undrained_session_stops_promptly() {
    // the consumer never drains, so the producer fills the queue and then
    // drops frames; stop must still complete because puts never block
    let session = Session::start("synthetic://32x32/100000", stub())
        .await
        .expect("start failed");

    tokio::time::sleep(Duration::from_millis(500)).await;

    timeout(Duration::from_secs(2), session.stop())
        .await
        .expect("stop did not complete in time");
}

#[tokio::test]
async fn test_restart_after_stop() {
    let first = Session::start("synthetic://32x32/100000", stub())
        .await
        .expect("first start failed");
    first.stop().await;

    // the old producer is joined, so a fresh session opens cleanly
    let mut second = Session::start("synthetic://32x32/3", stub())
        .await
        .expect("second start failed");
    loop {
        match second.recv(Duration::from_secs(2)).await {
            GetResult::Closed => break,
            GetResult::Frame(_) | GetResult::Empty => {}
        }
    }
    second.stop().await;
}
