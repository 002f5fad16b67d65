use {
    server::{FrameQueue, GetResult, PutResult},
    std::time::{Duration, Instant},
    wire::FramePayload,
};

fn payload(timestamp: f64) -> FramePayload {
    FramePayload::new(&[0xff, 0xd8], Vec::new(), timestamp)
}

#[tokio::test]
async fn test_fifo_order_preserved() {
    let (tx, mut rx) = FrameQueue::bounded(4);

    for i in 0..3 {
        assert_eq!(tx.put(payload(i as f64), Duration::ZERO), PutResult::Ok);
    }

    for i in 0..3 {
        match rx.get(Duration::from_secs(1)).await {
            GetResult::Frame(frame) => assert_eq!(frame.timestamp, i as f64),
            other => panic!("expected frame, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_full_queue_drops_within_timeout() {
    let (tx, _rx) = FrameQueue::bounded(2);

    assert_eq!(tx.put(payload(1.0), Duration::ZERO), PutResult::Ok);
    assert_eq!(tx.put(payload(2.0), Duration::ZERO), PutResult::Ok);
    assert_eq!(tx.capacity(), 0);

    let started = Instant::now();
    assert_eq!(tx.put(payload(3.0), Duration::from_millis(50)), PutResult::Full);
    let waited = started.elapsed();
    assert!(waited >= Duration::from_millis(50));
    assert!(waited < Duration::from_millis(500));

    // the dropped frame left the queue unchanged
    assert_eq!(tx.capacity(), 0);
}

#[tokio::test]
async fn test_put_succeeds_after_slot_freed() {
    let (tx, mut rx) = FrameQueue::bounded(1);

    assert_eq!(tx.put(payload(1.0), Duration::ZERO), PutResult::Ok);
    assert_eq!(tx.put(payload(2.0), Duration::ZERO), PutResult::Full);

    match rx.get(Duration::from_secs(1)).await {
        GetResult::Frame(frame) => assert_eq!(frame.timestamp, 1.0),
        other => panic!("expected frame, got {other:?}"),
    }

    assert_eq!(tx.put(payload(3.0), Duration::ZERO), PutResult::Ok);
}

#[tokio::test]
async fn test_get_reports_empty_after_timeout() {
    let (_tx, mut rx) = FrameQueue::bounded(2);

    let started = Instant::now();
    match rx.get(Duration::from_millis(100)).await {
        GetResult::Empty => {}
        other => panic!("expected empty, got {other:?}"),
    }
    let waited = started.elapsed();
    assert!(waited >= Duration::from_millis(100));
    assert!(waited < Duration::from_secs(1));
}

#[tokio::test]
async fn test_buffered_frames_survive_sender_drop() {
    let (tx, mut rx) = FrameQueue::bounded(2);
    assert_eq!(tx.put(payload(7.0), Duration::ZERO), PutResult::Ok);
    drop(tx);

    match rx.get(Duration::from_secs(1)).await {
        GetResult::Frame(frame) => assert_eq!(frame.timestamp, 7.0),
        other => panic!("expected frame, got {other:?}"),
    }
    match rx.get(Duration::from_secs(1)).await {
        GetResult::Closed => {}
        other => panic!("expected closed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_put_reports_closed_after_receiver_drop() {
    let (tx, rx) = FrameQueue::bounded(2);
    drop(rx);
    assert_eq!(tx.put(payload(1.0), Duration::ZERO), PutResult::Closed);
}
