//! Per-connection controller and streamer.
//!
//! One cooperative task per client owns the WebSocket and the optional
//! active session. It multiplexes inbound commands with draining the frame
//! queue, so a single writer touches the sink and session state never
//! leaves the connection.

use {
    crate::{ServerError, queue::GetResult, session::Session},
    detect::Detector,
    futures_util::{SinkExt, StreamExt},
    std::{net::SocketAddr, sync::Arc, time::Duration},
    tokio::net::TcpStream,
    tokio_websockets::{Message, WebSocketStream},
    wire::{ClientCommand, ServerEvent},
};

type WsSink = futures_util::stream::SplitSink<WebSocketStream<TcpStream>, Message>;

/// How long the streamer waits on the queue before re-checking liveness.
const STREAM_TIMEOUT: Duration = Duration::from_secs(1);

enum Step {
    Inbound(Option<Result<Message, tokio_websockets::Error>>),
    Queue(GetResult),
}

pub(crate) async fn handle(
    ws_stream: WebSocketStream<TcpStream>,
    addr: SocketAddr,
    detector: Arc<dyn Detector>,
) {
    let (mut sink, mut stream) = ws_stream.split();
    let mut session: Option<Session> = None;

    loop {
        let step = match session.as_mut() {
            Some(active) => {
                tokio::select! {
                    msg = stream.next() => Step::Inbound(msg),
                    result = active.recv(STREAM_TIMEOUT) => Step::Queue(result),
                }
            }
            None => Step::Inbound(stream.next().await),
        };

        match step {
            Step::Queue(GetResult::Frame(payload)) => {
                let event = ServerEvent::Frame { data: payload };
                if send_event(&mut sink, &event).await.is_err() {
                    // the connection is presumed gone
                    log::warn!("client {addr}: frame send failed, closing");
                    break;
                }
            }
            Step::Queue(GetResult::Empty) => {
                // liveness poll elapsed with nothing queued; go around
            }
            Step::Queue(GetResult::Closed) => {
                // producer reached end of stream; discard silently
                if let Some(finished) = session.take() {
                    finished.stop().await;
                }
            }
            Step::Inbound(Some(Ok(message))) => {
                // commands are text JSON; ignore everything else
                let Some(text) = message.as_text() else {
                    continue;
                };
                match serde_json::from_str::<ClientCommand>(text) {
                    Ok(command) => {
                        if let Err(e) = dispatch(command, &mut session, &mut sink, &detector).await
                        {
                            log::warn!("client {addr}: send failed: {e}");
                            break;
                        }
                    }
                    Err(e) => log::warn!("client {addr}: invalid command: {e}"),
                }
            }
            Step::Inbound(Some(Err(e))) => {
                log::warn!("client {addr}: connection error: {e}");
                break;
            }
            Step::Inbound(None) => {
                log::info!("client {addr}: disconnected");
                break;
            }
        }
    }

    // disconnect or send failure: implicit stop, no acknowledgement
    if let Some(active) = session.take() {
        active.stop().await;
    }
}

async fn dispatch(
    command: ClientCommand,
    session: &mut Option<Session>,
    sink: &mut WsSink,
    detector: &Arc<dyn Detector>,
) -> Result<(), ServerError> {
    match command {
        ClientCommand::StartVideo { video_path } => {
            // a replaced session is fully stopped, source released, before
            // the new one opens
            if let Some(previous) = session.take() {
                log::info!("replacing session for '{}'", previous.video_path());
                previous.stop().await;
            }
            match Session::start(&video_path, Arc::clone(detector)).await {
                Ok(started) => *session = Some(started),
                Err(e) => {
                    log::warn!("cannot start '{video_path}': {e}");
                    let event = ServerEvent::Error {
                        message: format!("Could not open video file: {video_path}"),
                    };
                    send_event(sink, &event).await?;
                }
            }
        }
        ClientCommand::StopVideo => {
            if let Some(previous) = session.take() {
                previous.stop().await;
            }
            // acknowledged even when no session was active
            send_event(sink, &ServerEvent::Stopped).await?;
        }
    }
    Ok(())
}

async fn send_event(sink: &mut WsSink, event: &ServerEvent) -> Result<(), ServerError> {
    let text = serde_json::to_string(event)?;
    sink.send(Message::text(text)).await?;
    Ok(())
}
