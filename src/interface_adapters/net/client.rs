use crate::interface_adapters::net::{LOG_THROTTLE, should_log};
use crate::interface_adapters::protocol;
use crate::use_cases::{OutboundSink, SyncMessage};

use futures_util::{SinkExt, StreamExt};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub url: String,
    pub reconnect_delay: Duration,
    pub outbound_capacity: usize,
    pub inbound_capacity: usize,
}

#[derive(Debug)]
enum SessionEnd {
    // Socket closed or failed; reconnect after the delay.
    Lost,
    // The simulation side dropped its channels.
    Shutdown,
}

// Outbound drops are reported at most once per throttle window.
#[derive(Debug)]
struct DropLog {
    last_log: Instant,
    since_log: u64,
    total: u64,
}

impl DropLog {
    fn new() -> Self {
        Self {
            last_log: Instant::now() - LOG_THROTTLE,
            since_log: 0,
            total: 0,
        }
    }
}

/// Simulation-side handle: transmits deltas only while the connection is open.
#[derive(Clone)]
pub struct NetworkLink {
    outbound_tx: mpsc::Sender<SyncMessage>,
    state_rx: watch::Receiver<ConnectionState>,
    drops: Arc<Mutex<DropLog>>,
}

impl NetworkLink {
    fn new(
        outbound_tx: mpsc::Sender<SyncMessage>,
        state_rx: watch::Receiver<ConnectionState>,
    ) -> Self {
        Self {
            outbound_tx,
            state_rx,
            drops: Arc::new(Mutex::new(DropLog::new())),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    pub fn state_changes(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Messages discarded since the link was created.
    pub fn dropped(&self) -> u64 {
        self.drops.lock().map(|d| d.total).unwrap_or(0)
    }

    fn record_drop(&self, kind: &'static str, reason: &'static str) {
        let Ok(mut drops) = self.drops.lock() else {
            return;
        };
        drops.total += 1;
        drops.since_log += 1;
        if should_log(&mut drops.last_log) {
            let state = self.state();
            warn!(kind, reason, ?state, dropped = drops.since_log, "dropping outbound messages");
            drops.since_log = 0;
        }
    }
}

impl OutboundSink for NetworkLink {
    fn send(&self, message: SyncMessage) {
        if self.state() != ConnectionState::Open {
            self.record_drop(message.kind(), "connection not open");
            return;
        }
        match self.outbound_tx.try_send(message) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(message)) => {
                self.record_drop(message.kind(), "outbound queue full");
            }
            Err(mpsc::error::TrySendError::Closed(message)) => {
                self.record_drop(message.kind(), "connection task gone");
            }
        }
    }
}

/// Starts the connection task. Inbound messages arrive decoded on the returned receiver.
pub fn spawn_connection(
    settings: ConnectionSettings,
) -> (NetworkLink, mpsc::Receiver<SyncMessage>, JoinHandle<()>) {
    let (outbound_tx, outbound_rx) = mpsc::channel(settings.outbound_capacity);
    let (inbound_tx, inbound_rx) = mpsc::channel(settings.inbound_capacity);
    let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);

    let handle = tokio::spawn(run_connection(settings, outbound_rx, inbound_tx, state_tx));
    (NetworkLink::new(outbound_tx, state_rx), inbound_rx, handle)
}

/// Connects, pumps messages both ways, and reconnects after a fixed delay, indefinitely.
///
/// Returns only once the simulation side has dropped both the link and the inbound receiver.
pub async fn run_connection(
    settings: ConnectionSettings,
    mut outbound_rx: mpsc::Receiver<SyncMessage>,
    inbound_tx: mpsc::Sender<SyncMessage>,
    state_tx: watch::Sender<ConnectionState>,
) {
    let mut attempt: u64 = 0;

    loop {
        if inbound_tx.is_closed() {
            break;
        }
        attempt += 1;
        let _ = state_tx.send(ConnectionState::Connecting);
        debug!(url = %settings.url, attempt, "connecting");

        match connect_async(settings.url.as_str()).await {
            Ok((ws, _response)) => {
                let _ = state_tx.send(ConnectionState::Open);
                info!(url = %settings.url, attempt, "connected");
                attempt = 0;

                let end = run_session(ws, &mut outbound_rx, &inbound_tx).await;
                let _ = state_tx.send(ConnectionState::Closed);

                let dropped = drain(&mut outbound_rx);
                if dropped > 0 {
                    warn!(dropped, "discarded messages queued for the closed connection");
                }
                if matches!(end, SessionEnd::Shutdown) {
                    break;
                }
            }
            Err(e) => {
                let _ = state_tx.send(ConnectionState::Closed);
                warn!(url = %settings.url, attempt, error = %e, "connection failed");
            }
        }

        info!(
            delay_ms = settings.reconnect_delay.as_millis() as u64,
            "reconnecting after delay"
        );
        tokio::time::sleep(settings.reconnect_delay).await;
    }

    info!("connection task exiting");
}

fn drain(outbound_rx: &mut mpsc::Receiver<SyncMessage>) -> usize {
    let mut dropped = 0;
    while outbound_rx.try_recv().is_ok() {
        dropped += 1;
    }
    dropped
}

async fn run_session<S>(
    ws: S,
    outbound_rx: &mut mpsc::Receiver<SyncMessage>,
    inbound_tx: &mpsc::Sender<SyncMessage>,
) -> SessionEnd
where
    S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
        + futures_util::Sink<Message, Error = tokio_tungstenite::tungstenite::Error>
        + Unpin,
{
    let (mut sink, mut stream) = ws.split();

    loop {
        tokio::select! {
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        match protocol::decode_sync(text.as_str()) {
                            Ok(message) => {
                                if inbound_tx.send(message).await.is_err() {
                                    let _ = sink.close().await;
                                    return SessionEnd::Shutdown;
                                }
                            }
                            Err(err) => {
                                warn!(
                                    bytes = text.len(),
                                    error = %err,
                                    "discarding server message"
                                );
                            }
                        }
                    }
                    Some(Ok(Message::Binary(bytes))) => {
                        warn!(bytes = bytes.len(), "binary frame ignored");
                    }
                    Some(Ok(Message::Close(frame))) => {
                        info!(?frame, "server closed connection");
                        return SessionEnd::Lost;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "websocket recv error");
                        return SessionEnd::Lost;
                    }
                    None => {
                        info!("websocket stream ended");
                        return SessionEnd::Lost;
                    }
                }
            }

            outbound = outbound_rx.recv() => {
                let Some(message) = outbound else {
                    let _ = sink.close().await;
                    return SessionEnd::Shutdown;
                };
                let kind = message.kind();
                let txt = match protocol::encode_sync(message) {
                    Ok(txt) => txt,
                    Err(e) => {
                        warn!(kind, error = ?e, "failed to serialize outbound message");
                        continue;
                    }
                };
                if let Err(e) = sink.send(Message::text(txt)).await {
                    warn!(kind, error = %e, "failed to send message");
                    return SessionEnd::Lost;
                }
            }
        }
    }
}
