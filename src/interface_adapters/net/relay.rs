use crate::domain::ids;
use crate::interface_adapters::net::{LOG_THROTTLE, should_log};
use crate::interface_adapters::protocol::{self, ProtocolError, WireMessage};
use crate::interface_adapters::state::{AppState, Envelope};
use crate::use_cases::{RelayEvent, RelayOutput, SyncMessage};

use axum::{
    extract::{
        State,
        ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures::SinkExt;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{broadcast, mpsc};
use tracing::{Instrument, debug, error, info, info_span, warn};

#[derive(Debug)]
enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[allow(dead_code)]
    Ws(axum::Error),
    InputClosed,
    OutputsClosed,
}

impl From<axum::Error> for NetError {
    fn from(e: axum::Error) -> Self {
        NetError::Ws(e)
    }
}

enum LoopControl {
    Continue,
    Disconnect,
}

/// Serializes each relay output once and broadcasts the shared bytes.
pub async fn relay_output_serializer(
    mut output_rx: broadcast::Receiver<RelayOutput>,
    envelope_tx: broadcast::Sender<Envelope>,
) {
    loop {
        match output_rx.recv().await {
            Ok(output) => {
                let kind = output.message.kind();
                let txt = match protocol::encode(&WireMessage::from(output.message)) {
                    Ok(txt) => txt,
                    Err(e) => {
                        error!(error = ?e, kind, "failed to serialize relay output");
                        continue;
                    }
                };
                let _ = envelope_tx.send(Envelope {
                    recipients: output.recipients,
                    bytes: Utf8Bytes::from(txt),
                });
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(missed = n, "relay serializer lagged; messages dropped");
            }
            Err(broadcast::error::RecvError::Closed) => {
                warn!("relay output channel closed; serializer exiting");
                break;
            }
        }
    }
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| {
        // Separate connection id for correlating logs with the assigned player id.
        let conn_id = ids::next_stamp();
        let player_id = ids::player_id();
        let span = info_span!("conn", conn_id, player_id = %player_id);
        handle_socket(socket, state, player_id).instrument(span)
    })
}

struct ConnStats {
    msgs_in: u64,
    msgs_out: u64,
    bytes_in: u64,
    bytes_out: u64,
    invalid: u32,
    last_invalid_log: Instant,
    last_lag_log: Instant,
}

impl ConnStats {
    fn new() -> Self {
        let now = Instant::now() - LOG_THROTTLE;
        Self {
            msgs_in: 0,
            msgs_out: 0,
            bytes_in: 0,
            bytes_out: 0,
            invalid: 0,
            last_invalid_log: now,
            last_lag_log: now,
        }
    }
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>, player_id: String) {
    // Subscribe before joining so the initialize/snapshot outputs are not missed.
    let mut envelope_rx = state.envelope_tx.subscribe();

    if state
        .input_tx
        .send(RelayEvent::Join {
            player_id: player_id.clone(),
        })
        .await
        .is_err()
    {
        error!(error = ?NetError::InputClosed, "relay world unavailable; closing");
        let _ = socket.close().await;
        return;
    }
    info!("client connected");

    let mut stats = ConnStats::new();
    if let Err(e) = run_connection_loop(
        &mut socket,
        &player_id,
        &state.input_tx,
        &mut envelope_rx,
        &mut stats,
    )
    .await
    {
        warn!(error = ?e, "connection loop exited with error");
    }

    disconnect_cleanup(&player_id, &state.input_tx, &stats).await;
}

async fn run_connection_loop(
    socket: &mut WebSocket,
    player_id: &str,
    input_tx: &mpsc::Sender<RelayEvent>,
    envelope_rx: &mut broadcast::Receiver<Envelope>,
    stats: &mut ConnStats,
) -> Result<(), NetError> {
    let mut fatal: Option<NetError> = None;

    loop {
        let disconnect = tokio::select! {
            incoming = socket.recv() => {
                match handle_incoming(incoming, player_id, input_tx, stats).await {
                    Ok(LoopControl::Continue) => false,
                    Ok(LoopControl::Disconnect) => true,
                    Err(e) => {
                        fatal = Some(e);
                        true
                    }
                }
            }

            envelope = envelope_rx.recv() => {
                match envelope {
                    Ok(envelope) if envelope.recipients.includes(player_id) => {
                        matches!(
                            forward_bytes(envelope.bytes, socket, stats).await,
                            LoopControl::Disconnect
                        )
                    }
                    Ok(_) => false,
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        if should_log(&mut stats.last_lag_log) {
                            warn!(missed = n, "relay outputs lagged; messages dropped");
                        }
                        false
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        fatal = Some(NetError::OutputsClosed);
                        true
                    }
                }
            }
        };

        if disconnect {
            if let Err(err) = socket.close().await.map_err(NetError::Ws) {
                debug!(error = ?err, "socket close error");
            }
            break;
        }
    }

    match fatal {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn log_rejected(player_id: &str, err: &ProtocolError, bytes: usize, stats: &mut ConnStats) {
    stats.invalid += 1;
    if should_log(&mut stats.last_invalid_log) {
        warn!(player_id, bytes, error = %err, "discarding client message");
    }
}

async fn handle_incoming(
    incoming: Option<Result<Message, axum::Error>>,
    player_id: &str,
    input_tx: &mpsc::Sender<RelayEvent>,
    stats: &mut ConnStats,
) -> Result<LoopControl, NetError> {
    match incoming {
        Some(Ok(msg)) => match msg {
            Message::Text(text) => {
                stats.msgs_in += 1;
                stats.bytes_in += text.len() as u64;

                let message: SyncMessage = match protocol::decode(text.as_str()) {
                    Ok(wire) => wire.into(),
                    Err(err) => {
                        log_rejected(player_id, &err, text.len(), stats);
                        return Ok(LoopControl::Continue);
                    }
                };

                input_tx
                    .send(RelayEvent::Message {
                        player_id: player_id.to_string(),
                        message,
                    })
                    .await
                    .map_err(|_| NetError::InputClosed)?;
                Ok(LoopControl::Continue)
            }
            Message::Binary(bytes) => {
                stats.invalid += 1;
                if should_log(&mut stats.last_invalid_log) {
                    warn!(player_id, bytes = bytes.len(), "binary frame ignored");
                }
                Ok(LoopControl::Continue)
            }
            Message::Ping(_) | Message::Pong(_) => Ok(LoopControl::Continue),
            Message::Close(_) => Ok(LoopControl::Disconnect),
        },
        Some(Err(e)) => {
            warn!(player_id, error = %e, "websocket recv error");
            Ok(LoopControl::Disconnect)
        }
        None => {
            info!(player_id, "websocket closed");
            Ok(LoopControl::Disconnect)
        }
    }
}

async fn forward_bytes(
    bytes: Utf8Bytes,
    socket: &mut WebSocket,
    stats: &mut ConnStats,
) -> LoopControl {
    let len = bytes.len();
    match socket.send(Message::Text(bytes)).await.map_err(NetError::Ws) {
        Ok(()) => {
            stats.msgs_out += 1;
            stats.bytes_out += len as u64;
            LoopControl::Continue
        }
        Err(err) => {
            // Disconnect follows immediately.
            warn!(error = ?err, "failed to send relay message");
            LoopControl::Disconnect
        }
    }
}

async fn disconnect_cleanup(
    player_id: &str,
    input_tx: &mpsc::Sender<RelayEvent>,
    stats: &ConnStats,
) {
    if input_tx
        .send(RelayEvent::Leave {
            player_id: player_id.to_string(),
        })
        .await
        .is_err()
    {
        warn!(error = ?NetError::InputClosed, "relay world gone during disconnect");
    }

    debug!(
        player_id,
        msgs_in = stats.msgs_in,
        msgs_out = stats.msgs_out,
        bytes_in = stats.bytes_in,
        bytes_out = stats.bytes_out,
        invalid = stats.invalid,
        "connection stats"
    );
    info!(player_id, "client disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::Recipients;

    #[tokio::test]
    async fn when_output_is_serialized_then_recipients_are_kept_and_json_is_tagged() {
        let (output_tx, output_rx) = broadcast::channel(4);
        let (envelope_tx, mut envelope_rx) = broadcast::channel(4);
        let task = tokio::spawn(relay_output_serializer(output_rx, envelope_tx));

        output_tx
            .send(RelayOutput {
                recipients: Recipients::AllExcept("player-1".to_string()),
                message: SyncMessage::PlayerDisconnected {
                    id: "player-1".to_string(),
                },
            })
            .expect("send output");
        drop(output_tx);

        let envelope = envelope_rx.recv().await.expect("envelope");
        assert_eq!(envelope.recipients, Recipients::AllExcept("player-1".to_string()));
        let json: serde_json::Value = serde_json::from_str(envelope.bytes.as_str()).expect("json");
        assert_eq!(json["type"], "playerDisconnected");
        assert_eq!(json["id"], "player-1");
        task.await.expect("serializer task");
    }

    #[tokio::test]
    async fn when_frame_is_malformed_then_it_is_discarded_without_disconnect() {
        let (input_tx, mut input_rx) = mpsc::channel(4);
        let mut stats = ConnStats::new();

        let control = handle_incoming(
            Some(Ok(Message::Text("{oops".into()))),
            "player-1",
            &input_tx,
            &mut stats,
        )
        .await
        .expect("no fatal error");

        assert!(matches!(control, LoopControl::Continue));
        assert_eq!(stats.invalid, 1);
        assert!(input_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn when_frame_is_valid_then_it_reaches_the_relay_world_tagged_with_sender() {
        let (input_tx, mut input_rx) = mpsc::channel(4);
        let mut stats = ConnStats::new();
        let text = r#"{"type":"updatePlayerPosition","id":"player-1","x":1,"y":2}"#;

        handle_incoming(Some(Ok(Message::Text(text.into()))), "player-1", &input_tx, &mut stats)
            .await
            .expect("no fatal error");

        let Some(RelayEvent::Message { player_id, message }) = input_rx.recv().await else {
            panic!("expected relayed message");
        };
        assert_eq!(player_id, "player-1");
        assert_eq!(message.kind(), "updatePlayerPosition");
    }
}
