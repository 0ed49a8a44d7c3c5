use crate::use_cases::{Recipients, RelayEvent};
use axum::extract::ws::Utf8Bytes;
use tokio::sync::{broadcast, mpsc};

/// A relay output serialized once and shared by every connection.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub recipients: Recipients,
    pub bytes: Utf8Bytes,
}

#[derive(Clone)]
pub struct AppState {
    // Connection events flowing into the relay world task.
    pub input_tx: mpsc::Sender<RelayEvent>,
    // Serialized outputs, filtered per connection by recipient.
    pub envelope_tx: broadcast::Sender<Envelope>,
}
