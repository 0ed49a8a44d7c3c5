// Wire protocol DTOs: JSON envelopes `{ "type": <kind>, ...fields }` for clients and the relay.

use crate::use_cases::{Position, SyncMessage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Every message kind either side may send.
pub const KNOWN_TYPES: [&str; 7] = [
    "initialize",
    "newPlayer",
    "updatePlayerPosition",
    "playerDisconnected",
    "currentPlayers",
    "projectileFired",
    "playerHit",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WireMessage {
    // Identity and spawn point assigned to the receiving connection.
    Initialize {
        id: String,
        x: f32,
        y: f32,
    },
    NewPlayer {
        id: String,
        x: f32,
        y: f32,
    },
    UpdatePlayerPosition {
        id: String,
        x: f32,
        y: f32,
    },
    PlayerDisconnected {
        id: String,
    },
    // Players connected before the receiver, keyed by id.
    CurrentPlayers {
        players: BTreeMap<String, PositionDto>,
    },
    ProjectileFired {
        #[serde(rename = "ownerId")]
        owner_id: String,
        x: f32,
        y: f32,
        dx: f32,
        dy: f32,
    },
    PlayerHit {
        #[serde(rename = "targetId")]
        target_id: String,
        x: f32,
        y: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionDto {
    pub x: f32,
    pub y: f32,
}

impl From<Position> for PositionDto {
    fn from(p: Position) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<PositionDto> for Position {
    fn from(p: PositionDto) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<SyncMessage> for WireMessage {
    fn from(message: SyncMessage) -> Self {
        match message {
            SyncMessage::Initialize { id, x, y } => WireMessage::Initialize { id, x, y },
            SyncMessage::NewPlayer { id, x, y } => WireMessage::NewPlayer { id, x, y },
            SyncMessage::UpdatePlayerPosition { id, x, y } => {
                WireMessage::UpdatePlayerPosition { id, x, y }
            }
            SyncMessage::PlayerDisconnected { id } => WireMessage::PlayerDisconnected { id },
            SyncMessage::CurrentPlayers { players } => WireMessage::CurrentPlayers {
                players: players
                    .into_iter()
                    .map(|(id, p)| (id, PositionDto::from(p)))
                    .collect(),
            },
            SyncMessage::ProjectileFired {
                owner_id,
                x,
                y,
                dx,
                dy,
            } => WireMessage::ProjectileFired {
                owner_id,
                x,
                y,
                dx,
                dy,
            },
            SyncMessage::PlayerHit { target_id, x, y } => {
                WireMessage::PlayerHit { target_id, x, y }
            }
        }
    }
}

impl From<WireMessage> for SyncMessage {
    fn from(message: WireMessage) -> Self {
        match message {
            WireMessage::Initialize { id, x, y } => SyncMessage::Initialize { id, x, y },
            WireMessage::NewPlayer { id, x, y } => SyncMessage::NewPlayer { id, x, y },
            WireMessage::UpdatePlayerPosition { id, x, y } => {
                SyncMessage::UpdatePlayerPosition { id, x, y }
            }
            WireMessage::PlayerDisconnected { id } => SyncMessage::PlayerDisconnected { id },
            WireMessage::CurrentPlayers { players } => SyncMessage::CurrentPlayers {
                players: players
                    .into_iter()
                    .map(|(id, p)| (id, Position::from(p)))
                    .collect(),
            },
            WireMessage::ProjectileFired {
                owner_id,
                x,
                y,
                dx,
                dy,
            } => SyncMessage::ProjectileFired {
                owner_id,
                x,
                y,
                dx,
                dy,
            },
            WireMessage::PlayerHit { target_id, x, y } => {
                SyncMessage::PlayerHit { target_id, x, y }
            }
        }
    }
}

/// Why an inbound frame could not be turned into a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    // Not JSON, or not a JSON object.
    Malformed(String),
    MissingType,
    UnknownType(String),
    // Known type with missing or mistyped fields.
    InvalidFields { kind: String, reason: String },
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Malformed(reason) => write!(f, "malformed message: {reason}"),
            ProtocolError::MissingType => write!(f, "message has no string `type` field"),
            ProtocolError::UnknownType(kind) => write!(f, "unknown message type `{kind}`"),
            ProtocolError::InvalidFields { kind, reason } => {
                write!(f, "invalid `{kind}` message: {reason}")
            }
        }
    }
}

impl std::error::Error for ProtocolError {}

/// Parses one text frame, telling the failure modes apart.
pub fn decode(text: &str) -> Result<WireMessage, ProtocolError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| ProtocolError::Malformed(e.to_string()))?;
    if !value.is_object() {
        return Err(ProtocolError::Malformed("expected a JSON object".to_string()));
    }

    let kind = value
        .get("type")
        .and_then(serde_json::Value::as_str)
        .ok_or(ProtocolError::MissingType)?
        .to_string();
    if !KNOWN_TYPES.contains(&kind.as_str()) {
        return Err(ProtocolError::UnknownType(kind));
    }

    serde_json::from_value(value).map_err(|e| ProtocolError::InvalidFields {
        kind,
        reason: e.to_string(),
    })
}

pub fn decode_sync(text: &str) -> Result<SyncMessage, ProtocolError> {
    decode(text).map(SyncMessage::from)
}

pub fn encode(message: &WireMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(message)
}

pub fn encode_sync(message: SyncMessage) -> Result<String, serde_json::Error> {
    encode(&WireMessage::from(message))
}
