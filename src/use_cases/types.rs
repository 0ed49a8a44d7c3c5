// Use-case level inputs/outputs for the simulation and the relay.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Down,
}

/// Discrete intents delivered by an input source to the local player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputIntent {
    Move(Direction),
    Stop,
    Jump,
    Fire,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// State deltas exchanged between clients and the relay.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncMessage {
    // Server assigns identity and spawn position to a new connection.
    Initialize { id: String, x: f32, y: f32 },
    NewPlayer { id: String, x: f32, y: f32 },
    UpdatePlayerPosition { id: String, x: f32, y: f32 },
    PlayerDisconnected { id: String },
    // Full snapshot sent once to a newly joined client.
    CurrentPlayers { players: BTreeMap<String, Position> },
    ProjectileFired {
        owner_id: String,
        x: f32,
        y: f32,
        dx: f32,
        dy: f32,
    },
    PlayerHit { target_id: String, x: f32, y: f32 },
}

impl SyncMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            SyncMessage::Initialize { .. } => "initialize",
            SyncMessage::NewPlayer { .. } => "newPlayer",
            SyncMessage::UpdatePlayerPosition { .. } => "updatePlayerPosition",
            SyncMessage::PlayerDisconnected { .. } => "playerDisconnected",
            SyncMessage::CurrentPlayers { .. } => "currentPlayers",
            SyncMessage::ProjectileFired { .. } => "projectileFired",
            SyncMessage::PlayerHit { .. } => "playerHit",
        }
    }
}

/// Inputs flowing from relay connections into the relay world task.
#[derive(Debug, Clone)]
pub enum RelayEvent {
    Join { player_id: String },
    Leave { player_id: String },
    Message { player_id: String, message: SyncMessage },
}

/// Which connections a relay output is delivered to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipients {
    AllExcept(String),
    Only(String),
}

impl Recipients {
    pub fn includes(&self, player_id: &str) -> bool {
        match self {
            Recipients::AllExcept(excluded) => excluded != player_id,
            Recipients::Only(target) => target == player_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelayOutput {
    pub recipients: Recipients,
    pub message: SyncMessage,
}

/// Summary of one simulation tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub airborne: usize,
    pub projectiles: usize,
    pub hits: usize,
    pub removed_players: usize,
}
