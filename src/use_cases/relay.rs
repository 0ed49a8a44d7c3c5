// Relay world: the server's non-authoritative view of connected players.

use crate::domain::GameConfig;
use crate::use_cases::types::{Position, Recipients, RelayEvent, RelayOutput, SyncMessage};
use rand::Rng;
use std::collections::BTreeMap;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

/// Last known position of every connected player, keyed by id.
#[derive(Debug)]
pub struct RelayWorld {
    config: GameConfig,
    players: BTreeMap<String, Position>,
}

fn finite(values: &[f32]) -> bool {
    values.iter().all(|v| v.is_finite())
}

impl RelayWorld {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            players: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn position(&self, player_id: &str) -> Option<Position> {
        self.players.get(player_id).copied()
    }

    /// Applies one connection event and returns the messages to deliver.
    pub fn handle<R: Rng>(&mut self, event: RelayEvent, rng: &mut R) -> Vec<RelayOutput> {
        match event {
            RelayEvent::Join { player_id } => self.join(player_id, rng),
            RelayEvent::Leave { player_id } => self.leave(player_id),
            RelayEvent::Message { player_id, message } => self.relay(player_id, message),
        }
    }

    fn join<R: Rng>(&mut self, player_id: String, rng: &mut R) -> Vec<RelayOutput> {
        let x = rng.random_range(0.0..=self.config.player_max_x());
        let y = rng.random_range(0.0..=self.config.player_max_y());
        info!(player_id = %player_id, x, y, "player joined");

        // Snapshot of everyone else, taken before the newcomer is recorded.
        let others = self.players.clone();
        self.players.insert(player_id.clone(), Position { x, y });

        vec![
            RelayOutput {
                recipients: Recipients::Only(player_id.clone()),
                message: SyncMessage::Initialize {
                    id: player_id.clone(),
                    x,
                    y,
                },
            },
            RelayOutput {
                recipients: Recipients::Only(player_id.clone()),
                message: SyncMessage::CurrentPlayers { players: others },
            },
            RelayOutput {
                recipients: Recipients::AllExcept(player_id.clone()),
                message: SyncMessage::NewPlayer { id: player_id, x, y },
            },
        ]
    }

    fn leave(&mut self, player_id: String) -> Vec<RelayOutput> {
        if self.players.remove(&player_id).is_none() {
            debug!(player_id = %player_id, "leave for unknown player");
            return Vec::new();
        }
        info!(player_id = %player_id, remaining = self.players.len(), "player left");

        vec![RelayOutput {
            recipients: Recipients::AllExcept(player_id.clone()),
            message: SyncMessage::PlayerDisconnected { id: player_id },
        }]
    }

    fn relay(&mut self, sender: String, message: SyncMessage) -> Vec<RelayOutput> {
        if !self.players.contains_key(&sender) {
            warn!(player_id = %sender, kind = message.kind(), "message from unknown player");
            return Vec::new();
        }

        let accepted = match &message {
            SyncMessage::UpdatePlayerPosition { id, x, y } => {
                if *id != sender {
                    warn!(player_id = %sender, target = %id, "position update for another player");
                    false
                } else if !finite(&[*x, *y]) {
                    warn!(player_id = %sender, "non-finite position dropped");
                    false
                } else {
                    self.players.insert(sender.clone(), Position { x: *x, y: *y });
                    true
                }
            }
            SyncMessage::ProjectileFired {
                owner_id,
                x,
                y,
                dx,
                dy,
            } => {
                if *owner_id != sender {
                    warn!(player_id = %sender, owner_id = %owner_id, "projectile owner mismatch");
                    false
                } else if !finite(&[*x, *y, *dx, *dy]) {
                    warn!(player_id = %sender, "non-finite projectile dropped");
                    false
                } else {
                    true
                }
            }
            SyncMessage::PlayerHit { x, y, .. } => {
                if finite(&[*x, *y]) {
                    true
                } else {
                    warn!(player_id = %sender, "non-finite hit dropped");
                    false
                }
            }
            SyncMessage::Initialize { .. }
            | SyncMessage::NewPlayer { .. }
            | SyncMessage::PlayerDisconnected { .. }
            | SyncMessage::CurrentPlayers { .. } => {
                warn!(
                    player_id = %sender,
                    kind = message.kind(),
                    "server-only message from client ignored"
                );
                false
            }
        };

        if !accepted {
            return Vec::new();
        }
        vec![RelayOutput {
            recipients: Recipients::AllExcept(sender),
            message,
        }]
    }
}

/// Owns the relay world; runs until every input sender is dropped.
pub async fn relay_task(
    mut input_rx: mpsc::Receiver<RelayEvent>,
    output_tx: broadcast::Sender<RelayOutput>,
    config: GameConfig,
) {
    let mut world = RelayWorld::new(config);

    while let Some(event) = input_rx.recv().await {
        let outputs = world.handle(event, &mut rand::rng());
        for output in outputs {
            // No receivers just means nobody is connected right now.
            let _ = output_tx.send(output);
        }
    }

    info!("relay input closed; relay task exiting");
}
