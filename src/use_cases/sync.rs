// Client-side synchronization: local events out, remote messages in.

use crate::domain::{EventBus, EventKind, GameEvent, HIT_DAMAGE};
use crate::use_cases::entry::LocalIdentity;
use crate::use_cases::game::GameController;
use crate::use_cases::ports::OutboundSink;
use crate::use_cases::types::SyncMessage;
use std::rc::Rc;
use tracing::{debug, warn};

// Remote repositioning is excluded so applied updates are never echoed back.
const OUTBOUND_MOTION: [EventKind; 4] = [
    EventKind::PlayerStartedMoving,
    EventKind::PlayerStopped,
    EventKind::PlayerJumping,
    EventKind::PlayerLanded,
];

/// Subscribes the outbound path: every local-player mutation becomes a minimal delta.
pub fn install_outbound_sync(bus: &EventBus, local: LocalIdentity, sink: Rc<dyn OutboundSink>) {
    let motion_local = local.clone();
    let motion_sink = sink.clone();
    bus.subscribe_many(&OUTBOUND_MOTION, move |event| {
        let (GameEvent::PlayerStartedMoving(m)
        | GameEvent::PlayerStopped(m)
        | GameEvent::PlayerJumping(m)
        | GameEvent::PlayerLanded(m)) = event
        else {
            return;
        };
        if motion_local.is(&m.player_id) {
            motion_sink.send(SyncMessage::UpdatePlayerPosition {
                id: m.player_id.clone(),
                x: m.x,
                y: m.y,
            });
        }
    });

    let fired_local = local.clone();
    let fired_sink = sink.clone();
    bus.subscribe(EventKind::ProjectileFired, move |event| {
        if let GameEvent::ProjectileFired {
            owner_id, x, y, dx, dy, ..
        } = event
        {
            if fired_local.is(owner_id) {
                fired_sink.send(SyncMessage::ProjectileFired {
                    owner_id: owner_id.clone(),
                    x: *x,
                    y: *y,
                    dx: *dx,
                    dy: *dy,
                });
            }
        }
    });

    bus.subscribe(EventKind::ProjectileCollision, move |event| {
        if let GameEvent::ProjectileCollision {
            owner_id,
            target_id,
            x,
            y,
            ..
        } = event
        {
            if local.is(owner_id) {
                sink.send(SyncMessage::PlayerHit {
                    target_id: target_id.clone(),
                    x: *x,
                    y: *y,
                });
            }
        }
    });
}

/// Routes one decoded message into the same controller APIs local input uses.
pub fn apply_remote(game: &mut GameController, message: SyncMessage) {
    debug!(kind = message.kind(), "applying remote message");
    let local = game.local_identity();

    match message {
        SyncMessage::Initialize { id, x, y } => {
            game.spawn_local_player(&id, x, y);
        }
        SyncMessage::NewPlayer { id, x, y } => {
            if !local.is(&id) {
                game.spawn_player(&id, x, y);
            }
        }
        SyncMessage::CurrentPlayers { players } => {
            for (id, pos) in players {
                if !local.is(&id) {
                    game.spawn_player(&id, pos.x, pos.y);
                }
            }
        }
        SyncMessage::UpdatePlayerPosition { id, x, y } => {
            if local.is(&id) {
                debug!(player_id = %id, "ignoring remote update for local player");
                return;
            }
            game.reposition_player(&id, x, y);
        }
        SyncMessage::PlayerDisconnected { id } => {
            game.remove_player(&id);
        }
        SyncMessage::ProjectileFired {
            owner_id,
            x,
            y,
            dx,
            dy,
        } => {
            if local.is(&owner_id) {
                debug!(owner_id = %owner_id, "ignoring echo of own projectile");
                return;
            }
            game.fire_projectile(&owner_id, x, y, dx, dy);
        }
        SyncMessage::PlayerHit { target_id, .. } => {
            if !game.players().contains(&target_id) {
                warn!(player_id = %target_id, "hit for unknown player");
                return;
            }
            game.damage_player(&target_id, HIT_DAMAGE);
        }
    }
}
