// Player controller: owns player model/view pairs and routes local and remote mutations.

use crate::domain::{
    EventBus, EventKind, GameConfig, GameEvent, LandingResolver, Player, TickOutcome,
};
use crate::use_cases::entry::{DirtySet, Entry, LocalIdentity, SharedDirty};
use crate::use_cases::ports::ViewFactory;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, info, warn};

const POSITION_EVENTS: [EventKind; 6] = [
    EventKind::PlayerInitialized,
    EventKind::PlayerStartedMoving,
    EventKind::PlayerStopped,
    EventKind::PlayerJumping,
    EventKind::PlayerLanded,
    EventKind::PlayerRepositioned,
];

pub struct PlayerController {
    config: GameConfig,
    bus: Rc<EventBus>,
    players: HashMap<String, Entry<Player>>,
    dirty: SharedDirty,
    local: LocalIdentity,
}

impl PlayerController {
    pub fn new(config: GameConfig, bus: Rc<EventBus>, local: LocalIdentity) -> Self {
        let dirty: SharedDirty = Rc::new(RefCell::new(DirtySet::default()));

        let position = dirty.clone();
        bus.subscribe_many(&POSITION_EVENTS, move |event| {
            if let Some(id) = event.player_id() {
                position.borrow_mut().position.insert(id.to_string());
            }
        });

        let health = dirty.clone();
        bus.subscribe(EventKind::HealthUpdated, move |event| {
            if let GameEvent::HealthUpdated { player_id, health: hp } = event {
                debug!(player_id = %player_id, health = hp, "health updated");
                health.borrow_mut().health.insert(player_id.clone());
            }
        });

        Self {
            config,
            bus,
            players: HashMap::new(),
            dirty,
            local,
        }
    }

    pub fn set_config(&mut self, config: GameConfig) {
        self.config = config;
    }

    /// Creates a player unless one with this id already exists. Returns whether it was created.
    pub fn spawn(&mut self, id: &str, x: f32, y: f32, views: &mut dyn ViewFactory) -> bool {
        if self.players.contains_key(id) {
            debug!(player_id = %id, "player already present; spawn skipped");
            return false;
        }

        let player = Player::new(id, x, y, &self.config);
        let view = views.player_view(&player, self.local.is(id));
        let (x, y) = (player.x, player.y);
        self.players.insert(id.to_string(), Entry::new(player, view));
        info!(player_id = %id, x, y, "player spawned");

        self.bus.publish(GameEvent::PlayerInitialized {
            player_id: id.to_string(),
            x,
            y,
        });
        true
    }

    /// Removes a player and its view. Missing ids are logged and ignored.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(mut entry) = self.players.remove(id) else {
            warn!(player_id = %id, "player not found; skipping removal");
            return false;
        };
        entry.view.remove();
        self.dirty.borrow_mut().forget(id);
        info!(player_id = %id, "player removed");

        self.bus.publish(GameEvent::PlayerRemoved {
            player_id: id.to_string(),
        });
        true
    }

    pub fn get(&self, id: &str) -> Option<&Player> {
        self.players.get(id).map(|e| &e.model)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.players.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn models(&self) -> impl Iterator<Item = &Player> {
        self.players.values().map(|e| &e.model)
    }

    pub fn local_player_id(&self) -> Option<String> {
        self.local.get()
    }

    fn with_player<T>(
        &mut self,
        id: &str,
        action: &str,
        f: impl FnOnce(&mut Player, &GameConfig, &EventBus) -> T,
    ) -> Option<T> {
        match self.players.get_mut(id) {
            Some(entry) => Some(f(&mut entry.model, &self.config, &self.bus)),
            None => {
                warn!(player_id = %id, action, "player not found");
                None
            }
        }
    }

    pub fn move_player(&mut self, id: &str, dx: f32, dy: f32) {
        self.with_player(id, "move", |p, cfg, bus| p.move_by(dx, dy, cfg, bus));
    }

    pub fn stop_player(&mut self, id: &str) {
        self.with_player(id, "stop", |p, _, bus| p.stop(bus));
    }

    pub fn jump_player(&mut self, id: &str) -> bool {
        self.with_player(id, "jump", |p, cfg, _| p.jump(cfg))
            .unwrap_or(false)
    }

    pub fn reposition(&mut self, id: &str, x: f32, y: f32) {
        self.with_player(id, "reposition", |p, cfg, bus| p.set_position(x, y, cfg, bus));
    }

    /// Applies damage; a player whose health reaches zero is removed exactly once.
    pub fn damage(&mut self, id: &str, amount: i32) -> bool {
        let died = self
            .with_player(id, "damage", |p, _, bus| p.take_damage(amount, bus))
            .unwrap_or(false);
        if died {
            info!(player_id = %id, "player health depleted");
            self.remove(id);
        }
        died
    }

    /// Runs one jump integration step for every airborne player. Returns how many remain airborne.
    pub fn tick<R>(&mut self, resolver: &R) -> usize
    where
        R: LandingResolver + ?Sized,
    {
        let mut airborne = 0;
        for entry in self.players.values_mut() {
            if !entry.model.is_jumping {
                continue;
            }
            if entry.model.tick_jump(resolver, &self.config, &self.bus) == TickOutcome::Continue {
                airborne += 1;
            }
        }
        airborne
    }

    /// Refreshes every view flagged since the last pass and clears the flags.
    pub fn render_pass(&mut self) -> usize {
        let dirty = std::mem::take(&mut *self.dirty.borrow_mut());
        let mut updated = 0;

        for id in &dirty.position {
            if let Some(entry) = self.players.get_mut(id) {
                entry.view.update_position(&entry.model);
                updated += 1;
            }
        }
        for id in &dirty.health {
            if let Some(entry) = self.players.get_mut(id) {
                entry.view.update_health(&entry.model);
                updated += 1;
            }
        }
        updated
    }

    pub fn has_pending_updates(&self) -> bool {
        !self.dirty.borrow().is_empty()
    }
}
