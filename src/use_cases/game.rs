// Game controller: aggregates the entity controllers and runs one simulation tick at a time.

use crate::domain::systems::GenerationError;
use crate::domain::{ConfigError, EventBus, GameConfig, HIT_DAMAGE, Platform, Player, Projectile};
use crate::use_cases::entry::LocalIdentity;
use crate::use_cases::platforms::PlatformController;
use crate::use_cases::players::PlayerController;
use crate::use_cases::ports::ViewFactory;
use crate::use_cases::projectiles::ProjectileController;
use crate::use_cases::types::{Direction, InputIntent, TickReport};
use rand::Rng;
use std::rc::Rc;
use tracing::{debug, info, warn};

pub struct GameController {
    config: GameConfig,
    bus: Rc<EventBus>,
    views: Box<dyn ViewFactory>,
    local: LocalIdentity,
    players: PlayerController,
    projectiles: ProjectileController,
    platforms: PlatformController,
    tick: u64,
}

impl GameController {
    /// Builds the controllers around a validated configuration.
    pub fn new(
        config: GameConfig,
        bus: Rc<EventBus>,
        views: Box<dyn ViewFactory>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let local = LocalIdentity::default();

        Ok(Self {
            players: PlayerController::new(config, bus.clone(), local.clone()),
            projectiles: ProjectileController::new(config, bus.clone()),
            platforms: PlatformController::new(config, bus.clone()),
            config,
            bus,
            views,
            local,
            tick: 0,
        })
    }

    /// Generates the platform layout. Players and projectiles are left untouched.
    pub fn setup_world<R: Rng>(&mut self, rng: &mut R) -> Result<usize, GenerationError> {
        self.platforms.generate(rng, self.views.as_mut())
    }

    /// Swaps in a new configuration; existing entities keep their current state.
    pub fn reconfigure(&mut self, config: GameConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.players.set_config(config);
        self.projectiles.set_config(config);
        self.platforms.set_config(config);
        info!(
            width = config.container_width,
            height = config.container_height,
            "game reconfigured"
        );
        Ok(())
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn bus(&self) -> Rc<EventBus> {
        self.bus.clone()
    }

    pub fn local_identity(&self) -> LocalIdentity {
        self.local.clone()
    }

    pub fn local_player_id(&self) -> Option<String> {
        self.local.get()
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn projectile(&self, id: &str) -> Option<&Projectile> {
        self.projectiles.get(id)
    }

    pub fn players(&self) -> &PlayerController {
        &self.players
    }

    pub fn projectiles(&self) -> &ProjectileController {
        &self.projectiles
    }

    pub fn platforms(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.iter()
    }

    pub fn ticks(&self) -> u64 {
        self.tick
    }

    pub fn spawn_player(&mut self, id: &str, x: f32, y: f32) -> bool {
        self.players.spawn(id, x, y, self.views.as_mut())
    }

    /// Adopts `id` as this client's player and spawns it if not yet present.
    ///
    /// A previous local player under another id (from before a reconnect) is removed first;
    /// no peer knows that id any more.
    pub fn spawn_local_player(&mut self, id: &str, x: f32, y: f32) -> bool {
        if let Some(previous) = self.local.get().filter(|prev| prev != id) {
            info!(previous = %previous, player_id = %id, "local identity replaced");
            if self.players.contains(&previous) {
                self.players.remove(&previous);
            }
        }
        self.local.set(id);
        self.spawn_player(id, x, y)
    }

    pub fn remove_player(&mut self, id: &str) -> bool {
        self.players.remove(id)
    }

    pub fn move_player(&mut self, id: &str, dx: f32, dy: f32) {
        self.players.move_player(id, dx, dy);
    }

    pub fn stop_player(&mut self, id: &str) {
        self.players.stop_player(id);
    }

    pub fn jump_player(&mut self, id: &str) -> bool {
        self.players.jump_player(id)
    }

    pub fn reposition_player(&mut self, id: &str, x: f32, y: f32) {
        self.players.reposition(id, x, y);
    }

    pub fn damage_player(&mut self, id: &str, amount: i32) -> bool {
        self.players.damage(id, amount)
    }

    pub fn fire_projectile(&mut self, owner_id: &str, x: f32, y: f32, dx: f32, dy: f32) -> String {
        self.projectiles
            .fire(owner_id, x, y, dx, dy, self.views.as_mut())
    }

    fn local_or_warn(&self, action: &str) -> Option<String> {
        let id = self.local.get();
        if id.is_none() {
            warn!(action, "no local player yet; input ignored");
        }
        id
    }

    pub fn move_local(&mut self, direction: Direction) {
        let Some(id) = self.local_or_warn("move") else {
            return;
        };
        let step = self.config.player.move_step;
        let (dx, dy) = match direction {
            Direction::Left => (-step, 0.0),
            Direction::Right => (step, 0.0),
            Direction::Down => (0.0, step),
        };
        self.move_player(&id, dx, dy);
    }

    pub fn stop_local(&mut self) {
        if let Some(id) = self.local_or_warn("stop") {
            self.stop_player(&id);
        }
    }

    pub fn jump_local(&mut self) -> bool {
        match self.local_or_warn("jump") {
            Some(id) => self.jump_player(&id),
            None => false,
        }
    }

    /// Fires from the local player's muzzle in the direction it faces.
    pub fn fire_local(&mut self) -> Option<String> {
        let id = self.local_or_warn("fire")?;
        let Some(player) = self.players.get(&id) else {
            warn!(player_id = %id, "local player not spawned; fire ignored");
            return None;
        };
        let (x, y) = player.muzzle();
        let dx = player.facing * self.config.projectile.speed;
        Some(self.fire_projectile(&id, x, y, dx, 0.0))
    }

    pub fn apply_input(&mut self, intent: InputIntent) {
        debug!(?intent, "input");
        match intent {
            InputIntent::Move(direction) => self.move_local(direction),
            InputIntent::Stop => self.stop_local(),
            InputIntent::Jump => {
                self.jump_local();
            }
            InputIntent::Fire => {
                self.fire_local();
            }
        }
    }

    // Remote-owned hits are applied when the owner's playerHit arrives.
    fn applies_hit_locally(&self, owner_id: &str) -> bool {
        match self.local.get() {
            None => true,
            Some(local) => local == owner_id,
        }
    }

    /// Jump integration, then projectile travel, then hit damage.
    pub fn tick(&mut self) -> TickReport {
        self.tick += 1;

        let airborne = self.players.tick(&self.platforms);
        let hits = self.projectiles.tick(self.players.models());

        let mut removed_players = 0;
        for hit in &hits {
            if !self.applies_hit_locally(&hit.owner_id) {
                continue;
            }
            if self.players.damage(&hit.target_id, HIT_DAMAGE) {
                removed_players += 1;
            }
        }

        TickReport {
            tick: self.tick,
            airborne,
            projectiles: self.projectiles.len(),
            hits: hits.len(),
            removed_players,
        }
    }

    /// Single batched view refresh across every controller.
    pub fn render_pass(&mut self) -> usize {
        self.players.render_pass() + self.projectiles.render_pass()
    }
}
