// Player model: bounded movement, jump state machine and health.

use crate::domain::events::{EventBus, GameEvent, Motion};
use crate::domain::tuning::{GameConfig, clamp_position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpState {
    Grounded,
    Jumping,
}

/// Returned by one jump integration step; `Stop` once the player has come to rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Stop,
}

/// Decides whether a descending player comes to rest on a platform this tick.
///
/// Implementations snap the player onto the surface, publish the landing and return `true`,
/// or clear `is_on_ground` and return `false`.
pub trait LandingResolver {
    fn resolve_landing(&self, player: &mut Player, bus: &EventBus) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub width: f32,
    pub height: f32,
    pub health: i32,
    pub is_jumping: bool,
    pub is_on_ground: bool,
    // -1.0 or 1.0; follows the last horizontal move and aims projectiles.
    pub facing: f32,
}

impl Player {
    /// Creates a player clamped inside the container with the configured size and health.
    pub fn new(id: impl Into<String>, x: f32, y: f32, cfg: &GameConfig) -> Self {
        Self {
            id: id.into(),
            x: clamp_position(x, 0.0, cfg.player_max_x()),
            y: clamp_position(y, 0.0, cfg.player_max_y()),
            dx: 0.0,
            dy: 0.0,
            width: cfg.player.width,
            height: cfg.player.height,
            health: cfg.player.default_health,
            is_jumping: false,
            is_on_ground: false,
            facing: 1.0,
        }
    }

    pub fn state(&self) -> JumpState {
        if self.is_jumping {
            JumpState::Jumping
        } else {
            JumpState::Grounded
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    fn motion(&self) -> Motion {
        Motion {
            player_id: self.id.clone(),
            x: self.x,
            y: self.y,
            dx: self.dx,
            dy: self.dy,
        }
    }

    /// Sets velocity and moves by it immediately, clamped to the container.
    ///
    /// While jumping the vertical axis belongs to the jump integrator, so only the
    /// horizontal velocity is taken from the request.
    pub fn move_by(&mut self, dx: f32, dy: f32, cfg: &GameConfig, bus: &EventBus) {
        self.dx = dx;
        if dx != 0.0 {
            self.facing = dx.signum();
        }
        self.x = clamp_position(self.x + dx, 0.0, cfg.player_max_x());

        if !self.is_jumping {
            self.dy = dy;
            self.y = clamp_position(self.y + dy, 0.0, cfg.player_max_y());
        }

        bus.publish(GameEvent::PlayerStartedMoving(self.motion()));
    }

    /// Zeroes input velocity; publishes `PlayerStopped` only if the player was moving.
    pub fn stop(&mut self, bus: &EventBus) {
        let was_moving = self.dx != 0.0 || (!self.is_jumping && self.dy != 0.0);
        self.dx = 0.0;
        if !self.is_jumping {
            self.dy = 0.0;
        }

        if was_moving {
            bus.publish(GameEvent::PlayerStopped(self.motion()));
        }
    }

    /// Applies a remote position, clamped to the container.
    pub fn set_position(&mut self, x: f32, y: f32, cfg: &GameConfig, bus: &EventBus) {
        self.x = clamp_position(x, 0.0, cfg.player_max_x());
        self.y = clamp_position(y, 0.0, cfg.player_max_y());
        bus.publish(GameEvent::PlayerRepositioned(self.motion()));
    }

    /// `Grounded -> Jumping`. Returns `false` if a jump is already in progress.
    pub fn jump(&mut self, cfg: &GameConfig) -> bool {
        if self.is_jumping {
            return false;
        }
        self.is_jumping = true;
        self.is_on_ground = false;
        self.dy = cfg.player.jump_velocity;
        true
    }

    /// One airborne integration step: move, apply gravity, then resolve landing.
    pub fn tick_jump<R>(&mut self, resolver: &R, cfg: &GameConfig, bus: &EventBus) -> TickOutcome
    where
        R: LandingResolver + ?Sized,
    {
        if !self.is_jumping {
            return TickOutcome::Stop;
        }

        self.x = clamp_position(self.x + self.dx, 0.0, cfg.player_max_x());
        self.y += self.dy;
        self.dy += cfg.player.gravity;

        if resolver.resolve_landing(self, bus) {
            return TickOutcome::Stop;
        }

        bus.publish(GameEvent::PlayerJumping(self.motion()));

        let ground = cfg.ground_level();
        if self.y >= ground {
            self.y = ground;
            self.dy = 0.0;
            self.is_jumping = false;
            self.is_on_ground = true;
            bus.publish(GameEvent::PlayerLanded(self.motion()));
            return TickOutcome::Stop;
        }

        TickOutcome::Continue
    }

    /// Rests the player on a surface whose top edge is at `surface_y`.
    pub fn land_on(&mut self, surface_y: f32, bus: &EventBus) {
        self.y = surface_y - self.height;
        self.dy = 0.0;
        self.is_jumping = false;
        self.is_on_ground = true;
        bus.publish(GameEvent::PlayerLanded(self.motion()));
    }

    /// Reduces health (never below zero). Returns `true` only on the call that brings
    /// health to zero; further calls on a depleted player do nothing.
    pub fn take_damage(&mut self, amount: i32, bus: &EventBus) -> bool {
        if amount <= 0 || self.health <= 0 {
            return false;
        }
        self.health = (self.health - amount).max(0);
        bus.publish(GameEvent::HealthUpdated {
            player_id: self.id.clone(),
            health: self.health,
        });
        self.health == 0
    }

    /// Inclusive point-in-rectangle test against the player's bounding box.
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// Spawn point for projectiles: horizontally centred, at the top edge.
    pub fn muzzle(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::{EventKind, record};

    struct NoPlatforms;

    impl LandingResolver for NoPlatforms {
        fn resolve_landing(&self, player: &mut Player, _bus: &EventBus) -> bool {
            player.is_on_ground = false;
            false
        }
    }

    fn run_jump(player: &mut Player, cfg: &GameConfig, bus: &EventBus) -> usize {
        let mut ticks = 0;
        while player.tick_jump(&NoPlatforms, cfg, bus) == TickOutcome::Continue {
            ticks += 1;
            assert!(ticks < 10_000, "jump never terminated");
        }
        ticks + 1
    }

    #[test]
    fn when_move_input_is_huge_then_position_stays_inside_container() {
        let cfg = GameConfig::default();
        let bus = EventBus::new();
        let mut player = Player::new("p1", 100.0, 100.0, &cfg);

        for (dx, dy) in [
            (1e9, 1e9),
            (-1e9, -1e9),
            (5_000.0, -3.0),
            (-0.5, 12_345.0),
            (f32::MAX, f32::MIN),
        ] {
            player.move_by(dx, dy, &cfg, &bus);
            assert!((0.0..=cfg.player_max_x()).contains(&player.x), "x = {}", player.x);
            assert!((0.0..=cfg.player_max_y()).contains(&player.y), "y = {}", player.y);
        }
    }

    #[test]
    fn when_player_moves_then_started_moving_is_published_with_clamped_position() {
        let cfg = GameConfig::default();
        let bus = EventBus::new();
        let log = record(&bus, &[EventKind::PlayerStartedMoving]);
        let mut player = Player::new("p1", 5.0, 100.0, &cfg);

        player.move_by(-10.0, 0.0, &cfg, &bus);

        assert_eq!(
            log.borrow().as_slice(),
            &[GameEvent::PlayerStartedMoving(Motion {
                player_id: "p1".to_string(),
                x: 0.0,
                y: 100.0,
                dx: -10.0,
                dy: 0.0,
            })]
        );
        assert_eq!(player.facing, -1.0);
    }

    #[test]
    fn when_stop_is_repeated_then_only_one_stopped_event_fires() {
        let cfg = GameConfig::default();
        let bus = EventBus::new();
        let log = record(&bus, &[EventKind::PlayerStopped]);
        let mut player = Player::new("p1", 100.0, 100.0, &cfg);

        player.move_by(10.0, 0.0, &cfg, &bus);
        player.stop(&bus);
        player.stop(&bus);
        player.stop(&bus);

        assert_eq!(log.borrow().len(), 1);
        assert_eq!(player.dx, 0.0);
    }

    #[test]
    fn when_stationary_player_stops_then_no_event_fires() {
        let cfg = GameConfig::default();
        let bus = EventBus::new();
        let log = record(&bus, &[EventKind::PlayerStopped]);
        let mut player = Player::new("p1", 100.0, 100.0, &cfg);

        player.stop(&bus);

        assert!(log.borrow().is_empty());
    }

    #[test]
    fn when_player_jumps_in_empty_world_then_it_lands_on_ground_exactly_once() {
        let cfg = GameConfig::default().with_container(800.0, 600.0);
        let bus = EventBus::new();
        let landed = record(&bus, &[EventKind::PlayerLanded]);
        let mut player = Player::new("P1", 100.0, 100.0, &cfg);

        assert!(player.jump(&cfg));
        assert_eq!(player.state(), JumpState::Jumping);
        run_jump(&mut player, &cfg, &bus);

        assert_eq!(player.state(), JumpState::Grounded);
        assert!(player.is_on_ground);
        assert_eq!(player.dy, 0.0);
        assert_eq!(player.y, 600.0 - 30.0 - 2.0);
        assert_eq!(landed.borrow().len(), 1);

        // Further ticks after landing are inert.
        assert_eq!(player.tick_jump(&NoPlatforms, &cfg, &bus), TickOutcome::Stop);
        assert_eq!(landed.borrow().len(), 1);
    }

    #[test]
    fn when_jump_is_requested_mid_air_then_velocity_is_not_reset() {
        let cfg = GameConfig::default();
        let bus = EventBus::new();
        let mut player = Player::new("p1", 100.0, 400.0, &cfg);

        player.jump(&cfg);
        player.tick_jump(&NoPlatforms, &cfg, &bus);
        let dy = player.dy;

        assert!(!player.jump(&cfg));
        assert_eq!(player.dy, dy);
    }

    #[test]
    fn when_jump_ticks_then_velocity_gains_gravity_each_step() {
        let cfg = GameConfig::default();
        let bus = EventBus::new();
        let mut player = Player::new("p1", 100.0, 400.0, &cfg);

        player.jump(&cfg);
        player.tick_jump(&NoPlatforms, &cfg, &bus);

        assert_eq!(player.y, 380.0);
        assert_eq!(player.dy, -19.5);
    }

    #[test]
    fn when_moving_sideways_mid_jump_then_jump_velocity_is_kept() {
        let cfg = GameConfig::default();
        let bus = EventBus::new();
        let mut player = Player::new("p1", 100.0, 400.0, &cfg);

        player.jump(&cfg);
        player.move_by(10.0, 0.0, &cfg, &bus);
        assert_eq!(player.dy, cfg.player.jump_velocity);

        player.tick_jump(&NoPlatforms, &cfg, &bus);
        assert_eq!(player.x, 120.0);
    }

    #[test]
    fn when_damage_is_repeated_past_zero_then_death_is_reported_once() {
        let cfg = GameConfig::default();
        let bus = EventBus::new();
        let health = record(&bus, &[EventKind::HealthUpdated]);
        let mut player = Player::new("p1", 0.0, 0.0, &cfg);

        let deaths = (0..6).filter(|_| player.take_damage(1, &bus)).count();

        assert_eq!(deaths, 1);
        assert_eq!(player.health, 0);
        assert_eq!(health.borrow().len(), 3);
    }

    #[test]
    fn when_point_is_on_bounding_box_edge_then_it_is_contained() {
        let cfg = GameConfig::default();
        let player = Player::new("p1", 50.0, 50.0, &cfg);

        assert!(player.contains_point(50.0, 80.0));
        assert!(player.contains_point(55.0, 55.0));
        assert!(!player.contains_point(80.1, 55.0));
    }
}
