use crate::domain::events::{EventBus, GameEvent};
use crate::domain::ids;
use crate::domain::tuning::GameConfig;

/// Health removed by every projectile hit, whether resolved locally or reported by the owner.
pub const HIT_DAMAGE: i32 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: String,
    pub owner_id: String,
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub width: f32,
    pub height: f32,
}

impl Projectile {
    /// Creates a projectile with a fresh id derived from the owner and a creation stamp.
    pub fn new(
        owner_id: impl Into<String>,
        x: f32,
        y: f32,
        dx: f32,
        dy: f32,
        cfg: &GameConfig,
    ) -> Self {
        let owner_id = owner_id.into();
        Self {
            id: ids::projectile_id(&owner_id),
            owner_id,
            x,
            y,
            dx,
            dy,
            width: cfg.projectile.width,
            height: cfg.projectile.height,
        }
    }

    /// Advances one tick and publishes the new position.
    pub fn advance(&mut self, bus: &EventBus) {
        self.x += self.dx;
        self.y += self.dy;
        bus.publish(GameEvent::ProjectileMoved {
            projectile_id: self.id.clone(),
            x: self.x,
            y: self.y,
        });
    }

    /// Point used for hit tests.
    pub fn leading_point(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn is_out_of_bounds(&self, cfg: &GameConfig) -> bool {
        self.x < 0.0
            || self.y < 0.0
            || self.x > cfg.container_width
            || self.y > cfg.container_height
    }
}
