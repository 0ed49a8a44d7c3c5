use crate::domain::events::{EventBus, GameEvent};
use crate::domain::player::Player;
use crate::domain::projectile::Projectile;
use crate::domain::tuning::GameConfig;
use tracing::debug;

/// A projectile struck a non-owner player this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileHit {
    pub projectile_id: String,
    pub owner_id: String,
    pub target_id: String,
    pub x: f32,
    pub y: f32,
}

/// Where a projectile ended up after one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectileFate {
    Active,
    Hit(ProjectileHit),
    OutOfBounds,
}

impl ProjectileFate {
    pub fn is_spent(&self) -> bool {
        !matches!(self, ProjectileFate::Active)
    }
}

/// First non-owner player whose bounding box contains the projectile's leading point.
pub fn find_target<'a, I>(projectile: &Projectile, players: I) -> Option<&'a Player>
where
    I: IntoIterator<Item = &'a Player>,
{
    let (px, py) = projectile.leading_point();
    players
        .into_iter()
        .filter(|p| p.id != projectile.owner_id && p.is_alive())
        .find(|p| p.contains_point(px, py))
}

/// Advances a projectile one tick and resolves hits before bounds.
///
/// A spent projectile must be dropped by the caller; it is never stepped again.
pub fn step_projectile<'a, I>(
    projectile: &mut Projectile,
    players: I,
    cfg: &GameConfig,
    bus: &EventBus,
) -> ProjectileFate
where
    I: IntoIterator<Item = &'a Player>,
{
    projectile.advance(bus);

    if let Some(target) = find_target(projectile, players) {
        let hit = ProjectileHit {
            projectile_id: projectile.id.clone(),
            owner_id: projectile.owner_id.clone(),
            target_id: target.id.clone(),
            x: projectile.x,
            y: projectile.y,
        };
        debug!(
            projectile_id = %hit.projectile_id,
            shooter_id = %hit.owner_id,
            victim_id = %hit.target_id,
            "projectile hit"
        );
        bus.publish(GameEvent::ProjectileCollision {
            projectile_id: hit.projectile_id.clone(),
            owner_id: hit.owner_id.clone(),
            target_id: hit.target_id.clone(),
            x: hit.x,
            y: hit.y,
        });
        return ProjectileFate::Hit(hit);
    }

    if projectile.is_out_of_bounds(cfg) {
        bus.publish(GameEvent::ProjectileOutOfBounds {
            projectile_id: projectile.id.clone(),
        });
        return ProjectileFate::OutOfBounds;
    }

    ProjectileFate::Active
}
