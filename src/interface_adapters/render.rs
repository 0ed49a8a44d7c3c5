// Headless presentation: views that report refreshes through tracing instead of drawing.

use crate::domain::{Platform, Player, Projectile};
use crate::use_cases::{EntityView, ViewFactory};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntityKind {
    Player,
    LocalPlayer,
    Projectile,
    Platform,
}

pub struct TracingView {
    id: String,
    kind: EntityKind,
    refreshes: u64,
}

impl TracingView {
    fn boxed(id: &str, kind: EntityKind) -> Box<Self> {
        debug!(id, ?kind, "view created");
        Box::new(Self {
            id: id.to_string(),
            kind,
            refreshes: 0,
        })
    }
}

impl EntityView<Player> for TracingView {
    fn update_position(&mut self, model: &Player) {
        self.refreshes += 1;
        debug!(id = %self.id, kind = ?self.kind, x = model.x, y = model.y, "player moved");
    }

    fn update_health(&mut self, model: &Player) {
        // Health changes are rare enough to surface at info.
        info!(id = %self.id, kind = ?self.kind, health = model.health, "player health");
    }

    fn remove(&mut self) {
        debug!(id = %self.id, kind = ?self.kind, refreshes = self.refreshes, "view removed");
    }
}

impl EntityView<Projectile> for TracingView {
    fn update_position(&mut self, model: &Projectile) {
        self.refreshes += 1;
        debug!(id = %self.id, x = model.x, y = model.y, "projectile moved");
    }

    fn remove(&mut self) {
        debug!(id = %self.id, kind = ?self.kind, refreshes = self.refreshes, "view removed");
    }
}

impl EntityView<Platform> for TracingView {
    fn update_position(&mut self, model: &Platform) {
        debug!(
            id = %self.id,
            x = model.x,
            y = model.y,
            width = model.width,
            color = %model.color,
            "platform placed"
        );
    }

    fn remove(&mut self) {
        debug!(id = %self.id, kind = ?self.kind, "view removed");
    }
}

/// View factory for the headless client.
#[derive(Debug, Default)]
pub struct TracingViews;

impl ViewFactory for TracingViews {
    fn player_view(&mut self, player: &Player, is_local: bool) -> Box<dyn EntityView<Player>> {
        let kind = if is_local {
            EntityKind::LocalPlayer
        } else {
            EntityKind::Player
        };
        TracingView::boxed(&player.id, kind)
    }

    fn projectile_view(&mut self, projectile: &Projectile) -> Box<dyn EntityView<Projectile>> {
        TracingView::boxed(&projectile.id, EntityKind::Projectile)
    }

    fn platform_view(&mut self, platform: &Platform) -> Box<dyn EntityView<Platform>> {
        TracingView::boxed(&platform.id, EntityKind::Platform)
    }
}
