use crate::domain::{Platform, Player, Projectile};
use crate::use_cases::types::SyncMessage;

// Port for the presentation of one entity. Views read their model only when asked to refresh.
pub trait EntityView<M> {
    fn update_position(&mut self, model: &M);

    fn update_health(&mut self, _model: &M) {}

    fn remove(&mut self);
}

// Port creating views as entities are spawned.
pub trait ViewFactory {
    fn player_view(&mut self, player: &Player, is_local: bool) -> Box<dyn EntityView<Player>>;
    fn projectile_view(&mut self, projectile: &Projectile) -> Box<dyn EntityView<Projectile>>;
    fn platform_view(&mut self, platform: &Platform) -> Box<dyn EntityView<Platform>>;
}

// Port for transmitting local state deltas. Implementations drop messages they cannot send.
pub trait OutboundSink {
    fn send(&self, message: SyncMessage);
}
