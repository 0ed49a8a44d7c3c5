// Platform controller: generates the layout and answers landing queries.

use crate::domain::systems::platforms::{self, GenerationError};
use crate::domain::{EventBus, GameConfig, GameEvent, LandingResolver, Platform, Player};
use crate::use_cases::entry::Entry;
use crate::use_cases::ports::ViewFactory;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::rc::Rc;
use tracing::{info, warn};

pub struct PlatformController {
    config: GameConfig,
    bus: Rc<EventBus>,
    // Creation order is landing priority.
    platforms: Vec<Entry<Platform>>,
}

impl PlatformController {
    pub fn new(config: GameConfig, bus: Rc<EventBus>) -> Self {
        Self {
            config,
            bus,
            platforms: Vec::new(),
        }
    }

    pub fn set_config(&mut self, config: GameConfig) {
        self.config = config;
    }

    pub fn create(&mut self, platform: Platform, views: &mut dyn ViewFactory) -> String {
        let id = platform.id.clone();
        let mut view = views.platform_view(&platform);
        view.update_position(&platform);
        self.platforms.push(Entry::new(platform, view));

        self.bus.publish(GameEvent::PlatformCreated {
            platform_id: id.clone(),
        });
        id
    }

    /// Replaces the current layout with a freshly generated one.
    ///
    /// A configured seed takes precedence over `rng` so every client derives the same layout.
    pub fn generate<R: Rng>(
        &mut self,
        rng: &mut R,
        views: &mut dyn ViewFactory,
    ) -> Result<usize, GenerationError> {
        let layout = match self.config.platform.seed {
            Some(seed) => platforms::generate(&mut StdRng::seed_from_u64(seed), &self.config)?,
            None => platforms::generate(rng, &self.config)?,
        };

        self.clear();
        let count = layout.len();
        for platform in layout {
            self.create(platform, views);
        }
        info!(count, layout = ?self.config.platform.layout, "platforms generated");
        Ok(count)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let Some(index) = self.platforms.iter().position(|e| e.model.id == id) else {
            warn!(platform_id = %id, "platform not found; skipping removal");
            return false;
        };
        let mut entry = self.platforms.remove(index);
        entry.view.remove();

        self.bus.publish(GameEvent::PlatformRemoved {
            platform_id: id.to_string(),
        });
        true
    }

    pub fn clear(&mut self) {
        let ids: Vec<String> = self.platforms.iter().map(|e| e.model.id.clone()).collect();
        for id in ids {
            self.remove(&id);
        }
    }

    pub fn get(&self, id: &str) -> Option<&Platform> {
        self.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.iter().map(|e| &e.model)
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }
}

impl LandingResolver for PlatformController {
    fn resolve_landing(&self, player: &mut Player, bus: &EventBus) -> bool {
        platforms::resolve_landing(self.iter(), player, bus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventKind;
    use crate::domain::events::record;
    use crate::domain::tuning::PlatformLayout;
    use crate::use_cases::test_support::{RecordingViews, ViewCall};

    fn seeded_config(seed: u64) -> GameConfig {
        let mut cfg = GameConfig::default();
        cfg.platform.seed = Some(seed);
        cfg
    }

    #[test]
    fn when_seed_is_configured_then_layouts_match_across_controllers() {
        let cfg = seeded_config(7);
        let mut views = RecordingViews::default();
        let mut a = PlatformController::new(cfg, Rc::new(EventBus::new()));
        let mut b = PlatformController::new(cfg, Rc::new(EventBus::new()));

        a.generate(&mut rand::rng(), &mut views).expect("layout a");
        b.generate(&mut rand::rng(), &mut views).expect("layout b");

        let coords = |c: &PlatformController| -> Vec<(f32, f32, f32)> {
            c.iter().map(|p| (p.x, p.y, p.width)).collect()
        };
        assert_eq!(a.len(), 5);
        assert_eq!(coords(&a), coords(&b));
    }

    #[test]
    fn when_regenerating_then_previous_platforms_are_removed() {
        let mut cfg = GameConfig::default();
        cfg.platform.layout = PlatformLayout::Series;
        let bus = Rc::new(EventBus::new());
        let created = record(&bus, &[EventKind::PlatformCreated]);
        let removed = record(&bus, &[EventKind::PlatformRemoved]);
        let mut views = RecordingViews::default();
        let mut ctrl = PlatformController::new(cfg, bus);

        let first = ctrl.generate(&mut rand::rng(), &mut views).expect("first");
        ctrl.generate(&mut rand::rng(), &mut views).expect("second");

        assert_eq!(ctrl.len(), first);
        assert_eq!(created.borrow().len(), first * 2);
        assert_eq!(removed.borrow().len(), first);
    }

    #[test]
    fn when_platform_is_created_then_view_is_placed_once() {
        let bus = Rc::new(EventBus::new());
        let mut views = RecordingViews::default();
        let mut ctrl = PlatformController::new(GameConfig::default(), bus);

        let id = ctrl.create(Platform::new("ledge", 100.0, 300.0, 120.0, 20.0), &mut views);
        assert!(ctrl.remove(&id));
        assert!(!ctrl.remove(&id));

        assert_eq!(
            views.calls(),
            vec![
                ViewCall::Position {
                    id: "ledge".to_string(),
                    x: 100.0,
                    y: 300.0
                },
                ViewCall::Removed {
                    id: "ledge".to_string()
                },
            ]
        );
    }

    #[test]
    fn when_falling_player_crosses_a_platform_then_controller_lands_it() {
        let bus = Rc::new(EventBus::new());
        let mut views = RecordingViews::default();
        let mut ctrl = PlatformController::new(GameConfig::default(), bus.clone());
        ctrl.create(Platform::new("ledge", 100.0, 300.0, 120.0, 20.0), &mut views);

        let cfg = GameConfig::default();
        let mut player = Player::new("p", 120.0, 272.0, &cfg);
        player.is_jumping = true;
        player.dy = 4.0;

        assert!(ctrl.resolve_landing(&mut player, &bus));
        assert_eq!(player.y, 270.0);
        assert!(player.is_on_ground);
    }
}
