// Projectile controller: fires, advances and retires projectiles.

use crate::domain::systems::projectiles::{ProjectileFate, ProjectileHit, step_projectile};
use crate::domain::{EventBus, EventKind, GameConfig, GameEvent, Player, Projectile};
use crate::use_cases::entry::{DirtySet, Entry, SharedDirty};
use crate::use_cases::ports::ViewFactory;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, warn};

pub struct ProjectileController {
    config: GameConfig,
    bus: Rc<EventBus>,
    projectiles: HashMap<String, Entry<Projectile>>,
    dirty: SharedDirty,
}

impl ProjectileController {
    pub fn new(config: GameConfig, bus: Rc<EventBus>) -> Self {
        let dirty: SharedDirty = Rc::new(RefCell::new(DirtySet::default()));

        let moved = dirty.clone();
        bus.subscribe_many(
            &[EventKind::ProjectileFired, EventKind::ProjectileMoved],
            move |event| match event {
                GameEvent::ProjectileFired { projectile_id, .. }
                | GameEvent::ProjectileMoved { projectile_id, .. } => {
                    moved.borrow_mut().position.insert(projectile_id.clone());
                }
                _ => {}
            },
        );

        Self {
            config,
            bus,
            projectiles: HashMap::new(),
            dirty,
        }
    }

    pub fn set_config(&mut self, config: GameConfig) {
        self.config = config;
    }

    /// Spawns a projectile owned by `owner_id` and returns its id.
    pub fn fire(
        &mut self,
        owner_id: &str,
        x: f32,
        y: f32,
        dx: f32,
        dy: f32,
        views: &mut dyn ViewFactory,
    ) -> String {
        let projectile = Projectile::new(owner_id, x, y, dx, dy, &self.config);
        let id = projectile.id.clone();
        let view = views.projectile_view(&projectile);
        self.projectiles
            .insert(id.clone(), Entry::new(projectile, view));
        debug!(projectile_id = %id, owner_id, x, y, dx, dy, "projectile fired");

        self.bus.publish(GameEvent::ProjectileFired {
            projectile_id: id.clone(),
            owner_id: owner_id.to_string(),
            x,
            y,
            dx,
            dy,
        });
        id
    }

    /// Removes a projectile and its view. Missing ids are logged and ignored.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(mut entry) = self.projectiles.remove(id) else {
            warn!(projectile_id = %id, "projectile not found; skipping removal");
            return false;
        };
        entry.view.remove();
        self.dirty.borrow_mut().forget(id);
        true
    }

    pub fn get(&self, id: &str) -> Option<&Projectile> {
        self.projectiles.get(id).map(|e| &e.model)
    }

    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    pub fn models(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.values().map(|e| &e.model)
    }

    /// Advances every projectile once; spent projectiles are dropped before returning.
    pub fn tick<'a, I>(&mut self, players: I) -> Vec<ProjectileHit>
    where
        I: IntoIterator<Item = &'a Player>,
    {
        let players: Vec<&Player> = players.into_iter().collect();
        let mut hits = Vec::new();
        let mut spent = Vec::new();

        for (id, entry) in self.projectiles.iter_mut() {
            let fate = step_projectile(
                &mut entry.model,
                players.iter().copied(),
                &self.config,
                &self.bus,
            );
            match fate {
                ProjectileFate::Active => {}
                ProjectileFate::Hit(hit) => {
                    hits.push(hit);
                    spent.push(id.clone());
                }
                ProjectileFate::OutOfBounds => {
                    debug!(projectile_id = %id, "projectile out of bounds");
                    spent.push(id.clone());
                }
            }
        }

        for id in spent {
            self.remove(&id);
        }
        hits
    }

    /// Refreshes every view flagged since the last pass and clears the flags.
    pub fn render_pass(&mut self) -> usize {
        let dirty = std::mem::take(&mut *self.dirty.borrow_mut());
        let mut updated = 0;
        for id in &dirty.position {
            if let Some(entry) = self.projectiles.get_mut(id) {
                entry.view.update_position(&entry.model);
                updated += 1;
            }
        }
        updated
    }
}
