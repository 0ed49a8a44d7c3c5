// Synchronous publish/subscribe routing between models, controllers and the network layer.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PlayerInitialized,
    PlayerStartedMoving,
    PlayerStopped,
    PlayerJumping,
    PlayerLanded,
    PlayerRepositioned,
    HealthUpdated,
    PlayerRemoved,
    ProjectileFired,
    ProjectileMoved,
    ProjectileOutOfBounds,
    ProjectileCollision,
    PlatformCreated,
    PlatformRemoved,
}

/// Player position and velocity at the moment an event was published.
#[derive(Debug, Clone, PartialEq)]
pub struct Motion {
    pub player_id: String,
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PlayerInitialized {
        player_id: String,
        x: f32,
        y: f32,
    },
    PlayerStartedMoving(Motion),
    PlayerStopped(Motion),
    PlayerJumping(Motion),
    PlayerLanded(Motion),
    // Position applied from a remote update rather than local input.
    PlayerRepositioned(Motion),
    HealthUpdated {
        player_id: String,
        health: i32,
    },
    PlayerRemoved {
        player_id: String,
    },
    ProjectileFired {
        projectile_id: String,
        owner_id: String,
        x: f32,
        y: f32,
        dx: f32,
        dy: f32,
    },
    ProjectileMoved {
        projectile_id: String,
        x: f32,
        y: f32,
    },
    ProjectileOutOfBounds {
        projectile_id: String,
    },
    ProjectileCollision {
        projectile_id: String,
        owner_id: String,
        target_id: String,
        x: f32,
        y: f32,
    },
    PlatformCreated {
        platform_id: String,
    },
    PlatformRemoved {
        platform_id: String,
    },
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::PlayerInitialized { .. } => EventKind::PlayerInitialized,
            GameEvent::PlayerStartedMoving(_) => EventKind::PlayerStartedMoving,
            GameEvent::PlayerStopped(_) => EventKind::PlayerStopped,
            GameEvent::PlayerJumping(_) => EventKind::PlayerJumping,
            GameEvent::PlayerLanded(_) => EventKind::PlayerLanded,
            GameEvent::PlayerRepositioned(_) => EventKind::PlayerRepositioned,
            GameEvent::HealthUpdated { .. } => EventKind::HealthUpdated,
            GameEvent::PlayerRemoved { .. } => EventKind::PlayerRemoved,
            GameEvent::ProjectileFired { .. } => EventKind::ProjectileFired,
            GameEvent::ProjectileMoved { .. } => EventKind::ProjectileMoved,
            GameEvent::ProjectileOutOfBounds { .. } => EventKind::ProjectileOutOfBounds,
            GameEvent::ProjectileCollision { .. } => EventKind::ProjectileCollision,
            GameEvent::PlatformCreated { .. } => EventKind::PlatformCreated,
            GameEvent::PlatformRemoved { .. } => EventKind::PlatformRemoved,
        }
    }

    /// Player id for player motion/lifecycle events.
    pub fn player_id(&self) -> Option<&str> {
        match self {
            GameEvent::PlayerInitialized { player_id, .. }
            | GameEvent::HealthUpdated { player_id, .. }
            | GameEvent::PlayerRemoved { player_id } => Some(player_id),
            GameEvent::PlayerStartedMoving(m)
            | GameEvent::PlayerStopped(m)
            | GameEvent::PlayerJumping(m)
            | GameEvent::PlayerLanded(m)
            | GameEvent::PlayerRepositioned(m) => Some(&m.player_id),
            _ => None,
        }
    }
}

type Handler = Rc<dyn Fn(&GameEvent)>;

/// Single-threaded event dispatcher.
///
/// `publish` runs every handler subscribed to the event's kind, in subscription order,
/// before returning. Handlers run against a snapshot of the subscriber list, so a handler
/// that subscribes (or publishes) re-entrantly never invalidates the in-flight dispatch;
/// new subscribers only see later events.
#[derive(Default)]
pub struct EventBus {
    handlers: RefCell<HashMap<EventKind, Vec<Handler>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, kind: EventKind, handler: F)
    where
        F: Fn(&GameEvent) + 'static,
    {
        self.handlers
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push(Rc::new(handler));
    }

    /// Subscribes one handler to several kinds.
    pub fn subscribe_many<F>(&self, kinds: &[EventKind], handler: F)
    where
        F: Fn(&GameEvent) + 'static,
    {
        let handler: Handler = Rc::new(handler);
        let mut handlers = self.handlers.borrow_mut();
        for kind in kinds {
            handlers.entry(*kind).or_default().push(handler.clone());
        }
    }

    pub fn publish(&self, event: GameEvent) {
        let snapshot: Vec<Handler> = self
            .handlers
            .borrow()
            .get(&event.kind())
            .cloned()
            .unwrap_or_default();

        for handler in snapshot {
            handler(&event);
        }
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.handlers.borrow().get(&kind).map_or(0, Vec::len)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers = self.handlers.borrow();
        f.debug_struct("EventBus")
            .field("kinds", &handlers.len())
            .field(
                "handlers",
                &handlers.values().map(Vec::len).sum::<usize>(),
            )
            .finish()
    }
}

/// Collects every published event of the given kinds; handy for assertions.
#[cfg(test)]
pub(crate) fn record(bus: &EventBus, kinds: &[EventKind]) -> Rc<RefCell<Vec<GameEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    bus.subscribe_many(kinds, move |event| sink.borrow_mut().push(event.clone()));
    log
}

#[cfg(test)]
mod tests {
    use super::*;

    fn removed(id: &str) -> GameEvent {
        GameEvent::PlayerRemoved {
            player_id: id.to_string(),
        }
    }

    #[test]
    fn when_event_is_published_then_handlers_run_in_subscription_order() {
        let bus = EventBus::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for n in 0..3 {
            let order = order.clone();
            bus.subscribe(EventKind::PlayerRemoved, move |_| order.borrow_mut().push(n));
        }

        bus.publish(removed("a"));

        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn when_event_kind_has_no_subscribers_then_other_handlers_are_untouched() {
        let bus = EventBus::new();
        let log = record(&bus, &[EventKind::PlayerLanded]);

        bus.publish(removed("a"));

        assert!(log.borrow().is_empty());
    }

    #[test]
    fn when_handler_subscribes_during_dispatch_then_it_only_sees_later_events() {
        let bus = Rc::new(EventBus::new());
        let late_calls = Rc::new(RefCell::new(0));

        let bus_in_handler = Rc::downgrade(&bus);
        let late = late_calls.clone();
        bus.subscribe(EventKind::PlayerRemoved, move |_| {
            if let Some(bus) = bus_in_handler.upgrade() {
                let late = late.clone();
                bus.subscribe(EventKind::PlayerRemoved, move |_| *late.borrow_mut() += 1);
            }
        });

        bus.publish(removed("a"));
        assert_eq!(*late_calls.borrow(), 0);

        bus.publish(removed("b"));
        assert_eq!(*late_calls.borrow(), 1);
    }

    #[test]
    fn when_handler_publishes_reentrantly_then_nested_event_is_delivered_before_return() {
        let bus = Rc::new(EventBus::new());
        let log = record(&bus, &[EventKind::PlatformRemoved]);

        let weak = Rc::downgrade(&bus);
        bus.subscribe(EventKind::PlayerRemoved, move |_| {
            if let Some(bus) = weak.upgrade() {
                bus.publish(GameEvent::PlatformRemoved {
                    platform_id: "p".to_string(),
                });
            }
        });

        bus.publish(removed("a"));

        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn when_subscribing_to_many_kinds_then_each_kind_counts_the_handler() {
        let bus = EventBus::new();
        bus.subscribe_many(&[EventKind::PlayerLanded, EventKind::PlayerJumping], |_| {});

        assert_eq!(bus.subscriber_count(EventKind::PlayerLanded), 1);
        assert_eq!(bus.subscriber_count(EventKind::PlayerJumping), 1);
        assert_eq!(bus.subscriber_count(EventKind::PlayerStopped), 0);
    }
}
