use crate::domain::{Platform, Player, Projectile};
use crate::use_cases::ports::{EntityView, OutboundSink, ViewFactory};
use crate::use_cases::types::SyncMessage;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ViewCall {
    Position { id: String, x: f32, y: f32 },
    Health { id: String, health: i32 },
    Removed { id: String },
}

type CallLog = Rc<RefCell<Vec<ViewCall>>>;

/// View factory whose views append every refresh to a shared log.
#[derive(Clone, Default)]
pub(crate) struct RecordingViews {
    log: CallLog,
    pub(crate) local_flags: Rc<RefCell<Vec<(String, bool)>>>,
}

impl RecordingViews {
    pub(crate) fn calls(&self) -> Vec<ViewCall> {
        self.log.borrow().clone()
    }

    pub(crate) fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

struct RecordingView {
    id: String,
    log: CallLog,
}

impl RecordingView {
    fn boxed(id: &str, log: &CallLog) -> Box<Self> {
        Box::new(Self {
            id: id.to_string(),
            log: log.clone(),
        })
    }

    fn push(&self, call: ViewCall) {
        self.log.borrow_mut().push(call);
    }
}

impl EntityView<Player> for RecordingView {
    fn update_position(&mut self, model: &Player) {
        self.push(ViewCall::Position {
            id: self.id.clone(),
            x: model.x,
            y: model.y,
        });
    }

    fn update_health(&mut self, model: &Player) {
        self.push(ViewCall::Health {
            id: self.id.clone(),
            health: model.health,
        });
    }

    fn remove(&mut self) {
        self.push(ViewCall::Removed { id: self.id.clone() });
    }
}

impl EntityView<Projectile> for RecordingView {
    fn update_position(&mut self, model: &Projectile) {
        self.push(ViewCall::Position {
            id: self.id.clone(),
            x: model.x,
            y: model.y,
        });
    }

    fn remove(&mut self) {
        self.push(ViewCall::Removed { id: self.id.clone() });
    }
}

impl EntityView<Platform> for RecordingView {
    fn update_position(&mut self, model: &Platform) {
        self.push(ViewCall::Position {
            id: self.id.clone(),
            x: model.x,
            y: model.y,
        });
    }

    fn remove(&mut self) {
        self.push(ViewCall::Removed { id: self.id.clone() });
    }
}

impl ViewFactory for RecordingViews {
    fn player_view(&mut self, player: &Player, is_local: bool) -> Box<dyn EntityView<Player>> {
        self.local_flags
            .borrow_mut()
            .push((player.id.clone(), is_local));
        RecordingView::boxed(&player.id, &self.log)
    }

    fn projectile_view(&mut self, projectile: &Projectile) -> Box<dyn EntityView<Projectile>> {
        RecordingView::boxed(&projectile.id, &self.log)
    }

    fn platform_view(&mut self, platform: &Platform) -> Box<dyn EntityView<Platform>> {
        RecordingView::boxed(&platform.id, &self.log)
    }
}

/// Outbound sink that keeps every message it was asked to send.
#[derive(Default)]
pub(crate) struct RecordingSink {
    sent: RefCell<Vec<SyncMessage>>,
}

impl RecordingSink {
    pub(crate) fn sent(&self) -> Vec<SyncMessage> {
        self.sent.borrow().clone()
    }
}

impl OutboundSink for RecordingSink {
    fn send(&self, message: SyncMessage) {
        self.sent.borrow_mut().push(message);
    }
}
