// Shared bookkeeping for controllers: model/view pairs, dirty flags and local identity.

use crate::use_cases::ports::EntityView;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// A model and the view presenting it, owned together by a controller.
pub struct Entry<M> {
    pub model: M,
    pub view: Box<dyn EntityView<M>>,
}

impl<M> Entry<M> {
    pub fn new(model: M, view: Box<dyn EntityView<M>>) -> Self {
        Self { model, view }
    }
}

/// Ids whose views need a refresh on the next render pass.
#[derive(Debug, Default)]
pub struct DirtySet {
    pub position: HashSet<String>,
    pub health: HashSet<String>,
}

impl DirtySet {
    pub fn forget(&mut self, id: &str) {
        self.position.remove(id);
        self.health.remove(id);
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_empty() && self.health.is_empty()
    }
}

pub type SharedDirty = Rc<RefCell<DirtySet>>;

/// Id of the player controlled on this client, shared with event handlers.
#[derive(Debug, Clone, Default)]
pub struct LocalIdentity(Rc<RefCell<Option<String>>>);

impl LocalIdentity {
    pub fn get(&self) -> Option<String> {
        self.0.borrow().clone()
    }

    pub fn set(&self, id: impl Into<String>) {
        *self.0.borrow_mut() = Some(id.into());
    }

    pub fn is(&self, id: &str) -> bool {
        self.0.borrow().as_deref() == Some(id)
    }
}
