use std::cell::{Cell, RefCell};

use crate::event::{EditorEvent, EventHandler};

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Delivers the tool's [`EditorEvent`]s to every subscribed handler, in
/// subscription order.
pub struct EventBus {
    subscribers: RefCell<Vec<(SubscriberId, Box<dyn EventHandler>)>>,
    next_id: Cell<u64>,
    emitted: Cell<u64>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.borrow().len())
            .field("emitted", &self.emitted.get())
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
            emitted: Cell::new(0),
        }
    }

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) -> SubscriberId {
        let id = SubscriberId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscribers.borrow_mut().push((id, handler));
        id
    }

    /// Removes a handler. Returns false if it was not subscribed.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }

    pub fn emit(&self, event: EditorEvent) {
        log::trace!("Emitting {:?}", event);
        self.emitted.set(self.emitted.get() + 1);
        for (_, handler) in self.subscribers.borrow_mut().iter_mut() {
            handler.handle_event(&event);
        }
    }

    pub fn handler_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Number of events emitted so far, subscribed or not
    pub fn emitted(&self) -> u64 {
        self.emitted.get()
    }
}
