use std::sync::Arc;

use parking_lot::Mutex;

use crate::event::{EditorEvent, EventHandler};

/// Shared list of events captured by an [`EventRecorder`]
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<EditorEvent>>>,
    capacity: Option<usize>,
}

impl EventLog {
    pub fn events(&self) -> Vec<EditorEvent> {
        self.events.lock().clone()
    }

    pub fn last(&self) -> Option<EditorEvent> {
        self.events.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

/// Records emitted events into an [`EventLog`]
#[derive(Debug)]
pub struct EventRecorder {
    log: EventLog,
}

impl EventRecorder {
    /// Creates a recorder and the log it writes to
    pub fn new() -> (Self, EventLog) {
        Self::with_capacity(None)
    }

    /// Like `new`, but keeps only the most recent `capacity` events when set
    pub fn with_capacity(capacity: Option<usize>) -> (Self, EventLog) {
        let log = EventLog {
            events: Arc::default(),
            capacity,
        };
        (Self { log: log.clone() }, log)
    }
}

impl EventHandler for EventRecorder {
    fn handle_event(&mut self, event: &EditorEvent) {
        let mut events = self.log.events.lock();
        events.push(event.clone());
        if let Some(capacity) = self.log.capacity {
            let excess = events.len().saturating_sub(capacity);
            events.drain(..excess);
        }
    }
}
