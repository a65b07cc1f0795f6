mod bus;
mod events;
mod handlers;

pub use bus::{EventBus, SubscriberId};
pub use events::{EditorEvent, HostEvent};
pub use handlers::{EventLog, EventRecorder};

pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &EditorEvent);
}
