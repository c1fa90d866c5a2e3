//! DOM events as seen by directive listeners.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The events directives listen to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Focus,
    Change,
    Blur,
}

impl EventKind {
    /// The DOM event type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Focus => "focus",
            Self::Change => "change",
            Self::Blur => "blur",
        }
    }
}

#[derive(Debug, Default)]
struct EventFlags {
    propagation_stopped: AtomicBool,
    default_prevented: AtomicBool,
}

/// A dispatched event.
///
/// Clones share the propagation and default-action flags, so an async
/// handler holding a clone observes the same event as the dispatcher.
#[derive(Debug, Clone)]
pub struct Event {
    kind: EventKind,
    flags: Arc<EventFlags>,
}

impl Event {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            flags: Arc::new(EventFlags::default()),
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Keep the event from reaching ancestor listeners.
    pub fn stop_propagation(&self) {
        self.flags.propagation_stopped.store(true, Ordering::SeqCst);
    }

    /// Cancel the browser's default action (link navigation, form submit).
    pub fn prevent_default(&self) {
        self.flags.default_prevented.store(true, Ordering::SeqCst);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.flags.propagation_stopped.load(Ordering::SeqCst)
    }

    pub fn is_default_prevented(&self) -> bool {
        self.flags.default_prevented.load(Ordering::SeqCst)
    }
}

/// A listener installed in one of an element's event slots.
pub type Listener = Arc<dyn Fn(&Event) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_flags() {
        let event = Event::new(EventKind::Click);
        let clone = event.clone();

        clone.stop_propagation();
        assert!(event.is_propagation_stopped());
        assert!(!event.is_default_prevented());

        event.prevent_default();
        assert!(clone.is_default_prevented());
    }

    #[test]
    fn kind_names_match_dom_types() {
        assert_eq!(EventKind::Click.as_str(), "click");
        assert_eq!(EventKind::Blur.as_str(), "blur");
    }
}
