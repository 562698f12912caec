use std::sync::OnceLock;

use super::{InvitationEvent, Listener};

static REGISTRY: OnceLock<EventRegistry> = OnceLock::new();

/// Listeners that receive every [`InvitationEvent`], in registration order.
///
/// Built once through [`register_event_listeners`] and frozen afterwards.
pub struct EventRegistry {
    listeners: Vec<Box<dyn Listener>>,
}

impl EventRegistry {
    fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Adds a listener. Chainable.
    pub fn listen(&mut self, listener: impl Listener) -> &mut Self {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    async fn dispatch(&self, event: &InvitationEvent) {
        for listener in &self.listeners {
            listener.handle(event).await;
        }
    }
}

/// Installs the process-wide listeners.
///
/// Call once during startup. Without it, events are dropped.
///
/// ```rust,ignore
/// use rosterly::register_event_listeners;
/// use rosterly::events::listeners::LoggingListener;
///
/// register_event_listeners(|registry| {
///     registry
///         .listen(LoggingListener::new())
///         .listen(NotifyInvitee);
/// });
/// ```
///
/// Only the first call takes effect; later calls log a warning.
pub fn register_event_listeners<F>(f: F)
where
    F: FnOnce(&mut EventRegistry),
{
    let mut registry = EventRegistry::new();
    f(&mut registry);
    if REGISTRY.set(registry).is_err() {
        log::warn!(
            target: "rosterly",
            "msg=\"event listeners already registered, ignoring\""
        );
    }
}

/// Whether [`register_event_listeners`] has installed at least one listener.
pub fn has_listeners() -> bool {
    REGISTRY.get().is_some_and(|r| !r.is_empty())
}

/// Sends `event` to every registered listener; no-op when none are installed.
pub async fn dispatch(event: InvitationEvent) {
    if let Some(registry) = REGISTRY.get() {
        registry.dispatch(&event).await;
    }
}
