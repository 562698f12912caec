use async_trait::async_trait;

use crate::events::{InvitationEvent, Listener};

/// Writes every invitation event through the `log` facade.
///
/// ```rust,ignore
/// register_event_listeners(|registry| {
///     registry.listen(LoggingListener::with_level(log::Level::Debug));
/// });
/// ```
pub struct LoggingListener {
    level: log::Level,
}

impl LoggingListener {
    /// Logs at INFO.
    pub fn new() -> Self {
        Self {
            level: log::Level::Info,
        }
    }

    pub fn with_level(level: log::Level) -> Self {
        Self { level }
    }
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Listener for LoggingListener {
    async fn handle(&self, event: &InvitationEvent) {
        log::log!(
            target: "rosterly::events",
            self.level,
            "event={} at={} {:?}",
            event.name(),
            event.timestamp().to_rfc3339(),
            event
        );
    }
}
