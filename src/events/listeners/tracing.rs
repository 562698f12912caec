use async_trait::async_trait;

use crate::events::{InvitationEvent, Listener};

/// Emits invitation events as `tracing` events.
///
/// Requires the `tracing` feature.
pub struct TracingListener;

#[async_trait]
impl Listener for TracingListener {
    async fn handle(&self, event: &InvitationEvent) {
        tracing::info!(
            target: "rosterly::events",
            event_name = event.name(),
            ?event,
            "invitation event"
        );
    }
}
