use async_trait::async_trait;

use super::InvitationEvent;

/// Trait for handling invitation events asynchronously.
///
/// Listeners can do any async work: logging, pushing notifications to the
/// invited user, updating metrics.
///
/// # Example
///
/// ```rust,ignore
/// use rosterly::events::{InvitationEvent, Listener};
/// use async_trait::async_trait;
///
/// struct NotifyInvitee;
///
/// #[async_trait]
/// impl Listener for NotifyInvitee {
///     async fn handle(&self, event: &InvitationEvent) {
///         if let InvitationEvent::Created { invited_user, team, .. } = event {
///             // push "you were invited to {team}" to invited_user
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    /// Called for every dispatched event; match on the variant to filter.
    async fn handle(&self, event: &InvitationEvent);
}
