//! Removes expired invitations. Run periodically, either from your own
//! scheduler or through [`spawn_purge_task`](crate::spawn_purge_task).

use std::sync::Arc;

use crate::InviteError;
use crate::clock::{Clock, SystemClock};
use crate::events::{InvitationEvent, dispatch};
use crate::invitations::InvitationRepository;

pub struct PruneExpiredInvitationsAction<R> {
    invitations: R,
    clock: Arc<dyn Clock>,
}

impl<R: InvitationRepository> PruneExpiredInvitationsAction<R> {
    pub fn new(invitations: R) -> Self {
        Self::with_clock(invitations, SystemClock)
    }

    /// Stamps the `Purged` event from `clock`. Pass the clock the store reads.
    pub fn with_clock(invitations: R, clock: impl Clock) -> Self {
        Self {
            invitations,
            clock: Arc::new(clock),
        }
    }

    /// Deletes every invitation past its expiry, whatever its status.
    ///
    /// Returns the number of invitations removed.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip(self), name = "prune_expired_invitations", err)
    )]
    pub async fn execute(&self) -> Result<u64, InviteError> {
        let at = self.clock.now();
        let count = self.invitations.purge_expired().await?;

        log::info!(
            target: "rosterly",
            "msg=\"invitations pruned\", count={count}"
        );

        dispatch(InvitationEvent::Purged { count, at }).await;

        Ok(count)
    }
}
