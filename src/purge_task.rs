//! Background sweep that purges expired invitations on an interval.

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

use crate::InviteError;
use crate::clock::{Clock, SystemClock};
use crate::config::InvitationConfig;
use crate::invitations::{InvitationRepository, PruneExpiredInvitationsAction};

/// Handle to a running purge task. The task stops when the handle is dropped.
pub struct PurgeTaskHandle {
    handle: JoinHandle<()>,
}

impl PurgeTaskHandle {
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PurgeTaskHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawns a task on the current tokio runtime that calls
/// [`InvitationRepository::purge_expired`] every `config.purge_interval`.
///
/// The first sweep runs one interval after spawning. Failures are logged and
/// the task keeps ticking.
///
/// - `Err(InviteError::Configuration(_))` - invalid `config`
pub fn spawn_purge_task<R>(
    invitations: R,
    config: &InvitationConfig,
) -> Result<PurgeTaskHandle, InviteError>
where
    R: InvitationRepository + 'static,
{
    spawn_purge_task_with_clock(invitations, SystemClock, config)
}

/// Like [`spawn_purge_task`], with `Purged` events stamped from `clock`.
pub fn spawn_purge_task_with_clock<R>(
    invitations: R,
    clock: impl Clock,
    config: &InvitationConfig,
) -> Result<PurgeTaskHandle, InviteError>
where
    R: InvitationRepository + 'static,
{
    config.validate()?;
    let every = config.purge_interval;
    let action = PruneExpiredInvitationsAction::with_clock(invitations, clock);

    let handle = tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // skip the immediate first tick
        ticker.tick().await;

        loop {
            ticker.tick().await;

            match action.execute().await {
                Ok(count) => {
                    log::debug!(target: "rosterly", "msg=\"purge sweep finished\", removed={count}");
                }
                Err(e) => {
                    log::error!(target: "rosterly", "msg=\"purge sweep failed\", error=\"{e}\"");
                }
            }
        }
    });

    log::info!(
        target: "rosterly",
        "msg=\"purge task started\", interval_secs={}",
        every.as_secs()
    );

    Ok(PurgeTaskHandle { handle })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invitations::MemoryInvitationStore;

    #[tokio::test]
    async fn test_rejects_zero_interval() {
        let config = InvitationConfig {
            purge_interval: std::time::Duration::ZERO,
            ..Default::default()
        };
        let result = spawn_purge_task(MemoryInvitationStore::new(), &config);
        assert!(matches!(result, Err(InviteError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_abort_stops_task() {
        let handle =
            spawn_purge_task(MemoryInvitationStore::new(), &InvitationConfig::default()).unwrap();
        assert!(!handle.is_finished());

        handle.abort();
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        assert!(handle.is_finished());
    }
}
