use chrono::{DateTime, Utc};

use crate::invitations::{InvitationId, TeamId, UserId};

/// Lifecycle events emitted by invitation actions.
///
/// Events are always fired from actions. If no listeners are registered,
/// they are silently ignored (no-op). Register listeners via
/// [`register_event_listeners`](crate::register_event_listeners) to handle events.
#[derive(Debug, Clone)]
pub enum InvitationEvent {
    Created {
        invitation_id: InvitationId,
        team: TeamId,
        invited_user: UserId,
        invited_by: UserId,
        at: DateTime<Utc>,
    },
    Accepted {
        invitation_id: InvitationId,
        team: TeamId,
        invited_user: UserId,
        at: DateTime<Utc>,
    },
    Rejected {
        invitation_id: InvitationId,
        team: TeamId,
        invited_user: UserId,
        at: DateTime<Utc>,
    },
    /// A resolved invitation was deleted right after resolution.
    Removed {
        invitation_id: InvitationId,
        at: DateTime<Utc>,
    },
    Purged {
        count: u64,
        at: DateTime<Utc>,
    },
}

impl InvitationEvent {
    /// Returns a dot-separated event name for logging/tracing.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created { .. } => "invitation.created",
            Self::Accepted { .. } => "invitation.accepted",
            Self::Rejected { .. } => "invitation.rejected",
            Self::Removed { .. } => "invitation.removed",
            Self::Purged { .. } => "invitation.purged",
        }
    }

    /// Returns the timestamp when this event occurred.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Created { at, .. }
            | Self::Accepted { at, .. }
            | Self::Rejected { at, .. }
            | Self::Removed { at, .. }
            | Self::Purged { at, .. } => *at,
        }
    }
}
