//! Team invitation lifecycle.
//!
//! `rosterly` stores invitations for users to join teams, enforces the
//! `pending -> accepted | rejected` state machine, and expires stale
//! invitations through an explicit purge.
//!
//! # Quick Start
//!
//! ```rust
//! use rosterly::{Decision, InvitationRepository, InvitationStatus, MemoryInvitationStore};
//! use rosterly::{CreateInvitation, TeamId, UserId};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), rosterly::InviteError> {
//! let store = MemoryInvitationStore::new();
//!
//! let invitation = store
//!     .create(CreateInvitation::new("team-1", "alice", "bob"))
//!     .await?;
//! assert_eq!(invitation.status, InvitationStatus::Pending);
//!
//! let resolved = store.resolve(invitation.id, Decision::Accepted).await?;
//! assert_eq!(resolved.status, InvitationStatus::Accepted);
//!
//! let pending = store
//!     .list_for_user(&UserId::new("alice"), Some(InvitationStatus::Pending))
//!     .await?;
//! assert!(pending.is_empty());
//! # let _ = TeamId::new("team-1");
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod config;
pub mod events;
pub mod invitations;
mod purge_task;
#[cfg(feature = "sqlx_sqlite")]
pub mod sqlite;

use std::fmt;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::InvitationConfig;
pub use events::{dispatch, register_event_listeners};
pub use invitations::{
    CreateInvitation, Decision, InvitationId, InvitationRepository, InvitationStatus,
    MemoryInvitationStore, MemoryTeamDirectory, TeamDirectory, TeamId, TeamInvitation, UserId,
};
pub use purge_task::{PurgeTaskHandle, spawn_purge_task, spawn_purge_task_with_clock};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InviteError {
    /// A required identifier was missing or blank.
    Validation(String),
    /// No invitation exists with the given id.
    NotFound,
    /// The invitation is no longer pending, or has expired.
    InvalidState {
        current: InvitationStatus,
        expired: bool,
    },
    /// A live pending invitation already exists for this team and user.
    AlreadyPending,
    TeamNotFound,
    Forbidden,
    AlreadyMember,
    Configuration(String),
    DatabaseError(String),
    Internal(String),
}

impl std::error::Error for InviteError {}

impl fmt::Display for InviteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InviteError::Validation(msg) => write!(f, "Validation failed: {msg}"),
            InviteError::NotFound => write!(f, "Invitation not found"),
            InviteError::InvalidState {
                current,
                expired: true,
            } => write!(f, "Invitation has expired (status: {current})"),
            InviteError::InvalidState {
                current,
                expired: false,
            } => write!(f, "Invitation is not pending (status: {current})"),
            InviteError::AlreadyPending => {
                write!(f, "A pending invitation already exists for this user and team")
            }
            InviteError::TeamNotFound => write!(f, "Team not found"),
            InviteError::Forbidden => write!(f, "Forbidden"),
            InviteError::AlreadyMember => write!(f, "User is already a member of this team"),
            InviteError::Configuration(msg) => write!(f, "Configuration error: {msg}"),
            InviteError::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            InviteError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}
