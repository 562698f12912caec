//! Team invitations: types, storage and the actions built on them.
//!
//! # Traits
//!
//! | Trait | Description |
//! |-------|-------------|
//! | [`InvitationRepository`] | Invitation storage and lifecycle |
//! | [`TeamDirectory`] | External teams and their members |
//!
//! # Implementations
//!
//! - [`MemoryInvitationStore`]: in-process, indexed
//! - [`SqliteInvitationStore`](crate::sqlite::SqliteInvitationStore): `sqlx_sqlite` feature
//! - [`MemoryTeamDirectory`]: in-process team roster

mod actions;
mod directory;
mod memory;
mod repository;
mod types;

pub use actions::{InviteToTeamAction, PruneExpiredInvitationsAction, ResolveInvitationAction};
pub use directory::{MemoryTeamDirectory, TeamDirectory};
pub use memory::MemoryInvitationStore;
pub use repository::InvitationRepository;
pub use types::{
    CreateInvitation, Decision, InvitationId, InvitationStatus, TeamId, TeamInvitation, UserId,
};
