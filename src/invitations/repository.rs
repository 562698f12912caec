use std::sync::Arc;

use async_trait::async_trait;

use super::types::{
    CreateInvitation, Decision, InvitationId, InvitationStatus, TeamId, TeamInvitation, UserId,
};
use crate::InviteError;

/// Storage for invitation records and their lifecycle.
///
/// Implementations must make `create` (including its duplicate check) and
/// `resolve` atomic per record, and must serialize `purge_expired` with both.
#[async_trait]
pub trait InvitationRepository: Send + Sync {
    /// Creates a pending invitation expiring after the configured window.
    ///
    /// - `Err(InviteError::Validation(_))` - an identifier is blank
    /// - `Err(InviteError::AlreadyPending)` - a live pending invitation exists
    ///   for the same team and user
    async fn create(&self, data: CreateInvitation) -> Result<TeamInvitation, InviteError>;

    /// Looks up an invitation, including expired ones not yet purged.
    async fn find_by_id(&self, id: InvitationId) -> Result<Option<TeamInvitation>, InviteError>;

    /// Moves a pending invitation to `decision`.
    ///
    /// - `Err(InviteError::NotFound)` - no such invitation, including one
    ///   deleted or purged while this call was in flight
    /// - `Err(InviteError::InvalidState { .. })` - already resolved or expired
    async fn resolve(
        &self,
        id: InvitationId,
        decision: Decision,
    ) -> Result<TeamInvitation, InviteError>;

    /// Unexpired invitations addressed to `user`, optionally filtered by status.
    async fn list_for_user(
        &self,
        user: &UserId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<TeamInvitation>, InviteError>;

    /// Unexpired invitations for `team`, optionally filtered by status.
    async fn list_for_team(
        &self,
        team: &TeamId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<TeamInvitation>, InviteError>;

    /// Removes an invitation. `Err(InviteError::NotFound)` if it does not exist.
    async fn delete(&self, id: InvitationId) -> Result<(), InviteError>;

    /// Removes every invitation whose expiry has passed, whatever its status.
    /// Returns the number removed.
    async fn purge_expired(&self) -> Result<u64, InviteError>;
}

#[async_trait]
impl<T> InvitationRepository for Arc<T>
where
    T: InvitationRepository + ?Sized,
{
    async fn create(&self, data: CreateInvitation) -> Result<TeamInvitation, InviteError> {
        (**self).create(data).await
    }

    async fn find_by_id(&self, id: InvitationId) -> Result<Option<TeamInvitation>, InviteError> {
        (**self).find_by_id(id).await
    }

    async fn resolve(
        &self,
        id: InvitationId,
        decision: Decision,
    ) -> Result<TeamInvitation, InviteError> {
        (**self).resolve(id, decision).await
    }

    async fn list_for_user(
        &self,
        user: &UserId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<TeamInvitation>, InviteError> {
        (**self).list_for_user(user, status).await
    }

    async fn list_for_team(
        &self,
        team: &TeamId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<TeamInvitation>, InviteError> {
        (**self).list_for_team(team, status).await
    }

    async fn delete(&self, id: InvitationId) -> Result<(), InviteError> {
        (**self).delete(id).await
    }

    async fn purge_expired(&self) -> Result<u64, InviteError> {
        (**self).purge_expired().await
    }
}
