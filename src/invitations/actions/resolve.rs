use crate::InviteError;
use crate::config::InvitationConfig;
use crate::events::{InvitationEvent, dispatch};
use crate::invitations::{
    Decision, InvitationId, InvitationRepository, TeamDirectory, TeamInvitation, UserId,
};

/// Action for the invited user to accept or reject an invitation.
///
/// This action:
/// 1. Loads the invitation
/// 2. Verifies the acting user is the invitee
/// 3. Moves it out of `pending` (exactly one concurrent caller wins)
/// 4. On acceptance, adds the user to the team
/// 5. Optionally deletes the resolved record
pub struct ResolveInvitationAction<D, R>
where
    D: TeamDirectory,
    R: InvitationRepository,
{
    directory: D,
    invitations: R,
    config: InvitationConfig,
}

impl<D: TeamDirectory, R: InvitationRepository> ResolveInvitationAction<D, R> {
    /// Creates a new `ResolveInvitationAction` with default configuration.
    pub fn new(directory: D, invitations: R) -> Self {
        Self::with_config(directory, invitations, InvitationConfig::default())
    }

    pub fn with_config(directory: D, invitations: R, config: InvitationConfig) -> Self {
        Self {
            directory,
            invitations,
            config,
        }
    }

    pub async fn accept(
        &self,
        id: InvitationId,
        acting_user: &UserId,
    ) -> Result<TeamInvitation, InviteError> {
        self.execute(id, acting_user, Decision::Accepted).await
    }

    pub async fn reject(
        &self,
        id: InvitationId,
        acting_user: &UserId,
    ) -> Result<TeamInvitation, InviteError> {
        self.execute(id, acting_user, Decision::Rejected).await
    }

    /// Applies `decision` on behalf of `acting_user`.
    ///
    /// # Returns
    ///
    /// - `Ok(invitation)` - the resolved invitation
    /// - `Err(InviteError::NotFound)` - no such invitation
    /// - `Err(InviteError::Forbidden)` - `acting_user` is not the invitee
    /// - `Err(InviteError::InvalidState { .. })` - already resolved or expired
    /// - `Err(_)` - directory or storage errors
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "resolve_invitation", skip(self, acting_user), err)
    )]
    pub async fn execute(
        &self,
        id: InvitationId,
        acting_user: &UserId,
        decision: Decision,
    ) -> Result<TeamInvitation, InviteError> {
        let invitation = self
            .invitations
            .find_by_id(id)
            .await?
            .ok_or(InviteError::NotFound)?;

        if invitation.invited_user != *acting_user {
            return Err(InviteError::Forbidden);
        }

        let resolved = self.invitations.resolve(id, decision).await?;

        if decision == Decision::Accepted {
            if let Err(e) = self
                .directory
                .add_member(&resolved.team, &resolved.invited_user)
                .await
            {
                log::error!(
                    target: "rosterly",
                    "msg=\"failed to add member after acceptance\", invitation_id={id}, team=\"{}\", error=\"{e}\"",
                    resolved.team
                );
                return Err(e);
            }
        }

        log::info!(
            target: "rosterly",
            "msg=\"invitation resolved\", invitation_id={id}, team=\"{}\", invited_user=\"{}\", status={}",
            resolved.team,
            resolved.invited_user,
            resolved.status
        );

        let event = match decision {
            Decision::Accepted => InvitationEvent::Accepted {
                invitation_id: id,
                team: resolved.team.clone(),
                invited_user: resolved.invited_user.clone(),
                at: resolved.updated_at,
            },
            Decision::Rejected => InvitationEvent::Rejected {
                invitation_id: id,
                team: resolved.team.clone(),
                invited_user: resolved.invited_user.clone(),
                at: resolved.updated_at,
            },
        };
        dispatch(event).await;

        if self.config.cleanup_on_resolve {
            self.cleanup(&resolved).await;
        }

        Ok(resolved)
    }

    // the resolution already succeeded, so cleanup failures are logged only
    async fn cleanup(&self, resolved: &TeamInvitation) {
        match self.invitations.delete(resolved.id).await {
            Ok(()) => {
                dispatch(InvitationEvent::Removed {
                    invitation_id: resolved.id,
                    at: resolved.updated_at,
                })
                .await;
            }
            // purged in the meantime
            Err(InviteError::NotFound) => {}
            Err(e) => {
                log::error!(
                    target: "rosterly",
                    "msg=\"failed to delete resolved invitation\", invitation_id={}, error=\"{e}\"",
                    resolved.id
                );
            }
        }
    }
}
