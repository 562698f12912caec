use crate::InviteError;
use crate::events::{InvitationEvent, dispatch};
use crate::invitations::{CreateInvitation, InvitationRepository, TeamDirectory, TeamInvitation};

/// Action to invite a user to a team.
///
/// This action:
/// 1. Validates the identifiers
/// 2. Validates the team exists
/// 3. Verifies the inviter is a member of the team
/// 4. Verifies the invitee is not already a member
/// 5. Creates the pending invitation
pub struct InviteToTeamAction<D, R>
where
    D: TeamDirectory,
    R: InvitationRepository,
{
    directory: D,
    invitations: R,
}

impl<D: TeamDirectory, R: InvitationRepository> InviteToTeamAction<D, R> {
    pub fn new(directory: D, invitations: R) -> Self {
        Self {
            directory,
            invitations,
        }
    }

    /// Creates an invitation for `input.invited_user` to join `input.team`.
    ///
    /// # Returns
    ///
    /// - `Ok(invitation)` - pending invitation
    /// - `Err(InviteError::Validation(_))` - an identifier is blank
    /// - `Err(InviteError::TeamNotFound)` - team does not exist
    /// - `Err(InviteError::Forbidden)` - inviter is not a team member
    /// - `Err(InviteError::AlreadyMember)` - invitee is already in the team
    /// - `Err(InviteError::AlreadyPending)` - invitee already has a live invitation
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "invite_to_team", skip_all, err)
    )]
    pub async fn execute(&self, input: CreateInvitation) -> Result<TeamInvitation, InviteError> {
        input.validate()?;

        if !self.directory.team_exists(&input.team).await? {
            return Err(InviteError::TeamNotFound);
        }

        if !self
            .directory
            .is_member(&input.team, &input.invited_by)
            .await?
        {
            return Err(InviteError::Forbidden);
        }

        if self
            .directory
            .is_member(&input.team, &input.invited_user)
            .await?
        {
            return Err(InviteError::AlreadyMember);
        }

        let invitation = self.invitations.create(input).await?;

        log::info!(
            target: "rosterly",
            "msg=\"invitation created\", invitation_id={}, team=\"{}\", invited_user=\"{}\", invited_by=\"{}\"",
            invitation.id,
            invitation.team,
            invitation.invited_user,
            invitation.invited_by
        );

        dispatch(InvitationEvent::Created {
            invitation_id: invitation.id,
            team: invitation.team.clone(),
            invited_user: invitation.invited_user.clone(),
            invited_by: invitation.invited_by.clone(),
            at: invitation.created_at,
        })
        .await;

        Ok(invitation)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::invitations::{
        InvitationStatus, MemoryInvitationStore, MemoryTeamDirectory, TeamId, UserId,
    };

    fn setup() -> (MemoryTeamDirectory, MemoryInvitationStore) {
        let directory = MemoryTeamDirectory::new();
        directory.insert_team("t1", ["captain"]).unwrap();
        (directory, MemoryInvitationStore::new())
    }

    #[tokio::test]
    async fn test_invite_success() {
        let (directory, store) = setup();
        let action = InviteToTeamAction::new(directory, store.clone());

        let invitation = action
            .execute(CreateInvitation::new("t1", "rookie", "captain"))
            .await
            .unwrap();

        assert_eq!(invitation.status, InvitationStatus::Pending);
        assert_eq!(invitation.invited_user, UserId::new("rookie"));
        assert_eq!(
            invitation.expires_at - invitation.created_at,
            Duration::days(7)
        );

        let listed = store
            .list_for_team(&TeamId::new("t1"), Some(InvitationStatus::Pending))
            .await
            .unwrap();
        assert_eq!(listed, vec![invitation]);
    }

    #[tokio::test]
    async fn test_invite_team_not_found() {
        let (directory, store) = setup();
        let action = InviteToTeamAction::new(directory, store);

        let result = action
            .execute(CreateInvitation::new("t404", "rookie", "captain"))
            .await;
        assert_eq!(result.unwrap_err(), InviteError::TeamNotFound);
    }

    #[tokio::test]
    async fn test_invite_not_member() {
        let (directory, store) = setup();
        let action = InviteToTeamAction::new(directory, store.clone());

        let result = action
            .execute(CreateInvitation::new("t1", "rookie", "stranger"))
            .await;
        assert_eq!(result.unwrap_err(), InviteError::Forbidden);
        assert!(store.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_invite_existing_member() {
        let (directory, store) = setup();
        directory.insert_team("t1", ["captain", "veteran"]).unwrap();
        let action = InviteToTeamAction::new(directory, store);

        let result = action
            .execute(CreateInvitation::new("t1", "veteran", "captain"))
            .await;
        assert_eq!(result.unwrap_err(), InviteError::AlreadyMember);
    }

    #[tokio::test]
    async fn test_invite_missing_identifier() {
        let (directory, store) = setup();
        let action = InviteToTeamAction::new(directory, store);

        let result = action
            .execute(CreateInvitation::new("t1", "", "captain"))
            .await;
        assert!(matches!(result, Err(InviteError::Validation(_))));
    }

    #[tokio::test]
    async fn test_invite_twice_is_rejected() {
        let (directory, store) = setup();
        let action = InviteToTeamAction::new(directory, store);

        action
            .execute(CreateInvitation::new("t1", "rookie", "captain"))
            .await
            .unwrap();
        let result = action
            .execute(CreateInvitation::new("t1", "rookie", "captain"))
            .await;
        assert_eq!(result.unwrap_err(), InviteError::AlreadyPending);
    }
}
