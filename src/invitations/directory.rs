#![allow(clippy::significant_drop_tightening)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::types::{TeamId, UserId};
use crate::InviteError;

/// The team directory that owns teams and their members.
///
/// Invitations only hold [`TeamId`] / [`UserId`] keys; this trait is how the
/// actions check membership and enrol users once they accept.
#[async_trait]
pub trait TeamDirectory: Send + Sync {
    async fn team_exists(&self, team: &TeamId) -> Result<bool, InviteError>;
    async fn is_member(&self, team: &TeamId, user: &UserId) -> Result<bool, InviteError>;
    async fn add_member(&self, team: &TeamId, user: &UserId) -> Result<(), InviteError>;
}

/// In-process [`TeamDirectory`]. Clones share the same teams.
#[derive(Clone, Default)]
pub struct MemoryTeamDirectory {
    teams: Arc<RwLock<HashMap<TeamId, HashSet<UserId>>>>,
}

impl MemoryTeamDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a team with its initial members, replacing any previous roster.
    pub fn insert_team<I, U>(&self, team: impl Into<TeamId>, members: I) -> Result<(), InviteError>
    where
        I: IntoIterator<Item = U>,
        U: Into<UserId>,
    {
        let mut teams = self
            .teams
            .write()
            .map_err(|_| InviteError::Internal("lock poisoned".into()))?;
        teams.insert(team.into(), members.into_iter().map(Into::into).collect());
        Ok(())
    }
}

#[async_trait]
impl TeamDirectory for MemoryTeamDirectory {
    async fn team_exists(&self, team: &TeamId) -> Result<bool, InviteError> {
        let teams = self
            .teams
            .read()
            .map_err(|_| InviteError::Internal("lock poisoned".into()))?;
        Ok(teams.contains_key(team))
    }

    async fn is_member(&self, team: &TeamId, user: &UserId) -> Result<bool, InviteError> {
        let teams = self
            .teams
            .read()
            .map_err(|_| InviteError::Internal("lock poisoned".into()))?;
        Ok(teams.get(team).is_some_and(|members| members.contains(user)))
    }

    async fn add_member(&self, team: &TeamId, user: &UserId) -> Result<(), InviteError> {
        let mut teams = self
            .teams
            .write()
            .map_err(|_| InviteError::Internal("lock poisoned".into()))?;
        let members = teams.get_mut(team).ok_or(InviteError::TeamNotFound)?;
        members.insert(user.clone());
        Ok(())
    }
}
