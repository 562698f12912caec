#![allow(clippy::significant_drop_tightening)]

use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use super::repository::InvitationRepository;
use super::types::{
    CreateInvitation, Decision, InvitationId, InvitationStatus, TeamId, TeamInvitation, UserId,
};
use crate::clock::{Clock, SystemClock};
use crate::config::InvitationConfig;
use crate::InviteError;

/// In-process invitation store.
///
/// Records live in a map guarded by a single `RwLock`, with secondary indexes
/// on `(invited_user, status)`, `(team, status)` and expiry. Every mutation
/// takes the write lock, so status checks and updates are one atomic step.
/// Clones share the same underlying store.
#[derive(Clone)]
pub struct MemoryInvitationStore {
    inner: Arc<Inner>,
}

struct Inner {
    state: RwLock<State>,
    next_id: AtomicI64,
    clock: Arc<dyn Clock>,
    expiry: Duration,
}

#[derive(Default)]
struct State {
    records: HashMap<InvitationId, TeamInvitation>,
    by_user: HashMap<(UserId, InvitationStatus), BTreeSet<InvitationId>>,
    by_team: HashMap<(TeamId, InvitationStatus), BTreeSet<InvitationId>>,
    by_expiry: BTreeSet<(DateTime<Utc>, InvitationId)>,
}

impl State {
    fn insert(&mut self, invitation: TeamInvitation) {
        self.index_status(&invitation);
        self.by_expiry
            .insert((invitation.expires_at, invitation.id));
        self.records.insert(invitation.id, invitation);
    }

    fn remove(&mut self, id: InvitationId) -> Option<TeamInvitation> {
        let invitation = self.records.remove(&id)?;
        self.unindex_status(&invitation);
        self.by_expiry.remove(&(invitation.expires_at, id));
        Some(invitation)
    }

    fn set_status(
        &mut self,
        id: InvitationId,
        status: InvitationStatus,
        now: DateTime<Utc>,
    ) -> Option<TeamInvitation> {
        let mut invitation = self.records.remove(&id)?;
        self.unindex_status(&invitation);
        invitation.status = status;
        invitation.updated_at = now;
        self.index_status(&invitation);
        self.records.insert(id, invitation.clone());
        Some(invitation)
    }

    fn index_status(&mut self, invitation: &TeamInvitation) {
        self.by_user
            .entry((invitation.invited_user.clone(), invitation.status))
            .or_default()
            .insert(invitation.id);
        self.by_team
            .entry((invitation.team.clone(), invitation.status))
            .or_default()
            .insert(invitation.id);
    }

    fn unindex_status(&mut self, invitation: &TeamInvitation) {
        unindex(
            &mut self.by_user,
            &(invitation.invited_user.clone(), invitation.status),
            invitation.id,
        );
        unindex(
            &mut self.by_team,
            &(invitation.team.clone(), invitation.status),
            invitation.id,
        );
    }

    fn collect<K: Hash + Eq>(
        &self,
        index: &HashMap<(K, InvitationStatus), BTreeSet<InvitationId>>,
        key: &K,
        status: Option<InvitationStatus>,
        now: DateTime<Utc>,
    ) -> Vec<TeamInvitation>
    where
        K: Clone,
    {
        let statuses = match status {
            Some(s) => vec![s],
            None => InvitationStatus::ALL.to_vec(),
        };

        statuses
            .into_iter()
            .filter_map(|s| index.get(&(key.clone(), s)))
            .flatten()
            .filter_map(|id| self.records.get(id))
            .filter(|i| !i.is_expired_at(now))
            .cloned()
            .collect()
    }
}

fn unindex<K: Hash + Eq>(
    index: &mut HashMap<K, BTreeSet<InvitationId>>,
    key: &K,
    id: InvitationId,
) {
    if let Some(ids) = index.get_mut(key) {
        ids.remove(&id);
        if ids.is_empty() {
            index.remove(key);
        }
    }
}

impl MemoryInvitationStore {
    /// Store on the system clock with default configuration.
    pub fn new() -> Self {
        Self::with_clock(SystemClock, &InvitationConfig::default())
    }

    pub fn with_config(config: &InvitationConfig) -> Self {
        Self::with_clock(SystemClock, config)
    }

    /// Store reading time from `clock`, e.g. a [`ManualClock`](crate::ManualClock) in tests.
    pub fn with_clock(clock: impl Clock, config: &InvitationConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(State::default()),
                next_id: AtomicI64::new(1),
                clock: Arc::new(clock),
                expiry: config.expiry,
            }),
        }
    }

    /// Number of stored records, including expired ones not yet purged.
    pub fn len(&self) -> Result<usize, InviteError> {
        Ok(self.read()?.records.len())
    }

    pub fn is_empty(&self) -> Result<bool, InviteError> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, InviteError> {
        self.inner
            .state
            .read()
            .map_err(|_| InviteError::Internal("lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, InviteError> {
        self.inner
            .state
            .write()
            .map_err(|_| InviteError::Internal("lock poisoned".into()))
    }
}

impl Default for MemoryInvitationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InvitationRepository for MemoryInvitationStore {
    async fn create(&self, data: CreateInvitation) -> Result<TeamInvitation, InviteError> {
        data.validate()?;

        let mut state = self.write()?;
        let now = self.inner.clock.now();

        let duplicate = state
            .by_user
            .get(&(data.invited_user.clone(), InvitationStatus::Pending))
            .into_iter()
            .flatten()
            .filter_map(|id| state.records.get(id))
            .any(|i| i.team == data.team && !i.is_expired_at(now));
        if duplicate {
            return Err(InviteError::AlreadyPending);
        }

        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        let invitation = TeamInvitation {
            id,
            team: data.team,
            invited_user: data.invited_user,
            invited_by: data.invited_by,
            status: InvitationStatus::Pending,
            expires_at: now + self.inner.expiry,
            created_at: now,
            updated_at: now,
        };
        state.insert(invitation.clone());

        Ok(invitation)
    }

    async fn find_by_id(&self, id: InvitationId) -> Result<Option<TeamInvitation>, InviteError> {
        let state = self.read()?;
        Ok(state.records.get(&id).cloned())
    }

    async fn resolve(
        &self,
        id: InvitationId,
        decision: Decision,
    ) -> Result<TeamInvitation, InviteError> {
        let mut state = self.write()?;
        let now = self.inner.clock.now();

        let current = state.records.get(&id).ok_or(InviteError::NotFound)?;
        if !current.is_open_at(now) {
            return Err(InviteError::InvalidState {
                current: current.status,
                expired: current.is_expired_at(now),
            });
        }

        state
            .set_status(id, decision.into(), now)
            .ok_or(InviteError::NotFound)
    }

    async fn list_for_user(
        &self,
        user: &UserId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<TeamInvitation>, InviteError> {
        let state = self.read()?;
        let now = self.inner.clock.now();
        Ok(state.collect(&state.by_user, user, status, now))
    }

    async fn list_for_team(
        &self,
        team: &TeamId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<TeamInvitation>, InviteError> {
        let state = self.read()?;
        let now = self.inner.clock.now();
        Ok(state.collect(&state.by_team, team, status, now))
    }

    async fn delete(&self, id: InvitationId) -> Result<(), InviteError> {
        let mut state = self.write()?;
        state.remove(id).map(|_| ()).ok_or(InviteError::NotFound)
    }

    async fn purge_expired(&self) -> Result<u64, InviteError> {
        let mut state = self.write()?;
        let now = self.inner.clock.now();

        let expired: Vec<InvitationId> = state
            .by_expiry
            .range(..(now, InvitationId::MIN))
            .map(|(_, id)| *id)
            .collect();
        for id in &expired {
            state.remove(*id);
        }

        Ok(expired.len() as u64)
    }
}
