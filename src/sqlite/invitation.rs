//! `SQLite` implementation of [`InvitationRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::InviteError;
use crate::clock::{Clock, SystemClock};
use crate::config::InvitationConfig;
use crate::invitations::{
    CreateInvitation, Decision, InvitationId, InvitationRepository, InvitationStatus, TeamId,
    TeamInvitation, UserId,
};

/// `SQLite`-backed invitation store.
///
/// Lifecycle guarantees come from single conditional statements: creation is
/// an `INSERT … SELECT … WHERE NOT EXISTS`, resolution an
/// `UPDATE … WHERE status = 'pending'`. Two callers can never both win.
#[derive(Clone)]
pub struct SqliteInvitationStore {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
    expiry: Duration,
}

impl SqliteInvitationStore {
    /// Create a new store with the given connection pool and default configuration.
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_clock(pool, SystemClock, &InvitationConfig::default())
    }

    pub fn with_config(pool: SqlitePool, config: &InvitationConfig) -> Self {
        Self::with_clock(pool, SystemClock, config)
    }

    pub fn with_clock(pool: SqlitePool, clock: impl Clock, config: &InvitationConfig) -> Self {
        Self {
            pool,
            clock: Arc::new(clock),
            expiry: config.expiry,
        }
    }

    async fn list_by(
        &self,
        column: &'static str,
        key: &str,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<TeamInvitation>, InviteError> {
        let now = self.clock.now();

        let rows: Vec<InvitationRecord> = match status {
            Some(status) => {
                let sql = format!(
                    "SELECT {COLUMNS} FROM team_invitations \
                     WHERE {column} = ? AND status = ? AND expires_at >= ? \
                     ORDER BY created_at DESC, id DESC"
                );
                sqlx::query_as::<_, InvitationRecord>(&sql)
                    .bind(key)
                    .bind(status.as_str())
                    .bind(now)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let sql = format!(
                    "SELECT {COLUMNS} FROM team_invitations \
                     WHERE {column} = ? AND expires_at >= ? \
                     ORDER BY created_at DESC, id DESC"
                );
                sqlx::query_as::<_, InvitationRecord>(&sql)
                    .bind(key)
                    .bind(now)
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(|e| db_error("list_invitations", &e))?;

        rows.into_iter().map(TeamInvitation::try_from).collect()
    }
}

const COLUMNS: &str =
    "id, team_id, invited_user_id, invited_by, status, expires_at, created_at, updated_at";

#[derive(FromRow)]
struct InvitationRecord {
    id: i64,
    team_id: String,
    invited_user_id: String,
    invited_by: String,
    status: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<InvitationRecord> for TeamInvitation {
    type Error = InviteError;

    fn try_from(row: InvitationRecord) -> Result<Self, Self::Error> {
        let status = InvitationStatus::from_str(&row.status).ok_or_else(|| {
            InviteError::DatabaseError(format!("unknown invitation status '{}'", row.status))
        })?;

        Ok(TeamInvitation {
            id: row.id,
            team: TeamId::new(row.team_id),
            invited_user: UserId::new(row.invited_user_id),
            invited_by: UserId::new(row.invited_by),
            status,
            expires_at: row.expires_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn db_error(operation: &str, e: &sqlx::Error) -> InviteError {
    log::error!(target: "rosterly", "msg=\"database error\", operation=\"{operation}\", error=\"{e}\"");
    InviteError::DatabaseError(e.to_string())
}

#[async_trait]
impl InvitationRepository for SqliteInvitationStore {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn create(&self, data: CreateInvitation) -> Result<TeamInvitation, InviteError> {
        data.validate()?;

        let now = self.clock.now();
        let expires_at = now + self.expiry;

        let row: Option<InvitationRecord> = sqlx::query_as(
            r"
            INSERT INTO team_invitations
                (team_id, invited_user_id, invited_by, status, expires_at, created_at, updated_at)
            SELECT ?, ?, ?, 'pending', ?, ?, ?
            WHERE NOT EXISTS (
                SELECT 1 FROM team_invitations
                WHERE team_id = ? AND invited_user_id = ? AND status = 'pending' AND expires_at >= ?
            )
            RETURNING id, team_id, invited_user_id, invited_by, status, expires_at, created_at, updated_at
            ",
        )
        .bind(data.team.as_str())
        .bind(data.invited_user.as_str())
        .bind(data.invited_by.as_str())
        .bind(expires_at)
        .bind(now)
        .bind(now)
        .bind(data.team.as_str())
        .bind(data.invited_user.as_str())
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("create_invitation", &e))?;

        TeamInvitation::try_from(row.ok_or(InviteError::AlreadyPending)?)
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_by_id(&self, id: InvitationId) -> Result<Option<TeamInvitation>, InviteError> {
        let row: Option<InvitationRecord> = sqlx::query_as(
            "SELECT id, team_id, invited_user_id, invited_by, status, expires_at, created_at, updated_at FROM team_invitations WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find_invitation_by_id", &e))?;

        row.map(TeamInvitation::try_from).transpose()
    }

    /// Conditional `UPDATE`; when it matches no row the current row is read
    /// back to report why. A record deleted or purged between the two
    /// statements yields `NotFound`, not `InvalidState`.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn resolve(
        &self,
        id: InvitationId,
        decision: Decision,
    ) -> Result<TeamInvitation, InviteError> {
        let now = self.clock.now();
        let status = InvitationStatus::from(decision);

        let row: Option<InvitationRecord> = sqlx::query_as(
            r"
            UPDATE team_invitations SET status = ?, updated_at = ?
            WHERE id = ? AND status = 'pending' AND expires_at >= ?
            RETURNING id, team_id, invited_user_id, invited_by, status, expires_at, created_at, updated_at
            ",
        )
        .bind(status.as_str())
        .bind(now)
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("resolve_invitation", &e))?;

        if let Some(row) = row {
            return TeamInvitation::try_from(row);
        }

        let current = self.find_by_id(id).await?.ok_or(InviteError::NotFound)?;
        Err(InviteError::InvalidState {
            current: current.status,
            expired: current.is_expired_at(now),
        })
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn list_for_user(
        &self,
        user: &UserId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<TeamInvitation>, InviteError> {
        self.list_by("invited_user_id", user.as_str(), status).await
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn list_for_team(
        &self,
        team: &TeamId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<TeamInvitation>, InviteError> {
        self.list_by("team_id", team.as_str(), status).await
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn delete(&self, id: InvitationId) -> Result<(), InviteError> {
        let result = sqlx::query("DELETE FROM team_invitations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete_invitation", &e))?;

        if result.rows_affected() == 0 {
            return Err(InviteError::NotFound);
        }
        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn purge_expired(&self) -> Result<u64, InviteError> {
        let now = self.clock.now();

        let result = sqlx::query("DELETE FROM team_invitations WHERE expires_at < ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("purge_expired_invitations", &e))?;

        Ok(result.rows_affected())
    }
}
