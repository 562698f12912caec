//! Core types for team invitations.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::InviteError;

/// Store-assigned invitation identifier.
pub type InvitationId = i64;

/// Opaque key of a team owned by an external team directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(String);

/// Opaque key of a user owned by an external user directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

macro_rules! relation_key {
    ($name:ident) => {
        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True when the key is empty or whitespace only.
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

relation_key!(TeamId);
relation_key!(UserId);

/// Where an invitation sits in its lifecycle.
///
/// `Pending` is the only state that can transition; both resolutions are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl InvitationStatus {
    pub const ALL: [InvitationStatus; 3] = [Self::Pending, Self::Accepted, Self::Rejected];

    /// Convert to string for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Parse from database string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The invited user's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accepted,
    Rejected,
}

impl From<Decision> for InvitationStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Accepted => InvitationStatus::Accepted,
            Decision::Rejected => InvitationStatus::Rejected,
        }
    }
}

/// A request for a user to join a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInvitation {
    /// Unique identifier.
    pub id: InvitationId,
    /// The team being invited to.
    pub team: TeamId,
    /// The user being invited.
    pub invited_user: UserId,
    /// The user who sent the invitation.
    pub invited_by: UserId,
    pub status: InvitationStatus,
    /// Fixed at creation.
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeamInvitation {
    /// Check if the invitation has expired at `now`, whatever its status.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Pending and not yet expired.
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.status == InvitationStatus::Pending && !self.is_expired_at(now)
    }
}

/// Input for creating an invitation.
#[derive(Debug, Clone)]
pub struct CreateInvitation {
    pub team: TeamId,
    pub invited_user: UserId,
    pub invited_by: UserId,
}

impl CreateInvitation {
    pub fn new(
        team: impl Into<TeamId>,
        invited_user: impl Into<UserId>,
        invited_by: impl Into<UserId>,
    ) -> Self {
        Self {
            team: team.into(),
            invited_user: invited_user.into(),
            invited_by: invited_by.into(),
        }
    }

    /// Rejects blank identifiers, naming the first missing field.
    pub fn validate(&self) -> Result<(), InviteError> {
        if self.team.is_blank() {
            return Err(InviteError::Validation("team is required".to_owned()));
        }
        if self.invited_user.is_blank() {
            return Err(InviteError::Validation(
                "invited_user is required".to_owned(),
            ));
        }
        if self.invited_by.is_blank() {
            return Err(InviteError::Validation("invited_by is required".to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn invitation(status: InvitationStatus, expires_at: DateTime<Utc>) -> TeamInvitation {
        let now = Utc::now();
        TeamInvitation {
            id: 1,
            team: TeamId::new("t1"),
            invited_user: UserId::new("u1"),
            invited_by: UserId::new("u2"),
            status,
            expires_at,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_status_roundtrip() {
        for status in InvitationStatus::ALL {
            assert_eq!(InvitationStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(InvitationStatus::from_str("expired"), None);
        assert_eq!(InvitationStatus::from_str(""), None);
    }

    #[test]
    fn test_only_pending_is_open() {
        assert!(!InvitationStatus::Pending.is_terminal());
        assert!(InvitationStatus::Accepted.is_terminal());
        assert!(InvitationStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_decision_into_status() {
        assert_eq!(
            InvitationStatus::from(Decision::Accepted),
            InvitationStatus::Accepted
        );
        assert_eq!(
            InvitationStatus::from(Decision::Rejected),
            InvitationStatus::Rejected
        );
    }

    #[test]
    fn test_invitation_is_expired() {
        let now = Utc::now();
        let expired = invitation(InvitationStatus::Pending, now - Duration::hours(1));
        assert!(expired.is_expired_at(now));
        assert!(!expired.is_open_at(now));

        let valid = TeamInvitation {
            expires_at: now + Duration::hours(1),
            ..expired
        };
        assert!(!valid.is_expired_at(now));
        assert!(valid.is_open_at(now));
    }

    #[test]
    fn test_resolved_invitation_is_not_open() {
        let now = Utc::now();
        let accepted = invitation(InvitationStatus::Accepted, now + Duration::days(1));
        assert!(!accepted.is_open_at(now));
    }

    #[test]
    fn test_validate_blank_identifiers() {
        assert!(CreateInvitation::new("t1", "u1", "u2").validate().is_ok());

        let err = CreateInvitation::new("", "u1", "u2").validate().unwrap_err();
        assert_eq!(err, InviteError::Validation("team is required".to_owned()));

        let err = CreateInvitation::new("t1", "  ", "u2").validate().unwrap_err();
        assert_eq!(
            err,
            InviteError::Validation("invited_user is required".to_owned())
        );

        let err = CreateInvitation::new("t1", "u1", "").validate().unwrap_err();
        assert_eq!(
            err,
            InviteError::Validation("invited_by is required".to_owned())
        );
    }

    #[test]
    fn test_serialized_shape() {
        let now = Utc::now();
        let inv = invitation(InvitationStatus::Pending, now);
        let json = serde_json::to_value(&inv).unwrap();

        assert_eq!(json["team"], "t1");
        assert_eq!(json["invitedUser"], "u1");
        assert_eq!(json["invitedBy"], "u2");
        assert_eq!(json["status"], "pending");
        assert!(json.get("expiresAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }
}
