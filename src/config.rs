//! Configuration for invitation stores and actions.
//!
//! # Example
//!
//! ```rust
//! use rosterly::config::InvitationConfig;
//! use chrono::Duration;
//!
//! // Use defaults
//! let config = InvitationConfig::default();
//! assert_eq!(config.expiry, Duration::days(7));
//!
//! // Or customize
//! let config = InvitationConfig {
//!     expiry: Duration::days(14),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use chrono::Duration;

use crate::InviteError;

/// Settings shared by the invitation stores, actions and purge task.
///
/// Use `InvitationConfig::default()` for production defaults.
#[derive(Debug, Clone)]
pub struct InvitationConfig {
    /// How long a new invitation stays valid.
    ///
    /// Default: 7 days
    pub expiry: Duration,

    /// How often the background purge task sweeps expired invitations.
    ///
    /// Default: 1 hour
    pub purge_interval: std::time::Duration,

    /// Delete an invitation as soon as it has been accepted or rejected,
    /// instead of leaving it for the purge.
    ///
    /// Default: false
    pub cleanup_on_resolve: bool,
}

impl Default for InvitationConfig {
    fn default() -> Self {
        Self {
            expiry: Duration::days(7),
            purge_interval: std::time::Duration::from_secs(60 * 60),
            cleanup_on_resolve: false,
        }
    }
}

impl InvitationConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sweeps every minute so expired invitations disappear quickly while
    /// developing.
    pub fn development() -> Self {
        Self {
            purge_interval: std::time::Duration::from_secs(60),
            ..Self::default()
        }
    }

    /// Shorter-lived invitations that are removed once resolved.
    pub fn strict() -> Self {
        Self {
            expiry: Duration::days(2),
            purge_interval: std::time::Duration::from_secs(15 * 60),
            cleanup_on_resolve: true,
        }
    }

    /// Checks that the expiry is positive and the purge interval non-zero.
    pub fn validate(&self) -> Result<(), InviteError> {
        if self.expiry <= Duration::zero() {
            return Err(InviteError::Configuration(
                "expiry must be positive".to_owned(),
            ));
        }
        if self.purge_interval.is_zero() {
            return Err(InviteError::Configuration(
                "purge_interval must be non-zero".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InvitationConfig::default();

        assert_eq!(config.expiry, Duration::days(7));
        assert_eq!(config.purge_interval, std::time::Duration::from_secs(3600));
        assert!(!config.cleanup_on_resolve);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_strict_config() {
        let config = InvitationConfig::strict();

        assert_eq!(config.expiry, Duration::days(2));
        assert!(config.cleanup_on_resolve);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_development_config() {
        let config = InvitationConfig::development();

        assert_eq!(config.purge_interval, std::time::Duration::from_secs(60));
        assert_eq!(config.expiry, Duration::days(7));
    }

    #[test]
    fn test_validate_rejects_non_positive_expiry() {
        let config = InvitationConfig {
            expiry: Duration::zero(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(InviteError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = InvitationConfig {
            purge_interval: std::time::Duration::ZERO,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(InviteError::Configuration(_))
        ));
    }
}
