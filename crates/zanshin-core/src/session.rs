use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{OnboardError, Result};

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Temporary credentials scoped to one target account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    /// Set by the issuing authority; the fan-out performs no renewal.
    pub expires_at: Option<DateTime<Utc>>,
}

/// A credential context for cloud API calls.
///
/// The base session resolves credentials from the ambient provider chain
/// (optionally a named profile); a delegated session carries the static
/// temporary credentials minted for a single fan-out iteration and is never
/// reused across accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub profile: Option<String>,
    pub region: Option<String>,
    pub credentials: Option<SessionCredentials>,
}

impl Session {
    /// Base session backed by the ambient credential chain.
    pub fn from_profile(profile: Option<&str>, region: Option<&str>) -> Self {
        Self {
            profile: profile.map(str::to_string),
            region: region.map(str::to_string),
            credentials: None,
        }
    }

    /// Session wrapping freshly delegated credentials.
    pub fn delegated(credentials: SessionCredentials, region: Option<String>) -> Self {
        Self {
            profile: None,
            region,
            credentials: Some(credentials),
        }
    }

    pub fn is_delegated(&self) -> bool {
        self.credentials.is_some()
    }
}

// ---------------------------------------------------------------------------
// SessionBroker
// ---------------------------------------------------------------------------

/// Mints delegated sessions by assuming a named role in a target account.
///
/// Implementors hold the base session; each call is independent, and a
/// failure for one account must not poison sessions already minted for
/// others.
#[async_trait]
pub trait SessionBroker: Send + Sync {
    async fn delegate(&self, account_id: &str, role_name: &str) -> Result<Session>;
}

// ---------------------------------------------------------------------------
// Role name validation
// ---------------------------------------------------------------------------

pub const ROLE_NAME_MIN_LEN: usize = 2;
pub const ROLE_NAME_MAX_LEN: usize = 64;

/// Reject role ARNs (the broker builds the ARN itself) and names outside
/// the 2-64 character bound, before any network I/O happens. The bound
/// counts characters, not bytes.
pub fn validate_role_name(role_name: &str) -> Result<()> {
    let length = role_name.chars().count();
    if role_name.contains(':') || length < ROLE_NAME_MIN_LEN || length > ROLE_NAME_MAX_LEN {
        return Err(OnboardError::InvalidRoleName(role_name.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
