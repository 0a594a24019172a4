use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

// ---------------------------------------------------------------------------
// AccountStatus
// ---------------------------------------------------------------------------

/// Lifecycle state of an organization account as reported by the backend.
///
/// Only `Active` accounts can reliably accept new role assumptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Active,
    Suspended,
    PendingClosure,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::Active => "ACTIVE",
            AccountStatus::Suspended => "SUSPENDED",
            AccountStatus::PendingClosure => "PENDING_CLOSURE",
        }
    }

    /// True when the account can be onboarded.
    pub fn is_serviceable(self) -> bool {
        matches!(self, AccountStatus::Active)
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = crate::error::OnboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(AccountStatus::Active),
            "SUSPENDED" => Ok(AccountStatus::Suspended),
            "PENDING_CLOSURE" => Ok(AccountStatus::PendingClosure),
            _ => Err(crate::error::OnboardError::UnknownStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// One member of a cloud organization.
///
/// Constructed fresh for each enumeration call and discarded after the
/// fan-out completes; the only in-memory mutation happens during interactive
/// selection (name edits and the `onboard` flag).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub arn: String,
    pub email: String,
    pub status: AccountStatus,
    /// Decision flag set during interactive selection; false means "skip".
    #[serde(default)]
    pub onboard: bool,
}

impl Account {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arn: impl Into<String>,
        email: impl Into<String>,
        status: AccountStatus,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arn: arn.into(),
            email: email.into(),
            status,
            onboard: false,
        }
    }

    /// Exact, case-sensitive match of an exclusion token against the
    /// account's id, name, arn, or email. No globbing or regex.
    pub fn matches(&self, token: &str) -> bool {
        token == self.id || token == self.name || token == self.arn || token == self.email
    }

    /// True when any token in `exclude` matches this account.
    pub fn is_excluded(&self, exclude: &HashSet<String>) -> bool {
        exclude.contains(&self.id)
            || exclude.contains(&self.name)
            || exclude.contains(&self.arn)
            || exclude.contains(&self.email)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
