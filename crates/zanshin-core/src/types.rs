use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// RunTarget
// ---------------------------------------------------------------------------

/// Which subset of the organization's accounts a fan-out run should visit.
///
/// `None` disables automatic enumeration: the caller supplies an explicit,
/// already-curated account list instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunTarget {
    All,
    Master,
    Members,
    None,
}

impl RunTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            RunTarget::All => "ALL",
            RunTarget::Master => "MASTER",
            RunTarget::Members => "MEMBERS",
            RunTarget::None => "NONE",
        }
    }

    /// True when the management account is in scope for this selector.
    pub fn includes_master(self) -> bool {
        matches!(self, RunTarget::All | RunTarget::Master)
    }

    /// True when member accounts are in scope for this selector.
    pub fn includes_members(self) -> bool {
        matches!(self, RunTarget::All | RunTarget::Members | RunTarget::None)
    }
}

impl fmt::Display for RunTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RunTarget {
    type Err = crate::error::OnboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ALL" => Ok(RunTarget::All),
            "MASTER" => Ok(RunTarget::Master),
            "MEMBERS" => Ok(RunTarget::Members),
            "NONE" => Ok(RunTarget::None),
            _ => Err(crate::error::OnboardError::UnknownTarget(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Branch
// ---------------------------------------------------------------------------

/// How an account was classified when the registration callback was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Branch {
    Master,
    Members,
}

impl Branch {
    pub fn as_str(self) -> &'static str {
        match self {
            Branch::Master => "MASTER",
            Branch::Members => "MEMBERS",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn run_target_roundtrip() {
        for target in [
            RunTarget::All,
            RunTarget::Master,
            RunTarget::Members,
            RunTarget::None,
        ] {
            let parsed = RunTarget::from_str(target.as_str()).unwrap();
            assert_eq!(target, parsed);
        }
    }

    #[test]
    fn run_target_parse_is_case_insensitive() {
        assert_eq!(RunTarget::from_str("all").unwrap(), RunTarget::All);
        assert_eq!(RunTarget::from_str("Members").unwrap(), RunTarget::Members);
        assert!(RunTarget::from_str("EVERYONE").is_err());
    }

    #[test]
    fn selector_scope() {
        assert!(RunTarget::All.includes_master());
        assert!(RunTarget::All.includes_members());
        assert!(RunTarget::Master.includes_master());
        assert!(!RunTarget::Master.includes_members());
        assert!(!RunTarget::Members.includes_master());
        assert!(RunTarget::Members.includes_members());
        assert!(!RunTarget::None.includes_master());
        assert!(RunTarget::None.includes_members());
    }
}
