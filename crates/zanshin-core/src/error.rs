use thiserror::Error;

#[derive(Debug, Error)]
pub enum OnboardError {
    #[error("failed to enumerate organization accounts: {0}")]
    Enumeration(String),

    #[error("account record from the organizations backend is missing field '{0}'")]
    MalformedAccount(&'static str),

    #[error("unknown account status: {0}")]
    UnknownStatus(String),

    #[error("unknown target selector '{0}': expected ALL, MASTER, MEMBERS or NONE")]
    UnknownTarget(String),

    #[error("invalid role name '{0}': expected a bare role name of 2-64 characters, not an ARN")]
    InvalidRoleName(String),

    #[error("an exclusion list requires a target selector (ALL, MASTER or MEMBERS)")]
    ExclusionsWithoutSelector,

    #[error("failed to assume role in account {account_id}: {message}")]
    Delegation { account_id: String, message: String },

    #[error("registration failed for account {account_id} ({account_name}): {message}")]
    Registration {
        account_id: String,
        account_name: String,
        message: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OnboardError>;
