//! Onboarding core for the Zanshin CLI.
//!
//! Walks a customer's AWS Organization, assumes a cross-account role in each
//! member account, and invokes a registration callback once per qualifying
//! account. The pieces compose left to right:
//!
//! ```text
//! OrganizationApi ──▶ accounts() stream ──▶ orgrun::run ──▶ RegisterTarget
//!                                              │
//!                                        SessionBroker (per member account)
//! ```
//!
//! The traits keep the AWS SDK at the edge ([`aws::AwsOrganization`]); the
//! orchestrator, filters, and the interactive selection helper are plain
//! logic over typed [`Account`] records.

pub mod account;
pub mod aws;
pub mod error;
pub mod orgrun;
pub mod orgs;
pub mod select;
pub mod session;
pub mod types;

pub use account::{Account, AccountStatus};
pub use aws::AwsOrganization;
pub use error::{OnboardError, Result};
pub use orgrun::{run, AccountFailure, RegisterTarget, RunOptions, RunReport};
pub use orgs::{accounts, collect_accounts, AccountPage, OrganizationApi};
pub use select::select_accounts;
pub use session::{validate_role_name, Session, SessionBroker, SessionCredentials};
pub use types::{Branch, RunTarget};
