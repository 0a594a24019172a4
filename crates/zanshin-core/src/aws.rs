//! AWS-backed implementations of [`OrganizationApi`] and [`SessionBroker`],
//! built on the official SDK crates. Everything above this module talks to
//! the traits only.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_organizations::error::DisplayErrorContext;
use tracing::info;

use crate::account::Account;
use crate::error::{OnboardError, Result};
use crate::orgs::{AccountPage, OrganizationApi};
use crate::session::{Session, SessionBroker, SessionCredentials};

/// Session name stamped on every role assumption, so the delegated calls are
/// attributable in the target account's audit trail.
const ROLE_SESSION_NAME: &str = "zanshin-onboard";

/// Organization-management and delegation client bound to one base session.
pub struct AwsOrganization {
    organizations: aws_sdk_organizations::Client,
    sts: aws_sdk_sts::Client,
    region: Option<String>,
}

impl AwsOrganization {
    /// Resolve the base session into SDK clients. Credentials come from the
    /// session's static keys when present, otherwise the ambient provider
    /// chain (optionally a named profile).
    pub async fn connect(session: &Session) -> Self {
        let config = sdk_config(session).await;
        Self {
            organizations: aws_sdk_organizations::Client::new(&config),
            sts: aws_sdk_sts::Client::new(&config),
            region: session.region.clone(),
        }
    }
}

async fn sdk_config(session: &Session) -> aws_config::SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(profile) = &session.profile {
        loader = loader.profile_name(profile);
    }
    if let Some(region) = &session.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(credentials) = &session.credentials {
        loader = loader.credentials_provider(aws_sdk_sts::config::Credentials::new(
            credentials.access_key_id.clone(),
            credentials.secret_access_key.clone(),
            Some(credentials.session_token.clone()),
            None,
            "zanshin-delegated",
        ));
    }
    loader.load().await
}

#[async_trait]
impl OrganizationApi for AwsOrganization {
    async fn management_account_id(&self) -> Result<String> {
        let output = self
            .organizations
            .describe_organization()
            .send()
            .await
            .map_err(|e| OnboardError::Enumeration(format!("{}", DisplayErrorContext(e))))?;
        output
            .organization()
            .and_then(|org| org.master_account_id())
            .map(str::to_string)
            .ok_or_else(|| {
                OnboardError::Enumeration(
                    "DescribeOrganization returned no management account id".to_string(),
                )
            })
    }

    async fn list_accounts(&self, next_token: Option<&str>) -> Result<AccountPage> {
        let output = self
            .organizations
            .list_accounts()
            .set_next_token(next_token.map(str::to_string))
            .send()
            .await
            .map_err(|e| OnboardError::Enumeration(format!("{}", DisplayErrorContext(e))))?;

        let mut accounts = Vec::with_capacity(output.accounts().len());
        for raw in output.accounts() {
            accounts.push(convert_account(raw)?);
        }
        Ok(AccountPage {
            accounts,
            next_token: output.next_token().map(str::to_string),
        })
    }
}

#[async_trait]
impl SessionBroker for AwsOrganization {
    async fn delegate(&self, account_id: &str, role_name: &str) -> Result<Session> {
        let delegation_error = |message: String| OnboardError::Delegation {
            account_id: account_id.to_string(),
            message,
        };

        let identity = self
            .sts
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| delegation_error(format!("{}", DisplayErrorContext(e))))?;
        let arn = identity
            .arn()
            .ok_or_else(|| delegation_error("GetCallerIdentity returned no ARN".to_string()))?;
        let partition = partition_of(arn)
            .ok_or_else(|| delegation_error(format!("caller ARN '{arn}' has no partition")))?;

        let role_arn = format!("arn:{partition}:iam::{account_id}:role/{role_name}");
        let output = self
            .sts
            .assume_role()
            .role_arn(role_arn)
            .role_session_name(ROLE_SESSION_NAME)
            .send()
            .await
            .map_err(|e| delegation_error(format!("{}", DisplayErrorContext(e))))?;
        let credentials = output
            .credentials()
            .ok_or_else(|| delegation_error("AssumeRole returned no credentials".to_string()))?;

        info!(
            access_key_id = %credentials.access_key_id(),
            account_id,
            "obtained delegated credentials"
        );

        Ok(Session::delegated(
            SessionCredentials {
                access_key_id: credentials.access_key_id().to_string(),
                secret_access_key: credentials.secret_access_key().to_string(),
                session_token: credentials.session_token().to_string(),
                expires_at: chrono::DateTime::from_timestamp(
                    credentials.expiration().secs(),
                    credentials.expiration().subsec_nanos(),
                ),
            },
            self.region.clone(),
        ))
    }
}

/// Second colon-delimited field of an ARN, e.g. `aws` or `aws-cn`.
fn partition_of(arn: &str) -> Option<&str> {
    arn.split(':').nth(1).filter(|p| !p.is_empty())
}

/// Typed account record from a raw SDK entry. Malformed entries are rejected
/// here, at the response boundary, rather than downstream.
fn convert_account(raw: &aws_sdk_organizations::types::Account) -> Result<Account> {
    let status = raw
        .status()
        .ok_or(OnboardError::MalformedAccount("Status"))?
        .as_str()
        .parse()?;
    Ok(Account {
        id: required(raw.id(), "Id")?,
        name: required(raw.name(), "Name")?,
        arn: required(raw.arn(), "Arn")?,
        email: required(raw.email(), "Email")?,
        status,
        onboard: false,
    })
}

fn required(value: Option<&str>, field: &'static str) -> Result<String> {
    value
        .map(str::to_string)
        .ok_or(OnboardError::MalformedAccount(field))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountStatus;

    #[test]
    fn partition_comes_from_the_caller_arn() {
        assert_eq!(
            partition_of("arn:aws:sts::123456789012:assumed-role/x/y"),
            Some("aws")
        );
        assert_eq!(
            partition_of("arn:aws-cn:iam::123456789012:user/ops"),
            Some("aws-cn")
        );
        assert_eq!(partition_of("not-an-arn"), None);
        assert_eq!(partition_of("arn::iam::x"), None);
    }

    #[test]
    fn convert_account_maps_every_field() {
        let raw = aws_sdk_organizations::types::Account::builder()
            .id("123456789012")
            .name("prod")
            .arn("arn:aws:organizations::111111111111:account/o-test/123456789012")
            .email("prod@example.com")
            .status(aws_sdk_organizations::types::AccountStatus::Active)
            .build();
        let account = convert_account(&raw).unwrap();
        assert_eq!(account.id, "123456789012");
        assert_eq!(account.name, "prod");
        assert_eq!(account.email, "prod@example.com");
        assert_eq!(account.status, AccountStatus::Active);
        assert!(!account.onboard);
    }

    #[test]
    fn convert_account_rejects_missing_fields() {
        let raw = aws_sdk_organizations::types::Account::builder()
            .id("123456789012")
            .status(aws_sdk_organizations::types::AccountStatus::Active)
            .build();
        let err = convert_account(&raw).unwrap_err();
        assert!(matches!(err, OnboardError::MalformedAccount("Name")));
    }

    #[test]
    fn convert_account_rejects_missing_status() {
        let raw = aws_sdk_organizations::types::Account::builder()
            .id("123456789012")
            .name("prod")
            .arn("arn")
            .email("prod@example.com")
            .build();
        let err = convert_account(&raw).unwrap_err();
        assert!(matches!(err, OnboardError::MalformedAccount("Status")));
    }
}
