//! The onboarding fan-out: walks an organization's accounts, classifies
//! each one as management or member, applies exclusion and state filters,
//! and invokes the registration callback once per qualifying account.
//!
//! Strictly sequential. Accounts are visited in enumeration order (or the
//! order of the explicit list); the management and member branches are
//! mutually exclusive per account, so nothing is double-processed.

use async_trait::async_trait;
use futures::{pin_mut, TryStreamExt};
use std::collections::HashSet;
use tracing::{error, info};

use crate::account::Account;
use crate::error::{OnboardError, Result};
use crate::orgs::{self, OrganizationApi};
use crate::session::{validate_role_name, Session, SessionBroker};
use crate::types::{Branch, RunTarget};

// ---------------------------------------------------------------------------
// RegisterTarget
// ---------------------------------------------------------------------------

/// The registration callback, invoked once per qualifying account.
///
/// The management account receives the base session unmodified; member
/// accounts receive a freshly delegated session owned by that single
/// invocation. Extra fixed parameters are bound by the caller when
/// constructing the implementor.
#[async_trait]
pub trait RegisterTarget: Send + Sync {
    async fn register(
        &self,
        branch: Branch,
        account_id: &str,
        account_name: &str,
        session: &Session,
    ) -> Result<()>;
}

// ---------------------------------------------------------------------------
// RunOptions / RunReport
// ---------------------------------------------------------------------------

/// Explicit configuration for one fan-out run. No process-wide state.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Bare role name assumed in each member account.
    pub role_name: String,
    pub target: RunTarget,
    /// Opaque tokens matched exactly against account id, name, arn or email.
    pub exclude: HashSet<String>,
    /// Keep going past a per-account delegation or registration failure,
    /// collecting it in the report. Off by default: the historical behavior
    /// is that the first failure aborts the remaining loop.
    pub continue_on_error: bool,
}

impl RunOptions {
    pub fn new(role_name: impl Into<String>, target: RunTarget) -> Self {
        Self {
            role_name: role_name.into(),
            target,
            exclude: HashSet::new(),
            continue_on_error: false,
        }
    }
}

/// What a completed run did. Failures are only collected when
/// `continue_on_error` is set; otherwise the first one is returned as `Err`.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Accounts for which the registration callback returned `Ok`.
    pub registered: usize,
    /// Accounts skipped by the exclusion or state filters, or with empty ids.
    pub skipped: usize,
    pub failures: Vec<AccountFailure>,
}

#[derive(Debug)]
pub struct AccountFailure {
    pub account_id: String,
    pub account_name: String,
    pub error: OnboardError,
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

/// Walk the organization and register every qualifying account.
///
/// Candidates come from `accounts` verbatim when given (the interactively
/// curated path), otherwise from the lazy enumerator. The orchestrator
/// performs no retries and no re-sorting; determinism across runs depends on
/// the backend's enumeration order.
pub async fn run<O, B, R>(
    orgs: &O,
    broker: &B,
    base: &Session,
    options: &RunOptions,
    accounts: Option<Vec<Account>>,
    registrar: &R,
) -> Result<RunReport>
where
    O: OrganizationApi + ?Sized,
    B: SessionBroker + ?Sized,
    R: RegisterTarget + ?Sized,
{
    validate_role_name(&options.role_name)?;
    let management_id = orgs.management_account_id().await?;

    let mut fanout = FanOut {
        broker,
        base,
        options,
        registrar,
        management_id,
        report: RunReport::default(),
    };

    match accounts {
        Some(list) => {
            for account in &list {
                fanout.visit(account).await?;
            }
        }
        None => {
            let stream = orgs::accounts(orgs);
            pin_mut!(stream);
            while let Some(account) = stream.try_next().await? {
                fanout.visit(&account).await?;
            }
        }
    }

    Ok(fanout.report)
}

struct FanOut<'a, B: ?Sized, R: ?Sized> {
    broker: &'a B,
    base: &'a Session,
    options: &'a RunOptions,
    registrar: &'a R,
    management_id: String,
    report: RunReport,
}

impl<B, R> FanOut<'_, B, R>
where
    B: SessionBroker + ?Sized,
    R: RegisterTarget + ?Sized,
{
    async fn visit(&mut self, account: &Account) -> Result<()> {
        if account.id.is_empty() {
            error!(name = %account.name, "skipping account record with empty id");
            self.report.skipped += 1;
            return Ok(());
        }
        if account.is_excluded(&self.options.exclude) {
            info!(
                account_id = %account.id,
                name = %account.name,
                "skipping excluded account"
            );
            self.report.skipped += 1;
            return Ok(());
        }
        if !account.status.is_serviceable() {
            info!(
                account_id = %account.id,
                name = %account.name,
                status = %account.status,
                "skipping account because of its state"
            );
            self.report.skipped += 1;
            return Ok(());
        }

        if account.id == self.management_id {
            if self.options.target.includes_master() {
                info!(account_id = %account.id, name = %account.name, "found management account");
                let outcome = self
                    .registrar
                    .register(Branch::Master, &self.management_id, &account.name, self.base)
                    .await;
                self.settle(account, outcome)?;
            }
        } else if self.options.target.includes_members() {
            info!(account_id = %account.id, name = %account.name, "found member account");
            let outcome = self.register_member(account).await;
            self.settle(account, outcome)?;
        }
        Ok(())
    }

    async fn register_member(&self, account: &Account) -> Result<()> {
        let session = self
            .broker
            .delegate(&account.id, &self.options.role_name)
            .await?;
        self.registrar
            .register(Branch::Members, &account.id, &account.name, &session)
            .await
    }

    fn settle(&mut self, account: &Account, outcome: Result<()>) -> Result<()> {
        match outcome {
            Ok(()) => {
                self.report.registered += 1;
                Ok(())
            }
            Err(err) if self.options.continue_on_error => {
                error!(
                    account_id = %account.id,
                    name = %account.name,
                    %err,
                    "account failed; continuing with the rest of the organization"
                );
                self.report.failures.push(AccountFailure {
                    account_id: account.id.clone(),
                    account_name: account.name.clone(),
                    error: err,
                });
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
