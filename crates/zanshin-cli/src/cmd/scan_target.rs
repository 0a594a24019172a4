use std::collections::HashSet;
use std::io::IsTerminal;

use anyhow::{bail, Context};
use async_trait::async_trait;
use clap::Subcommand;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use zanshin_core::{
    collect_accounts, select_accounts, validate_role_name, Account, AwsOrganization, Branch,
    OnboardError, RegisterTarget, RunOptions, RunReport, RunTarget, Session,
};

use crate::api::{NewScanTarget, ZanshinClient, DAILY_SCHEDULE};
use crate::config;
use crate::output::print_json;

#[derive(Subcommand)]
pub enum ScanTargetSubcommand {
    /// List the scan targets of an organization
    List {
        /// UUID of the organization
        organization_id: Uuid,
    },

    /// Create a new scan target in an organization
    Create {
        /// UUID of the organization
        organization_id: Uuid,
        /// Kind of the scan target (e.g. AWS)
        kind: String,
        /// Name of the scan target
        name: String,
        /// Credential of the scan target (for AWS: the account id)
        credential: String,
        /// Scan schedule as JSON
        #[arg(default_value = DAILY_SCHEDULE)]
        schedule: String,
    },

    /// Onboard accounts of an AWS Organization as scan targets
    ///
    /// Walks the AWS Organization reachable from the base credentials,
    /// assumes the given role in each member account, and creates one scan
    /// target per selected account. Without --target-accounts, the accounts
    /// not yet present in the organization are offered interactively.
    OnboardAwsOrganization {
        /// AWS region used for the delegated sessions
        region: String,
        /// UUID of the organization
        organization_id: Uuid,
        /// Scan schedule as JSON
        #[arg(default_value = DAILY_SCHEDULE)]
        schedule: String,

        /// Which accounts to onboard: ALL, MASTER, MEMBERS or NONE
        #[arg(long, value_parser = parse_run_target)]
        target_accounts: Option<RunTarget>,

        /// Id, name, e-mail or ARN of an account not to be onboarded (repeatable)
        #[arg(long = "exclude-account")]
        exclude_accounts: Vec<String>,

        /// AWS profile for the base session
        #[arg(long)]
        aws_profile: Option<String>,

        /// Role that allows access from the management account to members
        #[arg(long, default_value = "OrganizationAccountAccessRole")]
        aws_role_name: String,

        /// Keep going when one account fails, reporting the failures at the end
        #[arg(long)]
        continue_on_error: bool,
    },
}

fn parse_run_target(s: &str) -> Result<RunTarget, String> {
    s.parse().map_err(|e: OnboardError| e.to_string())
}

pub async fn run(profile: &str, subcmd: ScanTargetSubcommand) -> anyhow::Result<()> {
    match subcmd {
        ScanTargetSubcommand::List { organization_id } => list(profile, &organization_id).await,
        ScanTargetSubcommand::Create {
            organization_id,
            kind,
            name,
            credential,
            schedule,
        } => create(profile, &organization_id, &kind, &name, &credential, &schedule).await,
        ScanTargetSubcommand::OnboardAwsOrganization {
            region,
            organization_id,
            schedule,
            target_accounts,
            exclude_accounts,
            aws_profile,
            aws_role_name,
            continue_on_error,
        } => {
            onboard_aws_organization(OnboardArgs {
                profile,
                region,
                organization_id,
                schedule,
                target_accounts,
                exclude_accounts,
                aws_profile,
                aws_role_name,
                continue_on_error,
            })
            .await
        }
    }
}

async fn list(profile: &str, organization_id: &Uuid) -> anyhow::Result<()> {
    let settings = config::load(profile)?;
    let client = ZanshinClient::new(&settings)?;
    print_json(&client.scan_targets(organization_id).await?)
}

async fn create(
    profile: &str,
    organization_id: &Uuid,
    kind: &str,
    name: &str,
    credential: &str,
    schedule: &str,
) -> anyhow::Result<()> {
    let schedule: Value = serde_json::from_str(schedule).context("invalid schedule JSON")?;
    let settings = config::load(profile)?;
    let client = ZanshinClient::new(&settings)?;
    let created = client
        .create_scan_target(
            organization_id,
            &NewScanTarget {
                name: name.to_string(),
                kind: kind.to_string(),
                credential: serde_json::json!({ "account": credential }),
                schedule,
            },
        )
        .await?;
    print_json(&created)
}

struct OnboardArgs<'a> {
    profile: &'a str,
    region: String,
    organization_id: Uuid,
    schedule: String,
    target_accounts: Option<RunTarget>,
    exclude_accounts: Vec<String>,
    aws_profile: Option<String>,
    aws_role_name: String,
    continue_on_error: bool,
}

async fn onboard_aws_organization(args: OnboardArgs<'_>) -> anyhow::Result<()> {
    // Argument-level validation happens before any network I/O.
    validate_role_name(&args.aws_role_name)?;
    if args.target_accounts.is_none() && !args.exclude_accounts.is_empty() {
        return Err(OnboardError::ExclusionsWithoutSelector.into());
    }
    let schedule: Value = serde_json::from_str(&args.schedule).context("invalid schedule JSON")?;

    let settings = config::load(args.profile)?;
    let client = ZanshinClient::new(&settings)?;

    // Accounts already registered as AWS scan targets are never re-onboarded.
    println!("Looking for existing AWS scan targets");
    let existing: HashSet<String> = client
        .scan_targets(&args.organization_id)
        .await?
        .iter()
        .filter(|st| st["kind"] == "AWS")
        .filter_map(|st| st["credential"]["account"].as_str())
        .map(str::to_string)
        .collect();

    let mut exclude: HashSet<String> = args.exclude_accounts.iter().cloned().collect();
    exclude.extend(existing.iter().cloned());

    let base = Session::from_profile(args.aws_profile.as_deref(), Some(&args.region));
    let cloud = AwsOrganization::connect(&base).await;
    let registrar = ZanshinRegistrar {
        client: &client,
        organization_id: args.organization_id,
        schedule,
    };

    let report = match args.target_accounts {
        Some(target) => {
            let options = RunOptions {
                role_name: args.aws_role_name,
                target,
                exclude,
                continue_on_error: args.continue_on_error,
            };
            zanshin_core::run(&cloud, &cloud, &base, &options, None, &registrar).await?
        }
        None => {
            if !std::io::stdin().is_terminal() {
                bail!(
                    "interactive account selection needs a terminal; \
                     pass --target-accounts for scripted use"
                );
            }
            println!("Detecting AWS accounts already in the organization");
            let candidates: Vec<Account> = collect_accounts(&cloud)
                .await?
                .into_iter()
                .filter(|account| !existing.contains(&account.id))
                .collect();

            let selected = {
                let stdin = std::io::stdin();
                let stdout = std::io::stdout();
                select_accounts(candidates, stdin.lock(), stdout.lock())?
            };
            println!("{} account(s) marked to onboard", selected.len());
            if selected.is_empty() {
                return Ok(());
            }

            let options = RunOptions {
                role_name: args.aws_role_name,
                target: RunTarget::None,
                exclude,
                continue_on_error: args.continue_on_error,
            };
            zanshin_core::run(&cloud, &cloud, &base, &options, Some(selected), &registrar).await?
        }
    };

    summarize(&report)
}

fn summarize(report: &RunReport) -> anyhow::Result<()> {
    println!(
        "Onboarded {} account(s), skipped {}.",
        report.registered, report.skipped
    );
    if report.failures.is_empty() {
        return Ok(());
    }
    for failure in &report.failures {
        eprintln!(
            "failed: {} ({}): {}",
            failure.account_id, failure.account_name, failure.error
        );
    }
    bail!("{} account(s) failed to onboard", report.failures.len());
}

/// Registration callback: one scan target of kind AWS per visited account.
struct ZanshinRegistrar<'a> {
    client: &'a ZanshinClient,
    organization_id: Uuid,
    schedule: Value,
}

#[async_trait]
impl RegisterTarget for ZanshinRegistrar<'_> {
    async fn register(
        &self,
        branch: Branch,
        account_id: &str,
        account_name: &str,
        _session: &Session,
    ) -> zanshin_core::Result<()> {
        info!(%branch, account_id, account_name, "registering scan target");
        self.client
            .create_scan_target(
                &self.organization_id,
                &NewScanTarget {
                    name: account_name.to_string(),
                    kind: "AWS".to_string(),
                    credential: serde_json::json!({ "account": account_id }),
                    schedule: self.schedule.clone(),
                },
            )
            .await
            .map_err(|e| OnboardError::Registration {
                account_id: account_id.to_string(),
                account_name: account_name.to_string(),
                message: format!("{e:#}"),
            })?;
        Ok(())
    }
}
