mod api;
mod cmd;
mod config;
mod output;

use clap::{Parser, Subcommand};
use cmd::{
    account::AccountSubcommand, organization::OrganizationSubcommand,
    scan_target::ScanTargetSubcommand,
};

#[derive(Parser)]
#[command(
    name = "zanshin",
    about = "Command-line client for the Zanshin API",
    version,
    propagate_version = true
)]
struct Cli {
    /// Configuration profile from ~/.zanshin
    #[arg(long, global = true, env = "ZANSHIN_PROFILE", default_value = "default")]
    profile: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Operations on the caller's own account
    Account {
        #[command(subcommand)]
        subcommand: AccountSubcommand,
    },

    /// Operations on organizations
    Organization {
        #[command(subcommand)]
        subcommand: OrganizationSubcommand,
    },

    /// Operations on scan targets
    ScanTarget {
        #[command(subcommand)]
        subcommand: ScanTargetSubcommand,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // The onboarding fan-out logs every skip decision at INFO so the
    // operator can audit why an account was not touched.
    let default_level = match &cli.command {
        Commands::ScanTarget {
            subcommand: ScanTargetSubcommand::OnboardAwsOrganization { .. },
        } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Account { subcommand } => cmd::account::run(&cli.profile, subcommand).await,
        Commands::Organization { subcommand } => {
            cmd::organization::run(&cli.profile, subcommand).await
        }
        Commands::ScanTarget { subcommand } => {
            cmd::scan_target::run(&cli.profile, subcommand).await
        }
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
