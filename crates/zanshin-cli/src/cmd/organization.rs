use clap::Subcommand;

use crate::api::ZanshinClient;
use crate::config;
use crate::output::print_json;

#[derive(Subcommand)]
pub enum OrganizationSubcommand {
    /// List organizations this user has direct access to
    List,
}

pub async fn run(profile: &str, subcmd: OrganizationSubcommand) -> anyhow::Result<()> {
    match subcmd {
        OrganizationSubcommand::List => list(profile).await,
    }
}

async fn list(profile: &str) -> anyhow::Result<()> {
    let settings = config::load(profile)?;
    let client = ZanshinClient::new(&settings)?;
    print_json(&client.organizations().await?)
}
