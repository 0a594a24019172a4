use clap::Subcommand;

use crate::api::ZanshinClient;
use crate::config;
use crate::output::print_json;

#[derive(Subcommand)]
pub enum AccountSubcommand {
    /// Show the account this API key belongs to
    Me,
}

pub async fn run(profile: &str, subcmd: AccountSubcommand) -> anyhow::Result<()> {
    match subcmd {
        AccountSubcommand::Me => me(profile).await,
    }
}

async fn me(profile: &str) -> anyhow::Result<()> {
    let settings = config::load(profile)?;
    let client = ZanshinClient::new(&settings)?;
    print_json(&client.me().await?)
}
