use super::config::cmd_config;
use super::env::CliArgs;
use super::extract::cmd_extract;
use super::run::cmd_run;
use super::serve::cmd_serve;
use crate::cli::commands::Commands;
use crate::cli::context::CliContext;
use anyhow::Result;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Serve(args) => cmd_serve(args, ctx).await,
        Commands::Run(args) => cmd_run(args, ctx).await,
        Commands::Extract(args) => cmd_extract(args).await,
        Commands::Config(args) => cmd_config(args, ctx).await,
    }
}
