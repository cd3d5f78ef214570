use anyhow::Result;
use clap::Args;

use crate::cli::context::CliContext;

#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    /// Print as JSON instead of YAML
    #[arg(long)]
    pub json: bool,
}

pub async fn cmd_config(args: ConfigArgs, ctx: &CliContext) -> Result<()> {
    let redacted = ctx.config().redacted();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&redacted)?);
    } else {
        println!("Current configuration ({}):", ctx.config_path().display());
        println!("{}", serde_yaml::to_string(&redacted)?);
    }
    Ok(())
}
