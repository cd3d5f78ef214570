use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use tokio::fs;

use autoplant_core_types::{PlacementRequest, ProcessResponse};

use crate::cli::context::CliContext;

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// JSON file with the placement request fields
    #[arg(short, long, value_name = "FILE")]
    pub request: PathBuf,
}

pub async fn cmd_run(args: RunArgs, ctx: &CliContext) -> Result<()> {
    let raw = fs::read_to_string(&args.request)
        .await
        .with_context(|| format!("reading {}", args.request.display()))?;
    let request: PlacementRequest = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", args.request.display()))?;

    let response = ProcessResponse::from(ctx.runner().process(request).await);
    println!("{}", serde_json::to_string_pretty(&response)?);

    if !response.is_success() {
        bail!("{}", response.message);
    }
    Ok(())
}
