use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use tokio::fs;

use crate::parsers::{build_request, is_reply_command};

#[derive(Args, Clone, Debug)]
pub struct ExtractArgs {
    /// Text file with the dispatch message
    #[arg(short, long, value_name = "FILE")]
    pub message: PathBuf,

    /// Text file with the `ap kara` reply naming the driver
    #[arg(short, long, value_name = "FILE")]
    pub reply: Option<PathBuf>,
}

pub async fn cmd_extract(args: ExtractArgs) -> Result<()> {
    let message = read_text(&args.message).await?;
    let reply = match &args.reply {
        Some(path) => Some(read_text(path).await?),
        None => None,
    };
    if let Some(reply) = reply.as_deref() {
        if !is_reply_command(reply) {
            tracing::warn!("reply does not start with the ap kara command; parsing it anyway");
        }
    }

    let request = build_request(&message, reply.as_deref());
    let validation = request.validate();
    let output = json!({
        "processed_data": request,
        "complete": validation.is_ok(),
        "missing": validation.err().map(|err| err.to_string()),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))
}
