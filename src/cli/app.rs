use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};

use super::context::CliContext;
use super::dispatch::dispatch;
use super::env::CliArgs;
use super::runtime::{init_logging, load_config, load_local_env_overrides, LoadedConfig};

/// Entry point of the `autoplant` binary.
///
/// Settings are layered: defaults, YAML file, `AUTOPLANT_*` environment
/// (including `config/local.env`), then command line flags.
pub async fn run() -> Result<()> {
    load_local_env_overrides();
    let cli = CliArgs::parse();
    init_logging(&cli.log_level, cli.debug, cli.log_json)?;

    let LoadedConfig { mut config, path } = load_config(cli.config.as_ref()).await?;
    config.apply_env_overrides();
    cli.apply_to(&mut config);

    if !config.has_credentials() {
        warn!("portal credentials are not configured; placement runs will fail at login");
    }
    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %path.display(),
        webdriver = %config.webdriver.url,
        "autoplant starting"
    );

    let ctx = CliContext::new(config, path);
    if let Err(err) = dispatch(&cli, &ctx).await {
        error!("command failed: {:#}", err);
        return Err(err);
    }
    Ok(())
}
