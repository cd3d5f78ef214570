use clap::Parser;
use std::path::PathBuf;

use super::commands::Commands;
use crate::config::Config;

/// Vehicle placement automation for the Autoplant transporter portal
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (RUST_LOG takes precedence)
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,

    /// Shorthand for --log-level debug
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Show the browser window instead of running headless
    #[arg(long, global = true)]
    pub headed: bool,

    /// Directory for checkpoint and error screenshots
    #[arg(long, value_name = "DIR", global = true)]
    pub artifacts: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl CliArgs {
    /// Flags win over the config file and the environment.
    pub fn apply_to(&self, config: &mut Config) {
        if self.headed {
            config.webdriver.headless = false;
        }
        if let Some(dir) = &self.artifacts {
            config.artifacts.dir = dir.clone();
        }
    }
}
