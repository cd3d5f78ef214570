use clap::Subcommand;

use super::config::ConfigArgs;
use super::extract::ExtractArgs;
use super::run::RunArgs;
use super::serve::ServeArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Serve the placement HTTP API
    Serve(ServeArgs),

    /// Run one placement from a JSON request file
    Run(RunArgs),

    /// Extract placement fields from a dispatch message
    Extract(ExtractArgs),

    /// Print the effective configuration
    Config(ConfigArgs),
}
