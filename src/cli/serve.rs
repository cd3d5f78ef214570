use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::cli::context::CliContext;
use crate::server::{build_router, ServeState};

#[derive(Args, Clone, Debug)]
pub struct ServeArgs {
    /// Address to listen on (defaults to server.bind from the config)
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<SocketAddr>,
}

pub async fn cmd_serve(args: ServeArgs, ctx: &CliContext) -> Result<()> {
    let config = ctx.config();
    if !config.has_credentials() {
        warn!("portal credentials are not configured; every run will fail at login");
    }

    let state = ServeState::new(Arc::new(ctx.runner()));
    let app = build_router(state);

    let addr = args.bind.unwrap_or(config.server.bind);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(
        %addr,
        webdriver = %config.webdriver.url,
        headless = config.webdriver.headless,
        "placement server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(?err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
