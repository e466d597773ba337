//! Entry point for the `domo` CLI.

mod cli;
mod commands;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing_subscriber::EnvFilter;
use url::Url;

use domo_core::{ApiClient, TransportConfig};

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();
    init_tracing(args.global.verbose);

    let gateway = build_gateway(&args)?;

    match args.command {
        Command::Devices { all } => commands::devices::list(&gateway, all).await,
        Command::Device { id } => commands::detail::show(&gateway, id).await,
        Command::Switch {
            device_id,
            actuator,
            state,
        } => commands::detail::switch(&gateway, device_id, &actuator, state.into()).await,
        Command::Toggle { id, enabled } => commands::devices::toggle(&gateway, id, enabled).await,
        Command::Watch { id, interval } => {
            commands::detail::watch(&gateway, id, Duration::from_secs(interval)).await
        }
        Command::Theme { mode } => commands::theme::run(mode).await,
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn build_gateway(args: &Cli) -> Result<Arc<ApiClient>> {
    let base_url = Url::parse(&args.global.server)
        .wrap_err_with(|| format!("invalid server URL: {}", args.global.server))?;
    let transport = TransportConfig {
        timeout: Duration::from_secs(args.global.timeout),
    };
    tracing::debug!(server = %base_url, timeout = args.global.timeout, "building gateway");
    let client = ApiClient::new(base_url, &transport).wrap_err("failed to build HTTP client")?;
    Ok(Arc::new(client))
}
