use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use maintenance_gate::config::Config;
use maintenance_gate::logging::init_tracing;
use maintenance_gate::proxy::GateServer;

/// Reverse proxy that serves a maintenance page while a trigger file exists.
#[derive(Debug, Parser)]
#[command(name = "maintenance-gate", version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind address (host:port).
    #[arg(long)]
    bind: Option<String>,

    /// Override the upstream base URL.
    #[arg(long)]
    upstream: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = load_config(&cli)?;
    tracing::info!("maintenance-gate {}", env!("CARGO_PKG_VERSION"));

    let mut server = GateServer::new(&config).context("building maintenance gate")?;
    server.try_bind().await.context("binding listener")?;
    server.run().await.context("running server")?;

    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let path = cli.config.clone().unwrap_or_else(Config::config_path);
    let mut config = Config::load_from(&path)
        .with_context(|| format!("loading config from {}", path.display()))?;

    if let Some(bind) = &cli.bind {
        config.proxy.bind_addr = bind.clone();
    }
    if let Some(upstream) = &cli.upstream {
        config.proxy.upstream = upstream.clone();
    }
    config.validate().context("validating config")?;

    tracing::info!("Configuration loaded from {}", path.display());
    Ok(config)
}
