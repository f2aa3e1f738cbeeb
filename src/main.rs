//! botko - an event-driven IRC bot with plugins.
//!
//! Connects to one server, registers (NICK, USER, JOIN), then routes every
//! inbound line to the handlers the loaded plugins bound.

mod bot;
mod config;
mod error;
mod handlers;
mod handshake;
mod network;
mod plugins;
mod state;
mod telemetry;

use crate::bot::Bot;
use crate::config::Config;
use crate::plugins::PluginRegistry;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "botko", version, about = "An event-driven IRC bot")]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, env = "BOTKO_CONFIG", default_value = "botko.toml")]
    config: PathBuf,

    /// More logging (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    telemetry::init(args.verbose);

    let config = Config::load(&args.config).map_err(|e| {
        error!(path = %args.config.display(), error = %e, "failed to load config");
        e
    })?;
    if let Err(issues) = config::validate(&config) {
        for issue in &issues {
            warn!(issue = %issue, "configuration problem");
        }
    }

    info!(
        server = %config.main.server,
        port = config.main.port,
        nicks = %config.main.nick,
        "starting botko"
    );

    let (bot, outgoing) = Bot::new(config);
    let mut registry = PluginRegistry::bundled();
    registry.load(&bot).await.map_err(|e| {
        error!(error = %e, "failed to load plugins");
        e
    })?;
    info!(plugins = ?registry.loaded(), "plugins ready");

    let stream = network::connect(&bot).await.map_err(|e| {
        error!(code = e.error_code(), error = %e, "could not connect");
        e
    })?;
    network::run(&bot, stream, outgoing, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "could not listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    })
    .await?;

    info!("botko stopped");
    Ok(())
}
