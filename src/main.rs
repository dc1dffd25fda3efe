mod cli;
mod colors;
mod config;
mod error;
mod log_bridge;
mod resources;
mod state;
mod view;
mod web;

use std::net::SocketAddr;

use clap::Parser;
use color_eyre::Result;
use tracing::info;

use cli::Cli;
use resources::Resources;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let resources = Resources::new(&cli.resource_dir);

    // Missing or malformed config is fatal; there is no fallback.
    let mut app_config = resources.load_config()?;
    if let Some(level) = &cli.log_level {
        app_config.logging.set_root_level(level)?;
    }

    let (console_tx, console_rx) = log_bridge::console_channel();
    log_bridge::init_logging(&app_config.logging, console_tx)?;

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    info!("svgtint starting");

    let state = AppState::new(resources, console_rx);
    web::serve(state, addr).await;

    Ok(())
}
