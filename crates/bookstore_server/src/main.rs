//! Bookstore catalog server entry point.

use bookstore_core::init_logging;
use bookstore_server::config::Cli;
use clap::Parser;
use log::error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.into_config()?;
    init_logging(&config.log_level, config.log_dir.as_deref()).map_err(anyhow::Error::msg)?;

    if let Err(err) = bookstore_server::run(config).await {
        error!("event=server_stop module=server status=error error={err:#}");
        return Err(err);
    }
    Ok(())
}
