mod cli;
mod client;
mod config;
mod error;
mod logging;
mod output;
mod progress;
mod scraper;
mod table;
mod utils;

use crate::cli::Cli;
use crate::client::Client;
use crate::config::Config;
use crate::error::Result;
use crate::logging::{init_logging, LoggerConfig};
use crate::scraper::{run_mode, ScrapeContext};
use anyhow::Context;
use clap::Parser;
use std::time::Duration;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    let logger_config =
        LoggerConfig::try_from(&config.logging).context("invalid logging configuration")?;
    let _log_guard = init_logging(logger_config).context("failed to initialise logging")?;

    log_info!("[main] Parser started");
    log_info!("[main] Command line arguments: {:?}", cli);

    // Mode failures are logged, never turned into a failing exit status.
    if let Err(e) = run(&cli, &config).await {
        log_error!(e => "[main] Mode {} failed", cli.mode);
    }

    log_info!("[main] Parser finished");
    Ok(())
}

async fn run(cli: &Cli, config: &Config) -> Result<()> {
    let mut builder = Client::builder()
        .timeout(Duration::from_secs(config.http.timeout_secs))
        .header("user-agent", &config.http.user_agent)?;
    if config.http.cache {
        builder = builder.cache_dir(&config.paths.cache_dir);
    }
    let session = builder.build()?;

    if cli.clear_cache {
        let removed = session.clear_cache()?;
        log_info!("[main] Cleared {} cached responses", removed);
    }

    let ctx = ScrapeContext::new(&session, config);
    if let Some(table) = run_mode(cli.mode, &ctx).await? {
        output::control_output(&table, cli.output, cli.mode, &config.paths.results_dir)?;
    }

    Ok(())
}
