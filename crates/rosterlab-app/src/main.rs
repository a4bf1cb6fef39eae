// rosterlab entry point.
//
// Startup sequence:
// 1. Parse arguments
// 2. Load config (copying defaults on first run)
// 3. Initialize tracing (log to file, stdout carries JSON only)
// 4. Dispatch the command and print its result

use rosterlab_app::cli::Cli;
use rosterlab_app::commands;
use rosterlab_app::config::{self, LoggingConfig};
use rosterlab_core::CsvDirectory;

use anyhow::Context;
use clap::Parser;
use std::path::Path;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = config::load_config().context("failed to load configuration")?;
    let cwd = std::env::current_dir().context("failed to read working directory")?;
    init_tracing(&config.logging, &cwd)?;
    info!("rosterlab starting up");

    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.data_dir.clone());
    info!(
        "Config loaded: data_dir={}, season={}, variant={}, scoring={}",
        data_dir.display(),
        config.defaults.season,
        config.defaults.variant,
        config.defaults.scoring
    );
    let source = CsvDirectory::new(data_dir);

    let output = match commands::run(&cli.command, &source, &config.defaults) {
        Ok(output) => output,
        Err(e) => {
            error!("command failed: {e:#}");
            return Err(e);
        }
    };

    let text = serde_json::to_string_pretty(&output).context("failed to render output")?;
    println!("{text}");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig, base_dir: &Path) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = logging.resolved_dir(base_dir);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("rosterlab.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
