use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use uyghurly_config::Config;
use uyghurly_config::log::{LogConfig, LogFormat};

mod cli;
mod commands;
mod controller;
mod events;
mod io;
mod profile;
mod state;
mod ui;

#[cfg(test)]
mod tests;

use self::cli::Cli;
use self::state::AppState;

#[tokio::main]
async fn main() {
    let code = match run().await {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("uyghurly error: {error:#}");
            1
        }
    };
    // A pending stdin read would otherwise hold the runtime open
    std::process::exit(code);
}

async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let defaults = Config::new();
    init_tracing(cli.verbose, &defaults.log)?;

    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&defaults.storage.data_dir));
    profile::init_user_config(&data_dir)
        .with_context(|| format!("initializing {}", data_dir.display()))?;

    let mut config = profile::load_user_profile(&data_dir, &cli.profile)?;
    config.storage.data_dir = data_dir.to_string_lossy().into_owned();
    if let Some(seed) = cli.seed {
        config.quiz.seed = Some(seed);
        config.content.seed = Some(seed);
    }

    let state = Arc::new(AppState::init(config).await?);
    commands::dispatch(cli.command, state).await
}

fn init_tracing(verbose: bool, log: &LogConfig) -> anyhow::Result<()> {
    let level = if verbose { "debug" } else { log.filter.as_str() };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr));

    match log.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Plain => builder.try_init(),
    }
    .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
}
