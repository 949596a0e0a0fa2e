mod cli;
mod handlers;
mod output;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use std::sync::Arc;
use taskflow_core::AppConfig;
use taskflow_persistence::{JsonDirStore, Session, SessionOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("TASKFLOW_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "taskflow", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = AppConfig::load();
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    if cli.no_seed {
        config.seed_starter_board = false;
    }

    let data_dir = config.effective_data_dir();
    tracing::debug!("Using data directory {}", data_dir.display());
    let store = Arc::new(JsonDirStore::new(data_dir));

    let mut session = match Session::open(store, SessionOptions::from_config(&config)).await {
        Ok(session) => session,
        Err(e) => output::output_error(&e.to_string(), Vec::new()),
    };

    let outcome = handlers::dispatch(&mut session, cli.command);

    let mut notifications = session.take_notifications();
    let summary = session.close().await?;
    notifications.extend(summary.notifications);
    if summary.saves.failed > 0 {
        tracing::warn!("{} saves failed", summary.saves.failed);
    }

    match outcome {
        Ok(data) => output::output_success(data, notifications),
        Err(e) => output::output_error(&e.to_string(), notifications),
    }
}
