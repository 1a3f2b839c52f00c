//! Dashboard Sync CLI
//!
//! Runs the stats sync engine headless against an in-memory dashboard:
//! - `watch`: poll until Ctrl-C, then print the final view
//! - `once`: run a single cycle and print the view
//! - `init-config`: print a commented default config file

use anyhow::Context;
use clap::{Parser, Subcommand};
use dashboard_sync::config::{generate_default_config, ConfigSource};
use dashboard_sync::{
    ChartAdapter, Config, CycleOutcome, ErrorReporter, HttpSummaryFetcher, LoggingConfig,
    MemoryView, PollScheduler, PollState, SyncCycle, ViewReconciler,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dashboard-sync")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Live stats sync for the channel network admin dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Stats endpoint, overrides the config file
    #[arg(long, global = true)]
    pub url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll the endpoint until interrupted
    Watch,

    /// Run one cycle and print the resulting view as JSON
    Once,

    /// Print a default config file
    InitConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::InitConfig = cli.command {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let (mut config, source) = match &cli.config {
        Some(path) => (
            Config::load_with_env(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            ConfigSource::file(path),
        ),
        None => Config::discover(),
    };
    if let Some(url) = cli.url {
        config.endpoint.url = url;
    }

    init_tracing(&config.logging);
    source.log();
    config.validate().context("invalid configuration")?;
    tracing::info!("Dashboard sync v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Stats endpoint: {}", config.endpoint.url);

    let view = Arc::new(MemoryView::dashboard(&config.display.chart_name));
    let cycle = build_cycle(&config, Arc::clone(&view))?;

    match cli.command {
        Commands::Once => {
            let outcome = cycle.run().await;
            println!("{}", serde_json::to_string_pretty(&view.snapshot())?);
            if let CycleOutcome::Reported { .. } = outcome {
                anyhow::bail!("stats fetch failed");
            }
        }
        Commands::Watch => {
            let handle =
                PollScheduler::new(cycle, PollState::new(config.polling.interval())).start();
            shutdown_signal().await;
            handle.shutdown();
            println!("{}", serde_json::to_string_pretty(&view.snapshot())?);
        }
        Commands::InitConfig => {}
    }

    Ok(())
}

fn build_cycle(
    config: &Config,
    view: Arc<MemoryView>,
) -> anyhow::Result<SyncCycle<HttpSummaryFetcher, MemoryView>> {
    let fetcher = HttpSummaryFetcher::new(
        config.endpoint.url.clone(),
        config.endpoint.request_timeout(),
    )
    .context("building HTTP client")?;

    let reconciler = ViewReconciler::new(config.phrases.clone(), config.display.display_zone());
    let chart = ChartAdapter::new(config.display.chart_name.clone(), config.phrases.clone())
        .title_style(config.display.title_style());
    let reporter =
        ErrorReporter::new(config.phrases.fetch_error.clone()).expiry(config.polling.notice_expiry());

    Ok(SyncCycle::new(
        Arc::new(fetcher),
        view,
        reconciler,
        chart,
        reporter,
    ))
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("dashboard_sync={}", logging.level).into());
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries the JSON snapshot
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
