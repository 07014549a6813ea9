use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use pitwall_core::FileSnapshot;
use pitwall_daemon::{api::AppState, config::DaemonConfig, ingest, router, upstream::UpstreamClient};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "pitwall-daemon", version, about = "F1 schedule and results backend")]
struct Cli {
    /// Where the HTTP API will listen, e.g. 127.0.0.1:4000
    #[arg(long, default_value = "127.0.0.1:4000")]
    listen: SocketAddr,

    /// JSON array of race weekends read by /api/next-session.
    #[arg(long, default_value = "data/schedule.json")]
    snapshot: PathBuf,

    /// Base URL of the Ergast-compatible historical API.
    #[arg(long, default_value = "https://api.jolpi.ca/ergast/f1")]
    historical_url: String,

    /// Base URL of the current-season API.
    #[arg(long, default_value = "https://f1api.dev/api")]
    current_url: String,

    /// Timeout for each upstream request, in seconds.
    #[arg(long, default_value_t = 10)]
    upstream_timeout_seconds: u64,

    /// Refresh the snapshot from the current-season API every N seconds. 0 disables.
    #[arg(long, default_value_t = 0)]
    refresh_interval_seconds: u64,

    /// Refresh the snapshot once and exit instead of serving.
    #[arg(long, default_value_t = false)]
    refresh_once: bool,

    /// Log filter (env-filter syntax). RUST_LOG takes precedence.
    #[arg(long, default_value = "info")]
    log: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log));
    fmt().with_target(false).with_env_filter(filter).init();

    let config = DaemonConfig {
        listen: cli.listen,
        snapshot_path: cli.snapshot,
        historical_base_url: cli.historical_url,
        current_base_url: cli.current_url,
        upstream_timeout: Duration::from_secs(cli.upstream_timeout_seconds),
        refresh_interval_seconds: cli.refresh_interval_seconds,
    };

    let upstream = UpstreamClient::new(
        &config.historical_base_url,
        &config.current_base_url,
        config.upstream_timeout,
    )
    .context("build upstream http client")?;

    if cli.refresh_once {
        let count = ingest::refresh_snapshot(&upstream, &config.snapshot_path).await?;
        println!("wrote {count} races to {}", config.snapshot_path.display());
        return Ok(());
    }

    info!("starting daemon with config: {:?}", config);

    let snapshot = Arc::new(FileSnapshot::new(&config.snapshot_path));
    let state = AppState::new(config.clone(), upstream, snapshot);

    ingest::spawn_refresh(state.clone());

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("bind {}", config.listen))?;
    info!("listening on http://{}", config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("shutdown requested");
}
