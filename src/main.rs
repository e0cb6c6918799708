use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use coach_relay::cli::Args;
use coach_relay::config::Config;
use coach_relay::logging::init_logging;
use coach_relay::relay::ChatRelay;
use coach_relay::server;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let config = Config::from_env_and_args(&args).context("failed to load configuration")?;
    init_logging(config.verbose);

    info!(
        api_key = "configured",
        model = %config.model,
        endpoint = %config.api_endpoint,
        memory_backend = %config.memory_backend,
        memory_dir = %config.memory_dir.display(),
        timeout_secs = config.request_timeout_secs,
        "configuration loaded"
    );

    let relay = Arc::new(ChatRelay::from_config(&config).context("failed to build chat relay")?);
    let app = server::router(relay, config.embedded_listener);

    if !config.embedded_listener {
        warn!("embedded listener disabled (APP_ENV=production); mount coach_relay::server::router from the host instead");
        return Ok(());
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(%addr, "coach relay listening");
    info!("chat:   POST http://localhost:{}/api/chat", config.port);
    info!("health: GET  http://localhost:{}/api/health", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
