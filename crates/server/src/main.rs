use anyhow::Context;
use server::config::Config;
use server::settings::optimal_settings;
use server::{build_router, Services};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env();

    let settings = optimal_settings();
    tracing::info!(
        memory_mb = settings.memory_mb,
        hash = settings.hash,
        threads = settings.threads,
        max_depth = settings.max_depth,
        default_depth = settings.default_depth,
        cloud_mode = settings.cloud_mode,
        "Engine settings"
    );

    let services = Services::from_config(&config, settings).context("Failed to build OpenAI client")?;
    let app = build_router(&config, &services);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    services.analyzer.shutdown().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
