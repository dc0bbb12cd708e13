// =============================================================================
// Quote Screener - Main Entry Point
// =============================================================================
//
// Starts the indicator service.  The service holds no market data; every
// request brings its own series, so the process can be restarted at any
// time without losing anything but the request counter.
// =============================================================================

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use quote_screener::api;
use quote_screener::app_state::AppState;
use quote_screener::runtime_config::RuntimeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Quote Screener starting up");

    let config_path = std::env::var("SCREENER_CONFIG_PATH")
        .unwrap_or_else(|_| "screener_config.json".into());

    let config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    info!(
        donchian_period = config.indicators.donchian_period,
        atr_period = config.indicators.atr_period,
        max_batch_symbols = config.max_batch_symbols,
        "Indicator settings"
    );

    // ── 2. Build shared state ────────────────────────────────────────────
    let state = Arc::new(AppState::new(config));

    // ── 3. Start the API server ──────────────────────────────────────────
    let bind_addr =
        std::env::var("SCREENER_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".into());

    let app = api::rest::router(state.clone());
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server on {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    // ── 4. Serve until Ctrl+C ────────────────────────────────────────────
    serve_until(listener, app, tokio::signal::ctrl_c()).await?;

    if let Err(e) = state.runtime_config.read().save(&config_path) {
        error!(error = %e, "Failed to save runtime config on shutdown");
    }

    info!(
        requests_served = state.requests_served(),
        "Quote Screener shut down complete."
    );
    Ok(())
}

/// Serve `app` until `signal` resolves.  A signal listener that fails stops
/// the server and surfaces the error instead of passing as a shutdown request.
async fn serve_until<F>(listener: TcpListener, app: Router, signal: F) -> anyhow::Result<()>
where
    F: Future<Output = std::io::Result<()>> + Send + 'static,
{
    let (signal_tx, signal_rx) = tokio::sync::oneshot::channel();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = signal_tx.send(signal.await);
        })
        .await
        .context("API server failed")?;

    signal_rx
        .await
        .context("shutdown signal listener dropped")?
        .context("failed to listen for shutdown signal")?;
    warn!("Shutdown signal received - stopping gracefully");
    Ok(())
}
