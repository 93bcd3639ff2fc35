use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use shoplytics_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Structured JSON logging. Level controlled via RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("shoplytics=info".parse()?),
        )
        .json()
        .init();

    let cfg = shoplytics_core::config::Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    let state = Arc::new(AppState::new(cfg.clone()));

    // Warm the cache so the first request does not pay for loading. A broken
    // source is reported here and again on every data request.
    match state.dataset().await {
        Ok(dataset) => info!(
            source = dataset.source(),
            years = ?dataset.years_available(),
            "Dataset ready"
        ),
        Err(e) => tracing::warn!(data_dir = %cfg.data_dir, error = %e, "Dataset not loaded at startup"),
    }

    let addr = format!("0.0.0.0:{}", cfg.port);
    let app = shoplytics_server::app::build_app(Arc::clone(&state));

    info!(port = cfg.port, "Shoplytics listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
