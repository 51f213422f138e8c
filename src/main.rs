use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cinematch::api::{create_router, AppState};
use cinematch::config::Config;
use cinematch::store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // Missing, malformed, or shape-mismatched artifacts abort startup; there
    // is no degraded mode.
    let store = Store::load(&config.catalog_path, &config.similarity_path)
        .context("failed to load recommendation data")?;
    info!(
        movies = store.catalog.len(),
        catalog = %config.catalog_path.display(),
        similarity = %config.similarity_path.display(),
        "Catalog and similarity matrix loaded"
    );

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(store, config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
