mod api;
mod middleware;

use std::sync::Arc;

use shopfront_catalog::{BulkLoader, CatalogClient, InventoryStore};
use shopfront_stylist::{Assistant, OutfitClient};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};
use crate::middleware::RateLimitState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = shopfront_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let catalog = CatalogClient::from_config(&config);
    let loader = BulkLoader::from_config(&config)?;
    let assistant = Assistant::from_config(&config)?;
    let outfits = OutfitClient::from_config(&config)?;

    tracing::info!(
        env = %config.env,
        live_catalog = catalog.is_live(),
        answer_mode = %assistant.mode(),
        outfits = outfits.is_some(),
        "starting shopfront server"
    );

    let state = AppState {
        catalog: Arc::new(catalog),
        inventory: Arc::new(InventoryStore::new()),
        loader: Arc::new(loader),
        assistant: Arc::new(assistant),
        outfits: outfits.map(Arc::new),
    };

    if state.loader.has_credentials() {
        let inventory = Arc::clone(&state.inventory);
        let loader = Arc::clone(&state.loader);
        tokio::spawn(async move {
            if let Err(e) = inventory.reload(&loader).await {
                tracing::warn!(error = %e, "initial inventory load failed");
            }
        });
    }

    let app = build_app(state, RateLimitState::from_config(&config));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
