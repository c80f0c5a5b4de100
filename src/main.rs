use anyhow::Result;
use std::sync::Arc;
use storefront_cart::cart::{AppState, CartStore};
use storefront_cart::catalog::HttpCatalog;
use storefront_cart::config::AppConfig;
use storefront_cart::router::create_app_router;
use storefront_cart::storage::{FileStorage, KeyValueStorage, MemoryStorage};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("storefront_cart=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Rehydrate the cart before accepting requests
    let cart = CartStore::open(open_storage(&config));
    info!(lines = cart.line_count(), "cart ready");

    let catalog = HttpCatalog::new(config.catalog_base_url.clone())?;
    info!(catalog = catalog.base_url(), "using product catalog");

    let state = AppState::new(cart, Arc::new(catalog), config.promo_error_display).shared();

    // Build application router with all routes and middleware
    let app = create_app_router(state);

    let addr = config.socket_addr();
    info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// File storage under the configured directory, or memory when the
/// directory cannot be used.
fn open_storage(config: &AppConfig) -> Arc<dyn KeyValueStorage> {
    match FileStorage::open(&config.storage_dir) {
        Ok(storage) => Arc::new(storage),
        Err(e) => {
            warn!(
                error = %e,
                dir = %config.storage_dir.display(),
                "cart storage directory unavailable, cart will not survive restarts"
            );
            Arc::new(MemoryStorage::new())
        }
    }
}
