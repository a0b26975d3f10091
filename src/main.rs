use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use baranki_storefront::api::create_api_router;
use baranki_storefront::build_state;
use baranki_storefront::config::AppConfig;
use baranki_storefront::storage::SeaOrmStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let storage = SeaOrmStore::connect(&config.database_url).await?;
    let state = build_state(&config, Arc::new(storage)).await?;

    let app = create_api_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(
        address = %listener.local_addr()?,
        catalog = %config.catalog_base_url,
        "Storefront running"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
