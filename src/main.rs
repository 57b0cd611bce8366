//! OpenSASE Catalog Admin - category and product backend for the admin console

use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use catalog_admin::api::{router, AppState};
use catalog_admin::catalog::{CatalogService, HttpCatalogSource};
use catalog_admin::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();
    let config = Config::from_env()?;
    let source = HttpCatalogSource::new(config.commerce.clone())?;
    let catalog = Arc::new(CatalogService::new(Arc::new(source)));

    // Serve even if the commerce API is down; the console can retry via /catalog/refresh.
    if let Err(e) = catalog.refresh().await {
        tracing::error!(error = %e, base_url = %config.commerce.base_url, "initial catalog load failed");
    }

    let app = router(AppState { catalog });
    tracing::info!("🚀 OpenSASE Catalog Admin listening on 0.0.0.0:{}", config.port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?, app).await?;
    Ok(())
}
