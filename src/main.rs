use anyhow::{Context, Result};
use axum::Router;
use std::{io::ErrorKind, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use bucket_lister::{
    config, routes,
    services::{
        gcs::GcsLister, lister::ObjectLister, listing_service::ListingService,
        page_tokens::PageTokenStore,
    },
};

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // --- Parse config ---
    let cfg = config::AppConfig::from_env_and_args()?;

    tracing::info!("Starting bucket-lister with config: {:?}", cfg);
    if cfg.credentials_file.is_none() {
        tracing::warn!("No credentials file configured; listing bucket anonymously");
    }

    // --- Storage backend ---
    let http = reqwest::Client::builder()
        .timeout(cfg.request_timeout)
        .build()
        .context("building HTTP client")?;
    let lister: Arc<dyn ObjectLister> = Arc::new(
        GcsLister::new(
            http,
            &cfg.storage_endpoint,
            &cfg.bucket,
            cfg.credentials_file.clone(),
        )
        .with_context(|| format!("invalid storage endpoint `{}`", cfg.storage_endpoint))?,
    );

    // --- Initialize core service ---
    let listing = ListingService::new(
        lister,
        PageTokenStore::new(),
        cfg.prefix.clone(),
        cfg.public_url.clone(),
    );

    // --- Build router ---
    let app: Router = routes::routes::routes().with_state(listing);

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!(
        "Listing bucket `{}` on http://{}/list",
        cfg.bucket,
        listener.local_addr()?
    );
    axum::serve(listener, app).await?;

    Ok(())
}
