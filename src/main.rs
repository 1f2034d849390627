//! # Tray Judgment Core — Binary Entrypoint
//! Boots the Axum HTTP server around the pure decision core.
//!
//! ## Endpoints
//! - `GET /health` — liveness check
//! - `POST /judge` — run one fusion decision
//! - `GET /catalog` — list the loaded product catalog

mod api;
mod catalog;
mod combination;
mod config;
mod count;
mod decision;
mod detection;
mod engine;
mod ensemble;
mod hand_filter;

use catalog::Catalog;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    let catalog = match std::env::var("TRAYJUDGE_CATALOG_PATH") {
        Ok(path) => Catalog::load_from_file(path),
        Err(_) => Catalog::built_in(),
    };

    let bind_addr = std::env::var("TRAYJUDGE_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let router = api::create_router(catalog);

    tracing::info!(addr = %bind_addr, "starting tray judgment core");
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
