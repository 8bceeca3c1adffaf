//! Charity boxes server — entry point.
//!
//! Opens the SQLite database, applies migrations, optionally seeds sample
//! boxes, and serves the REST API for collection boxes and fundraising
//! events.

mod api;
mod config;
mod db;
mod errors;
mod seed;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use api::ApiState;
use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    // Set up the SQLite connection pool and run migrations.
    let pool = db::init_pool(&config.database_url, config.max_connections).await?;

    if config.seed_sample_data {
        seed::sample_data(&pool).await?;
    }

    let app = api::router(Arc::new(ApiState::new(pool)));

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
