//! Records API server: reads config from the environment (and `.env`), makes
//! sure the database and tables exist, then serves the API.
//!
//! Run from repo root: `cargo run -p ecommerce-server`

use ecommerce_api::{app, ensure_database_exists, ensure_schema, AppState, PgStore, ServerConfig};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ecommerce_api=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    ensure_database_exists(&config.database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    ensure_schema(&pool).await?;

    let state = AppState::new(Arc::new(PgStore::new(pool)));
    let router: axum::Router = app(state, config.body_limit);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
