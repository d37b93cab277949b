mod config;
mod database;
mod entities;
mod error;
mod router;
mod routes;
mod rsvp;
mod util;

use std::sync::Arc;

use config::Config;
use database::setup_database;
use router::{create_router, shutdown_signal};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.rust_log.clone()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = setup_database(&config.database_url).await?;

    let addr = config.bind_addr.clone();
    let app = create_router(db, Arc::new(config));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
