mod catalog;
mod config;
mod db;
mod entities;
mod error;
mod models;
mod rate_limit;
mod ratings;
mod routes;
mod security;
#[cfg(test)]
mod test_utils;
mod validation;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;

use crate::{
    catalog::CatalogStore, config::Config, rate_limit::ClientRateLimiter, ratings::RatingsStore,
};

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogStore,
    pub ratings: RatingsStore,
    pub rate_limiter: ClientRateLimiter,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,movies_api=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let movies = db::connect(&config.movies_database_url, config.db_max_connections)
        .await
        .with_context(|| format!("opening movie catalog at {}", config.movies_database_url))?;
    let ratings = db::connect(&config.ratings_database_url, config.db_max_connections)
        .await
        .with_context(|| format!("opening ratings at {}", config.ratings_database_url))?;

    let rate_limiter = ClientRateLimiter::new(config.rate_limit_max, config.rate_limit_window);
    tokio::spawn(rate_limiter.clone().prune_periodically(Duration::from_secs(60)));

    let state = Arc::new(AppState {
        catalog: CatalogStore::new(movies),
        ratings: RatingsStore::new(ratings),
        rate_limiter,
    });

    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
