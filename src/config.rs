use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub movies_database_url: String,
    pub ratings_database_url: String,
    pub db_max_connections: u32,
    pub rate_limit_max: u32,
    pub rate_limit_window: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 =
            var("PORT").unwrap_or_else(|| "3000".to_string()).parse().context("PORT")?;

        let movies_database_url = var("MOVIES_DATABASE_URL").unwrap_or_else(|| {
            read_only_sqlite_url(&var("DB_PATH").unwrap_or_else(|| "db/movies.db".to_string()))
        });
        let ratings_database_url = var("RATINGS_DATABASE_URL").unwrap_or_else(|| {
            read_only_sqlite_url(
                &var("RATINGS_DB_PATH").unwrap_or_else(|| "db/ratings.db".to_string()),
            )
        });

        let db_max_connections: u32 =
            var("DB_MAX_CONNECTIONS").and_then(|s| s.parse().ok()).unwrap_or(5);

        let rate_limit_max: u32 =
            var("RATE_LIMIT_MAX").and_then(|s| s.parse().ok()).unwrap_or(100);

        let rate_limit_window_secs: u64 =
            var("RATE_LIMIT_WINDOW_SECS").and_then(|s| s.parse().ok()).unwrap_or(15 * 60);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            movies_database_url,
            ratings_database_url,
            db_max_connections,
            rate_limit_max,
            rate_limit_window: Duration::from_secs(rate_limit_window_secs),
        })
    }
}

fn read_only_sqlite_url(path: &str) -> String {
    format!("sqlite://{path}?mode=ro")
}
