use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;
use tracing::info;

use configs::DatabaseConfig;

/// `DATABASE_URL` from the environment or `.env`; unset means no database.
pub static DATABASE_URL: Lazy<Option<String>> = Lazy::new(|| {
    let _ = dotenvy::dotenv();
    env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty())
});

/// Connect using `DATABASE_URL` with default pool settings.
pub async fn connect() -> anyhow::Result<DatabaseConnection> {
    let url = DATABASE_URL
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is not set"))?;
    let db = Database::connect(url).await?;
    Ok(db)
}

/// Open a pool sized and timed according to `cfg`.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    opts.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .sqlx_logging(cfg.sqlx_logging);
    let db = Database::connect(opts).await?;
    info!(max = cfg.max_connections, min = cfg.min_connections, "database pool ready");
    Ok(db)
}
