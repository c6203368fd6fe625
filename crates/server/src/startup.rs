use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use configs::{AppConfig, AuthSettings};
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::routes::{self, auth};
use service::auth::{
    password::HashParams,
    repo::seaorm::SeaOrmUserRepository,
    repository::UserRepository,
    token::TokenConfig,
    AuthConfig,
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Translate file/env settings into the service configuration.
pub fn auth_config(settings: &AuthSettings) -> AuthConfig {
    AuthConfig {
        token: TokenConfig::new(settings.jwt_secret.clone(), Duration::from_secs(settings.token_ttl_secs)),
        hashing: HashParams {
            memory_kib: settings.argon2_memory_kib,
            iterations: settings.argon2_iterations,
            parallelism: settings.argon2_parallelism,
        },
        uniform_login_errors: settings.uniform_login_errors,
    }
}

/// Router backed by any credential store; used by `run` and by tests.
pub fn build_app(repo: Arc<dyn UserRepository>, cfg: AuthConfig) -> Router {
    let state = auth::ServerState::new(repo, cfg);
    routes::build_router(state, build_cors())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; shutdown only by kill");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}

/// Public entry: connect storage, migrate, build the app and run the HTTP
/// server until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!("database migrations applied");

    let repo: Arc<dyn UserRepository> = Arc::new(SeaOrmUserRepository::new(db));
    let app = build_app(repo, auth_config(&cfg.auth));

    let listener = tokio::net::TcpListener::bind(cfg.server.bind_addr()).await?;
    let addr: SocketAddr = listener.local_addr()?;
    info!(%addr, "starting server");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}
