use anyhow::Context;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::{info, warn};

use carebook::db::{init_db_pool, run_migrations};
use carebook::logging::init_tracing;
use carebook::router::init_router;
use carebook::state::init_app_state;
use carebook_config::{DatabaseConfig, JwtConfig, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing().context("failed to initialize logging")?;

    let jwt_config = JwtConfig::from_env();
    if jwt_config.uses_default_secret() {
        warn!("serving with the development JWT secret");
    }
    let server_config = ServerConfig::from_env();
    let database_config = DatabaseConfig::from_env();

    let pool = init_db_pool(&database_config)
        .await
        .context("failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    let state = init_app_state(pool, &jwt_config);
    let app = init_router(state)?;

    let addr = format!("0.0.0.0:{}", server_config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
