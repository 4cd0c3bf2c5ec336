use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

use attendance::shared::core::primitives::SystemClock;
use attendance::shell::config::Config;
use attendance::shell::context::AppContext;
use attendance::shell::http::router;
use attendance::shell::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::from_env()?;
    let context = AppContext::from_config(&config, Arc::new(SystemClock))?;
    let app = router(AppState::new(context, config.poll_timeout));

    tracing::info!(backend = ?config.backend, scope = ?config.scope, "attendance log ready");
    tracing::info!("Dashboard: http://{}/", config.bind_addr);
    tracing::info!("GraphQL endpoint: http://{}/gql", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
