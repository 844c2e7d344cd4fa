use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use wardflow::api::ward_api_router;
use wardflow::config;
use wardflow::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let db_path = config::database_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Open once at boot so migration failures surface before we bind
    let state = AppState::new(&db_path);
    state.open_db()?;
    tracing::info!(db = %db_path.display(), "Database ready");

    let addr = config::bind_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Ward API listening");

    axum::serve(listener, ward_api_router(Arc::new(state))).await?;
    Ok(())
}
