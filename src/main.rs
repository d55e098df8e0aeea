// EthXpose server - classification proxy and transaction graph explorer

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ethxpose::{
    api::create_router,
    app_state::AppState,
    config::Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ethxpose=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize application state
    let app_state = AppState::new(config.clone())?;

    let app = create_router(app_state);

    let addr = config.server_address();
    info!("🚀 EthXpose starting on http://{}", addr);
    info!("  GET    /                     - Wallet explorer page");
    info!("  POST   /api/classify         - Classification proxy");
    info!("  GET    /api/graph/layout     - Current node positions");
    info!("  POST   /api/graph/drag       - Drag a node");
    info!("  POST   /api/graph/viewport   - Resize the drawing");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
