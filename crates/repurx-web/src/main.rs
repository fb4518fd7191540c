//! repurx web server
//!
//! Run with: cargo run -p repurx-web

use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use repurx_web::config::Config;
use repurx_web::router::build_router;
use repurx_web::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; RUST_LOG overrides the default level
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting repurx...");

    let config = Config::load()?;
    let bind = config.server.bind.clone();

    // Load seed data, the embedder and the first snapshot off the runtime
    let state = tokio::task::spawn_blocking(move || AppState::load(config)).await??;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("Server listening on http://{}", bind);

    axum::serve(listener, app).await?;

    Ok(())
}
