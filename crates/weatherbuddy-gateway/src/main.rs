use std::net::SocketAddr;

use anyhow::{Context, Result};
use weatherbuddy_core::Config;
use weatherbuddy_gateway::{router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    weatherbuddy_core::init()?;

    let (config, _) = Config::load_checked()?;
    let gateway = &config.gateway;

    let state = AppState::from_config(gateway).context("Failed to build geolocation client")?;
    let static_dir = gateway.static_dir.as_deref().filter(|d| d.is_dir());
    let app = router(state, static_dir);

    let listener = tokio::net::TcpListener::bind(gateway.listen_addr())
        .await
        .with_context(|| format!("Failed to bind {}", gateway.listen_addr()))?;

    tracing::info!("Gateway running on http://{}", listener.local_addr()?);
    tracing::info!(
        "Default city {:?}, forwarded-for trusted: {}",
        gateway.default_city,
        gateway.trust_forwarded_for
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Gateway server error")?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
