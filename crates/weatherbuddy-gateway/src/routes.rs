//! HTTP routes: `/api/location`, `/health`, and the optional web client.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use weatherbuddy_core::GatewayConfig;
use weatherbuddy_weather::LocationResponse;

use crate::client_ip::client_ip;
use crate::geolocate::LocationResolver;

#[derive(Debug, Clone)]
pub struct AppState {
    pub resolver: Arc<LocationResolver>,
    pub trust_forwarded_for: bool,
}

impl AppState {
    pub fn new(resolver: LocationResolver, trust_forwarded_for: bool) -> Self {
        Self {
            resolver: Arc::new(resolver),
            trust_forwarded_for,
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(
            LocationResolver::from_config(config)?,
            config.trust_forwarded_for,
        ))
    }
}

/// Build the gateway router. With `static_dir`, the built client is served at
/// `/` and `/weather` returns its `index.html`.
pub fn router(state: AppState, static_dir: Option<&Path>) -> Router {
    let mut app = Router::new()
        .route("/api/location", get(handle_location))
        .route("/health", get(handle_health));

    if let Some(dir) = static_dir {
        app = app
            .route_service("/weather", ServeFile::new(dir.join("index.html")))
            .fallback_service(ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// GET /api/location: best-effort city for the caller. Always 200.
async fn handle_location(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Json<LocationResponse> {
    let ip = client_ip(&headers, peer, state.trust_forwarded_for);
    Json(state.resolver.resolve(ip).await)
}

/// GET /health
async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
