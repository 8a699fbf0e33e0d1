// HTTP + WebSocket routes

mod error;
mod http;
mod ws;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

use crate::analysis::TrendAnalyzer;
use crate::config::AppConfig;
use crate::models::RadarSnapshot;
use crate::registry::ModelRegistry;

pub use error::ApiError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) registry: Arc<ModelRegistry>,
    pub(crate) analyzer: TrendAnalyzer,
    pub(crate) radar_tx: broadcast::Sender<RadarSnapshot>,
    pub(crate) ws_radar_connections: Arc<AtomicUsize>,
}

pub fn app(
    registry: Arc<ModelRegistry>,
    radar_tx: broadcast::Sender<RadarSnapshot>,
    ws_radar_connections: Arc<AtomicUsize>,
    config: &AppConfig,
) -> Router {
    let state = AppState {
        registry,
        analyzer: TrendAnalyzer::new(config.analysis),
        radar_tx,
        ws_radar_connections,
    };
    Router::new()
        .route("/", get(|| async { "BIM radar: watching model file sizes" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/analyze", post(http::analyze_handler)) // POST /api/analyze
        .route(
            "/api/models",
            get(http::list_models_handler).post(http::register_model_handler),
        ) // GET, POST /api/models
        .route("/api/models/{id}", get(http::get_model_handler)) // GET /api/models/{id}
        .route("/api/models/{id}/history", post(http::record_size_handler)) // POST /api/models/{id}/history
        .route("/ws/radar", get(ws::ws_radar)) // WS /ws/radar
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
