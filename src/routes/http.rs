// HTTP handlers: version, one-shot analysis, catalog read and ingest

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};
use crate::models::{HistoryPoint, ModelReport, MonitoredModel, PredictionResult, SizeSeries};
use crate::registry::build_report;

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeRequest {
    history: Vec<HistoryPoint>,
    #[serde(rename = "thresholdMB")]
    threshold_mb: f64,
    #[serde(rename = "currentSizeMB")]
    current_size_mb: f64,
    #[serde(rename = "asOf")]
    as_of: NaiveDate,
}

/// POST /api/analyze — analyzes a caller-supplied series; nothing is stored.
pub(super) async fn analyze_handler(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<PredictionResult>, ApiError> {
    let series = SizeSeries {
        history: req.history,
        threshold_mb: req.threshold_mb,
        current_size_mb: req.current_size_mb,
    };
    let result = state.analyzer.analyze(&series, req.as_of)?;
    Ok(Json(result))
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct AsOfQuery {
    #[serde(rename = "asOf")]
    as_of: Option<NaiveDate>,
}

impl AsOfQuery {
    fn date(&self) -> NaiveDate {
        self.as_of
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

/// GET /api/models — every monitored model with its current prediction.
pub(super) async fn list_models_handler(
    State(state): State<AppState>,
    Query(query): Query<AsOfQuery>,
) -> Json<Vec<ModelReport>> {
    Json(state.registry.report(&state.analyzer, query.date()).await)
}

#[derive(Debug, Serialize)]
pub(super) struct ModelDetail {
    #[serde(flatten)]
    report: ModelReport,
    history: Vec<HistoryPoint>,
}

/// GET /api/models/{id} — one model's prediction plus its full history (for charts).
pub(super) async fn get_model_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> Result<Json<ModelDetail>, ApiError> {
    let model = state.registry.get(&id).await?;
    let report = build_report(&model, &state.analyzer, query.date());
    Ok(Json(ModelDetail {
        report,
        history: model.history,
    }))
}

/// POST /api/models — adds a model to the catalog.
pub(super) async fn register_model_handler(
    State(state): State<AppState>,
    Query(query): Query<AsOfQuery>,
    Json(model): Json<MonitoredModel>,
) -> Result<(StatusCode, Json<ModelReport>), ApiError> {
    let report = build_report(&model, &state.analyzer, query.date());
    state.registry.register(model).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// POST /api/models/{id}/history — appends one size observation from the data source.
pub(super) async fn record_size_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<AsOfQuery>,
    Json(point): Json<HistoryPoint>,
) -> Result<Json<ModelReport>, ApiError> {
    let model = state.registry.record_size(&id, point).await?;
    Ok(Json(build_report(&model, &state.analyzer, query.date())))
}
