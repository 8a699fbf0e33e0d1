// In-memory catalog of monitored model files. Seeded from the size data source's JSON file,
// then grows append-only as new observations arrive. Nothing is written back to disk.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::analysis::{self, AnalysisError, TrendAnalyzer};
use crate::models::{HistoryPoint, ModelReport, MonitoredModel};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("model not found: {0}")]
    NotFound(String),
    #[error("model already registered: {0}")]
    Duplicate(String),
    #[error(transparent)]
    InvalidInput(#[from] AnalysisError),
}

pub struct ModelRegistry {
    models: RwLock<BTreeMap<String, MonitoredModel>>,
}

impl ModelRegistry {
    /// Loads the catalog file. A missing file gives an empty catalog; bad JSON or bad entries fail.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        if !Path::new(path).exists() {
            warn!(path = %path, "catalog file not found; starting with no monitored models");
            return Ok(Self::empty());
        }
        let s = std::fs::read_to_string(path)?;
        let models: Vec<MonitoredModel> = serde_json::from_str(&s)
            .map_err(|e| anyhow::anyhow!("catalog {}: {}", path, e))?;
        let registry = Self::from_models(models)?;
        info!(path = %path, "catalog loaded");
        Ok(registry)
    }

    pub fn empty() -> Self {
        Self {
            models: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn from_models(models: Vec<MonitoredModel>) -> Result<Self, RegistryError> {
        let mut by_id = BTreeMap::new();
        for model in models {
            validate_model(&model)?;
            if by_id.contains_key(&model.id) {
                return Err(RegistryError::Duplicate(model.id));
            }
            by_id.insert(model.id.clone(), model);
        }
        Ok(Self {
            models: RwLock::new(by_id),
        })
    }

    pub async fn len(&self) -> usize {
        self.models.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.models.read().await.is_empty()
    }

    /// All models, ordered by id.
    pub async fn list(&self) -> Vec<MonitoredModel> {
        self.models.read().await.values().cloned().collect()
    }

    pub async fn get(&self, id: &str) -> Result<MonitoredModel, RegistryError> {
        self.models
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    #[instrument(skip(self, model), fields(repo = "registry", operation = "register", model_id = %model.id))]
    pub async fn register(&self, model: MonitoredModel) -> Result<(), RegistryError> {
        validate_model(&model)?;
        let mut models = self.models.write().await;
        if models.contains_key(&model.id) {
            return Err(RegistryError::Duplicate(model.id));
        }
        info!(name = %model.name, threshold_mb = model.threshold_mb, "model registered");
        models.insert(model.id.clone(), model);
        Ok(())
    }

    /// Appends one observation. The date must be later than every recorded date.
    /// The model's current size and last-modified time follow the new point.
    #[instrument(skip(self), fields(repo = "registry", operation = "record_size"))]
    pub async fn record_size(
        &self,
        id: &str,
        point: HistoryPoint,
    ) -> Result<MonitoredModel, RegistryError> {
        analysis::validate_point(&point)?;
        let mut models = self.models.write().await;
        let model = models
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        if let Some(last) = model.history.last()
            && point.date <= last.date
        {
            return Err(AnalysisError::InvalidInput(format!(
                "observation date {} is not after the last recorded date {}",
                point.date, last.date
            ))
            .into());
        }
        model.history.push(point);
        model.current_size_mb = point.size_mb;
        model.last_modified = Utc::now();
        tracing::debug!(size_mb = point.size_mb, date = %point.date, "size recorded");
        Ok(model.clone())
    }

    /// Analyzes every model as of `as_of`. Invalid data yields a report carrying the error.
    pub async fn report(&self, analyzer: &TrendAnalyzer, as_of: NaiveDate) -> Vec<ModelReport> {
        self.models
            .read()
            .await
            .values()
            .map(|m| build_report(m, analyzer, as_of))
            .collect()
    }
}

pub fn build_report(
    model: &MonitoredModel,
    analyzer: &TrendAnalyzer,
    as_of: NaiveDate,
) -> ModelReport {
    let (prediction, error) = match analyzer.analyze(&model.size_series(), as_of) {
        Ok(p) => (Some(p), None),
        Err(e) => (None, Some(e.to_string())),
    };
    ModelReport {
        id: model.id.clone(),
        name: model.name.clone(),
        path: model.path.clone(),
        threshold_mb: model.threshold_mb,
        current_size_mb: model.current_size_mb,
        last_modified: model.last_modified,
        prediction,
        error,
    }
}

/// Catalog entries may start without history; everything else follows the series contract.
fn validate_model(model: &MonitoredModel) -> Result<(), AnalysisError> {
    if model.id.trim().is_empty() {
        return Err(AnalysisError::InvalidInput("model id must be non-empty".into()));
    }
    if !model.threshold_mb.is_finite() || model.threshold_mb <= 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "thresholdMB of {} must be a positive number, got {}",
            model.id, model.threshold_mb
        )));
    }
    if !model.current_size_mb.is_finite() || model.current_size_mb < 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "currentSizeMB of {} must be a non-negative number, got {}",
            model.id, model.current_size_mb
        )));
    }
    analysis::validate_history(&model.history)
}
