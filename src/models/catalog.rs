// Monitored model files and dashboard reports

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{HistoryPoint, ModelStatus, PredictionResult, SizeSeries};

/// A centrally hosted model file under watch. Status is never stored; it is derived on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoredModel {
    pub id: String,
    pub name: String,
    /// Network path of the central file, e.g. `\\Server\Projects\...\Arch_Central.rvt`.
    pub path: String,
    #[serde(rename = "thresholdMB")]
    pub threshold_mb: f64,
    #[serde(rename = "currentSizeMB")]
    pub current_size_mb: f64,
    #[serde(default = "Utc::now")]
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub history: Vec<HistoryPoint>,
}

impl MonitoredModel {
    pub fn size_series(&self) -> SizeSeries {
        SizeSeries {
            history: self.history.clone(),
            threshold_mb: self.threshold_mb,
            current_size_mb: self.current_size_mb,
        }
    }
}

/// Analysis outcome for one model. Exactly one of `prediction` / `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelReport {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(rename = "thresholdMB")]
    pub threshold_mb: f64,
    #[serde(rename = "currentSizeMB")]
    pub current_size_mb: f64,
    pub last_modified: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<PredictionResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ModelReport {
    pub fn status(&self) -> Option<ModelStatus> {
        self.prediction.map(|p| p.status)
    }
}

/// One dashboard refresh: every monitored model analyzed against the same `as_of` date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarSnapshot {
    pub timestamp: u64,
    pub as_of: NaiveDate,
    pub models: Vec<ModelReport>,
    pub healthy: usize,
    pub warning: usize,
    pub critical: usize,
}

impl RadarSnapshot {
    pub fn new(timestamp: u64, as_of: NaiveDate, models: Vec<ModelReport>) -> Self {
        let count = |status: ModelStatus| {
            models
                .iter()
                .filter(|m| m.status() == Some(status))
                .count()
        };
        let healthy = count(ModelStatus::Healthy);
        let warning = count(ModelStatus::Warning);
        let critical = count(ModelStatus::Critical);
        Self {
            timestamp,
            as_of,
            models,
            healthy,
            warning,
            critical,
        }
    }
}
