// Size history models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One size observation for a model file; at most one per calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    #[serde(rename = "sizeMB")]
    pub size_mb: f64,
}

impl HistoryPoint {
    pub fn new(date: NaiveDate, size_mb: f64) -> Self {
        Self { date, size_mb }
    }
}

/// Chronological size history of one monitored file plus its operational ceiling.
/// `current_size_mb` is expected to track the last point; the caller keeps them consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeSeries {
    pub history: Vec<HistoryPoint>,
    #[serde(rename = "thresholdMB")]
    pub threshold_mb: f64,
    #[serde(rename = "currentSizeMB")]
    pub current_size_mb: f64,
}
