// Trend analysis output

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Risk classification; serializes as "Healthy" / "Warning" / "Critical".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModelStatus {
    Healthy,
    Warning,
    Critical,
}

impl ModelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelStatus::Healthy => "Healthy",
            ModelStatus::Warning => "Warning",
            ModelStatus::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much the growth rate can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataQuality {
    /// Slope fitted over at least two observations.
    Trend,
    /// Fewer than two observations, or the fit was numerically degenerate; growth is 0.
    InsufficientData,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    #[serde(rename = "growthRateMBPerDay")]
    pub growth_rate_mb_per_day: f64,
    /// Defined only for a positive growth rate; 0 when the threshold is already reached.
    pub days_to_threshold: Option<f64>,
    pub prediction_date: Option<NaiveDate>,
    pub status: ModelStatus,
    pub data_quality: DataQuality,
    pub samples_used: usize,
    pub r_squared: f64,
}
