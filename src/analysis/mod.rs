// Deterministic growth-trend analysis: size history -> growth rate, crossing date, status.
// Pure computation; no I/O, no logging, no clock reads. "Now" is always passed in as `as_of`.

mod regression;

pub use regression::{LinearFit, least_squares};

use chrono::{Days, NaiveDate};
use serde::Deserialize;

use crate::models::{DataQuality, HistoryPoint, ModelStatus, PredictionResult, SizeSeries};

/// Caller contract violations. Sparse history is not an error; see [`DataQuality`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Tuning for the analyzer. Also the `[analysis]` config section.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// Most recent observations used for the fit.
    pub window_size: usize,
    /// Crossings projected further out than this are not reported as a date.
    pub horizon_days: f64,
    pub critical_days: f64,
    pub warning_days: f64,
    /// Sizes within this fraction below the threshold already count as at the threshold,
    /// so a flat file just under its ceiling is Critical. 0 makes only
    /// `current_size_mb >= threshold_mb` count.
    pub critical_headroom_ratio: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            window_size: 15,
            horizon_days: 180.0,
            critical_days: 7.0,
            warning_days: 30.0,
            critical_headroom_ratio: 0.02,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TrendAnalyzer {
    config: TrendConfig,
}

impl TrendAnalyzer {
    pub fn new(config: TrendConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrendConfig {
        &self.config
    }

    /// Estimates growth over the last `window_size` points and classifies the series as of `as_of`.
    pub fn analyze(
        &self,
        series: &SizeSeries,
        as_of: NaiveDate,
    ) -> Result<PredictionResult, AnalysisError> {
        validate_series(series)?;

        let start = series
            .history
            .len()
            .saturating_sub(self.config.window_size.max(2));
        let window = &series.history[start..];

        let (growth, data_quality, r_squared) = match fit_window(window) {
            Some(fit) => (fit.slope, DataQuality::Trend, fit.r_squared),
            None => (0.0, DataQuality::InsufficientData, 0.0),
        };

        let days_to_threshold = if growth > 0.0 {
            let days = ((series.threshold_mb - series.current_size_mb) / growth).max(0.0);
            days.is_finite().then_some(days)
        } else {
            None
        };

        // Zero days means the threshold is already reached: no future crossing to report.
        let prediction_date = days_to_threshold
            .filter(|&d| d > 0.0 && d <= self.config.horizon_days)
            .and_then(|d| as_of.checked_add_days(Days::new(d.ceil() as u64)));

        Ok(PredictionResult {
            growth_rate_mb_per_day: growth,
            days_to_threshold,
            prediction_date,
            status: self.classify(series, days_to_threshold),
            data_quality,
            samples_used: window.len(),
            r_squared,
        })
    }

    fn classify(&self, series: &SizeSeries, days_to_threshold: Option<f64>) -> ModelStatus {
        let critical_floor = series.threshold_mb * (1.0 - self.config.critical_headroom_ratio);
        let at_threshold = series.current_size_mb >= critical_floor;

        if at_threshold || days_to_threshold.is_some_and(|d| d < self.config.critical_days) {
            ModelStatus::Critical
        } else if days_to_threshold.is_some_and(|d| d < self.config.warning_days) {
            ModelStatus::Warning
        } else {
            ModelStatus::Healthy
        }
    }
}

/// Analyzes with the default window (15), horizon (180 days) and 7 / 30 day status bands.
pub fn analyze(series: &SizeSeries, as_of: NaiveDate) -> Result<PredictionResult, AnalysisError> {
    TrendAnalyzer::default().analyze(series, as_of)
}

/// Checks the series contract. Input is never sorted or repaired.
pub fn validate_series(series: &SizeSeries) -> Result<(), AnalysisError> {
    if !series.threshold_mb.is_finite() || series.threshold_mb <= 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "thresholdMB must be a positive number, got {}",
            series.threshold_mb
        )));
    }
    if !series.current_size_mb.is_finite() || series.current_size_mb < 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "currentSizeMB must be a non-negative number, got {}",
            series.current_size_mb
        )));
    }
    if series.history.is_empty() {
        return Err(AnalysisError::InvalidInput("history is empty".into()));
    }
    validate_history(&series.history)
}

/// Sizes must be finite and non-negative; dates strictly increasing.
pub fn validate_history(history: &[HistoryPoint]) -> Result<(), AnalysisError> {
    for p in history {
        validate_point(p)?;
    }
    if let Some(pair) = history.windows(2).find(|w| w[1].date <= w[0].date) {
        return Err(AnalysisError::InvalidInput(format!(
            "history dates must be strictly increasing: {} is followed by {}",
            pair[0].date, pair[1].date
        )));
    }
    Ok(())
}

pub fn validate_point(point: &HistoryPoint) -> Result<(), AnalysisError> {
    if !point.size_mb.is_finite() || point.size_mb < 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "sizeMB on {} must be a non-negative number, got {}",
            point.date, point.size_mb
        )));
    }
    Ok(())
}

/// Regression of size against days elapsed since the first point of the window.
fn fit_window(window: &[HistoryPoint]) -> Option<LinearFit> {
    let first = window.first()?.date;
    let points: Vec<(f64, f64)> = window
        .iter()
        .map(|p| ((p.date - first).num_days() as f64, p.size_mb))
        .collect();
    least_squares(&points)
}
