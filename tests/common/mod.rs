// Shared test helpers
#![allow(dead_code)]

use bimradar::models::*;
use chrono::{DateTime, Days, NaiveDate, Utc};

/// Day `n` counted from 2026-01-01.
pub fn day(n: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1)
        .unwrap()
        .checked_add_days(Days::new(n))
        .unwrap()
}

/// `days` daily points starting at day(0): start_mb, start_mb + rate, ...
pub fn linear_history(start_mb: f64, rate: f64, days: u64) -> Vec<HistoryPoint> {
    (0..days)
        .map(|i| HistoryPoint::new(day(i), start_mb + rate * i as f64))
        .collect()
}

/// Linear growth with a fixed, repeating day-to-day wobble.
pub fn wobbly_history(start_mb: f64, rate: f64, days: u64) -> Vec<HistoryPoint> {
    const WOBBLE: [f64; 7] = [0.0, 4.5, -3.0, 7.0, 1.5, -5.0, 2.0];
    (0..days)
        .map(|i| {
            HistoryPoint::new(
                day(i),
                start_mb + rate * i as f64 + WOBBLE[(i % 7) as usize],
            )
        })
        .collect()
}

pub fn series(history: Vec<HistoryPoint>, threshold_mb: f64, current_size_mb: f64) -> SizeSeries {
    SizeSeries {
        history,
        threshold_mb,
        current_size_mb,
    }
}

/// Series whose current size is the last history point.
pub fn series_at_last(history: Vec<HistoryPoint>, threshold_mb: f64) -> SizeSeries {
    let current = history.last().map(|p| p.size_mb).unwrap_or(0.0);
    series(history, threshold_mb, current)
}

pub fn fixed_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-01-30T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

pub fn model(id: &str, threshold_mb: f64, history: Vec<HistoryPoint>) -> MonitoredModel {
    let current_size_mb = history.last().map(|p| p.size_mb).unwrap_or(0.0);
    MonitoredModel {
        id: id.into(),
        name: format!("{id} central"),
        path: format!("\\\\Server\\Projects\\{id}\\{id}_Central.rvt"),
        threshold_mb,
        current_size_mb,
        last_modified: fixed_time(),
        history,
    }
}
