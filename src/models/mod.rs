// Domain models

mod catalog;
mod history;
mod prediction;

pub use catalog::{ModelReport, MonitoredModel, RadarSnapshot};
pub use history::{HistoryPoint, SizeSeries};
pub use prediction::{DataQuality, ModelStatus, PredictionResult};
