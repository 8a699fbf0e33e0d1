// Background radar worker: periodically re-analyzes the whole catalog (one dashboard refresh)
// and broadcasts the resulting snapshot to /ws/radar subscribers.

use crate::analysis::TrendAnalyzer;
use crate::models::{ModelStatus, RadarSnapshot};
use crate::registry::ModelRegistry;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tokio::time::{Duration, Instant, interval};
use tracing::Instrument;

/// Rate limit for "no receivers" message (avoid logging every refresh when no one is on /ws/radar)
const NO_RECEIVERS_WARN_INTERVAL: Duration = Duration::from_secs(600);

/// Catalog, channels, and shutdown for the worker.
pub struct WorkerDeps {
    pub registry: Arc<ModelRegistry>,
    pub analyzer: TrendAnalyzer,
    pub tx: broadcast::Sender<RadarSnapshot>,
    pub ws_radar_connections: Arc<AtomicUsize>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Worker timing. Both intervals are real seconds.
pub struct WorkerConfig {
    pub refresh_interval_secs: u64,
    pub stats_log_interval_secs: u64,
}

/// Builds one radar snapshot for `as_of`.
pub async fn refresh(
    registry: &ModelRegistry,
    analyzer: &TrendAnalyzer,
    as_of: NaiveDate,
) -> RadarSnapshot {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, operation = "get_timestamp", "system time error");
            0
        });
    let models = registry.report(analyzer, as_of).await;
    RadarSnapshot::new(timestamp, as_of, models)
}

/// Logs models whose status changed since the previous refresh and remembers the new ones.
/// Returns how many models changed.
pub fn log_status_changes(
    previous: &mut HashMap<String, ModelStatus>,
    snapshot: &RadarSnapshot,
) -> usize {
    let mut changed = 0;
    for report in &snapshot.models {
        let Some(status) = report.status() else {
            tracing::warn!(
                model_id = %report.id,
                error = report.error.as_deref().unwrap_or_default(),
                "model could not be analyzed"
            );
            continue;
        };
        let before = previous.insert(report.id.clone(), status);
        if before == Some(status) {
            continue;
        }
        changed += 1;
        let from = before.map(|s| s.as_str()).unwrap_or("none");
        if status == ModelStatus::Critical {
            tracing::warn!(
                model_id = %report.id,
                name = %report.name,
                current_size_mb = report.current_size_mb,
                threshold_mb = report.threshold_mb,
                from,
                "model is critical"
            );
        } else {
            tracing::info!(model_id = %report.id, from, to = %status, "model status changed");
        }
    }
    changed
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let worker_span = tracing::span!(
        tracing::Level::DEBUG,
        "radar_worker",
        refresh_interval_secs = config.refresh_interval_secs
    );
    tokio::spawn(run(deps, config).instrument(worker_span))
}

async fn run(deps: WorkerDeps, config: WorkerConfig) {
    let WorkerDeps {
        registry,
        analyzer,
        tx,
        ws_radar_connections,
        mut shutdown_rx,
    } = deps;

    let mut tick = interval(Duration::from_secs(config.refresh_interval_secs));
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut stats_log_tick = interval(Duration::from_secs(config.stats_log_interval_secs));
    stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut refreshes_total: u64 = 0;
    let mut previous: HashMap<String, ModelStatus> = HashMap::new();
    let mut last_no_receivers_warn: Option<Instant> = None;

    loop {
        tokio::select! {
            _ = tick.tick() => {
                let as_of = chrono::Local::now().date_naive();
                let snapshot = refresh(&registry, &analyzer, as_of).await;
                refreshes_total += 1;
                log_status_changes(&mut previous, &snapshot);
                tracing::debug!(
                    operation = "refresh",
                    models = snapshot.models.len(),
                    critical = snapshot.critical,
                    warning = snapshot.warning,
                    "radar refreshed"
                );

                if tx.send(snapshot).is_err() {
                    let should_warn = last_no_receivers_warn
                        .is_none_or(|t| t.elapsed() >= NO_RECEIVERS_WARN_INTERVAL);
                    if should_warn {
                        tracing::debug!(
                            operation = "broadcast_snapshot",
                            "No active WebSocket clients; broadcast channel has no receivers"
                        );
                        last_no_receivers_warn = Some(Instant::now());
                    }
                }
            }
            _ = &mut shutdown_rx => {
                tracing::debug!("Radar worker shutting down");
                break;
            }
            _ = stats_log_tick.tick() => {
                let monitored_models = registry.len().await;
                tracing::info!(
                    ws_radar_clients =
                        ws_radar_connections.load(std::sync::atomic::Ordering::Relaxed),
                    monitored_models,
                    refreshes_total,
                    "app stats"
                );
            }
        }
    }
}
