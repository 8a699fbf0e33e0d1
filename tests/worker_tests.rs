// Radar worker tests: one-shot refresh, status change logging, spawned loop broadcasts and shuts down

mod common;

use bimradar::analysis::TrendAnalyzer;
use bimradar::models::*;
use bimradar::registry::ModelRegistry;
use bimradar::worker::{WorkerConfig, WorkerDeps, log_status_changes, refresh, spawn};
use common::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;

fn registry() -> ModelRegistry {
    ModelRegistry::from_models(vec![
        model("tower-arch", 1000.0, linear_history(600.0, 8.0, 30)),
        model("mall-st", 800.0, linear_history(340.0, 15.0, 31)),
        model("hospital-mep", 500.0, linear_history(250.0, 2.0, 31)),
    ])
    .unwrap()
}

#[tokio::test]
async fn refresh_counts_statuses() {
    let snapshot = refresh(&registry(), &TrendAnalyzer::default(), day(30)).await;
    assert_eq!(snapshot.as_of, day(30));
    assert_eq!(snapshot.models.len(), 3);
    assert_eq!(snapshot.critical, 1);
    assert_eq!(snapshot.warning, 1);
    assert_eq!(snapshot.healthy, 1);
    assert!(snapshot.timestamp > 0);
}

#[tokio::test]
async fn status_changes_are_tracked_between_refreshes() {
    let registry = registry();
    let analyzer = TrendAnalyzer::default();
    let mut previous = HashMap::new();

    let first = refresh(&registry, &analyzer, day(30)).await;
    assert_eq!(log_status_changes(&mut previous, &first), 3);
    assert_eq!(previous.get("mall-st"), Some(&ModelStatus::Critical));

    let unchanged = refresh(&registry, &analyzer, day(30)).await;
    assert_eq!(log_status_changes(&mut previous, &unchanged), 0);

    // Tower jumps to 990 MB: within the 2% headroom of 1000 MB.
    registry
        .record_size("tower-arch", HistoryPoint::new(day(30), 990.0))
        .await
        .unwrap();
    let changed = refresh(&registry, &analyzer, day(31)).await;
    assert_eq!(log_status_changes(&mut previous, &changed), 1);
    assert_eq!(previous.get("tower-arch"), Some(&ModelStatus::Critical));
}

#[tokio::test]
async fn worker_broadcasts_and_stops_on_shutdown() {
    let (tx, mut rx) = broadcast::channel(4);
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let handle = spawn(
        WorkerDeps {
            registry: Arc::new(registry()),
            analyzer: TrendAnalyzer::default(),
            tx,
            ws_radar_connections: Arc::new(AtomicUsize::new(0)),
            shutdown_rx,
        },
        WorkerConfig {
            refresh_interval_secs: 3600,
            stats_log_interval_secs: 3600,
        },
    );

    // First interval tick fires immediately.
    let snapshot = tokio::time::timeout(tokio::time::Duration::from_secs(3), rx.recv())
        .await
        .expect("snapshot within timeout")
        .expect("channel open");
    assert_eq!(snapshot.models.len(), 3);

    let _ = shutdown_tx.send(());
    tokio::time::timeout(tokio::time::Duration::from_secs(3), handle)
        .await
        .expect("worker stops")
        .unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn worker_keeps_refreshing_across_stats_ticks() {
    let (tx, mut rx) = broadcast::channel(4);
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let ws_radar_connections = Arc::new(AtomicUsize::new(1));

    let handle = spawn(
        WorkerDeps {
            registry: Arc::new(registry()),
            analyzer: TrendAnalyzer::default(),
            tx,
            ws_radar_connections: ws_radar_connections.clone(),
            shutdown_rx,
        },
        WorkerConfig {
            refresh_interval_secs: 1,
            stats_log_interval_secs: 1,
        },
    );

    // Refresh and stats ticks both fire immediately, then again after a second.
    for _ in 0..2 {
        let snapshot = tokio::time::timeout(tokio::time::Duration::from_secs(3), rx.recv())
            .await
            .expect("snapshot within timeout")
            .expect("channel open");
        assert_eq!(snapshot.models.len(), 3);
    }

    let _ = shutdown_tx.send(());
    tokio::time::timeout(tokio::time::Duration::from_secs(3), handle)
        .await
        .expect("worker stops")
        .unwrap();
}
