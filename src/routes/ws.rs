// WebSocket handler: pushes one radar snapshot on connect, then every worker refresh.

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tokio::time::{Duration, timeout};

use super::AppState;
use crate::models::RadarSnapshot;
use crate::worker;

pub(super) const WS_PING_INTERVAL: Duration = Duration::from_secs(30);
pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Decrements ws_radar connection count on drop (connect = +1, drop = -1).
struct WsRadarGuard(Arc<AtomicUsize>);

impl Drop for WsRadarGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, std::sync::atomic::Ordering::Relaxed);
    }
}

pub(super) async fn ws_radar(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        // Subscribe before the initial snapshot so no refresh falls in between.
        let mut rx = state.radar_tx.subscribe();
        let initial = worker::refresh(
            &state.registry,
            &state.analyzer,
            chrono::Local::now().date_naive(),
        )
        .await;
        if let Err(e) =
            stream_radar(socket, initial, &mut rx, state.ws_radar_connections.clone()).await
        {
            tracing::info!("Radar stream error: {}", e);
        }
    })
}

async fn send_json(socket: &mut WebSocket, snapshot: &RadarSnapshot) -> anyhow::Result<bool> {
    let json = serde_json::to_string(snapshot)?;
    let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Text(json.into()))).await;
    Ok(matches!(r, Ok(Ok(()))))
}

async fn stream_radar(
    mut socket: WebSocket,
    initial: RadarSnapshot,
    rx: &mut broadcast::Receiver<RadarSnapshot>,
    conn_count: Arc<AtomicUsize>,
) -> anyhow::Result<()> {
    conn_count.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    let _guard = WsRadarGuard(conn_count);
    tracing::info!("Client connected to radar stream");

    if !send_json(&mut socket, &initial).await? {
        return Ok(());
    }

    let mut ping_interval = tokio::time::interval(WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            result = rx.recv() => {
                let snapshot = match result {
                    Ok(s) => s,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "radar client lagging; skipped snapshots");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                if !send_json(&mut socket, &snapshot).await? {
                    break;
                }
            }
            _ = ping_interval.tick() => {
                let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Ping(Bytes::new()))).await;
                if !matches!(r, Ok(Ok(()))) {
                    break;
                }
            }
        }
    }
    Ok(())
}
