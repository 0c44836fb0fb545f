//! Service Health Monitor
//!
//! Background task that polls the backend health endpoint on a fixed
//! interval, classifies each response into online/degraded/offline and
//! notifies a subscriber with the new snapshot. Checks are driven
//! sequentially in one task: a slow check delays the next tick, it never
//! overlaps it.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

use crate::api::types::HealthStatus;
use crate::api::{ApiError, DetectorClient};
use crate::constants;

/// Reachability and responsiveness of the classification backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    /// Initial state while the first check is in flight
    Loading,
    Online,
    Degraded,
    Offline,
}

impl std::fmt::Display for HealthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "loading"),
            Self::Online => write!(f, "online"),
            Self::Degraded => write!(f, "degraded"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

/// Point-in-time health snapshot; replaced wholesale after every check
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    pub state: HealthState,

    /// Elapsed time of the last completed check; None until one completes
    pub latency_ms: Option<u64>,

    /// Updated on every check attempt regardless of outcome
    pub last_checked_at: DateTime<Utc>,

    pub message: Option<String>,
}

impl ServiceHealth {
    fn loading() -> Self {
        Self {
            state: HealthState::Loading,
            latency_ms: None,
            last_checked_at: Utc::now(),
            message: None,
        }
    }
}

/// Monitor configuration
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Time between health checks
    pub refresh_interval: Duration,

    /// Latency above which a healthy response is reported as degraded
    pub degraded_latency: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(constants::get_refresh_interval()),
            degraded_latency: Duration::from_millis(constants::DEGRADED_LATENCY_MS),
        }
    }
}

/// Handle to a running monitor
///
/// Dropping the handle tears the monitor down; an in-flight check is
/// discarded, not awaited.
pub struct MonitorHandle {
    snapshot: Arc<RwLock<ServiceHealth>>,
    stopped: Arc<AtomicBool>,
    task: tokio::task::JoinHandle<()>,
}

impl MonitorHandle {
    /// Latest health snapshot
    pub fn current(&self) -> ServiceHealth {
        self.snapshot.read().clone()
    }

    /// Cancel future ticks and discard the result of any in-flight check
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.task.abort();
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.task.abort();
    }
}

/// Classify one completed health check
///
/// Transport failure means offline, with the failure reason as the message.
/// A reachable backend is degraded when it reports a non-ok status, answers
/// with an error response, or answers slower than the threshold; the latency
/// override beats a nominally healthy status.
pub fn classify(
    result: &Result<HealthStatus, ApiError>,
    latency: Duration,
    degraded_latency: Duration,
) -> (HealthState, Option<String>) {
    match result {
        Err(ApiError::Network(reason)) => (HealthState::Offline, Some(reason.clone())),
        Err(e) => (HealthState::Degraded, Some(e.to_string())),
        Ok(health) if !health.is_ok() => (
            HealthState::Degraded,
            health
                .message
                .clone()
                .or_else(|| Some(format!("Backend reported status {:?}", health.status))),
        ),
        Ok(_) if latency > degraded_latency => (
            HealthState::Degraded,
            Some(format!("Slow response: {} ms", latency.as_millis())),
        ),
        Ok(health) => (HealthState::Online, health.message.clone()),
    }
}

/// Periodic backend health poller
pub struct ServiceMonitor;

impl ServiceMonitor {
    /// Start polling: an immediate first check, then one per refresh interval
    ///
    /// The subscriber runs after every completed check with the new snapshot.
    pub fn start(
        client: Arc<DetectorClient>,
        config: MonitorConfig,
        subscriber: impl Fn(&ServiceHealth) + Send + Sync + 'static,
    ) -> MonitorHandle {
        log::info!(
            "Starting service monitor (every {}s, degraded above {} ms)",
            config.refresh_interval.as_secs(),
            config.degraded_latency.as_millis()
        );

        let snapshot = Arc::new(RwLock::new(ServiceHealth::loading()));
        let stopped = Arc::new(AtomicBool::new(false));

        let task = tokio::spawn({
            let snapshot = snapshot.clone();
            let stopped = stopped.clone();

            async move {
                let mut ticker = tokio::time::interval(config.refresh_interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

                loop {
                    ticker.tick().await;
                    if stopped.load(Ordering::SeqCst) {
                        break;
                    }

                    let started = Instant::now();
                    let result = client.check_health().await;
                    let latency = started.elapsed();

                    // A result arriving after stop() is discarded
                    if stopped.load(Ordering::SeqCst) {
                        break;
                    }

                    let (state, message) = classify(&result, latency, config.degraded_latency);
                    let health = ServiceHealth {
                        state,
                        latency_ms: Some(latency.as_millis() as u64),
                        last_checked_at: Utc::now(),
                        message,
                    };

                    log::debug!(
                        "Service health: {} ({} ms)",
                        health.state,
                        latency.as_millis()
                    );

                    *snapshot.write() = health.clone();
                    subscriber(&health);
                }
            }
        });

        MonitorHandle {
            snapshot,
            stopped,
            task,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::DetectorConfig;
    use crate::logic::session::Session;

    fn healthy(message: Option<&str>) -> Result<HealthStatus, ApiError> {
        Ok(HealthStatus {
            status: "ok".to_string(),
            message: message.map(|m| m.to_string()),
            version: None,
        })
    }

    fn threshold() -> Duration {
        Duration::from_millis(constants::DEGRADED_LATENCY_MS)
    }

    #[test]
    fn test_fast_ok_response_is_online() {
        let (state, message) = classify(&healthy(None), Duration::from_millis(50), threshold());
        assert_eq!(state, HealthState::Online);
        assert_eq!(message, None);
    }

    #[test]
    fn test_slow_ok_response_is_degraded() {
        let (state, message) = classify(&healthy(None), Duration::from_millis(1500), threshold());
        assert_eq!(state, HealthState::Degraded);
        assert_eq!(message.as_deref(), Some("Slow response: 1500 ms"));
    }

    #[test]
    fn test_latency_exactly_at_threshold_is_online() {
        let (state, _) = classify(&healthy(None), threshold(), threshold());
        assert_eq!(state, HealthState::Online);
    }

    #[test]
    fn test_network_failure_is_offline_with_reason() {
        let result = Err(ApiError::Network("connection refused".to_string()));
        let (state, message) = classify(&result, Duration::from_millis(10), threshold());
        assert_eq!(state, HealthState::Offline);
        assert_eq!(message.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_non_ok_status_is_degraded() {
        let result = Ok(HealthStatus {
            status: "maintenance".to_string(),
            message: Some("reindexing".to_string()),
            version: None,
        });
        let (state, message) = classify(&result, Duration::from_millis(50), threshold());
        assert_eq!(state, HealthState::Degraded);
        assert_eq!(message.as_deref(), Some("reindexing"));
    }

    #[test]
    fn test_error_response_is_degraded() {
        let result = Err(ApiError::Status {
            code: 500,
            message: "Error interno".to_string(),
        });
        let (state, _) = classify(&result, Duration::from_millis(50), threshold());
        assert_eq!(state, HealthState::Degraded);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_monitor_publishes_snapshots_until_stopped() {
        // Unroutable backend: every check classifies as offline
        let client = Arc::new(DetectorClient::new(
            DetectorConfig {
                base_url: "http://127.0.0.1:1/api/texto".to_string(),
                timeout_seconds: 1,
            },
            Session::in_memory(),
        ));

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let config = MonitorConfig {
            refresh_interval: Duration::from_millis(50),
            degraded_latency: threshold(),
        };

        let handle = ServiceMonitor::start(client, config, move |health| {
            tx.send(health.clone()).ok();
        });

        assert_eq!(handle.current().state, HealthState::Loading);

        let first = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("no snapshot within timeout")
            .expect("subscriber channel closed");

        assert_eq!(first.state, HealthState::Offline);
        assert!(first.latency_ms.is_some());
        assert!(first.message.is_some());
        assert_eq!(handle.current().state, HealthState::Offline);

        handle.stop();
    }
}
