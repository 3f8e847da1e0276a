//! Live telemetry connection

use futures::stream::BoxStream;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::feed::{Feed, SnapshotReceiver};
use crate::provider::SnapshotProvider;
use crate::providers::ReplayProvider;
use crate::stream::ThrottleExt;
use crate::telemetry::TelemetrySnapshot;
use crate::types::UpdateRate;
use crate::{DashboardError, Result};

/// Connection to a running telemetry feed.
///
/// Dropping the connection stops the feed. Subscriptions taken from it end
/// when the feed ends.
pub struct TelemetryConnection {
    snapshots: SnapshotReceiver,
    source_hz: f64,
    cancel: CancellationToken,
}

impl TelemetryConnection {
    /// Start a feed over `provider`. Must be called within a tokio runtime.
    pub fn open<P: SnapshotProvider>(provider: P) -> Self {
        let source_hz = provider.tick_rate();
        let channels = Feed::spawn(provider);
        info!(source_hz, "Telemetry connection opened");
        Self { snapshots: channels.snapshots, source_hz, cancel: channels.cancel }
    }

    /// Replay recorded snapshots at `tick_rate` frames per second.
    pub fn replay(frames: Vec<TelemetrySnapshot>, tick_rate: f64) -> Result<Self> {
        Ok(Self::open(ReplayProvider::new(frames, tick_rate)?))
    }

    /// Snapshots at no more than `rate`.
    ///
    /// Waits quietly until the first snapshot arrives, then ends as soon as
    /// the feed reports the source has ended. Delivery is latest-value: a
    /// consumer slower than the feed sees the newest snapshot, not a backlog.
    pub fn subscribe(&self, rate: UpdateRate) -> BoxStream<'static, Arc<TelemetrySnapshot>> {
        let snapshots = WatchStream::new(self.snapshots.clone())
            .skip_while(|snapshot| {
                let waiting = snapshot.is_none();
                async move { waiting }
            })
            .take_while(|snapshot| {
                let live = snapshot.is_some();
                async move { live }
            })
            .filter_map(|snapshot| async move { snapshot });

        match rate.throttle_interval(self.source_hz) {
            None => snapshots.boxed(),
            Some(period) => {
                debug!(?period, "Throttling subscription");
                snapshots.throttle(period).boxed()
            }
        }
    }

    /// Most recent snapshot, if the feed is producing
    pub fn latest(&self) -> Option<Arc<TelemetrySnapshot>> {
        self.snapshots.borrow().clone()
    }

    /// True while the feed is publishing snapshots
    pub fn is_connected(&self) -> bool {
        self.snapshots.borrow().is_some()
    }

    /// Wait up to `timeout` for the first snapshot.
    pub async fn wait_for_first(&self, timeout: Duration) -> Result<Arc<TelemetrySnapshot>> {
        let mut rx = self.snapshots.clone();
        let waited = tokio::time::timeout(timeout, async move {
            rx.wait_for(Option::is_some).await.map(|current| current.clone())
        })
        .await;

        match waited {
            Ok(Ok(Some(snapshot))) => Ok(snapshot),
            Ok(Ok(None)) | Ok(Err(_)) => {
                Err(DashboardError::provider_failed("feed ended before the first snapshot"))
            }
            Err(_) => Err(DashboardError::Timeout { duration: timeout }),
        }
    }

    pub fn source_hz(&self) -> f64 {
        self.source_hz
    }

    /// Token that stops the feed when cancelled
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Drop for TelemetryConnection {
    fn drop(&mut self) {
        debug!("Dropping telemetry connection");
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ScriptedProvider, snapshot_with_angle};

    fn angles(n: usize) -> Vec<TelemetrySnapshot> {
        (0..n).map(|i| snapshot_with_angle(i as f32)).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn native_subscription_ends_with_source() {
        let _ = tracing_subscriber::fmt::try_init();
        let connection = TelemetryConnection::replay(angles(5), 60.0).unwrap();

        let seen: Vec<f32> = connection
            .subscribe(UpdateRate::Native)
            .filter_map(|s| async move { s.steering_wheel_angle })
            .collect()
            .await;

        assert!(!seen.is_empty());
        assert_eq!(seen.last(), Some(&4.0));
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test(start_paused = true)]
    async fn throttled_subscription_skips_frames() {
        let connection = TelemetryConnection::replay(angles(60), 60.0).unwrap();

        let seen: Vec<Arc<TelemetrySnapshot>> =
            connection.subscribe(UpdateRate::Max(10)).collect().await;

        // One second of data at 10Hz, plus the first frame
        assert!(seen.len() <= 12, "got {} frames", seen.len());
        assert_eq!(seen.last().and_then(|s| s.steering_wheel_angle), Some(59.0));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_for_first_returns_snapshot() {
        let connection = TelemetryConnection::replay(angles(3), 60.0).unwrap();
        let first = connection.wait_for_first(Duration::from_secs(1)).await.unwrap();
        assert!(first.steering_wheel_angle.is_some());
        assert!(connection.is_connected());
    }

    #[tokio::test(start_paused = true)]
    async fn wait_for_first_times_out() {
        let provider = ScriptedProvider::paced(vec![Ok(Some(snapshot_with_angle(0.0)))], Duration::from_secs(10));
        let connection = TelemetryConnection::open(provider);
        let err = connection.wait_for_first(Duration::from_millis(100)).await.unwrap_err();
        assert!(matches!(err, DashboardError::Timeout { .. }));
        assert!(connection.latest().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_source_reports_end() {
        let connection = TelemetryConnection::replay(Vec::new(), 60.0).unwrap();
        let err = connection.wait_for_first(Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, DashboardError::Provider { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_connection_cancels_feed() {
        let connection = TelemetryConnection::replay(angles(1000), 60.0).unwrap();
        let token = connection.cancellation();
        drop(connection);
        assert!(token.is_cancelled());
    }
}
