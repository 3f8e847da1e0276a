//! Feed task that owns a provider and publishes its snapshots

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use crate::provider::SnapshotProvider;
use crate::telemetry::TelemetrySnapshot;

/// Consecutive provider errors tolerated before the feed gives up
pub const MAX_PROVIDER_ERRORS: u32 = 10;

/// Latest published snapshot. `None` before the first frame and after the end.
pub type SnapshotReceiver = watch::Receiver<Option<Arc<TelemetrySnapshot>>>;

/// Handles returned by [`Feed::spawn`]
pub struct FeedChannels {
    pub snapshots: SnapshotReceiver,
    /// Cancel to stop the feed task
    pub cancel: CancellationToken,
}

/// Spawns the task that pulls from a provider.
///
/// Publication is latest-value: each snapshot overwrites the previous one on
/// a watch channel, so a consumer that falls behind skips straight to the
/// newest frame instead of draining a queue.
pub struct Feed;

impl Feed {
    pub fn spawn<P>(provider: P) -> FeedChannels
    where
        P: SnapshotProvider,
    {
        let (tx, rx) = watch::channel(None);
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        tokio::spawn(async move {
            Self::run(provider, tx, task_cancel).await;
        });

        FeedChannels { snapshots: rx, cancel }
    }

    async fn run<P>(
        mut provider: P,
        tx: watch::Sender<Option<Arc<TelemetrySnapshot>>>,
        cancel: CancellationToken,
    ) where
        P: SnapshotProvider,
    {
        info!(tick_rate = provider.tick_rate(), "Telemetry feed started");
        let mut frame_count = 0u64;
        let mut error_count = 0u32;

        loop {
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Telemetry feed cancelled");
                    break;
                }
                result = provider.next_snapshot() => result,
            };

            match result {
                Ok(Some(snapshot)) => {
                    frame_count += 1;
                    error_count = 0;
                    trace!(frame_count, empty = snapshot.is_empty(), "Snapshot");

                    if tx.send(Some(Arc::new(snapshot))).is_err() {
                        debug!("All snapshot receivers dropped, shutting down");
                        break;
                    }
                }
                Ok(None) => {
                    info!("Telemetry source ended after {} frames", frame_count);
                    let _ = tx.send(None);
                    break;
                }
                Err(e) => {
                    error_count += 1;
                    error!("Provider error ({}/{}): {}", error_count, MAX_PROVIDER_ERRORS, e);

                    if error_count >= MAX_PROVIDER_ERRORS {
                        error!("Too many provider errors, stopping feed");
                        let _ = tx.send(None);
                        break;
                    }

                    // 100ms, 200ms, 400ms ... capped at 1.6s
                    let backoff = Duration::from_millis(50 * (1 << error_count.min(5)));
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(backoff) => {}
                    }
                }
            }
        }

        info!("Telemetry feed ended (published {} frames)", frame_count);
    }
}
