//! Provider trait for live telemetry sources

use crate::Result;
use crate::telemetry::TelemetrySnapshot;

/// A source of telemetry snapshots.
///
/// Providers pace themselves: `next_snapshot` resolves when the next frame is
/// due, whether that means waiting on the rig's stream or on a replay clock.
#[async_trait::async_trait]
pub trait SnapshotProvider: Send + 'static {
    /// Next snapshot from the source.
    ///
    /// - `Ok(Some(snapshot))`: a new frame
    /// - `Ok(None)`: the source has ended
    /// - `Err(e)`: a transient failure; the feed backs off and asks again
    async fn next_snapshot(&mut self) -> Result<Option<TelemetrySnapshot>>;

    /// Frames per second the source produces
    fn tick_rate(&self) -> f64;
}
