//! Replay provider for recorded snapshots

use std::collections::VecDeque;
use std::path::Path;
use tokio::time::{Duration, Interval, MissedTickBehavior, interval};
use tracing::{debug, info, trace};

use crate::provider::SnapshotProvider;
use crate::telemetry::TelemetrySnapshot;
use crate::{DashboardError, Result};

/// Replays a fixed sequence of snapshots at the recorded tick rate
pub struct ReplayProvider {
    frames: VecDeque<TelemetrySnapshot>,
    total_frames: usize,
    /// Playback speed multiplier (1.0 = recorded speed)
    speed: f64,
    interval: Interval,
    tick_rate: f64,
}

impl ReplayProvider {
    /// Replay `frames` at `tick_rate` frames per second.
    ///
    /// Must be called within a tokio runtime.
    pub fn new(frames: Vec<TelemetrySnapshot>, tick_rate: f64) -> Result<Self> {
        if !(tick_rate.is_finite() && tick_rate > 0.0) {
            return Err(DashboardError::validation("tick_rate", format!("{tick_rate} is not a rate")));
        }
        let total_frames = frames.len();
        info!(total_frames, tick_rate, "Replay loaded");
        Ok(Self {
            frames: frames.into(),
            total_frames,
            speed: 1.0,
            interval: pacing(tick_rate),
            tick_rate,
        })
    }

    /// Load a JSON-lines recording, one snapshot per line. Blank lines are skipped.
    pub fn from_json_lines<P: AsRef<Path>>(path: P, tick_rate: f64) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| DashboardError::file_error(path.to_path_buf(), e))?;

        let frames = contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(number, line)| {
                serde_json::from_str(line).map_err(|e| {
                    DashboardError::parse(format!("{} line {}", path.display(), number + 1), e)
                })
            })
            .collect::<Result<Vec<TelemetrySnapshot>>>()?;

        Self::new(frames, tick_rate)
    }

    /// Set playback speed, clamped to 0.1x..10x.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed.clamp(0.1, 10.0);
        self.interval = pacing(self.tick_rate * self.speed);
        debug!("Playback speed set to {}x", self.speed);
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    /// Seconds of recording already played
    pub fn current_time(&self) -> f64 {
        (self.total_frames - self.frames.len()) as f64 / self.tick_rate
    }

    /// Total recording length in seconds
    pub fn duration(&self) -> f64 {
        self.total_frames as f64 / self.tick_rate
    }
}

fn pacing(rate: f64) -> Interval {
    let mut interval = interval(Duration::from_secs_f64(1.0 / rate));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

#[async_trait::async_trait]
impl SnapshotProvider for ReplayProvider {
    async fn next_snapshot(&mut self) -> Result<Option<TelemetrySnapshot>> {
        // End of replay is reported one frame after the last snapshot
        self.interval.tick().await;

        match self.frames.pop_front() {
            Some(snapshot) => {
                trace!(remaining = self.frames.len(), total = self.total_frames, "Replay frame");
                Ok(Some(snapshot))
            }
            None => {
                debug!("Reached end of replay");
                Ok(None)
            }
        }
    }

    fn tick_rate(&self) -> f64 {
        self.tick_rate * self.speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::snapshot_with_angle;
    use std::io::Write;

    #[tokio::test(start_paused = true)]
    async fn replays_in_order_then_ends() {
        let frames = vec![snapshot_with_angle(0.1), snapshot_with_angle(0.2)];
        let mut provider = ReplayProvider::new(frames, 60.0).unwrap();

        assert_eq!(provider.next_snapshot().await.unwrap().unwrap().steering_wheel_angle, Some(0.1));
        assert_eq!(provider.next_snapshot().await.unwrap().unwrap().steering_wheel_angle, Some(0.2));
        assert!(provider.next_snapshot().await.unwrap().is_none());
        assert_eq!(provider.current_time(), provider.duration());
    }

    #[tokio::test(start_paused = true)]
    async fn speed_is_clamped() {
        let mut provider = ReplayProvider::new(Vec::new(), 60.0).unwrap();
        provider.set_speed(50.0);
        assert_eq!(provider.speed(), 10.0);
        assert_eq!(provider.tick_rate(), 600.0);
        provider.set_speed(0.0);
        assert_eq!(provider.speed(), 0.1);
    }

    #[tokio::test]
    async fn rejects_non_positive_rate() {
        assert!(ReplayProvider::new(Vec::new(), 0.0).is_err());
        assert!(ReplayProvider::new(Vec::new(), f64::NAN).is_err());
    }

    #[tokio::test]
    async fn loads_json_lines() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, r#"{{"SteeringWheelAngle": 0.5}}"#)?;
        writeln!(file)?;
        writeln!(file, "{{}}")?;

        let provider = ReplayProvider::from_json_lines(file.path(), 60.0)?;
        assert_eq!(provider.remaining(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn reports_bad_line_number() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "{{}}")?;
        writeln!(file, "not json")?;

        match ReplayProvider::from_json_lines(file.path(), 60.0) {
            Err(DashboardError::Parse { context, .. }) => assert!(context.ends_with("line 2")),
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("expected parse failure"),
        }
        Ok(())
    }
}
