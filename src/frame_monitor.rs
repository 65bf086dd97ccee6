//! Frame-rate monitoring
//!
//! Track instantaneous FPS over a rolling window, derive current, average,
//! min and max rates, and count frames that fall below the drop threshold.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{info, trace};

/// Default number of samples kept in the rolling window
pub const DEFAULT_SAMPLE_SIZE: usize = 60;
/// Instantaneous FPS below this counts as a dropped frame
pub const FRAME_DROP_THRESHOLD: f64 = 30.0;
/// Deltas shorter than this are timer noise and would blow up the rate
pub const MIN_FRAME_DELTA_MS: f64 = 0.01;

/// Coarse performance tier derived from average FPS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceLevel {
    #[default]
    Excellent,
    Good,
    Fair,
    Poor,
}

impl PerformanceLevel {
    /// Classify an average frame rate: >=55 excellent, >=45 good, >=30 fair
    pub fn from_average_fps(average_fps: u32) -> Self {
        match average_fps {
            55.. => PerformanceLevel::Excellent,
            45..=54 => PerformanceLevel::Good,
            30..=44 => PerformanceLevel::Fair,
            _ => PerformanceLevel::Poor,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PerformanceLevel::Excellent => "excellent",
            PerformanceLevel::Good => "good",
            PerformanceLevel::Fair => "fair",
            PerformanceLevel::Poor => "poor",
        }
    }

    pub fn all() -> &'static [PerformanceLevel] {
        &ALL_LEVELS[..]
    }
}

static ALL_LEVELS: [PerformanceLevel; 4] = [
    PerformanceLevel::Excellent,
    PerformanceLevel::Good,
    PerformanceLevel::Fair,
    PerformanceLevel::Poor,
];

/// Snapshot of frame-rate statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameStatistics {
    #[serde(rename = "currentFPS")]
    pub current_fps: u32,
    #[serde(rename = "averageFPS")]
    pub average_fps: u32,
    #[serde(rename = "minFPS")]
    pub min_fps: u32,
    #[serde(rename = "maxFPS")]
    pub max_fps: u32,
    pub frame_drops: u64,
    pub performance_level: PerformanceLevel,
}

impl FrameStatistics {
    pub fn is_performance_good(&self) -> bool {
        self.average_fps >= 45
    }
}

impl Default for FrameStatistics {
    fn default() -> Self {
        Self {
            current_fps: 60,
            average_fps: 60,
            min_fps: 60,
            max_fps: 60,
            frame_drops: 0,
            performance_level: PerformanceLevel::Excellent,
        }
    }
}

/// Rolling frame-rate sampler
#[derive(Debug, Clone)]
pub struct FrameMonitor {
    samples: VecDeque<f64>,
    capacity: usize,
    last_frame_ms: Option<f64>,
    frame_drops: u64,
    stats: FrameStatistics,
}

impl FrameMonitor {
    /// Create a monitor keeping the last `sample_size` samples (at least one)
    pub fn new(sample_size: usize) -> Self {
        let capacity = sample_size.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            last_frame_ms: None,
            frame_drops: 0,
            stats: FrameStatistics::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples currently in the window, oldest first
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    pub fn statistics(&self) -> &FrameStatistics {
        &self.stats
    }

    /// Set the reference timestamp for the first measured frame
    pub fn seed(&mut self, now_ms: f64) {
        self.last_frame_ms = Some(now_ms);
    }

    /// Record a frame rendered at `now_ms`.
    ///
    /// Returns the updated statistics, or `None` when no sample was taken
    /// (unseeded first frame, or a delta shorter than [`MIN_FRAME_DELTA_MS`]).
    pub fn record_frame(&mut self, now_ms: f64) -> Option<&FrameStatistics> {
        let last = self.last_frame_ms.replace(now_ms)?;
        let delta = now_ms - last;
        if delta.is_nan() || delta < MIN_FRAME_DELTA_MS {
            trace!(delta, "discarding degenerate frame delta");
            return None;
        }

        self.push_sample(1000.0 / delta);
        Some(&self.stats)
    }

    /// Clear the window and the drop counter
    pub fn reset(&mut self) {
        self.samples.clear();
        self.frame_drops = 0;
        self.stats = FrameStatistics::default();
        info!("frame statistics reset");
    }

    fn push_sample(&mut self, fps: f64) {
        if fps < FRAME_DROP_THRESHOLD {
            self.frame_drops += 1;
        }

        self.samples.push_back(fps);
        if self.samples.len() > self.capacity {
            self.samples.pop_front();
        }

        self.update_stats(fps);
    }

    /// Update computed statistics
    fn update_stats(&mut self, latest: f64) {
        let count = self.samples.len() as f64;
        let sum: f64 = self.samples.iter().sum();
        let (min, max) = self
            .samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| {
                (lo.min(s), hi.max(s))
            });

        let average_fps = round_fps(sum / count);
        self.stats = FrameStatistics {
            current_fps: round_fps(latest),
            average_fps,
            min_fps: round_fps(min),
            max_fps: round_fps(max),
            frame_drops: self.frame_drops,
            performance_level: PerformanceLevel::from_average_fps(average_fps),
        };
    }
}

impl Default for FrameMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_SIZE)
    }
}

fn round_fps(fps: f64) -> u32 {
    fps.round().clamp(0.0, u32::MAX as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(monitor: &mut FrameMonitor, start: f64, deltas: &[f64]) -> f64 {
        let mut now = start;
        for delta in deltas {
            now += delta;
            monitor.record_frame(now);
        }
        now
    }

    #[test]
    fn test_monitor_initial() {
        let monitor = FrameMonitor::default();
        assert_eq!(monitor.statistics(), &FrameStatistics::default());
        assert_eq!(monitor.capacity(), 60);
    }

    #[test]
    fn test_unseeded_first_frame_only_seeds() {
        let mut monitor = FrameMonitor::default();
        assert!(monitor.record_frame(100.0).is_none());
        let stats = monitor.record_frame(116.0).unwrap();
        assert_eq!(stats.current_fps, 63);
    }

    #[test]
    fn test_steady_60fps() {
        let mut monitor = FrameMonitor::default();
        monitor.seed(0.0);
        feed(&mut monitor, 0.0, &[16.67; 60]);

        let stats = monitor.statistics();
        assert_eq!(stats.current_fps, 60);
        assert_eq!(stats.average_fps, 60);
        assert_eq!(stats.frame_drops, 0);
        assert_eq!(stats.performance_level, PerformanceLevel::Excellent);
        assert!(stats.is_performance_good());
    }

    #[test]
    fn test_duplicate_timestamp_is_discarded() {
        let mut monitor = FrameMonitor::default();
        monitor.seed(0.0);
        monitor.record_frame(20.0);
        let before = monitor.statistics().clone();

        assert!(monitor.record_frame(20.0).is_none());
        assert!(monitor.record_frame(10.0).is_none());
        assert_eq!(monitor.statistics(), &before);
        assert_eq!(monitor.samples().count(), 1);
    }

    #[test]
    fn test_tiny_delta_is_discarded() {
        let mut monitor = FrameMonitor::default();
        monitor.seed(0.0);
        assert!(monitor.record_frame(5e-324).is_none());
        assert!(monitor.record_frame(0.001).is_none());
        feed(&mut monitor, 0.001, &[100.0; 59]);

        let stats = monitor.statistics();
        assert_eq!(monitor.samples().count(), 59);
        assert_eq!(stats.average_fps, 10);
        assert_eq!(stats.max_fps, 10);
        assert_eq!(stats.frame_drops, 59);
        assert_eq!(stats.performance_level, PerformanceLevel::Poor);
    }

    #[test]
    fn test_window_evicts_oldest() {
        let mut monitor = FrameMonitor::new(3);
        monitor.seed(0.0);
        feed(&mut monitor, 0.0, &[100.0, 50.0, 20.0, 10.0]);

        let samples: Vec<f64> = monitor.samples().collect();
        assert_eq!(samples, vec![20.0, 50.0, 100.0]);
        assert_eq!(monitor.statistics().min_fps, 20);
        assert_eq!(monitor.statistics().max_fps, 100);
    }

    #[test]
    fn test_drops_outlive_window_until_reset() {
        let mut monitor = FrameMonitor::new(2);
        monitor.seed(0.0);
        let now = feed(&mut monitor, 0.0, &[50.0; 5]);
        feed(&mut monitor, now, &[10.0; 5]);

        assert_eq!(monitor.statistics().frame_drops, 5);
        assert_eq!(monitor.statistics().performance_level, PerformanceLevel::Excellent);

        monitor.reset();
        assert_eq!(monitor.statistics().frame_drops, 0);
        assert_eq!(monitor.samples().count(), 0);
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(PerformanceLevel::from_average_fps(55), PerformanceLevel::Excellent);
        assert_eq!(PerformanceLevel::from_average_fps(54), PerformanceLevel::Good);
        assert_eq!(PerformanceLevel::from_average_fps(45), PerformanceLevel::Good);
        assert_eq!(PerformanceLevel::from_average_fps(44), PerformanceLevel::Fair);
        assert_eq!(PerformanceLevel::from_average_fps(30), PerformanceLevel::Fair);
        assert_eq!(PerformanceLevel::from_average_fps(29), PerformanceLevel::Poor);
        assert_eq!(PerformanceLevel::from_average_fps(0), PerformanceLevel::Poor);
    }
}
