//! Frame scheduling
//!
//! A cancellable repeating task that feeds frame timestamps into a
//! [`FrameMonitor`]. The scheduler is abstract so the same loop can run
//! against the wall clock or a replay of synthetic timestamps.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{GovernorError, Result};
use crate::frame_monitor::{FrameMonitor, FrameStatistics};

/// Source of frame wake-ups
pub trait FrameScheduler {
    /// Current time in milliseconds on the scheduler's clock
    fn now_ms(&self) -> f64;

    /// Wait for the next frame and return its timestamp, or `None` once the
    /// source has no more frames
    fn next_frame(&mut self) -> Option<f64>;
}

/// Paces frames against the monotonic clock at a target refresh rate
#[derive(Debug)]
pub struct SystemScheduler {
    origin: Instant,
    frame_interval: Duration,
    next_deadline: Instant,
}

impl SystemScheduler {
    pub fn new(target_fps: u32) -> Result<Self> {
        if target_fps == 0 {
            return Err(GovernorError::InvalidFrameRate(target_fps));
        }
        let origin = Instant::now();
        let frame_interval = Duration::from_secs_f64(1.0 / target_fps as f64);
        Ok(Self {
            origin,
            frame_interval,
            next_deadline: origin + frame_interval,
        })
    }

    /// Time left before the next frame is due
    pub fn time_until_next_frame(&self) -> Duration {
        self.next_deadline.saturating_duration_since(Instant::now())
    }
}

impl FrameScheduler for SystemScheduler {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn next_frame(&mut self) -> Option<f64> {
        let wait = self.time_until_next_frame();
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }

        // Late frames re-anchor instead of bursting to catch up
        let now = Instant::now();
        self.next_deadline = (self.next_deadline + self.frame_interval).max(now);
        Some(self.now_ms())
    }
}

/// Replays a fixed sequence of timestamps
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now_ms: f64,
    pending: VecDeque<f64>,
}

impl ManualScheduler {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now_ms: start_ms,
            pending: VecDeque::new(),
        }
    }

    /// Build a schedule from frame deltas, starting at `start_ms`
    pub fn from_deltas(start_ms: f64, deltas: impl IntoIterator<Item = f64>) -> Self {
        let mut scheduler = Self::new(start_ms);
        scheduler.extend_deltas(deltas);
        scheduler
    }

    /// Append frames after the last scheduled one
    pub fn extend_deltas(&mut self, deltas: impl IntoIterator<Item = f64>) {
        let mut at = self.pending.back().copied().unwrap_or(self.now_ms);
        for delta in deltas {
            at += delta;
            self.pending.push_back(at);
        }
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl FrameScheduler for ManualScheduler {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }

    fn next_frame(&mut self) -> Option<f64> {
        let ts = self.pending.pop_front()?;
        self.now_ms = ts;
        Some(ts)
    }
}

/// Cooperative stop signal for a [`FrameLoop`]
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Drives a [`FrameMonitor`] from a [`FrameScheduler`]
pub struct FrameLoop<S: FrameScheduler> {
    monitor: FrameMonitor,
    scheduler: S,
    cancel: CancelHandle,
}

impl<S: FrameScheduler> FrameLoop<S> {
    /// Seed the monitor from the scheduler's clock and arm the loop
    pub fn start(mut monitor: FrameMonitor, scheduler: S) -> (Self, CancelHandle) {
        monitor.seed(scheduler.now_ms());
        let cancel = CancelHandle::default();
        let frame_loop = Self {
            monitor,
            scheduler,
            cancel: cancel.clone(),
        };
        (frame_loop, cancel)
    }

    pub fn monitor_mut(&mut self) -> &mut FrameMonitor {
        &mut self.monitor
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Run one scheduled callback.
    ///
    /// Returns `false` once the loop is cancelled or the scheduler is
    /// exhausted. A callback already in flight when `cancel` is called still
    /// delivers its statistics.
    pub fn pump<F>(&mut self, mut on_update: F) -> bool
    where
        F: FnMut(&FrameStatistics),
    {
        if self.cancel.is_cancelled() {
            return false;
        }

        let Some(now) = self.scheduler.next_frame() else {
            debug!("frame source exhausted");
            return false;
        };

        if let Some(stats) = self.monitor.record_frame(now) {
            on_update(stats);
        }

        !self.cancel.is_cancelled()
    }

    /// Pump until cancelled or the scheduler runs dry
    pub fn run<F>(&mut self, mut on_update: F)
    where
        F: FnMut(&FrameStatistics),
    {
        while self.pump(&mut on_update) {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_scheduler_replays_deltas() {
        let mut scheduler = ManualScheduler::from_deltas(10.0, [5.0, 5.0]);
        assert_eq!(scheduler.now_ms(), 10.0);
        assert_eq!(scheduler.next_frame(), Some(15.0));
        assert_eq!(scheduler.next_frame(), Some(20.0));
        assert_eq!(scheduler.next_frame(), None);
    }

    #[test]
    fn test_loop_runs_until_exhausted() {
        let scheduler = ManualScheduler::from_deltas(0.0, vec![20.0; 10]);
        let (mut frame_loop, _cancel) = FrameLoop::start(FrameMonitor::default(), scheduler);

        let mut updates = 0;
        frame_loop.run(|stats| {
            assert_eq!(stats.current_fps, 50);
            updates += 1;
        });

        assert_eq!(updates, 10);
    }

    #[test]
    fn test_cancel_stops_rescheduling() {
        let scheduler = ManualScheduler::from_deltas(0.0, vec![16.0; 10]);
        let (mut frame_loop, cancel) = FrameLoop::start(FrameMonitor::default(), scheduler);

        let mut updates = 0;
        frame_loop.run(|_| {
            updates += 1;
            if updates == 3 {
                cancel.cancel();
            }
        });

        assert_eq!(updates, 3);
        assert_eq!(frame_loop.scheduler().remaining(), 7);
        assert!(!frame_loop.pump(|_| panic!("cancelled loop must not tick")));
    }

    #[test]
    fn test_system_scheduler_rejects_zero_rate() {
        assert!(SystemScheduler::new(0).is_err());
        let scheduler = SystemScheduler::new(120).unwrap();
        assert!(scheduler.time_until_next_frame() <= Duration::from_millis(9));
    }
}
