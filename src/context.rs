//! Performance context
//!
//! Owns the capability probe, the governor and the latest frame statistics.
//! The frame monitor stays with the frame loop that drives it; statistics
//! arrive through [`PerformanceContext::on_frame`]. Presentation code receives
//! this value explicitly and reads snapshots between ticks.

use std::path::Path;

use tracing::info;

use crate::capabilities::{CapabilityDescriptor, CapabilityProbe, CapabilitySource, MotionSubscription};
use crate::error::Result;
use crate::frame_monitor::{FrameMonitor, FrameStatistics};
use crate::governor::{AdaptiveSettings, Governor, PerformanceAlert, PerformanceReport};
use crate::props::{optimized_props, AnimationKind, OptimizedProps};
use crate::report::ReportExport;

pub struct PerformanceContext<S: CapabilitySource> {
    probe: CapabilityProbe<S>,
    governor: Governor,
    stats: FrameStatistics,
    alerts: u64,
}

impl<S: CapabilitySource> PerformanceContext<S> {
    pub fn new(source: S) -> Self {
        let probe = CapabilityProbe::new(source);
        let mut governor = Governor::new();
        let stats = FrameStatistics::default();

        // Settle device-driven overrides before the first frame arrives
        governor.refresh_settings(&probe.capabilities(), &stats);

        Self {
            probe,
            governor,
            stats,
            alerts: 0,
        }
    }

    /// Frame callback: fold new statistics into the governor
    pub fn on_frame(&mut self, stats: &FrameStatistics) -> Option<PerformanceAlert> {
        self.stats = stats.clone();
        let caps = self.probe.capabilities();
        let alert = self.governor.update(&caps, stats);
        if alert.is_some() {
            self.alerts += 1;
        }
        alert
    }

    pub fn frame_statistics(&self) -> &FrameStatistics {
        &self.stats
    }

    pub fn capabilities(&self) -> CapabilityDescriptor {
        self.probe.capabilities()
    }

    pub fn adaptive_settings(&self) -> &AdaptiveSettings {
        self.governor.settings()
    }

    pub fn optimized_props(&self, kind: AnimationKind) -> OptimizedProps {
        optimized_props(self.governor.settings(), kind)
    }

    pub fn performance_report(&self) -> PerformanceReport {
        self.governor.report()
    }

    pub fn governor(&self) -> &Governor {
        &self.governor
    }

    /// Number of low-performance alerts raised so far
    pub fn alert_count(&self) -> u64 {
        self.alerts
    }

    pub fn subscribe_capabilities(&self) -> MotionSubscription {
        self.probe.subscribe()
    }

    /// Motion-preference change; settings are re-derived immediately
    pub fn set_reduced_motion(&mut self, reduced: bool) -> CapabilityDescriptor {
        let caps = self.probe.set_reduced_motion(reduced);
        self.rederive();
        caps
    }

    /// Re-read the device signals and re-derive settings
    pub fn refresh_capabilities(&mut self) -> CapabilityDescriptor {
        let caps = self.probe.refresh();
        self.rederive();
        caps
    }

    /// Reset the loop's monitor and the governor's history. Capabilities are
    /// kept.
    pub fn reset_metrics(&mut self, monitor: &mut FrameMonitor) {
        monitor.reset();
        self.stats = monitor.statistics().clone();
        self.governor.reset_history();
        self.rederive();
        info!("performance metrics reset");
    }

    pub fn set_override(&mut self, settings: AdaptiveSettings) -> Result<()> {
        self.governor.set_override(settings)
    }

    pub fn clear_override(&mut self) {
        self.governor.clear_override();
    }

    /// Bundle the current report, with the manual override if one is active
    pub fn export_report(&self) -> ReportExport {
        ReportExport::new(
            self.governor.report(),
            self.governor.manual_override().cloned(),
        )
    }

    /// Restore the manual override carried by an exported report
    pub fn import_settings(&mut self, json: &str) -> Result<()> {
        let settings = ReportExport::from_json(json)?.into_custom_settings()?;
        self.governor.set_override(settings)
    }

    /// Restore the manual override from an exported report file
    pub fn import_from(&mut self, path: &Path) -> Result<()> {
        let settings = ReportExport::read_from(path)?.into_custom_settings()?;
        self.governor.set_override(settings)?;
        info!(path = %path.display(), "manual override imported");
        Ok(())
    }

    fn rederive(&mut self) {
        let caps = self.probe.capabilities();
        self.governor.refresh_settings(&caps, &self.stats);
    }
}
