//! Adaptive performance governor
//!
//! Maps device capabilities and frame statistics onto a bundle of animation
//! settings, keeps a short history of average FPS for smoothed reporting,
//! and raises a one-shot alert when the smoothed rate collapses.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::capabilities::CapabilityDescriptor;
use crate::error::{GovernorError, Result};
use crate::frame_monitor::{FrameStatistics, PerformanceLevel};

/// Number of average-FPS readings kept for the smoothed report average
pub const HISTORY_LEN: usize = 30;
/// Frame drops beyond this trigger the extra degradation penalty
pub const FRAME_DROP_PENALTY_THRESHOLD: u64 = 20;
/// Smoothed FPS below this raises the low-performance alert
pub const ALERT_RAISE_FPS: f64 = 20.0;
/// Smoothed FPS above this re-arms the alert
pub const ALERT_CLEAR_FPS: f64 = 40.0;

/// Animation complexity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationComplexity {
    #[default]
    High,
    Medium,
    Low,
    Minimal,
}

impl AnimationComplexity {
    pub fn name(&self) -> &'static str {
        match self {
            AnimationComplexity::High => "high",
            AnimationComplexity::Medium => "medium",
            AnimationComplexity::Low => "low",
            AnimationComplexity::Minimal => "minimal",
        }
    }
}

/// Animation parameters consumed by presentation code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveSettings {
    pub animation_complexity: AnimationComplexity,
    pub particle_count: u32,
    /// Seconds between staggered children
    pub stagger_delay: f64,
    /// Multiplier applied to base animation durations
    pub animation_duration: f64,
    pub enable_blur: bool,
    pub enable_shadows: bool,
    pub enable_gradients: bool,
    pub max_concurrent_animations: u32,
    pub should_reduce_motion: bool,
}

impl Default for AdaptiveSettings {
    fn default() -> Self {
        tier_bundle(PerformanceLevel::Excellent, false)
    }
}

impl AdaptiveSettings {
    /// Check the ranges accepted for manual overrides
    pub fn validate_override(&self) -> Result<()> {
        check_range("particleCount", self.particle_count as f64, 0.0, 50.0)?;
        check_range("animationDuration", self.animation_duration, 0.1, 2.0)?;
        check_range("staggerDelay", self.stagger_delay, 0.0, 1.0)?;
        check_range(
            "maxConcurrentAnimations",
            self.max_concurrent_animations as f64,
            1.0,
            20.0,
        )?;
        Ok(())
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_nan() || value < min || value > max {
        return Err(GovernorError::OverrideOutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Fixed settings bundle for a performance tier
pub fn tier_bundle(level: PerformanceLevel, is_mobile: bool) -> AdaptiveSettings {
    match level {
        PerformanceLevel::Excellent => AdaptiveSettings {
            animation_complexity: AnimationComplexity::High,
            particle_count: if is_mobile { 10 } else { 20 },
            stagger_delay: 0.1,
            animation_duration: 1.0,
            enable_blur: true,
            enable_shadows: true,
            enable_gradients: true,
            max_concurrent_animations: if is_mobile { 5 } else { 10 },
            should_reduce_motion: false,
        },
        PerformanceLevel::Good => AdaptiveSettings {
            animation_complexity: AnimationComplexity::Medium,
            particle_count: if is_mobile { 5 } else { 15 },
            stagger_delay: 0.08,
            animation_duration: 0.8,
            enable_blur: !is_mobile,
            enable_shadows: true,
            enable_gradients: true,
            max_concurrent_animations: if is_mobile { 3 } else { 8 },
            should_reduce_motion: false,
        },
        PerformanceLevel::Fair => AdaptiveSettings {
            animation_complexity: AnimationComplexity::Low,
            particle_count: if is_mobile { 3 } else { 10 },
            stagger_delay: 0.05,
            animation_duration: 0.6,
            enable_blur: false,
            enable_shadows: !is_mobile,
            enable_gradients: !is_mobile,
            max_concurrent_animations: if is_mobile { 2 } else { 5 },
            should_reduce_motion: false,
        },
        PerformanceLevel::Poor => AdaptiveSettings {
            animation_complexity: AnimationComplexity::Minimal,
            particle_count: 0,
            stagger_delay: 0.02,
            animation_duration: 0.3,
            enable_blur: false,
            enable_shadows: false,
            enable_gradients: false,
            max_concurrent_animations: 1,
            should_reduce_motion: true,
        },
    }
}

/// Derive settings from capabilities and the latest statistics.
///
/// Pure: the tier bundle is rebuilt every call, so the frame-drop penalty
/// never compounds.
pub fn recompute(capabilities: &CapabilityDescriptor, stats: &FrameStatistics) -> AdaptiveSettings {
    let mut settings = tier_bundle(stats.performance_level, capabilities.is_mobile);

    if stats.frame_drops > FRAME_DROP_PENALTY_THRESHOLD {
        settings.particle_count = settings.particle_count.saturating_sub(5);
        settings.max_concurrent_animations =
            settings.max_concurrent_animations.saturating_sub(2).max(1);
        settings.enable_blur = false;
    }

    if capabilities.should_use_simple_animations() {
        settings.animation_complexity = AnimationComplexity::Minimal;
        settings.should_reduce_motion = true;
    }

    settings
}

/// One-shot low-performance warning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceAlert {
    pub smoothed_fps: f64,
}

/// Snapshot handed to diagnostics consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    #[serde(rename = "currentFPS")]
    pub current_fps: u32,
    /// Smoothed over the recent history, not the raw window average
    #[serde(rename = "averageFPS")]
    pub average_fps: u32,
    pub performance_level: PerformanceLevel,
    pub frame_drops: u64,
    #[serde(rename = "adaptiveSettings")]
    pub settings: AdaptiveSettings,
    pub recommendations: Vec<String>,
}

/// Owns the effective settings and the reporting state
#[derive(Debug, Clone, Default)]
pub struct Governor {
    adaptive: AdaptiveSettings,
    manual_override: Option<AdaptiveSettings>,
    history: VecDeque<u32>,
    alert_raised: bool,
    last_stats: FrameStatistics,
}

impl Governor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings presentation code should use right now
    pub fn settings(&self) -> &AdaptiveSettings {
        self.manual_override.as_ref().unwrap_or(&self.adaptive)
    }

    /// Settings the governor would choose without an override
    pub fn adaptive_settings(&self) -> &AdaptiveSettings {
        &self.adaptive
    }

    pub fn manual_override(&self) -> Option<&AdaptiveSettings> {
        self.manual_override.as_ref()
    }

    pub fn alert_raised(&self) -> bool {
        self.alert_raised
    }

    /// Mean of the recorded average-FPS history, 0 when empty
    pub fn smoothed_fps(&self) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.history.iter().map(|&fps| fps as u64).sum();
        sum as f64 / self.history.len() as f64
    }

    /// Fold in a new statistics snapshot
    pub fn update(
        &mut self,
        capabilities: &CapabilityDescriptor,
        stats: &FrameStatistics,
    ) -> Option<PerformanceAlert> {
        self.history.push_back(stats.average_fps);
        if self.history.len() > HISTORY_LEN {
            self.history.pop_front();
        }

        self.refresh_settings(capabilities, stats);
        self.check_alert()
    }

    /// Re-derive settings without recording a history sample
    pub fn refresh_settings(&mut self, capabilities: &CapabilityDescriptor, stats: &FrameStatistics) {
        let next = recompute(capabilities, stats);
        if next.animation_complexity != self.adaptive.animation_complexity {
            debug!(
                level = stats.performance_level.name(),
                complexity = next.animation_complexity.name(),
                frame_drops = stats.frame_drops,
                "animation tier changed"
            );
        }
        self.adaptive = next;
        self.last_stats = stats.clone();
    }

    fn check_alert(&mut self) -> Option<PerformanceAlert> {
        let smoothed_fps = self.smoothed_fps();

        if smoothed_fps < ALERT_RAISE_FPS && !self.alert_raised {
            self.alert_raised = true;
            warn!(smoothed_fps, "low performance detected, reducing animation complexity");
            return Some(PerformanceAlert { smoothed_fps });
        }

        if smoothed_fps > ALERT_CLEAR_FPS && self.alert_raised {
            self.alert_raised = false;
            debug!(smoothed_fps, "performance recovered, alert re-armed");
        }

        None
    }

    /// Pin the effective settings to a validated manual override
    pub fn set_override(&mut self, settings: AdaptiveSettings) -> Result<()> {
        settings.validate_override()?;
        info!(
            particles = settings.particle_count,
            duration = settings.animation_duration,
            "manual settings override enabled"
        );
        self.manual_override = Some(settings);
        Ok(())
    }

    pub fn clear_override(&mut self) {
        if self.manual_override.take().is_some() {
            info!("manual settings override cleared");
        }
    }

    /// Drop the history and alert state, keeping the current settings
    pub fn reset_history(&mut self) {
        self.history.clear();
        self.alert_raised = false;
    }

    pub fn report(&self) -> PerformanceReport {
        let settings = self.settings().clone();
        let recommendations = recommendations(self.last_stats.frame_drops, &settings);

        PerformanceReport {
            current_fps: self.last_stats.current_fps,
            average_fps: self.smoothed_fps().round() as u32,
            performance_level: self.last_stats.performance_level,
            frame_drops: self.last_stats.frame_drops,
            settings,
            recommendations,
        }
    }
}

fn recommendations(frame_drops: u64, settings: &AdaptiveSettings) -> Vec<String> {
    let mut out = Vec::new();
    if frame_drops > 10 {
        out.push("Consider reducing animation complexity".to_string());
    }
    if settings.particle_count == 0 {
        out.push("Particles disabled for better performance".to_string());
    }
    if settings.should_reduce_motion {
        out.push("Motion reduced due to low performance".to_string());
    }
    out
}
