//! Dashboard state management
//!
//! Single source of truth for the overlay: the performance context plus the
//! UI-only bits (help, override editor, status line).

use std::path::PathBuf;

use crate::capabilities::CapabilitySource;
use crate::config::Config;
use crate::context::PerformanceContext;
use crate::governor::AdaptiveSettings;
use crate::report::ReportExport;

/// Field selected in the manual-override editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverrideField {
    #[default]
    ParticleCount,
    AnimationDuration,
    MaxConcurrent,
    Blur,
    Shadows,
    Gradients,
}

impl OverrideField {
    pub fn name(&self) -> &'static str {
        match self {
            OverrideField::ParticleCount => "Particle Count",
            OverrideField::AnimationDuration => "Animation Duration",
            OverrideField::MaxConcurrent => "Max Concurrent",
            OverrideField::Blur => "Enable Blur",
            OverrideField::Shadows => "Enable Shadows",
            OverrideField::Gradients => "Enable Gradients",
        }
    }

    pub fn all() -> &'static [OverrideField] {
        &ALL_OVERRIDE_FIELDS[..]
    }

    pub fn next(&self) -> Self {
        let fields = Self::all();
        let idx = fields.iter().position(|f| f == self).unwrap_or(0);
        fields[(idx + 1) % fields.len()]
    }

    pub fn prev(&self) -> Self {
        let fields = Self::all();
        let idx = fields.iter().position(|f| f == self).unwrap_or(0);
        fields[(idx + fields.len() - 1) % fields.len()]
    }

    /// Current value rendered for the editor
    pub fn value(&self, settings: &AdaptiveSettings) -> String {
        let on_off = |b: bool| if b { "On" } else { "Off" }.to_string();
        match self {
            OverrideField::ParticleCount => settings.particle_count.to_string(),
            OverrideField::AnimationDuration => format!("{:.1}s", settings.animation_duration),
            OverrideField::MaxConcurrent => settings.max_concurrent_animations.to_string(),
            OverrideField::Blur => on_off(settings.enable_blur),
            OverrideField::Shadows => on_off(settings.enable_shadows),
            OverrideField::Gradients => on_off(settings.enable_gradients),
        }
    }
}

static ALL_OVERRIDE_FIELDS: [OverrideField; 6] = [
    OverrideField::ParticleCount,
    OverrideField::AnimationDuration,
    OverrideField::MaxConcurrent,
    OverrideField::Blur,
    OverrideField::Shadows,
    OverrideField::Gradients,
];

/// Main dashboard state
pub struct DashboardState<S: CapabilitySource> {
    pub context: PerformanceContext<S>,
    pub config: Config,

    pub show_dashboard: bool,
    pub show_help: bool,
    pub should_quit: bool,
    pub reset_requested: bool,

    pub selected_field: OverrideField,
    pub status_message: String,
    pub status_is_error: bool,
    pub last_export: Option<PathBuf>,
}

impl<S: CapabilitySource> DashboardState<S> {
    pub fn new(config: Config, context: PerformanceContext<S>) -> Self {
        Self {
            context,
            show_dashboard: config.overlay.show_by_default,
            config,
            show_help: false,
            should_quit: false,
            reset_requested: false,
            selected_field: OverrideField::default(),
            status_message: "Ready - Press [?] for help".to_string(),
            status_is_error: false,
            last_export: None,
        }
    }

    /// Set status message
    pub fn set_status(&mut self, message: &str, is_error: bool) {
        self.status_message = message.to_string();
        self.status_is_error = is_error;
    }

    pub fn override_active(&self) -> bool {
        self.context.governor().manual_override().is_some()
    }

    /// Toggle the manual override, seeding it from the current settings
    pub fn toggle_override(&mut self) {
        if self.override_active() {
            self.context.clear_override();
            self.set_status("Manual override off", false);
            return;
        }

        let seed = clamp_to_override_ranges(self.context.adaptive_settings().clone());
        match self.context.set_override(seed) {
            Ok(()) => self.set_status("Manual override on", false),
            Err(e) => self.set_status(&format!("Override rejected: {}", e), true),
        }
    }

    /// Step the selected override field. Numeric fields move by one unit,
    /// toggles flip regardless of direction.
    pub fn adjust_selected(&mut self, increase: bool) {
        let Some(current) = self.context.governor().manual_override().cloned() else {
            self.set_status("Enable manual override with [O] first", true);
            return;
        };

        let mut next = current;
        match self.selected_field {
            OverrideField::ParticleCount => {
                next.particle_count = step_u32(next.particle_count, increase, 0, 50);
            }
            OverrideField::AnimationDuration => {
                let delta = if increase { 0.1 } else { -0.1 };
                let stepped = ((next.animation_duration + delta) * 10.0).round() / 10.0;
                next.animation_duration = stepped.clamp(0.1, 2.0);
            }
            OverrideField::MaxConcurrent => {
                next.max_concurrent_animations =
                    step_u32(next.max_concurrent_animations, increase, 1, 20);
            }
            OverrideField::Blur => next.enable_blur = !next.enable_blur,
            OverrideField::Shadows => next.enable_shadows = !next.enable_shadows,
            OverrideField::Gradients => next.enable_gradients = !next.enable_gradients,
        }

        let field = self.selected_field;
        let value = field.value(&next);
        match self.context.set_override(next) {
            Ok(()) => self.set_status(&format!("{}: {}", field.name(), value), false),
            Err(e) => self.set_status(&e.to_string(), true),
        }
    }

    pub fn toggle_reduced_motion(&mut self) {
        let reduced = !self.context.capabilities().prefers_reduced_motion;
        self.context.set_reduced_motion(reduced);
        let label = if reduced { "on" } else { "off" };
        self.set_status(&format!("Reduced motion {}", label), false);
    }

    /// Write a report export into the configured directory
    pub fn export_report(&mut self) {
        let export = self.context.export_report();
        match export.write_to_dir(&self.config.export_dir()) {
            Ok(path) => {
                self.set_status(&format!("Exported {}", path.display()), false);
                self.last_export = Some(path);
            }
            Err(e) => self.set_status(&format!("Export failed: {}", e), true),
        }
    }

    /// Restore the override carried by the newest export in the export dir
    pub fn import_latest_report(&mut self) {
        let dir = self.config.export_dir();
        let path = match ReportExport::latest_in(&dir) {
            Ok(Some(path)) => path,
            Ok(None) => {
                self.set_status(&format!("No reports in {}", dir.display()), true);
                return;
            }
            Err(e) => {
                self.set_status(&format!("Import failed: {}", e), true);
                return;
            }
        };

        match self.context.import_from(&path) {
            Ok(()) => self.set_status(&format!("Imported {}", path.display()), false),
            Err(e) => self.set_status(&format!("Import failed: {}", e), true),
        }
    }

    pub fn redetect_device(&mut self) {
        let caps = self.context.refresh_capabilities();
        let kind = match (caps.is_mobile, caps.is_low_end) {
            (true, true) => "mobile, low-end",
            (true, false) => "mobile",
            (false, true) => "low-end",
            (false, false) => "desktop",
        };
        self.set_status(&format!("Device re-detected: {}", kind), false);
    }
}

fn step_u32(value: u32, increase: bool, min: u32, max: u32) -> u32 {
    if increase {
        value.saturating_add(1).min(max)
    } else {
        value.saturating_sub(1).max(min)
    }
}

/// Fit settings into the editor's accepted ranges
fn clamp_to_override_ranges(mut settings: AdaptiveSettings) -> AdaptiveSettings {
    settings.particle_count = settings.particle_count.min(50);
    settings.animation_duration = settings.animation_duration.clamp(0.1, 2.0);
    settings.stagger_delay = settings.stagger_delay.clamp(0.0, 1.0);
    settings.max_concurrent_animations = settings.max_concurrent_animations.clamp(1, 20);
    settings
}
