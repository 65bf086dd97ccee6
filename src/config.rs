//! Configuration management
//!
//! Load and save governor preferences to a TOML config file.

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::capabilities::SystemCapabilitySource;
use crate::error::GovernorError;
use crate::frame_monitor::DEFAULT_SAMPLE_SIZE;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub monitor: MonitorPreferences,
    pub device: DevicePreferences,
    pub overlay: OverlayPreferences,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, falling back to defaults if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = Self::project_dirs() {
            Ok(proj_dirs.config_dir().join("config.toml"))
        } else {
            // Fallback to current directory
            Ok(PathBuf::from("motion-governor.toml"))
        }
    }

    /// Directory for exported reports, defaulting to the data dir
    pub fn export_dir(&self) -> PathBuf {
        if let Some(dir) = &self.overlay.export_dir {
            return dir.clone();
        }
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().join("reports"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Log file used while the dashboard owns the terminal
    pub fn log_path(&self) -> PathBuf {
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().join("motion-governor.log"))
            .unwrap_or_else(|| PathBuf::from("motion-governor.log"))
    }

    pub fn validate(&self) -> std::result::Result<(), GovernorError> {
        if self.monitor.sample_size == 0 {
            return Err(GovernorError::EmptySampleWindow);
        }
        if self.monitor.target_fps == 0 {
            return Err(GovernorError::InvalidFrameRate(0));
        }
        Ok(())
    }

    /// Capability source configured from the device section
    pub fn capability_source(&self) -> SystemCapabilitySource {
        SystemCapabilitySource {
            viewport_width: self.device.viewport_width,
            user_agent: self.device.user_agent.clone(),
            prefers_reduced_motion: self.device.prefers_reduced_motion,
        }
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "motion-governor", "motion-governor")
    }
}

/// Frame sampling preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorPreferences {
    pub sample_size: usize,
    pub target_fps: u32,
}

impl Default for MonitorPreferences {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            target_fps: 60,
        }
    }
}

/// Device signals with no native probe
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevicePreferences {
    pub viewport_width: Option<u32>,
    pub user_agent: Option<String>,
    /// Unset means "read REDUCE_MOTION from the environment"
    pub prefers_reduced_motion: Option<bool>,
}

/// Dashboard preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayPreferences {
    pub show_by_default: bool,
    pub export_dir: Option<PathBuf>,
}

impl Default for OverlayPreferences {
    fn default() -> Self {
        Self {
            show_by_default: true,
            export_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.monitor.sample_size, 60);
        assert_eq!(config.monitor.target_fps, 60);
        assert!(config.device.viewport_width.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.device.viewport_width = Some(390);
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Config = toml::from_str("[monitor]\nsample_size = 30\n").unwrap();
        assert_eq!(parsed.monitor.sample_size, 30);
        assert_eq!(parsed.monitor.target_fps, 60);
    }

    #[test]
    fn test_save_and_load_roundtrip_on_disk() {
        let path = std::env::temp_dir()
            .join(format!("motion-governor-test-{}", std::process::id()))
            .join("config.toml");
        let mut config = Config::default();
        config.monitor.target_fps = 144;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.monitor.target_fps, 144);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("motion-governor-does-not-exist.toml");
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut config = Config::default();
        config.monitor.sample_size = 0;
        assert!(matches!(config.validate(), Err(GovernorError::EmptySampleWindow)));
    }
}
