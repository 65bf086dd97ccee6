//! Report export and settings import
//!
//! A diagnostics export bundles the performance report with a timestamp and,
//! when a manual override is active, the overriding settings. Importing an
//! export restores that override.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{GovernorError, Result};
use crate::governor::{AdaptiveSettings, PerformanceReport};

/// Serialized diagnostics bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportExport {
    pub timestamp: DateTime<Utc>,
    pub performance_report: PerformanceReport,
    pub custom_settings: Option<AdaptiveSettings>,
}

impl ReportExport {
    pub fn new(report: PerformanceReport, custom_settings: Option<AdaptiveSettings>) -> Self {
        Self {
            timestamp: Utc::now(),
            performance_report: report,
            custom_settings,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Default file name, keyed by export time in milliseconds
    pub fn file_name(&self) -> String {
        format!("performance-report-{}.json", self.timestamp.timestamp_millis())
    }

    /// Write into `dir`, returning the path written
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        std::fs::write(&path, self.to_json()?)?;
        info!(path = %path.display(), "performance report exported");
        Ok(path)
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Most recent export in `dir` by the timestamp in its file name
    pub fn latest_in(dir: &Path) -> Result<Option<PathBuf>> {
        if !dir.exists() {
            return Ok(None);
        }

        let mut latest: Option<(i64, PathBuf)> = None;
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let Some(millis) = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_prefix("performance-report-"))
                .and_then(|rest| rest.strip_suffix(".json"))
                .and_then(|stamp| stamp.parse::<i64>().ok())
            else {
                continue;
            };
            if latest.as_ref().map_or(true, |(best, _)| millis > *best) {
                latest = Some((millis, path));
            }
        }

        Ok(latest.map(|(_, path)| path))
    }

    /// Settings to restore as a manual override
    pub fn into_custom_settings(self) -> Result<AdaptiveSettings> {
        self.custom_settings.ok_or(GovernorError::NoCustomSettings)
    }
}
