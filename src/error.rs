//! Error types
//!
//! The governor's computations are total; these errors only surface at the
//! edges (configuration, manual overrides, report import/export).

use thiserror::Error;

/// Errors raised by the fallible edges of the governor
#[derive(Debug, Error)]
pub enum GovernorError {
    /// The rolling frame window must hold at least one sample
    #[error("sample window must hold at least one frame")]
    EmptySampleWindow,

    /// Target refresh rate must be positive
    #[error("target frame rate must be positive, got {0}")]
    InvalidFrameRate(u32),

    /// A manual override field is outside its accepted range
    #[error("override field `{field}` out of range: {value} (expected {min}..={max})")]
    OverrideOutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// An imported report carried no custom settings to apply
    #[error("report export contains no custom settings")]
    NoCustomSettings,

    #[error("invalid report JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GovernorError>;
