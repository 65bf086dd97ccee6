//! motion-governor - Adaptive frame-rate governor for animated interfaces
//!
//! Samples rendering frame rate, classifies the running device, and derives
//! tiered animation settings for presentation code.

pub mod capabilities;
pub mod config;
pub mod context;
pub mod error;
pub mod frame_monitor;
pub mod governor;
pub mod input;
pub mod props;
pub mod report;
pub mod scheduler;
pub mod state;
pub mod ui;

// Re-export commonly used types
pub use capabilities::{CapabilityDescriptor, CapabilitySource};
pub use config::Config;
pub use context::PerformanceContext;
pub use error::GovernorError;
pub use frame_monitor::{FrameMonitor, FrameStatistics, PerformanceLevel};
pub use governor::{AdaptiveSettings, AnimationComplexity, Governor};
