//! Device capability detection
//!
//! Classifies the running device as mobile and/or low-end and tracks the
//! user's reduced-motion preference. Raw signals come from a
//! [`CapabilitySource`]; classification is a pure function over them.

use std::env;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crossbeam_channel::{unbounded, Receiver, Sender};
use sysinfo::System;
use tracing::debug;

/// Viewport narrower than this is treated as a phone/tablet layout
pub const MOBILE_VIEWPORT_WIDTH: u32 = 768;
/// Viewport narrower than this marks the device as low-end
pub const LOW_END_VIEWPORT_WIDTH: u32 = 480;
/// Devices reporting less memory than this (GB) are low-end
pub const LOW_END_MEMORY_GB: f64 = 4.0;
/// Devices with fewer logical cores than this are low-end
pub const LOW_END_CORES: usize = 4;

const MOBILE_AGENT_TOKENS: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Raw environment signals. Any of them may be unavailable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvironmentSignals {
    pub viewport_width: Option<u32>,
    pub logical_cores: Option<usize>,
    pub device_memory_gb: Option<f64>,
    pub user_agent: Option<String>,
    pub prefers_reduced_motion: bool,
}

/// Classification of the running device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapabilityDescriptor {
    pub is_mobile: bool,
    pub is_low_end: bool,
    pub prefers_reduced_motion: bool,
}

impl CapabilityDescriptor {
    /// Whether presentation code should fall back to the simplest animations
    pub fn should_use_simple_animations(&self) -> bool {
        self.is_mobile || self.is_low_end || self.prefers_reduced_motion
    }

    /// Upper bound on simultaneously animated elements for this device
    pub fn max_animated_elements(&self) -> u32 {
        if self.is_low_end {
            10
        } else if self.is_mobile {
            20
        } else {
            50
        }
    }

    /// Device-level animation duration multiplier
    pub fn base_animation_duration(&self) -> f64 {
        if self.prefers_reduced_motion {
            0.1
        } else if self.is_low_end {
            0.3
        } else if self.is_mobile {
            0.5
        } else {
            1.0
        }
    }
}

/// Classify a set of environment signals
pub fn compute_capabilities(signals: &EnvironmentSignals) -> CapabilityDescriptor {
    let narrow = signals
        .viewport_width
        .is_some_and(|w| w < MOBILE_VIEWPORT_WIDTH);
    let mobile_agent = signals
        .user_agent
        .as_deref()
        .is_some_and(is_mobile_user_agent);

    let low_memory = signals
        .device_memory_gb
        .is_some_and(|gb| gb > 0.0 && gb < LOW_END_MEMORY_GB);
    let few_cores = signals
        .logical_cores
        .is_some_and(|n| n > 0 && n < LOW_END_CORES);
    let tiny_viewport = signals
        .viewport_width
        .is_some_and(|w| w < LOW_END_VIEWPORT_WIDTH);

    CapabilityDescriptor {
        is_mobile: narrow || mobile_agent,
        is_low_end: low_memory || few_cores || tiny_viewport,
        prefers_reduced_motion: signals.prefers_reduced_motion,
    }
}

/// Coarse user-agent sniffing for handheld devices
pub fn is_mobile_user_agent(agent: &str) -> bool {
    let agent = agent.to_lowercase();
    MOBILE_AGENT_TOKENS.iter().any(|token| agent.contains(token))
}

/// Provider of raw environment signals
pub trait CapabilitySource {
    fn signals(&self) -> EnvironmentSignals;
}

/// Reads signals from the host system.
///
/// Core count and memory are read from the OS. Viewport and user agent have
/// no native equivalent and are taken from configuration when present.
#[derive(Debug, Clone, Default)]
pub struct SystemCapabilitySource {
    pub viewport_width: Option<u32>,
    pub user_agent: Option<String>,
    pub prefers_reduced_motion: Option<bool>,
}

impl CapabilitySource for SystemCapabilitySource {
    fn signals(&self) -> EnvironmentSignals {
        let logical_cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .ok();

        let mut sys = System::new();
        sys.refresh_memory();
        let total = sys.total_memory();
        let device_memory_gb = (total > 0).then(|| total as f64 / (1024.0 * 1024.0 * 1024.0));

        let prefers_reduced_motion = self
            .prefers_reduced_motion
            .unwrap_or_else(reduced_motion_from_env);

        EnvironmentSignals {
            viewport_width: self.viewport_width,
            logical_cores,
            device_memory_gb,
            user_agent: self.user_agent.clone(),
            prefers_reduced_motion,
        }
    }
}

/// `REDUCE_MOTION` set to anything but `0`/`false` requests reduced motion
fn reduced_motion_from_env() -> bool {
    match env::var("REDUCE_MOTION") {
        Ok(v) => {
            let v = v.trim().to_lowercase();
            !(v.is_empty() || v == "0" || v == "false")
        }
        Err(_) => false,
    }
}

/// Deterministic source for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct FixedCapabilitySource(pub EnvironmentSignals);

impl CapabilitySource for FixedCapabilitySource {
    fn signals(&self) -> EnvironmentSignals {
        self.0.clone()
    }
}

type ListenerMap = Mutex<Vec<(u64, Sender<CapabilityDescriptor>)>>;

/// Owns a capability source, the current descriptor, and the
/// motion-preference listeners.
pub struct CapabilityProbe<S: CapabilitySource> {
    source: S,
    signals: EnvironmentSignals,
    current: CapabilityDescriptor,
    motion_preference: Option<bool>,
    listeners: Arc<ListenerMap>,
    next_id: AtomicU64,
}

impl<S: CapabilitySource> CapabilityProbe<S> {
    pub fn new(source: S) -> Self {
        let signals = source.signals();
        let current = compute_capabilities(&signals);
        debug!(
            is_mobile = current.is_mobile,
            is_low_end = current.is_low_end,
            reduced_motion = current.prefers_reduced_motion,
            "device capabilities detected"
        );

        Self {
            source,
            signals,
            current,
            motion_preference: None,
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn capabilities(&self) -> CapabilityDescriptor {
        self.current
    }

    /// Re-read the source. A motion preference set through
    /// [`set_reduced_motion`](Self::set_reduced_motion) survives the re-read.
    pub fn refresh(&mut self) -> CapabilityDescriptor {
        self.signals = self.source.signals();
        if let Some(reduced) = self.motion_preference {
            self.signals.prefers_reduced_motion = reduced;
        }
        self.apply(compute_capabilities(&self.signals));
        self.current
    }

    /// Motion-preference change event
    pub fn set_reduced_motion(&mut self, reduced: bool) -> CapabilityDescriptor {
        self.motion_preference = Some(reduced);
        if self.signals.prefers_reduced_motion != reduced {
            self.signals.prefers_reduced_motion = reduced;
            self.apply(compute_capabilities(&self.signals));
        }
        self.current
    }

    /// Register for descriptor updates. The listener is removed when the
    /// returned subscription is dropped.
    pub fn subscribe(&self) -> MotionSubscription {
        let (tx, rx) = unbounded();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.listeners).push((id, tx));

        MotionSubscription {
            id,
            rx,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Number of live subscriptions
    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).len()
    }

    fn apply(&mut self, next: CapabilityDescriptor) {
        if next == self.current {
            return;
        }
        self.current = next;
        debug!(reduced_motion = next.prefers_reduced_motion, "capabilities changed");

        for (_, tx) in lock(&self.listeners).iter() {
            let _ = tx.send(next);
        }
    }
}

fn lock(listeners: &ListenerMap) -> std::sync::MutexGuard<'_, Vec<(u64, Sender<CapabilityDescriptor>)>> {
    // A poisoned registry still holds valid senders
    listeners.lock().unwrap_or_else(|e| e.into_inner())
}

/// Live registration for capability updates
pub struct MotionSubscription {
    id: u64,
    rx: Receiver<CapabilityDescriptor>,
    listeners: Weak<ListenerMap>,
}

impl MotionSubscription {
    /// Drain pending updates, returning the most recent one
    pub fn latest(&self) -> Option<CapabilityDescriptor> {
        self.rx.try_iter().last()
    }
}

impl Drop for MotionSubscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            lock(&listeners).retain(|(id, _)| *id != self.id);
        }
    }
}
