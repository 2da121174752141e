//! The process-wide tracking switch.
//!
//! One `Tracking` handle is constructed by the host process (usually from a
//! verbosity setting) and injected into every [`Trackable`] at construction.
//! All nodes sharing the handle see a toggle instantaneously; there is no
//! per-instance opt-out and no hidden global state.
//!
//! [`Trackable`]: crate::trackable::Trackable

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

/// Switch selecting between live emission and no-op tracking.
///
/// Disabled is the default. Toggling is expected to happen rarely (once at
/// process start), while `is_live` is read on every tracked operation.
#[derive(Debug)]
pub struct Tracking {
    live: AtomicBool,
}

impl Tracking {
    /// Create a switch in the disabled state.
    pub fn disabled() -> Self {
        Self {
            live: AtomicBool::new(false),
        }
    }

    /// Create a switch in the enabled state.
    pub fn enabled() -> Self {
        Self {
            live: AtomicBool::new(true),
        }
    }

    /// Enable emission for every node holding this switch.
    pub fn enable(&self) {
        if !self.live.swap(true, Ordering::Relaxed) {
            info!("Hook tracking enabled");
        }
    }

    /// Disable emission for every node holding this switch.
    pub fn disable(&self) {
        if self.live.swap(false, Ordering::Relaxed) {
            info!("Hook tracking disabled");
        }
    }

    /// Returns whether tracked operations currently emit.
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Relaxed)
    }
}

impl Default for Tracking {
    fn default() -> Self {
        Self::disabled()
    }
}
