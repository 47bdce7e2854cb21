//! Hardware emergency-stop latch.
//!
//! The emergency button ISR calls [`EmergencyLatch::trigger`]; the control
//! loop reads [`EmergencyLatch::is_active`] at the top of every cycle.
//!
//! ```text
//!  button ISR ──trigger()──▶ ┌──────────────┐ ──is_active()──▶ ControlService
//!                            │ AtomicBool   │
//!       fail-safe pin writes │ (set-only)   │
//!                            └──────────────┘
//! ```
//!
//! The latch is single-writer, set-only: nothing in the firmware can clear
//! it.  Recovery is a human-attended reset of the whole board, which
//! re-initialises the static.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Pin-level fail-safe hook run from interrupt context.
///
/// Must only perform GPIO level writes: heater off, danger LED on.
pub type FailSafeFn = fn();

pub struct EmergencyLatch {
    active: AtomicBool,
    /// Number of `trigger()` calls, including repeats after the first.
    triggers: AtomicU32,
    fail_safe: Option<FailSafeFn>,
}

impl EmergencyLatch {
    /// A latch with no pin-level hook.  The controller still drives the
    /// fail-safe posture on its next cycle.
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            triggers: AtomicU32::new(0),
            fail_safe: None,
        }
    }

    /// A latch that drives the outputs to the fail-safe posture directly
    /// from the ISR, before the control loop observes the flag.
    pub const fn with_fail_safe(fail_safe: FailSafeFn) -> Self {
        Self {
            active: AtomicBool::new(false),
            triggers: AtomicU32::new(0),
            fail_safe: Some(fail_safe),
        }
    }

    /// Latch the emergency stop.
    ///
    /// Safe to call from interrupt context and re-entrant: lock-free,
    /// constant time, no allocation.
    pub fn trigger(&self) {
        if let Some(fail_safe) = self.fail_safe {
            fail_safe();
        }
        self.triggers.fetch_add(1, Ordering::Relaxed);
        self.active.store(true, Ordering::Release);
    }

    /// Whether the latch has ever been triggered since boot.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn trigger_count(&self) -> u32 {
        self.triggers.load(Ordering::Relaxed)
    }
}

impl Default for EmergencyLatch {
    fn default() -> Self {
        Self::new()
    }
}
