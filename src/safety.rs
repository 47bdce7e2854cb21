//! Gas-leak interlock.
//!
//! The monitor runs **every cycle before the FSM** and classifies the gas
//! reading against two fixed thresholds.  The controller uses the result
//! to decide whether to override the actuators and suppress the state
//! handler.
//!
//! ## Emergency lifecycle
//!
//! 1. A reading at or above the high threshold sets the emergency flag.
//!    [`GasMonitor::evaluate`] reports [`GasEdge::Entered`] on that cycle
//!    only, so the controller can snapshot the operating state once.
//! 2. While the flag is set the controller holds the protective posture.
//! 3. The first reading below the high threshold clears the flag and
//!    reports [`GasEdge::Cleared`]; the controller restores the snapshot.
//!
//! An unreadable sensor is classified as high-level.

use core::fmt;

use log::{error, info};
use serde::Serialize;

use crate::config::ControlConfig;

/// Gas concentration band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum GasLevel {
    #[default]
    Normal,
    /// At or above the low threshold: danger indicator only.
    Low,
    /// At or above the high threshold: protective override.
    High,
}

impl fmt::Display for GasLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Low => write!(f, "low"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Change in emergency status produced by one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasEdge {
    None,
    Entered,
    Cleared,
}

pub struct GasMonitor {
    low_threshold: u16,
    high_threshold: u16,
    level: GasLevel,
    in_emergency: bool,
}

impl GasMonitor {
    pub fn new(config: &ControlConfig) -> Self {
        Self {
            low_threshold: config.gas_low_threshold,
            high_threshold: config.gas_high_threshold,
            level: GasLevel::Normal,
            in_emergency: false,
        }
    }

    /// Band for a raw reading.
    pub fn classify(&self, raw: u16) -> GasLevel {
        if raw >= self.high_threshold {
            GasLevel::High
        } else if raw >= self.low_threshold {
            GasLevel::Low
        } else {
            GasLevel::Normal
        }
    }

    /// Evaluate the latest reading (`None` if the sensor could not be read).
    pub fn evaluate(&mut self, reading: Option<u16>) -> GasEdge {
        self.level = match reading {
            Some(raw) => self.classify(raw),
            None => GasLevel::High,
        };

        let high = self.level == GasLevel::High;
        match (self.in_emergency, high) {
            (false, true) => {
                error!("GAS ALARM SET: reading {reading:?} >= {}", self.high_threshold);
                self.in_emergency = true;
                GasEdge::Entered
            }
            (true, false) => {
                info!("GAS ALARM CLEARED: reading {reading:?}, level {}", self.level);
                self.in_emergency = false;
                GasEdge::Cleared
            }
            _ => GasEdge::None,
        }
    }

    pub fn level(&self) -> GasLevel {
        self.level
    }

    /// True while the high-level override is in force.
    pub fn in_emergency(&self) -> bool {
        self.in_emergency
    }

    /// Forget any previous emergency.  Used at controller start.
    pub fn reset(&mut self) {
        self.level = GasLevel::Normal;
        self.in_emergency = false;
    }
}
