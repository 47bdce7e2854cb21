//! Controller configuration parameters
//!
//! Every threshold the control and safety logic depends on.  The chamber
//! runs with the compile-time [`ControlConfig::DEFAULT`]; there is no
//! runtime update path.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Core controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlConfig {
    // --- Thermal control ---
    /// Band around the setpoint (°C) that separates Standby/Preheating/Maintaining.
    /// Must exceed sensor noise to avoid oscillation.
    pub hysteresis_c: f32,
    /// Trend (°C/s) below which Maintaining fires a corrective pulse.  Negative.
    pub trend_threshold_c_per_s: f32,
    /// Minimum spacing between trend recomputations (milliseconds)
    pub trend_interval_ms: u64,
    /// Length of one predictive heating pulse (milliseconds)
    pub pulse_duration_ms: u64,

    // --- Gas interlock (raw 10-bit scale) ---
    /// At/above this reading the danger indicator is lit
    pub gas_low_threshold: u16,
    /// At/above this reading the heater is cut and the alarm sounds
    pub gas_high_threshold: u16,

    // --- Setpoint potentiometer ---
    pub setpoint_min_c: f32,
    pub setpoint_max_c: f32,

    // --- Siren ---
    pub siren_min_hz: u32,
    pub siren_max_hz: u32,
    pub siren_step_hz: u32,
    /// Time between siren frequency steps (milliseconds)
    pub siren_update_interval_ms: u64,

    // --- Timing ---
    /// Telemetry report interval (milliseconds)
    pub telemetry_interval_ms: u64,
}

impl ControlConfig {
    /// The thresholds the chamber ships with.
    pub const DEFAULT: Self = Self {
        // Thermal control
        hysteresis_c: 0.5,
        trend_threshold_c_per_s: -0.05,
        trend_interval_ms: 2_000,
        pulse_duration_ms: 2_000,

        // Gas interlock
        gas_low_threshold: 400,
        gas_high_threshold: 700,

        // Setpoint
        setpoint_min_c: 20.0,
        setpoint_max_c: 40.0,

        // Siren
        siren_min_hz: 500,
        siren_max_hz: 1_500,
        siren_step_hz: 25,
        siren_update_interval_ms: 15,

        // Timing
        telemetry_interval_ms: 60_000,
    };

    /// Reject parameter sets the control law cannot run with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.hysteresis_c.is_nan() || self.hysteresis_c <= 0.0 {
            return Err(Error::Config("hysteresis must be positive"));
        }
        if self.trend_threshold_c_per_s.is_nan() || self.trend_threshold_c_per_s >= 0.0 {
            return Err(Error::Config("trend threshold must be negative"));
        }
        if self.trend_interval_ms == 0 || self.pulse_duration_ms == 0 {
            return Err(Error::Config("trend interval and pulse duration must be non-zero"));
        }
        if self.gas_low_threshold >= self.gas_high_threshold {
            return Err(Error::Config("gas low threshold must be below high threshold"));
        }
        if self.setpoint_min_c >= self.setpoint_max_c {
            return Err(Error::Config("setpoint range is empty"));
        }
        if self.siren_min_hz >= self.siren_max_hz || self.siren_step_hz == 0 {
            return Err(Error::Config("siren sweep band is empty"));
        }
        Ok(())
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
