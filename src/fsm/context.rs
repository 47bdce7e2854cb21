//! Shared mutable context threaded through every FSM handler.
//!
//! `ControllerContext` is the single struct that state handlers read from
//! and write to: the sensor snapshot for this cycle, the actuator commands
//! the cycle will apply, the predictive-control timers, and configuration.
//! Only the controller and its handlers ever touch it.

use serde::Serialize;

use crate::config::ControlConfig;
use crate::control::pulse::HeatPulse;
use crate::control::trend::TrendEstimator;

use super::OperatingState;

// ---------------------------------------------------------------------------
// Sensor snapshot (read-only to state handlers; written by the controller)
// ---------------------------------------------------------------------------

/// One reading of every input the control law depends on.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorSnapshot {
    /// Chamber temperature (°C).
    pub temperature_c: f32,
    /// Gas concentration, raw 10-bit scale (monotonic with concentration).
    pub gas_raw: u16,
    /// Operator-selected target temperature (°C).
    pub setpoint_c: f32,
}

// ---------------------------------------------------------------------------
// Actuator commands (written by state handlers; applied by the controller)
// ---------------------------------------------------------------------------

/// Two-LED status indicator: green = safe, red = danger / heating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Indicator {
    #[default]
    Off,
    Safe,
    Danger,
}

/// Commands that state handlers write to request actuator actions.
/// The controller applies these through the actuator port every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActuatorCommands {
    pub heater: bool,
    pub indicator: Indicator,
    pub alarm: bool,
}

impl ActuatorCommands {
    /// Heater off, alarm on, danger indicator.
    pub fn fail_safe() -> Self {
        Self {
            heater: false,
            indicator: Indicator::Danger,
            alarm: true,
        }
    }
}

// ---------------------------------------------------------------------------
// ControllerContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct ControllerContext {
    // -- Timing --
    /// Monotonic timestamp of the current cycle (milliseconds).
    pub now_ms: u64,

    // -- Sensor data --
    pub sensors: SensorSnapshot,

    // -- Actuator outputs --
    pub commands: ActuatorCommands,

    // -- Predictive control --
    pub trend: TrendEstimator,
    pub pulse: HeatPulse,

    // -- Gas interlock --
    /// State to return to once a gas emergency clears.
    pub prior_to_emergency: OperatingState,

    // -- Configuration --
    pub config: ControlConfig,
}

impl ControllerContext {
    pub fn new(config: ControlConfig) -> Self {
        Self {
            now_ms: 0,
            sensors: SensorSnapshot::default(),
            commands: ActuatorCommands::default(),
            trend: TrendEstimator::new(config.trend_interval_ms),
            pulse: HeatPulse::new(config.pulse_duration_ms),
            prior_to_emergency: OperatingState::Standby,
            config,
        }
    }

    /// Restart the trend estimate from the current reading.
    pub fn reset_trend_baseline(&mut self) {
        self.trend.reset(self.now_ms, self.sensors.temperature_c);
    }
}
