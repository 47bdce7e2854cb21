//! Outbound application events.
//!
//! The [`ControlService`](super::service::ControlService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on the
//! other side decide what to do with them; on the device they go to the
//! serial log.

use serde::Serialize;

use crate::fsm::OperatingState;
use crate::fsm::context::Indicator;
use crate::safety::GasLevel;

/// Which input a [`AppEvent::SensorFault`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SensorKind {
    Temperature,
    Gas,
    Setpoint,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The controller has started (carries initial state).
    Started(OperatingState),

    /// The FSM transitioned between states.
    StateChanged {
        from: OperatingState,
        to: OperatingState,
    },

    /// Gas reached the high threshold; `prior` will be restored on clear.
    GasAlarm { reading: Option<u16>, prior: OperatingState },

    /// Gas fell back below the high threshold; `restored` is active again.
    GasCleared { reading: u16, restored: OperatingState },

    /// The hardware emergency latch was observed for the first time.
    EmergencyStop,

    /// A sensor read failed and a fail-closed value was used instead.
    SensorFault(SensorKind),

    /// A maintaining heat pulse started.
    PulseStarted { trend_c_per_s: f32 },

    /// A maintaining heat pulse ran its full duration.
    PulseEnded,

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time telemetry snapshot suitable for logging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TelemetryData {
    pub uptime_ms: u64,
    pub state: OperatingState,
    pub temperature_c: f32,
    pub setpoint_c: f32,
    pub gas_raw: u16,
    pub gas_level: GasLevel,
    pub heater: bool,
    pub indicator: Indicator,
    pub alarm: bool,
    pub trend_c_per_s: f32,
    pub pulse_active: bool,
    pub emergency_latched: bool,
}
