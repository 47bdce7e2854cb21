//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlService (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, display, event sinks) implement
//! these traits.  The [`ControlService`](super::service::ControlService)
//! owns them through generics, so the domain core never touches hardware
//! directly.

use crate::error::SensorError;
use crate::fsm::context::Indicator;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per cycle for each input.
pub trait SensorPort {
    /// Chamber temperature (°C).
    fn temperature(&mut self) -> Result<f32, SensorError>;

    /// Gas concentration on the raw 10-bit scale.
    fn gas_level(&mut self) -> Result<u16, SensorError>;

    /// Operator setpoint (°C).  Implementations may cache or rate-limit.
    fn setpoint(&mut self) -> Result<f32, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
///
/// Writes are infallible here; adapters log pin failures and carry on.
pub trait ActuatorPort {
    /// Heater relay / transistor.
    fn set_heater(&mut self, on: bool);

    /// Two-LED status indicator.
    fn set_indicator(&mut self, indicator: Indicator);

    /// Request or silence the audible alarm.
    fn set_alarm(&mut self, on: bool);

    /// Advance any time-based output (siren sweep).  Must not block.
    fn tick(&mut self, now_ms: u64);
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → operator)
// ───────────────────────────────────────────────────────────────

/// Operator display.  Does not deduplicate: every call is a physical redraw.
pub trait DisplayPort {
    fn show_status(&mut self, label: &str, temperature_c: f32, setpoint_c: f32, gas_raw: u16);

    fn show_emergency(&mut self, message: &str);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
