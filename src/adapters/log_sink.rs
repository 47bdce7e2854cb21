//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART / USB-CDC in production).  Telemetry records
//! are emitted as a single JSON object so they can be scraped off the
//! serial console.

use log::{error, info, warn};

use crate::app::events::{AppEvent, TelemetryData};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink {
    emitted: u32,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self { emitted: 0 }
    }

    /// Events written since construction.
    pub fn emitted(&self) -> u32 {
        self.emitted
    }
}

/// Serialise a telemetry snapshot as one JSON line.
pub fn telemetry_json(t: &TelemetryData) -> Result<String, serde_json::Error> {
    serde_json::to_string(t)
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        self.emitted = self.emitted.wrapping_add(1);
        match event {
            AppEvent::Telemetry(t) => match telemetry_json(t) {
                Ok(json) => info!("TELEM | {json}"),
                Err(e) => warn!("TELEM | serialisation failed: {e}"),
            },
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {from} -> {to}");
            }
            AppEvent::GasAlarm { reading, prior } => {
                warn!("GAS   | alarm, reading={reading:?}, prior_state={prior}");
            }
            AppEvent::GasCleared { reading, restored } => {
                info!("GAS   | cleared, reading={reading}, restored_state={restored}");
            }
            AppEvent::EmergencyStop => {
                error!("ESTOP | hardware emergency stop latched");
            }
            AppEvent::SensorFault(kind) => {
                warn!("SENSE | {kind:?} unreadable, failing closed");
            }
            AppEvent::PulseStarted { trend_c_per_s } => {
                info!("PULSE | start, trend={trend_c_per_s:.3}\u{00b0}C/s");
            }
            AppEvent::PulseEnded => {
                info!("PULSE | end");
            }
            AppEvent::Started(state) => {
                info!("START | initial_state={state}");
            }
        }
    }
}
