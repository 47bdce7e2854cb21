//! TMP36 analog temperature sensor.
//!
//! Output is 10 mV/°C with a 500 mV offset at 0 °C, so
//! `T = (V - 0.5) * 100`.  The part is specified from -40 °C to 125 °C;
//! anything outside that is a wiring fault, not a temperature.

use crate::error::SensorError;

const OFFSET_MV: f32 = 500.0;
const MV_PER_DEG_C: f32 = 10.0;

/// Lowest output the sensor can produce (-40 °C).
pub const MIN_VALID_MV: u16 = 100;
/// Highest output the sensor can produce (125 °C).
pub const MAX_VALID_MV: u16 = 1_750;

/// Convert a TMP36 output voltage to °C.
pub fn millivolts_to_celsius(mv: u16) -> Result<f32, SensorError> {
    if !(MIN_VALID_MV..=MAX_VALID_MV).contains(&mv) {
        return Err(SensorError::OutOfRange);
    }
    Ok((f32::from(mv) - OFFSET_MV) / MV_PER_DEG_C)
}
