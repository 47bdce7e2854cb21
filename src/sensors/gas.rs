//! MQ-series gas sensor.
//!
//! The gas thresholds are expressed on a 10-bit scale (0-1023).  The
//! ESP32-S3 ADC converts at 12 bits, so readings are shifted down by two
//! bits before they reach the controller.

use crate::error::SensorError;

/// Largest value a 12-bit conversion can produce.
pub const ADC_MAX_RAW: u16 = 4_095;

/// Normalise a 12-bit conversion to the 10-bit threshold scale.
pub fn normalise(raw: u16) -> Result<u16, SensorError> {
    if raw > ADC_MAX_RAW {
        return Err(SensorError::OutOfRange);
    }
    Ok(raw >> 2)
}
