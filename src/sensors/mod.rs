//! Sensor subsystem: per-sensor conversions and the aggregating [`SensorHub`].
//!
//! The hub owns the ADC and implements [`SensorPort`] for the controller.
//! Conversion failures surface as [`SensorError`]; the controller decides
//! how to fail closed.

pub mod gas;
pub mod setpoint;
pub mod temperature;

use crate::app::ports::SensorPort;
use crate::config::ControlConfig;
use crate::error::SensorError;

/// The three analog inputs on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalogChannel {
    Temperature,
    Gas,
    Setpoint,
}

/// Source of analog conversions.  Implemented over the ESP-IDF oneshot ADC
/// on the device and by simple mocks in tests.
pub trait AnalogReader {
    /// Raw 12-bit conversion.
    fn read_raw(&mut self, channel: AnalogChannel) -> Result<u16, SensorError>;

    /// Input voltage in millivolts.
    fn read_millivolts(&mut self, channel: AnalogChannel) -> Result<u16, SensorError>;
}

/// Aggregates the chamber's analog sensors behind [`SensorPort`].
pub struct SensorHub<A> {
    adc: A,
    setpoint_min_c: f32,
    setpoint_max_c: f32,
}

impl<A: AnalogReader> SensorHub<A> {
    pub fn new(adc: A, config: &ControlConfig) -> Self {
        Self {
            adc,
            setpoint_min_c: config.setpoint_min_c,
            setpoint_max_c: config.setpoint_max_c,
        }
    }

    pub fn adc_mut(&mut self) -> &mut A {
        &mut self.adc
    }
}

impl<A: AnalogReader> SensorPort for SensorHub<A> {
    fn temperature(&mut self) -> Result<f32, SensorError> {
        let mv = self.adc.read_millivolts(AnalogChannel::Temperature)?;
        temperature::millivolts_to_celsius(mv)
    }

    fn gas_level(&mut self) -> Result<u16, SensorError> {
        let raw = self.adc.read_raw(AnalogChannel::Gas)?;
        gas::normalise(raw)
    }

    fn setpoint(&mut self) -> Result<f32, SensorError> {
        let raw = self.adc.read_raw(AnalogChannel::Setpoint)?;
        let wiper = gas::normalise(raw)?;
        Ok(setpoint::wiper_to_celsius(
            wiper,
            self.setpoint_min_c,
            self.setpoint_max_c,
        ))
    }
}
