//! Hardware adapter: bridges real outputs to the actuator port.
//!
//! [`ActuatorBank`] owns the heater switch, the two indicator LEDs and the
//! siren, exposing them through [`ActuatorPort`].  Pins are any
//! `embedded-hal` [`OutputPin`], so the same adapter runs on the ESP32
//! GPIO wrapper and on host test doubles.
//!
//! Pin write failures are logged and otherwise ignored: the controller
//! re-applies every output on every cycle.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::ActuatorPort;
use crate::drivers::siren::{SirenSweep, ToneOutput};
use crate::error::ActuatorError;
use crate::fsm::context::Indicator;

/// Concrete adapter that combines all outputs behind [`ActuatorPort`].
pub struct ActuatorBank<H, G, R, T> {
    heater: H,
    green_led: G,
    red_led: R,
    siren: SirenSweep<T>,
    heater_on: bool,
    indicator: Indicator,
}

impl<H, G, R, T> ActuatorBank<H, G, R, T>
where
    H: OutputPin,
    G: OutputPin,
    R: OutputPin,
    T: ToneOutput,
{
    pub fn new(heater: H, green_led: G, red_led: R, siren: SirenSweep<T>) -> Self {
        Self {
            heater,
            green_led,
            red_led,
            siren,
            heater_on: false,
            indicator: Indicator::Off,
        }
    }

    pub fn heater_on(&self) -> bool {
        self.heater_on
    }

    pub fn indicator(&self) -> Indicator {
        self.indicator
    }

    pub fn siren(&self) -> &SirenSweep<T> {
        &self.siren
    }
}

fn drive<P: OutputPin>(pin: &mut P, high: bool, what: &str) {
    let result = if high { pin.set_high() } else { pin.set_low() };
    if let Err(e) = result {
        warn!("{what}: {} ({e:?})", ActuatorError::GpioWriteFailed);
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<H, G, R, T> ActuatorPort for ActuatorBank<H, G, R, T>
where
    H: OutputPin,
    G: OutputPin,
    R: OutputPin,
    T: ToneOutput,
{
    fn set_heater(&mut self, on: bool) {
        drive(&mut self.heater, on, "heater");
        self.heater_on = on;
    }

    fn set_indicator(&mut self, indicator: Indicator) {
        let (green, red) = match indicator {
            Indicator::Off => (false, false),
            Indicator::Safe => (true, false),
            Indicator::Danger => (false, true),
        };
        drive(&mut self.green_led, green, "green led");
        drive(&mut self.red_led, red, "red led");
        self.indicator = indicator;
    }

    fn set_alarm(&mut self, on: bool) {
        if let Err(e) = self.siren.set_active(on) {
            warn!("siren: {e}");
        }
    }

    fn tick(&mut self, now_ms: u64) {
        if let Err(e) = self.siren.update(now_ms) {
            warn!("siren: {e}");
        }
    }
}
