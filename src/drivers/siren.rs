//! Piezo siren driver.
//!
//! A non-blocking frequency sweep: while active, every `update_interval_ms`
//! the current frequency is sent to the tone output and then stepped toward
//! the active bound, reversing at `max_hz` and `min_hz`.  Call
//! [`SirenSweep::update`] once per control cycle.
//!
//! ```text
//!  500 Hz ──+25──▶ ... ──▶ 1500 Hz
//!    ▲                        │
//!    └──── ... ◀──-25──────────┘
//! ```

use crate::config::ControlConfig;
use crate::error::ActuatorError;

/// Square-wave output on the piezo pin (LEDC on the device).
pub trait ToneOutput {
    fn tone(&mut self, freq_hz: u32) -> Result<(), ActuatorError>;
    fn silence(&mut self) -> Result<(), ActuatorError>;
}

pub struct SirenSweep<T> {
    out: T,
    min_hz: u32,
    max_hz: u32,
    step_hz: u32,
    interval_ms: u64,
    active: bool,
    last_update_ms: u64,
    freq_hz: u32,
    sweeping_up: bool,
}

impl<T: ToneOutput> SirenSweep<T> {
    pub fn new(out: T, config: &ControlConfig) -> Self {
        Self {
            out,
            min_hz: config.siren_min_hz,
            max_hz: config.siren_max_hz,
            step_hz: config.siren_step_hz,
            interval_ms: config.siren_update_interval_ms,
            active: false,
            last_update_ms: 0,
            freq_hz: config.siren_min_hz,
            sweeping_up: true,
        }
    }

    /// Start or stop the siren.  Stopping silences the output immediately
    /// and rewinds the sweep to `min_hz`, sweeping up.
    pub fn set_active(&mut self, on: bool) -> Result<(), ActuatorError> {
        if on == self.active {
            return Ok(());
        }
        self.active = on;
        if !on {
            self.freq_hz = self.min_hz;
            self.sweeping_up = true;
            self.out.silence()?;
        }
        Ok(())
    }

    /// Advance the sweep.  Returns the frequency emitted this call, if any.
    pub fn update(&mut self, now_ms: u64) -> Result<Option<u32>, ActuatorError> {
        if !self.active || now_ms.saturating_sub(self.last_update_ms) < self.interval_ms {
            return Ok(None);
        }
        self.last_update_ms = now_ms;

        let emitted = self.freq_hz;
        self.out.tone(emitted)?;

        if self.sweeping_up {
            self.freq_hz = self.freq_hz.saturating_add(self.step_hz).min(self.max_hz);
            if self.freq_hz >= self.max_hz {
                self.sweeping_up = false;
            }
        } else {
            self.freq_hz = self.freq_hz.saturating_sub(self.step_hz).max(self.min_hz);
            if self.freq_hz <= self.min_hz {
                self.sweeping_up = true;
            }
        }

        Ok(Some(emitted))
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Frequency the next update will emit.
    pub fn next_frequency(&self) -> u32 {
        self.freq_hz
    }

    pub fn output(&self) -> &T {
        &self.out
    }
}
