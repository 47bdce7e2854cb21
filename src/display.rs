//! Display update gating.
//!
//! The LCD flickers and the I²C bus stalls if every cycle issues a full
//! redraw, and the display adapter does not deduplicate on its own.  The
//! controller therefore describes what it wants shown as a [`Frame`] and
//! hands it to a [`DisplayGate`], which only forwards frames that differ
//! from the last one drawn.

use crate::app::ports::DisplayPort;

/// Everything that determines what the display shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Frame {
    Status {
        label: &'static str,
        temperature_c: f32,
        setpoint_c: f32,
        gas_raw: u16,
    },
    Emergency(&'static str),
}

#[derive(Debug, Default)]
pub struct DisplayGate {
    last: Option<Frame>,
}

impl DisplayGate {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Draw `frame` if it differs from the last drawn frame.
    /// Returns `true` if the display was written.
    pub fn render<D: DisplayPort>(&mut self, frame: Frame, display: &mut D) -> bool {
        if self.last == Some(frame) {
            return false;
        }

        match frame {
            Frame::Status {
                label,
                temperature_c,
                setpoint_c,
                gas_raw,
            } => display.show_status(label, temperature_c, setpoint_c, gas_raw),
            Frame::Emergency(message) => display.show_emergency(message),
        }
        self.last = Some(frame);
        true
    }

    /// Force the next frame to be drawn.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    pub fn last(&self) -> Option<&Frame> {
        self.last.as_ref()
    }
}
