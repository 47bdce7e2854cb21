//! 16×2 character LCD status screen.
//!
//! [`LcdDisplay`] implements [`DisplayPort`] on top of any
//! [`CharacterLcd`].  Layout:
//!
//! ```text
//!  ┌────────────────┐      ┌────────────────┐
//!  │T:18.0 S:25.0   │      │!EMERGENCY STOP!│
//!  │PREHEATIN  G:412│      │HW STOP ACTIVATE│
//!  └────────────────┘      └────────────────┘
//!       status                 emergency
//! ```
//!
//! The state label is cut to 9 characters and the gas value is
//! right-aligned on the second line.  Write failures are logged and
//! dropped; the next changed frame redraws the whole screen anyway.

use core::fmt::Write as _;

use heapless::String;
use log::warn;

use crate::app::ports::DisplayPort;
use crate::error::Error;

pub const LCD_COLS: usize = 16;
pub const LCD_ROWS: u8 = 2;

/// Longest state label shown on the status screen.
pub const LABEL_WIDTH: usize = 9;

pub const EMERGENCY_HEADER: &str = "!EMERGENCY STOP!";

/// One full display row.
pub type Line = String<LCD_COLS>;

/// Minimal character-LCD interface.
pub trait CharacterLcd {
    fn clear(&mut self) -> Result<(), Error>;

    /// Write `text` starting at column 0 of `row`.
    fn write_line(&mut self, row: u8, text: &str) -> Result<(), Error>;
}

/// Copy as much of `text` as fits on one row.
pub fn fit(text: &str) -> Line {
    let mut line = Line::new();
    for c in text.chars() {
        if line.push(c).is_err() {
            break;
        }
    }
    line
}

/// Render the two status rows.
pub fn format_status(label: &str, temperature_c: f32, setpoint_c: f32, gas_raw: u16) -> (Line, Line) {
    let mut scratch: String<32> = String::new();
    let _ = write!(scratch, "T:{temperature_c:.1} S:{setpoint_c:.1}");
    let top = fit(&scratch);

    let mut gas: String<8> = String::new();
    let _ = write!(gas, "G:{gas_raw}");

    let mut bottom = Line::new();
    for c in label.chars().take(LABEL_WIDTH) {
        let _ = bottom.push(c);
    }
    let gas_col = LCD_COLS.saturating_sub(gas.len());
    while bottom.len() < gas_col {
        let _ = bottom.push(' ');
    }
    let _ = bottom.push_str(&gas);

    (top, bottom)
}

/// Render the two emergency rows.
pub fn format_emergency(message: &str) -> (Line, Line) {
    (fit(EMERGENCY_HEADER), fit(message))
}

pub struct LcdDisplay<L> {
    lcd: L,
}

impl<L: CharacterLcd> LcdDisplay<L> {
    pub fn new(lcd: L) -> Self {
        Self { lcd }
    }

    pub fn lcd(&self) -> &L {
        &self.lcd
    }

    fn draw(&mut self, top: &str, bottom: &str) {
        let result = self
            .lcd
            .clear()
            .and_then(|()| self.lcd.write_line(0, top))
            .and_then(|()| self.lcd.write_line(1, bottom));
        if let Err(e) = result {
            warn!("lcd: redraw failed: {e}");
        }
    }
}

impl<L: CharacterLcd> DisplayPort for LcdDisplay<L> {
    fn show_status(&mut self, label: &str, temperature_c: f32, setpoint_c: f32, gas_raw: u16) {
        let (top, bottom) = format_status(label, temperature_c, setpoint_c, gas_raw);
        self.draw(&top, &bottom);
    }

    fn show_emergency(&mut self, message: &str) {
        let (top, bottom) = format_emergency(message);
        self.draw(&top, &bottom);
    }
}
