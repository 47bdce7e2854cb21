//! Serial-console stand-in for the character LCD.
//!
//! Implements [`CharacterLcd`] by logging each row.  `main` falls back to
//! it when no LCD backpack answers on the I²C bus, so the operator screen
//! is still visible on the serial monitor.

use heapless::String;
use log::info;

use crate::drivers::lcd::{CharacterLcd, LCD_COLS, LCD_ROWS, Line, fit};
use crate::error::Error;

#[derive(Default)]
pub struct ConsoleLcd {
    rows: [Line; LCD_ROWS as usize],
}

impl ConsoleLcd {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents of `row`, as last written.
    pub fn row(&self, row: u8) -> &str {
        self.rows.get(row as usize).map_or("", String::as_str)
    }
}

impl CharacterLcd for ConsoleLcd {
    fn clear(&mut self) -> Result<(), Error> {
        for row in &mut self.rows {
            row.clear();
        }
        Ok(())
    }

    fn write_line(&mut self, row: u8, text: &str) -> Result<(), Error> {
        let slot = self.rows.get_mut(row as usize).ok_or(Error::Display)?;
        *slot = fit(text);
        info!("LCD{row} |{:<width$}|", slot.as_str(), width = LCD_COLS);
        Ok(())
    }
}
