//! HD44780 character LCD behind a PCF8574 I²C backpack.
//!
//! The backpack exposes the LCD's 4-bit bus on the expander's port:
//!
//! ```text
//!  P7 P6 P5 P4 │ P3 │ P2 │ P1 │ P0
//!  D7 D6 D5 D4 │ BL │ EN │ RW │ RS
//! ```
//!
//! Every byte is sent as two nibbles, each latched by an EN pulse.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::lcd::{CharacterLcd, LCD_COLS, LCD_ROWS};
use crate::error::Error;

/// Default 7-bit address of a PCF8574 backpack with A0-A2 pulled high.
pub const DEFAULT_ADDRESS: u8 = 0x27;

const RS: u8 = 0b0000_0001;
const EN: u8 = 0b0000_0100;
const BACKLIGHT: u8 = 0b0000_1000;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE_INC: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;

const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

pub struct Pcf8574Lcd<I, D> {
    i2c: I,
    delay: D,
    address: u8,
}

impl<I: I2c, D: DelayNs> Pcf8574Lcd<I, D> {
    pub fn new(i2c: I, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    /// Power-on initialisation into 4-bit, two-line mode.  Blocks for
    /// roughly 60 ms; call once at boot.
    pub fn init(&mut self) -> Result<(), Error> {
        self.delay.delay_ms(50);
        for _ in 0..3 {
            self.write_nibble(0x30, 0)?;
            self.delay.delay_us(4_500);
        }
        self.write_nibble(0x20, 0)?;
        self.command(CMD_FUNCTION_4BIT_2LINE)?;
        self.command(CMD_DISPLAY_ON)?;
        self.command(CMD_ENTRY_MODE_INC)?;
        self.clear()
    }

    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }

    fn command(&mut self, cmd: u8) -> Result<(), Error> {
        self.send(cmd, 0)
    }

    fn send(&mut self, byte: u8, mode: u8) -> Result<(), Error> {
        self.write_nibble(byte & 0xF0, mode)?;
        self.write_nibble((byte << 4) & 0xF0, mode)
    }

    fn write_nibble(&mut self, nibble: u8, mode: u8) -> Result<(), Error> {
        let data = nibble | mode | BACKLIGHT;
        self.i2c
            .write(self.address, &[data | EN, data])
            .map_err(|_| Error::Display)?;
        self.delay.delay_us(50);
        Ok(())
    }
}

impl<I: I2c, D: DelayNs> CharacterLcd for Pcf8574Lcd<I, D> {
    fn clear(&mut self) -> Result<(), Error> {
        self.command(CMD_CLEAR)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    fn write_line(&mut self, row: u8, text: &str) -> Result<(), Error> {
        if row >= LCD_ROWS {
            return Err(Error::Display);
        }
        self.command(CMD_SET_DDRAM | ROW_OFFSETS[row as usize])?;
        for b in text.bytes().take(LCD_COLS) {
            // HD44780 ROM A00 matches ASCII for the printable range.
            let b = if b.is_ascii() && !b.is_ascii_control() { b } else { b'?' };
            self.send(b, RS)?;
        }
        Ok(())
    }
}
