//! Output drivers, display drivers, and hardware initialisation.

pub mod hw_init;
pub mod lcd;
pub mod pcf8574_lcd;
pub mod siren;
