//! GPIO / peripheral pin assignments for the fermenter controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Heater
// ---------------------------------------------------------------------------

/// Digital output: gate of the heater MOSFET (active HIGH).
pub const HEATER_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

/// Green LED: normal operation.
pub const GREEN_LED_GPIO: i32 = 10;
/// Red LED: heating or danger.
pub const RED_LED_GPIO: i32 = 12;

// ---------------------------------------------------------------------------
// Siren
// ---------------------------------------------------------------------------

/// Passive piezo buzzer, driven by an LEDC square wave.
pub const PIEZO_GPIO: i32 = 13;
/// LEDC duty resolution for the piezo (bits).  50 % duty = half scale.
pub const PIEZO_DUTY_BITS: u32 = 10;

// ---------------------------------------------------------------------------
// Emergency stop (active-low with pull-up, falling-edge interrupt)
// ---------------------------------------------------------------------------

pub const EMERGENCY_BUTTON_GPIO: i32 = 3;

// ---------------------------------------------------------------------------
// Analog inputs (ADC1)
// ---------------------------------------------------------------------------

/// TMP36 output.  ADC1 channel 3 (GPIO 4 on ESP32-S3).
pub const TEMP_ADC_CHANNEL: u32 = 3;
/// MQ gas sensor divider.  ADC1 channel 4 (GPIO 5 on ESP32-S3).
pub const GAS_ADC_CHANNEL: u32 = 4;
/// Setpoint potentiometer wiper.  ADC1 channel 5 (GPIO 6 on ESP32-S3).
pub const SETPOINT_ADC_CHANNEL: u32 = 5;
/// Full-scale input voltage at 12 dB attenuation (mV).
pub const ADC_FULL_SCALE_MV: u32 = 3_100;

// ---------------------------------------------------------------------------
// I²C bus (LCD backpack)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 8;
pub const I2C_SCL_GPIO: i32 = 9;
pub const I2C_FREQ_HZ: u32 = 100_000;
