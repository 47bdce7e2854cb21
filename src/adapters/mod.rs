//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to              |
//! |----------------|--------------------|--------------------------|
//! | `hardware`     | ActuatorPort       | Heater / LED GPIO, piezo |
//! | `console_lcd`  | CharacterLcd       | Serial log output        |
//! | `log_sink`     | EventSink          | Serial log output        |
//! | `time`         | -                  | ESP32 system timer       |
//!
//! The sensor side is [`SensorHub`](crate::sensors::SensorHub) and the
//! display side is [`LcdDisplay`](crate::drivers::lcd::LcdDisplay).

pub mod console_lcd;
pub mod hardware;
pub mod log_sink;
pub mod time;
