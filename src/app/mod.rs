//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the control rules for the fermentation chamber:
//! emergency precedence, gas override, FSM dispatch, and display gating.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
