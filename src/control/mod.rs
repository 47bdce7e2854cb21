//! Predictive heating primitives used by the Maintaining state.
//!
//! - [`trend`]: rate-of-change estimate recomputed on a fixed cadence.
//! - [`pulse`]: one fixed-length corrective heater pulse.

pub mod pulse;
pub mod trend;
