//! Setpoint potentiometer.
//!
//! The wiper is read on the 10-bit scale and mapped linearly onto the
//! configured setpoint range with integer arithmetic, so the setpoint moves
//! in whole degrees.

/// Top of the 10-bit wiper scale.
pub const WIPER_MAX: i32 = 1_023;

/// Linear integer re-map of `x` from `[in_min, in_max]` to `[out_min, out_max]`.
/// Division truncates toward zero.
pub fn map_range(x: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    if in_max == in_min {
        return out_min;
    }
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Setpoint (°C) for a 10-bit wiper position.
pub fn wiper_to_celsius(wiper: u16, min_c: f32, max_c: f32) -> f32 {
    let wiper = i32::from(wiper).min(WIPER_MAX);
    map_range(wiper, 0, WIPER_MAX, min_c as i32, max_c as i32) as f32
}
