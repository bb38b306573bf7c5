//! Fixed-precision rendering of synthesized lines
//!
//! Positions and arc offsets use 3 decimals, extrusion 5, width/height 6.
//! Acceleration, fan speed and feed rate are truncated toward zero, which keeps
//! the output identical to what existing post-processing chains expect.

use seamflip_core::markers::{ACCELERATION_PREFIX, FAN_PREFIX, HEIGHT_TAG, WIDTH_TAG};
use seamflip_core::movement::Position;

/// Truncate a rate to the integer written in `S`/`F` words
pub fn truncated(value: f64) -> i64 {
    value.trunc() as i64
}

/// `G0 X<x> Y<y>`
pub fn rapid_xy(position: &Position) -> String {
    format!("G0 X{:.3} Y{:.3}", position.x, position.y)
}

/// `G1 X<x> Y<y> Z<z> F<feed>`
pub fn linear_xyz_at(position: &Position, feed_rate: f64) -> String {
    format!(
        "G1 X{:.3} Y{:.3} Z{:.3} F{}",
        position.x,
        position.y,
        position.z,
        truncated(feed_rate)
    )
}

pub fn acceleration(value: f64) -> String {
    format!("{ACCELERATION_PREFIX}{}", truncated(value))
}

pub fn fan_speed(value: f64) -> String {
    format!("{FAN_PREFIX}{}", truncated(value))
}

pub fn feed_rate(value: f64) -> String {
    format!("G1 F{}", truncated(value))
}

pub fn width(value: f64) -> String {
    format!("{WIDTH_TAG}{:.6}", value)
}

pub fn height(value: f64) -> String {
    format!("{HEIGHT_TAG}{:.6}", value)
}
