//! Length and angle conversions between CAD host units and display units.
//!
//! The CAD host reports every length in meters; drawings and BOMs are read in
//! inches. All conversions are rounded to 8 decimal places so values that came
//! from the same geometry compare equal no matter which call site produced them.

/// Inches to meters.
pub const INCHES_TO_METERS: f64 = 0.0254;

const DECIMALS: i32 = 8;

fn round(value: f64) -> f64 {
    let scale = 10f64.powi(DECIMALS);
    (value * scale).round() / scale
}

/// Convert a host length (meters) to inches
pub fn meters_to_inches(meters: f64) -> f64 {
    round(meters / INCHES_TO_METERS)
}

/// Convert inches to a host length (meters)
pub fn inches_to_meters(inches: f64) -> f64 {
    round(inches * INCHES_TO_METERS)
}

pub fn radians_to_degrees(radians: f64) -> f64 {
    round(radians.to_degrees())
}
