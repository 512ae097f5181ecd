//! Physical and mathematical constants.

/// Floating-point precision to use for constants.
#[allow(non_camel_case_types)]
pub type fcn = f64;

// Mathematical constants

pub const PI: fcn = std::f64::consts::PI;
pub const FOUR_PI: fcn = 4.0 * PI;

// Physical constants

/// Speed of light in vacuum [m/s].
pub const CLIGHT: fcn = 299_792_458.0;
/// Electron rest energy [eV].
pub const ELECTRON_REST_ENERGY: fcn = 0.510_998_95e6;

// Unit conversions

/// Number of metres per millimetre.
pub const METRES_PER_MILLIMETRE: fcn = 1e-3;
