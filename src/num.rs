//! Utilities related to numbers.

use num;
use std::fmt;

/// Floating point marker trait for easier control over trait bounds.
pub trait BFloat: Sync + Send + num::Float + num::cast::FromPrimitive + fmt::Debug {}

impl BFloat for f32 {}
impl BFloat for f64 {}

/// Returns `NaN` for the given float type.
pub fn nan<F: BFloat>() -> F {
    F::nan()
}

/// Converts an `f64` literal into the given float type.
pub fn from_f64<F: BFloat>(value: f64) -> F {
    F::from_f64(value).unwrap_or_else(F::nan)
}

/// Compares two slices of floats element-wise, treating a pair of `NaN`s as equal.
pub fn slices_eq_with_nan<F: BFloat>(a: &[F], b: &[F], epsilon: F) -> bool {
    a.len() == b.len()
        && a.iter().zip(b.iter()).all(|(&va, &vb)| {
            if va.is_nan() || vb.is_nan() {
                va.is_nan() && vb.is_nan()
            } else {
                (va - vb).abs() <= epsilon
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_cells_compare_equal() {
        let a = [1.0, f64::NAN, 3.0];
        let b = [1.0 + 1e-12, f64::NAN, 3.0];
        assert!(slices_eq_with_nan(&a, &b, 1e-9));
        assert!(!slices_eq_with_nan(&a, &[1.0, 2.0, 3.0], 1e-9));
        assert!(!slices_eq_with_nan(&a, &a[..2], 1e-9));
    }
}
