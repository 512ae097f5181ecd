//! Magnetic field sources.

pub mod block;
pub mod cassette;
pub mod container;
pub mod device;
pub mod field_map;

use crate::{
    error::IdkitResult,
    geometry::{Dim3, Point3, Vec3},
};
use std::fmt;

/// Floating-point precision to use for magnet geometry and fields.
#[allow(non_camel_case_types)]
pub type fmg = f64;

/// Axis-aligned box bounding the region where a field source is defined.
#[derive(Clone, Debug, PartialEq)]
pub struct Bounds3 {
    pub lower: Vec3<fmg>,
    pub upper: Vec3<fmg>,
}

impl Bounds3 {
    pub fn new(lower: Vec3<fmg>, upper: Vec3<fmg>) -> Self {
        Self { lower, upper }
    }

    /// Whether the given position lies inside the bounds (boundaries included).
    pub fn contains(&self, position: &Point3<fmg>) -> bool {
        Dim3::slice()
            .iter()
            .all(|&dim| position[dim] >= self.lower[dim] && position[dim] <= self.upper[dim])
    }
}

impl fmt::Display for Bounds3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

/// Defines the properties of an object producing a magnetic field.
pub trait FieldSource: Sync {
    /// Computes the magnetic field [T] at the given position [m].
    fn field(&self, position: &Point3<fmg>) -> IdkitResult<Vec3<fmg>>;

    /// Computes the magnetic field at each of the given positions.
    fn fields(&self, positions: &[Point3<fmg>]) -> IdkitResult<Vec<Vec3<fmg>>> {
        positions
            .iter()
            .map(|position| self.field(position))
            .collect()
    }

    /// Returns the region where the field is defined, or `None` if it is defined everywhere.
    fn domain(&self) -> Option<Bounds3> {
        None
    }
}

impl<S: FieldSource + ?Sized> FieldSource for &S {
    fn field(&self, position: &Point3<fmg>) -> IdkitResult<Vec3<fmg>> {
        (**self).field(position)
    }

    fn domain(&self) -> Option<Bounds3> {
        (**self).domain()
    }
}

impl<S: FieldSource + ?Sized> FieldSource for Box<S> {
    fn field(&self, position: &Point3<fmg>) -> IdkitResult<Vec3<fmg>> {
        (**self).field(position)
    }

    fn domain(&self) -> Option<Bounds3> {
        (**self).domain()
    }
}

/// Samples one field component along a line parallel to a coordinate axis.
///
/// # Parameters
///
/// - `source`: Field source to sample.
/// - `component`: Field component to extract.
/// - `axis`: Axis along which the sampling line runs.
/// - `coordinates`: Coordinates along `axis` where the field is sampled.
/// - `origin`: Point supplying the coordinates held fixed (its `axis` coordinate is ignored).
///
/// # Returns
///
/// A `Result` which is either:
///
/// - `Ok`: Contains the sampled field component values.
/// - `Err`: Contains an error from the field source.
pub fn field_profile<S: FieldSource + ?Sized>(
    source: &S,
    component: Dim3,
    axis: Dim3,
    coordinates: &[fmg],
    origin: &Point3<fmg>,
) -> IdkitResult<Vec<fmg>> {
    coordinates
        .iter()
        .map(|&coordinate| {
            let mut position = origin.clone();
            position[axis] = coordinate;
            source.field(&position).map(|field| field[component])
        })
        .collect()
}
