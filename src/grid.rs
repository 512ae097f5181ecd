//! Regular grids of transverse sampling positions.

use crate::{
    ensure_valid,
    error::IdkitResult,
    geometry::{
        Dim2::{self, X, Y},
        In2D, Point2, Vec2,
    },
};

/// Floating-point precision to use for grids and masks.
#[allow(non_camel_case_types)]
pub type fgr = f64;

/// A regular 2D grid of sample positions in the transverse plane, with
/// samples placed on both bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct RegularGrid2 {
    shape: In2D<usize>,
    lower_bounds: Vec2<fgr>,
    upper_bounds: Vec2<fgr>,
    coords: In2D<Vec<fgr>>,
}

impl RegularGrid2 {
    /// Creates a new regular grid given the shape and bounds.
    ///
    /// A dimension with a single sample is placed at the lower bound.
    pub fn from_bounds(
        shape: In2D<usize>,
        lower_bounds: Vec2<fgr>,
        upper_bounds: Vec2<fgr>,
    ) -> IdkitResult<Self> {
        for &dim in &Dim2::slice() {
            ensure_valid!(
                shape[dim] > 0,
                "Cannot create grid with size zero along {}",
                dim
            );
            ensure_valid!(
                lower_bounds[dim].is_finite() && upper_bounds[dim].is_finite(),
                "Grid bounds must be finite"
            );
            ensure_valid!(
                upper_bounds[dim] > lower_bounds[dim]
                    || (shape[dim] == 1 && upper_bounds[dim] == lower_bounds[dim]),
                "Upper grid bound along {} must exceed the lower bound",
                dim
            );
        }
        let coords = In2D::new(
            regular_coords_from_bounds(shape[X], lower_bounds[X], upper_bounds[X]),
            regular_coords_from_bounds(shape[Y], lower_bounds[Y], upper_bounds[Y]),
        );
        Ok(Self {
            shape,
            lower_bounds,
            upper_bounds,
            coords,
        })
    }

    /// Creates a new grid from the number of samples and bounds along each axis.
    pub fn new(
        nx: usize,
        ny: usize,
        xmin: fgr,
        xmax: fgr,
        ymin: fgr,
        ymax: fgr,
    ) -> IdkitResult<Self> {
        Self::from_bounds(
            In2D::new(nx, ny),
            Vec2::new(xmin, ymin),
            Vec2::new(xmax, ymax),
        )
    }

    pub fn shape(&self) -> &In2D<usize> {
        &self.shape
    }

    pub fn nx(&self) -> usize {
        self.shape[X]
    }

    pub fn ny(&self) -> usize {
        self.shape[Y]
    }

    pub fn lower_bounds(&self) -> &Vec2<fgr> {
        &self.lower_bounds
    }

    pub fn upper_bounds(&self) -> &Vec2<fgr> {
        &self.upper_bounds
    }

    /// Returns the ascending sample coordinates along the given dimension.
    pub fn coords(&self, dim: Dim2) -> &[fgr] {
        &self.coords[dim]
    }

    pub fn x(&self) -> &[fgr] {
        self.coords(X)
    }

    pub fn y(&self) -> &[fgr] {
        self.coords(Y)
    }

    /// Returns the total number of sample positions.
    pub fn size(&self) -> usize {
        self.nx() * self.ny()
    }

    /// Returns the sample position with the given row (y) and column (x) indices.
    pub fn point(&self, i: usize, j: usize) -> Point2<fgr> {
        Point2::new(self.coords[X][j], self.coords[Y][i])
    }
}

fn regular_coords_from_bounds(size: usize, lower_bound: fgr, upper_bound: fgr) -> Vec<fgr> {
    if size == 1 {
        return vec![lower_bound];
    }
    let spacing = (upper_bound - lower_bound) / ((size - 1) as fgr);
    (0..size)
        .map(|idx| lower_bound + (idx as fgr) * spacing)
        .collect()
}
