//! Magnetic fields sampled on a regular grid and read from file.

use super::{fmg, Bounds3, FieldSource};
use crate::{
    ensure_valid,
    error::{IdkitError, IdkitResult},
    geometry::{
        Dim3::{self, X, Y, Z},
        In3D, Point3, Vec3,
    },
    io::field_map as field_map_io,
};
use ndarray::Array3;
use std::path::Path;

/// Coordinates closer than this [m] are considered to coincide.
const COORDINATE_TOLERANCE: fmg = 1e-9;

/// A magnetic field vector sampled at a position.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSample {
    pub position: Point3<fmg>,
    pub field: Vec3<fmg>,
}

/// A magnetic field defined by samples on a rectilinear grid, evaluated
/// with trilinear interpolation inside the sampled region.
#[derive(Clone, Debug)]
pub struct FieldMapContainer {
    coords: In3D<Vec<fmg>>,
    components: In3D<Array3<fmg>>,
}

impl FieldMapContainer {
    /// Reads and merges the samples of all the given field map files.
    ///
    /// # Parameters
    ///
    /// - `file_paths`: Paths to the field map files.
    /// - `use_field_symmetry`: Whether to mirror a map covering only `y >= 0` to `y < 0`.
    ///
    /// # Returns
    ///
    /// A `Result` which is either:
    ///
    /// - `Ok`: Contains the new field map.
    /// - `Err`: Contains an error if a file could not be read or the samples do not
    /// form a complete grid.
    pub fn from_files<P: AsRef<Path>>(
        file_paths: &[P],
        use_field_symmetry: bool,
    ) -> IdkitResult<Self> {
        ensure_valid!(!file_paths.is_empty(), "No field map files given");
        let mut samples = Vec::new();
        for file_path in file_paths {
            samples.extend(field_map_io::read_field_map_samples(file_path)?);
        }
        Self::from_samples(samples, use_field_symmetry)
    }

    /// Creates a new field map from the given samples, which may come in any order.
    pub fn from_samples(
        mut samples: Vec<FieldSample>,
        use_field_symmetry: bool,
    ) -> IdkitResult<Self> {
        ensure_valid!(!samples.is_empty(), "A field map needs at least one sample");
        ensure_valid!(
            samples
                .iter()
                .all(|sample| !sample.position.to_vec3().has_nan() && !sample.field.has_nan()),
            "Field map samples must not contain NaN"
        );

        if use_field_symmetry {
            Self::mirror_to_negative_y(&mut samples);
        }

        let coords = In3D::with_each_component(|dim| unique_coordinates(&samples, dim));
        let shape = (coords[X].len(), coords[Y].len(), coords[Z].len());
        let mut components = In3D::with_each_component(|_| Array3::from_elem(shape, fmg::NAN));
        let mut filled = Array3::from_elem(shape, false);

        for sample in &samples {
            let idx = (
                coordinate_index(&coords[X], sample.position[X]),
                coordinate_index(&coords[Y], sample.position[Y]),
                coordinate_index(&coords[Z], sample.position[Z]),
            );
            for &dim in &Dim3::slice() {
                components[dim][idx] = sample.field[dim];
            }
            filled[idx] = true;
        }
        ensure_valid!(
            filled.iter().all(|&is_filled| is_filled),
            "Field map samples do not form a complete {}x{}x{} grid",
            shape.0,
            shape.1,
            shape.2
        );

        Ok(Self { coords, components })
    }

    /// Adds mirror images at `-y` of all samples with `y > 0` when no
    /// sample lies below `y = 0`. Under the mirroring `Bx` and `Bz`
    /// change sign while `By` is unchanged.
    fn mirror_to_negative_y(samples: &mut Vec<FieldSample>) {
        if samples
            .iter()
            .any(|sample| sample.position[Y] < -COORDINATE_TOLERANCE)
        {
            return;
        }
        let mirrored: Vec<_> = samples
            .iter()
            .filter(|sample| sample.position[Y] > COORDINATE_TOLERANCE)
            .map(|sample| {
                let mut position = sample.position.clone();
                position[Y] = -position[Y];
                FieldSample {
                    position,
                    field: Vec3::new(-sample.field[X], sample.field[Y], -sample.field[Z]),
                }
            })
            .collect();
        samples.extend(mirrored);
    }

    /// Returns the sample coordinates along the given axis [m].
    pub fn coords(&self, dim: Dim3) -> &[fmg] {
        &self.coords[dim]
    }

    /// Returns the number of samples along each axis.
    pub fn shape(&self) -> (usize, usize, usize) {
        self.components[X].dim()
    }

    pub fn min(&self, dim: Dim3) -> fmg {
        self.coords[dim][0]
    }

    pub fn max(&self, dim: Dim3) -> fmg {
        self.coords[dim][self.coords[dim].len() - 1]
    }

    pub fn x_min(&self) -> fmg {
        self.min(X)
    }

    pub fn x_max(&self) -> fmg {
        self.max(X)
    }

    pub fn y_min(&self) -> fmg {
        self.min(Y)
    }

    pub fn y_max(&self) -> fmg {
        self.max(Y)
    }

    pub fn z_min(&self) -> fmg {
        self.min(Z)
    }

    pub fn z_max(&self) -> fmg {
        self.max(Z)
    }

    /// Returns the box spanned by the samples.
    pub fn bounds(&self) -> Bounds3 {
        Bounds3::new(
            Vec3::with_each_component(|dim| self.min(dim)),
            Vec3::with_each_component(|dim| self.max(dim)),
        )
    }

    /// Computes the interpolated field at the given position.
    ///
    /// # Returns
    ///
    /// A `Result` which is either:
    ///
    /// - `Ok`: Contains the interpolated field vector [T].
    /// - `Err`: Contains an `OutOfBounds` error if the position is outside the sampled region.
    pub fn field_at(&self, position: &Point3<fmg>) -> IdkitResult<Vec3<fmg>> {
        let bounds = self.bounds();
        if !bounds.contains(position) {
            return Err(IdkitError::OutOfBounds {
                position: position.clone(),
                lower: bounds.lower,
                upper: bounds.upper,
            });
        }

        let cells: In3D<(usize, usize, fmg)> =
            In3D::with_each_component(|dim| locate_in_cell(&self.coords[dim], position[dim]));

        let mut field = Vec3::zero();
        for &(i, wx) in &corner_weights(cells[X]) {
            for &(j, wy) in &corner_weights(cells[Y]) {
                for &(k, wz) in &corner_weights(cells[Z]) {
                    let weight = wx * wy * wz;
                    if weight == 0.0 {
                        continue;
                    }
                    for &dim in &Dim3::slice() {
                        field[dim] += weight * self.components[dim][(i, j, k)];
                    }
                }
            }
        }
        Ok(field)
    }
}

impl FieldSource for FieldMapContainer {
    fn field(&self, position: &Point3<fmg>) -> IdkitResult<Vec3<fmg>> {
        self.field_at(position)
    }

    fn domain(&self) -> Option<Bounds3> {
        Some(self.bounds())
    }
}

/// Samples the given field source on the grid spanned by the given
/// coordinates and writes the result as a field map file.
pub fn write_field_map_file<S, P>(
    source: &S,
    x: &[fmg],
    y: &[fmg],
    z: &[fmg],
    file_path: P,
) -> IdkitResult<()>
where
    S: FieldSource + ?Sized,
    P: AsRef<Path>,
{
    let mut samples = Vec::with_capacity(x.len() * y.len() * z.len());
    for &zc in z {
        for &yc in y {
            for &xc in x {
                let position = Point3::new(xc, yc, zc);
                let field = source.field(&position)?;
                samples.push(FieldSample { position, field });
            }
        }
    }
    field_map_io::write_field_map_samples(&samples, file_path)?;
    Ok(())
}

fn unique_coordinates(samples: &[FieldSample], dim: Dim3) -> Vec<fmg> {
    let mut coords: Vec<fmg> = samples.iter().map(|sample| sample.position[dim]).collect();
    coords.sort_by(|a, b| a.total_cmp(b));
    coords.dedup_by(|current, previous| (*current - *previous).abs() <= COORDINATE_TOLERANCE);
    coords
}

/// Finds the index of the coordinate matching the given value, which is
/// known to be present in the sorted coordinates up to the tolerance.
fn coordinate_index(coords: &[fmg], value: fmg) -> usize {
    let idx = coords.partition_point(|&coord| coord < value - COORDINATE_TOLERANCE);
    idx.min(coords.len() - 1)
}

/// Returns the lower and upper sample indices of the cell containing the
/// given value along with the interpolation weight of the upper sample.
fn locate_in_cell(coords: &[fmg], value: fmg) -> (usize, usize, fmg) {
    if coords.len() == 1 {
        return (0, 0, 0.0);
    }
    let lower = coords
        .partition_point(|&coord| coord <= value)
        .saturating_sub(1)
        .min(coords.len() - 2);
    let upper = lower + 1;
    let weight = (value - coords[lower]) / (coords[upper] - coords[lower]);
    (lower, upper, weight)
}

fn corner_weights((lower, upper, weight): (usize, usize, fmg)) -> [(usize, fmg); 2] {
    [(lower, 1.0 - weight), (upper, weight)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn linear_field(position: &Point3<fmg>) -> Vec3<fmg> {
        Vec3::new(
            1.0 + 2.0 * position[X] - position[Z],
            0.5 * position[Y] + 3.0 * position[X],
            -position[Z] + 0.1,
        )
    }

    fn linear_samples(xs: &[fmg], ys: &[fmg], zs: &[fmg]) -> Vec<FieldSample> {
        let mut samples = Vec::new();
        for &z in zs.iter().rev() {
            for &x in xs {
                for &y in ys {
                    let position = Point3::new(x, y, z);
                    let field = linear_field(&position);
                    samples.push(FieldSample { position, field });
                }
            }
        }
        samples
    }

    #[test]
    fn trilinear_interpolation_reproduces_linear_field() {
        let field_map = FieldMapContainer::from_samples(
            linear_samples(&[-0.01, 0.0, 0.02], &[-0.005, 0.005], &[0.0, 0.1, 0.3]),
            false,
        )
        .unwrap();
        assert_eq!(field_map.shape(), (3, 2, 3));
        assert_abs_diff_eq!(field_map.x_min(), -0.01);
        assert_abs_diff_eq!(field_map.z_max(), 0.3);
        for position in &[
            Point3::new(0.013, 0.001, 0.27),
            Point3::new(-0.01, -0.005, 0.0),
            Point3::new(0.02, 0.005, 0.3),
        ] {
            assert_abs_diff_eq!(
                field_map.field_at(position).unwrap(),
                linear_field(position),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn singleton_axes_are_supported() {
        let field_map =
            FieldMapContainer::from_samples(linear_samples(&[0.0], &[0.0], &[0.0, 0.1]), false)
                .unwrap();
        let position = Point3::new(0.0, 0.0, 0.04);
        assert_abs_diff_eq!(
            field_map.field_at(&position).unwrap(),
            linear_field(&position),
            epsilon = 1e-12
        );
    }

    #[test]
    fn queries_outside_bounds_are_errors() {
        let field_map = FieldMapContainer::from_samples(
            linear_samples(&[-0.01, 0.01], &[-0.01, 0.01], &[0.0, 0.1]),
            false,
        )
        .unwrap();
        assert!(matches!(
            field_map.field_at(&Point3::new(0.0, 0.0, 0.2)),
            Err(IdkitError::OutOfBounds { .. })
        ));
        assert!(field_map.field_at(&Point3::new(0.011, 0.0, 0.05)).is_err());
        assert_eq!(field_map.domain(), Some(field_map.bounds()));
    }

    #[test]
    fn symmetry_mirrors_upper_half() {
        let mut samples = Vec::new();
        for &z in &[0.0, 0.1] {
            for &y in &[0.0, 0.01] {
                for &x in &[-0.01, 0.01] {
                    samples.push(FieldSample {
                        position: Point3::new(x, y, z),
                        field: Vec3::new(2.0 * y, 1.0 + x, -3.0 * y + x * y),
                    });
                }
            }
        }
        let field_map = FieldMapContainer::from_samples(samples, true).unwrap();
        assert_eq!(field_map.shape(), (2, 3, 2));
        assert_abs_diff_eq!(field_map.y_min(), -0.01);
        let upper = field_map.field_at(&Point3::new(0.002, 0.004, 0.05)).unwrap();
        let lower = field_map.field_at(&Point3::new(0.002, -0.004, 0.05)).unwrap();
        assert_abs_diff_eq!(lower, Vec3::new(-upper[X], upper[Y], -upper[Z]), epsilon = 1e-12);
    }

    #[test]
    fn incomplete_grids_are_rejected() {
        let mut samples = linear_samples(&[-0.01, 0.01], &[-0.01, 0.01], &[0.0, 0.1]);
        samples.pop();
        assert!(FieldMapContainer::from_samples(samples, false).is_err());
        assert!(FieldMapContainer::from_samples(Vec::new(), false).is_err());
    }

    #[test]
    fn written_field_map_reads_back() {
        let field_map = FieldMapContainer::from_samples(
            linear_samples(&[-0.01, 0.0, 0.02], &[-0.005, 0.005], &[0.0, 0.1, 0.3]),
            false,
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field.dat");
        write_field_map_file(&field_map, &[-0.01, 0.02], &[-0.005, 0.005], &[0.0, 0.15, 0.3], &path)
            .unwrap();
        let reread = FieldMapContainer::from_files(&[&path], false).unwrap();
        assert_eq!(reread.shape(), (2, 2, 3));
        let position = Point3::new(0.005, 0.0, 0.2);
        assert_abs_diff_eq!(
            reread.field_at(&position).unwrap(),
            linear_field(&position),
            epsilon = 1e-8
        );
    }
}
