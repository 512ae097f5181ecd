//! Uniformly magnetized rectangular blocks.

use super::{fmg, FieldSource};
use crate::{
    constants::FOUR_PI,
    ensure_valid,
    error::IdkitResult,
    geometry::{
        Dim3::{X, Y, Z},
        Matrix3, Point3, Vec3,
    },
};

/// Index offsets `(i, j, k)` of the eight corners of a box, where
/// index 0 refers to the lower and 1 to the upper face along an axis.
const CORNERS: [(usize, usize, usize); 8] = [
    (0, 0, 0),
    (0, 0, 1),
    (0, 1, 0),
    (0, 1, 1),
    (1, 0, 0),
    (1, 0, 1),
    (1, 1, 0),
    (1, 1, 1),
];

/// Sign of the contribution from the corner with the given index offsets.
fn corner_sign((i, j, k): (usize, usize, usize)) -> fmg {
    if (i + j + k) % 2 == 0 {
        1.0
    } else {
        -1.0
    }
}

/// Computes `atan(numerator/denominator)`, resolving a vanishing
/// denominator to `±π/2`, or `NaN` if the numerator vanishes as well.
fn corner_atan(numerator: fmg, denominator: fmg) -> fmg {
    if denominator == 0.0 {
        if numerator == 0.0 {
            fmg::NAN
        } else {
            std::f64::consts::FRAC_PI_2.copysign(numerator)
        }
    } else {
        (numerator / denominator).atan()
    }
}

/// Computes `ln(argument)`, which is `NaN` for non-positive arguments.
fn corner_ln(argument: fmg) -> fmg {
    if argument > 0.0 {
        argument.ln()
    } else {
        fmg::NAN
    }
}

fn validate_dimension(dimension: &Vec3<fmg>) -> IdkitResult<()> {
    ensure_valid!(
        dimension[X] > 0.0 && dimension[Y] > 0.0 && dimension[Z] > 0.0,
        "Block dimensions must be positive, got {}",
        dimension
    );
    Ok(())
}

/// A box-shaped part of a block acting as a signed source of field.
#[derive(Clone, Debug, PartialEq)]
pub struct SubVolume {
    dimension: Vec3<fmg>,
    position: Vec3<fmg>,
    strength: fmg,
}

impl SubVolume {
    /// Creates a new sub-volume.
    ///
    /// # Parameters
    ///
    /// - `dimension`: Extent of the sub-volume along each axis [m].
    /// - `position`: Center of the sub-volume relative to the center of the owning block [m].
    /// - `strength`: Either `1` or `-1`.
    pub fn new(dimension: Vec3<fmg>, position: Vec3<fmg>, strength: fmg) -> IdkitResult<Self> {
        validate_dimension(&dimension)?;
        ensure_valid!(
            strength == 1.0 || strength == -1.0,
            "Sub-volume strength must be 1 or -1, got {}",
            strength
        );
        Ok(Self {
            dimension,
            position,
            strength,
        })
    }

    fn full_volume(dimension: &Vec3<fmg>) -> Self {
        Self {
            dimension: dimension.clone(),
            position: Vec3::zero(),
            strength: 1.0,
        }
    }

    pub fn dimension(&self) -> &Vec3<fmg> {
        &self.dimension
    }

    pub fn position(&self) -> &Vec3<fmg> {
        &self.position
    }

    pub fn strength(&self) -> fmg {
        self.strength
    }

    pub fn set_dimension(&mut self, dimension: Vec3<fmg>) -> IdkitResult<()> {
        validate_dimension(&dimension)?;
        self.dimension = dimension;
        Ok(())
    }

    pub fn set_position(&mut self, position: Vec3<fmg>) {
        self.position = position;
    }

    /// Computes the field gradient matrix of the sub-volume, including its strength,
    /// at the given displacement from the center of the owning block.
    pub fn gradient_matrix(&self, displacement: &Vec3<fmg>) -> Matrix3<fmg> {
        let half_dimension = &self.dimension * 0.5;
        let offset = &self.position - displacement;
        let lower = &offset - &half_dimension;
        let upper = &offset + &half_dimension;
        let xs = [lower[X], upper[X]];
        let ys = [lower[Y], upper[Y]];
        let zs = [lower[Z], upper[Z]];

        let mut g = Matrix3::zero();
        for corner in CORNERS {
            let (x, y, z) = (xs[corner.0], ys[corner.1], zs[corner.2]);
            let r = (x * x + y * y + z * z).sqrt();
            let sign = corner_sign(corner);

            g[(X, X)] -= sign * corner_atan(y * z, x * r);
            g[(Y, Y)] -= sign * corner_atan(x * z, y * r);
            g[(Z, Z)] -= sign * corner_atan(x * y, z * r);

            g[(X, Y)] += sign * corner_ln(z + r);
            g[(X, Z)] += sign * corner_ln(y + r);
            g[(Y, Z)] += sign * corner_ln(x + r);
        }
        g[(Y, X)] = g[(X, Y)];
        g[(Z, X)] = g[(X, Z)];
        g[(Z, Y)] = g[(Y, Z)];

        &g * (self.strength / FOUR_PI)
    }
}

/// A rectangular permanent magnet with uniform magnetization.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    magnetization: Vec3<fmg>,
    dimension: Vec3<fmg>,
    position: Point3<fmg>,
    subvolumes: Vec<SubVolume>,
}

impl Block {
    /// Creates a new block without sub-volumes.
    ///
    /// # Parameters
    ///
    /// - `magnetization`: Magnetization vector [T].
    /// - `dimension`: Extent of the block along each axis [m].
    /// - `position`: Center of the block [m].
    pub fn new(
        magnetization: Vec3<fmg>,
        dimension: Vec3<fmg>,
        position: Point3<fmg>,
    ) -> IdkitResult<Self> {
        validate_dimension(&dimension)?;
        Ok(Self {
            magnetization,
            dimension,
            position,
            subvolumes: Vec::new(),
        })
    }

    /// Creates a new block from the given sub-volumes.
    pub fn with_subvolumes(
        magnetization: Vec3<fmg>,
        dimension: Vec3<fmg>,
        position: Point3<fmg>,
        subvolumes: Vec<SubVolume>,
    ) -> IdkitResult<Self> {
        let mut block = Self::new(magnetization, dimension, position)?;
        block.subvolumes = subvolumes;
        Ok(block)
    }

    pub fn magnetization(&self) -> &Vec3<fmg> {
        &self.magnetization
    }

    pub fn dimension(&self) -> &Vec3<fmg> {
        &self.dimension
    }

    pub fn position(&self) -> &Point3<fmg> {
        &self.position
    }

    pub fn subvolumes(&self) -> &[SubVolume] {
        &self.subvolumes
    }

    pub fn set_magnetization(&mut self, magnetization: Vec3<fmg>) {
        self.magnetization = magnetization;
    }

    pub fn set_dimension(&mut self, dimension: Vec3<fmg>) -> IdkitResult<()> {
        validate_dimension(&dimension)?;
        self.dimension = dimension;
        Ok(())
    }

    pub fn set_position(&mut self, position: Point3<fmg>) {
        self.position = position;
    }

    /// Moves the block by the given displacement.
    pub fn shift(&mut self, displacement: &Vec3<fmg>) {
        self.position = &self.position + displacement;
    }

    /// Creates a copy of the block with the given orthogonal transformation
    /// applied to its magnetization, dimensions, position and sub-volumes.
    ///
    /// The transformation is expected to map coordinate axes onto coordinate
    /// axes (a signed permutation), so that the result is still axis aligned.
    pub fn transformed(&self, transformation: &Matrix3<fmg>) -> IdkitResult<Self> {
        let subvolumes = self
            .subvolumes
            .iter()
            .map(|subvolume| {
                SubVolume::new(
                    transformation.mul_vec(&subvolume.dimension).abs(),
                    transformation.mul_vec(&subvolume.position),
                    subvolume.strength,
                )
            })
            .collect::<IdkitResult<Vec<_>>>()?;
        Self::with_subvolumes(
            transformation.mul_vec(&self.magnetization),
            transformation.mul_vec(&self.dimension).abs(),
            transformation.mul_vec(&self.position.to_vec3()).to_point3(),
            subvolumes,
        )
    }

    /// Appends a sub-volume to the decomposition of the block.
    pub fn add_subvolume(&mut self, subvolume: SubVolume) {
        self.subvolumes.push(subvolume);
    }

    pub fn clear_subvolumes(&mut self) {
        self.subvolumes.clear();
    }

    /// Computes the field gradient matrix of the block at the given position,
    /// such that the field is `-G M`.
    ///
    /// Positions on the faces, edges or corners of a (sub-)volume give `NaN` entries.
    pub fn gradient_matrix(&self, position: &Point3<fmg>) -> Matrix3<fmg> {
        let displacement = position - &self.position;
        if self.subvolumes.is_empty() {
            SubVolume::full_volume(&self.dimension).gradient_matrix(&displacement)
        } else {
            self.subvolumes
                .iter()
                .fold(Matrix3::zero(), |mut total, subvolume| {
                    total += &subvolume.gradient_matrix(&displacement);
                    total
                })
        }
    }

    /// Computes the magnetic field [T] produced by the block at the given position.
    pub fn field_at(&self, position: &Point3<fmg>) -> Vec3<fmg> {
        -self.gradient_matrix(position).mul_vec(&self.magnetization)
    }
}

impl FieldSource for Block {
    fn field(&self, position: &Point3<fmg>) -> IdkitResult<Vec3<fmg>> {
        Ok(self.field_at(position))
    }
}
