//! Periodic arrays of blocks with rotating magnetization.

use super::{block::Block, container::BlockContainer, fmg, FieldSource};
use crate::{
    ensure_valid,
    error::IdkitResult,
    geometry::{
        Dim3::{self, X, Y, Z},
        Matrix3, Point3, Vec3,
    },
};

/// A Halbach cassette: a linear array of blocks along the z-axis where the
/// magnetization of each block is rotated relative to the previous one.
///
/// The position of the first block is the stored reference frame. The center
/// position is derived from it, with its z-coordinate displaced by half the
/// total longitudinal extent of the cassette.
#[derive(Clone, Debug, PartialEq)]
pub struct HalbachCassette {
    rotation: Matrix3<fmg>,
    nr_periods: usize,
    blocks_per_period: usize,
    spacing: fmg,
    container: BlockContainer,
}

impl HalbachCassette {
    pub const DEFAULT_BLOCKS_PER_PERIOD: usize = 4;

    /// Creates a new cassette with the default number of blocks per period.
    ///
    /// # Parameters
    ///
    /// - `block`: Generator block, whose position becomes the first block position.
    /// - `rotation`: Rotation applied to the magnetization from one block to the next.
    /// - `nr_periods`: Number of periods.
    /// - `spacing`: Longitudinal gap between adjacent blocks [m].
    pub fn new(
        block: &Block,
        rotation: Matrix3<fmg>,
        nr_periods: usize,
        spacing: fmg,
    ) -> IdkitResult<Self> {
        Self::with_blocks_per_period(
            block,
            rotation,
            nr_periods,
            spacing,
            Self::DEFAULT_BLOCKS_PER_PERIOD,
        )
    }

    /// Creates a new cassette with the given number of blocks per period.
    pub fn with_blocks_per_period(
        block: &Block,
        rotation: Matrix3<fmg>,
        nr_periods: usize,
        spacing: fmg,
        blocks_per_period: usize,
    ) -> IdkitResult<Self> {
        ensure_valid!(nr_periods > 0, "Number of periods must be positive");
        ensure_valid!(
            blocks_per_period > 0,
            "Number of blocks per period must be positive"
        );
        ensure_valid!(
            spacing.is_finite() && spacing >= 0.0,
            "Block spacing must be non-negative, got {}",
            spacing
        );
        ensure_valid!(
            !rotation.has_nan(),
            "Rotation matrix must not contain NaN"
        );

        let n_blocks = nr_periods * blocks_per_period;
        let step = block.dimension()[Z] + spacing;
        let blocks = (0..n_blocks)
            .map(|idx| {
                let mut member = block.clone();
                member.set_magnetization(rotation.powi(idx).mul_vec(block.magnetization()));
                member.shift(&Vec3::new(0.0, 0.0, (idx as fmg) * step));
                member
            })
            .collect();

        Ok(Self {
            rotation,
            nr_periods,
            blocks_per_period,
            spacing,
            container: BlockContainer::new(blocks),
        })
    }

    /// Returns the generator block, which is the first block of the cassette.
    pub fn genblock(&self) -> &Block {
        &self.container.blocks()[0]
    }

    pub fn rotation(&self) -> &Matrix3<fmg> {
        &self.rotation
    }

    pub fn nr_periods(&self) -> usize {
        self.nr_periods
    }

    pub fn blocks_per_period(&self) -> usize {
        self.blocks_per_period
    }

    pub fn spacing(&self) -> fmg {
        self.spacing
    }

    pub fn n_blocks(&self) -> usize {
        self.container.n_blocks()
    }

    pub fn blocks(&self) -> &[Block] {
        self.container.blocks()
    }

    /// Returns a reference to the block with the given index, if it exists.
    pub fn block(&self, idx: usize) -> Option<&Block> {
        self.container.block(idx)
    }

    /// Returns the magnetization vectors of all blocks in order.
    pub fn magnetization_vectors(&self) -> Vec<Vec3<fmg>> {
        self.blocks()
            .iter()
            .map(|block| block.magnetization().clone())
            .collect()
    }

    /// Returns the total extent of the cassette along each axis [m].
    pub fn dimension(&self) -> Vec3<fmg> {
        let block_dimension = self.genblock().dimension();
        let n_blocks = self.n_blocks() as fmg;
        Vec3::new(
            block_dimension[X],
            block_dimension[Y],
            (n_blocks - 1.0) * (block_dimension[Z] + self.spacing) + block_dimension[Z],
        )
    }

    /// Returns half the total longitudinal extent of the cassette [m].
    pub fn half_longitudinal_extent(&self) -> fmg {
        0.5 * self.dimension()[Z]
    }

    pub fn first_block_position(&self) -> Point3<fmg> {
        self.genblock().position().clone()
    }

    pub fn center_position(&self) -> Point3<fmg> {
        let mut center = self.first_block_position();
        center[Z] += self.half_longitudinal_extent();
        center
    }

    /// Moves the cassette so that the first block is at the given position.
    pub fn set_first_block_position(&mut self, position: Point3<fmg>) {
        let displacement = &position - &self.first_block_position();
        self.shift(&displacement);
    }

    /// Moves the cassette so that its center is at the given position.
    pub fn set_center_position(&mut self, mut position: Point3<fmg>) {
        position[Z] -= self.half_longitudinal_extent();
        self.set_first_block_position(position);
    }

    fn set_center_component(&mut self, dim: Dim3, value: fmg) {
        let mut center = self.center_position();
        center[dim] = value;
        self.set_center_position(center);
    }

    /// Sets the horizontal coordinate of the cassette center.
    pub fn set_xcenter(&mut self, x: fmg) {
        self.set_center_component(X, x);
    }

    /// Sets the vertical coordinate of the cassette center.
    pub fn set_ycenter(&mut self, y: fmg) {
        self.set_center_component(Y, y);
    }

    /// Sets the longitudinal coordinate of the cassette center.
    pub fn set_zcenter(&mut self, z: fmg) {
        self.set_center_component(Z, z);
    }

    /// Moves every block of the cassette by the given displacement.
    pub fn shift(&mut self, displacement: &Vec3<fmg>) {
        self.container.shift(displacement);
    }

    /// Computes the total magnetic field [T] of the cassette at the given position.
    pub fn field_at(&self, position: &Point3<fmg>) -> Vec3<fmg> {
        self.container.field_at(position)
    }
}

impl FieldSource for HalbachCassette {
    fn field(&self, position: &Point3<fmg>) -> IdkitResult<Vec3<fmg>> {
        Ok(self.field_at(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn cube_cassette() -> HalbachCassette {
        let block = Block::new(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::equal_components(0.06),
            Point3::origin(),
        )
        .unwrap();
        HalbachCassette::new(&block, Matrix3::rotx90p(), 3, 0.0).unwrap()
    }

    #[test]
    fn generator_block_is_first_block() {
        let cassette = cube_cassette();
        assert_eq!(cassette.n_blocks(), 12);
        assert_eq!(cassette.genblock().magnetization(), &Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(cassette.genblock().dimension(), &Vec3::equal_components(0.06));
        assert_eq!(cassette.genblock().position(), &Point3::origin());
    }

    #[test]
    fn magnetization_rotates_from_block_to_block() {
        let block = Block::new(
            Vec3::new(0.2, 1.0, -0.4),
            Vec3::new(0.02, 0.03, 0.01),
            Point3::origin(),
        )
        .unwrap();
        let rotation = Matrix3::rotation_about_axis(&Vec3::new(1.0, 0.3, 0.1), 0.7);
        let cassette =
            HalbachCassette::with_blocks_per_period(&block, rotation.clone(), 2, 0.001, 3).unwrap();
        let magnetizations = cassette.magnetization_vectors();
        assert_eq!(magnetizations.len(), 6);
        for (idx, magnetization) in magnetizations.iter().enumerate() {
            assert_abs_diff_eq!(
                magnetization,
                &rotation.powi(idx).mul_vec(block.magnetization()),
                epsilon = 1e-15
            );
        }
    }

    #[test]
    fn blocks_are_laid_out_along_z() {
        let block = Block::new(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.02, 0.03, 0.01),
            Point3::new(0.1, -0.2, 0.3),
        )
        .unwrap();
        let cassette = HalbachCassette::new(&block, Matrix3::rotx90p(), 2, 0.005).unwrap();
        for (idx, member) in cassette.blocks().iter().enumerate() {
            assert_abs_diff_eq!(
                member.position(),
                &Point3::new(0.1, -0.2, 0.3 + (idx as fmg) * 0.015),
                epsilon = 1e-15
            );
        }
        assert_abs_diff_eq!(
            cassette.dimension(),
            Vec3::new(0.02, 0.03, 7.0 * 0.015 + 0.01),
            epsilon = 1e-15
        );
    }

    #[test]
    fn setting_center_updates_first_block_position() {
        let mut cassette = cube_cassette();
        let dimension = cassette.dimension();

        cassette.set_xcenter(100.0);
        cassette.set_ycenter(-5.0);
        cassette.set_zcenter(8.0);
        let center = cassette.center_position();
        let first = cassette.first_block_position();
        assert_abs_diff_eq!(center, Point3::new(100.0, -5.0, 8.0), epsilon = 1e-12);
        assert_abs_diff_eq!(
            first,
            Point3::new(100.0, -5.0, 8.0 - dimension[Z] / 2.0),
            epsilon = 1e-12
        );
        assert_eq!(cassette.genblock().position(), &first);

        cassette.set_first_block_position(Point3::origin());
        assert_eq!(cassette.first_block_position(), Point3::origin());
        assert_abs_diff_eq!(
            cassette.center_position(),
            Point3::new(0.0, 0.0, dimension[Z] / 2.0)
        );
    }

    #[test]
    fn frames_stay_consistent_under_repositioning() {
        let mut cassette = cube_cassette();
        let half_extent = cassette.half_longitudinal_extent();
        cassette.set_center_position(Point3::new(0.3, 0.1, -2.0));
        cassette.set_first_block_position(Point3::new(-0.3, 0.0, 1.5));
        cassette.set_zcenter(0.25);
        cassette.shift(&Vec3::new(0.0, 0.0, 0.125));
        assert_abs_diff_eq!(
            cassette.center_position()[Z] - cassette.first_block_position()[Z],
            half_extent,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(cassette.center_position()[Z], 0.375, epsilon = 1e-12);
        let last = cassette.block(cassette.n_blocks() - 1).unwrap();
        assert_abs_diff_eq!(
            last.position()[Z] - cassette.first_block_position()[Z],
            11.0 * 0.06,
            epsilon = 1e-12
        );
    }

    #[test]
    fn invalid_cassettes_are_rejected() {
        let block = Block::new(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::equal_components(0.06),
            Point3::origin(),
        )
        .unwrap();
        assert!(HalbachCassette::new(&block, Matrix3::rotx90p(), 0, 0.0).is_err());
        assert!(HalbachCassette::new(&block, Matrix3::rotx90p(), 2, -0.1).is_err());
        assert!(
            HalbachCassette::with_blocks_per_period(&block, Matrix3::rotx90p(), 2, 0.0, 0).is_err()
        );
    }
}
