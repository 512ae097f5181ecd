//! Ordered collections of blocks.

use super::{block::Block, fmg, FieldSource};
use crate::{
    error::IdkitResult,
    geometry::{Point3, Vec3},
};

/// An ordered collection of blocks whose fields superpose.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockContainer {
    blocks: Vec<Block>,
}

impl BlockContainer {
    /// Creates a new container holding the given blocks.
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Returns a reference to the block with the given index, if it exists.
    pub fn block(&self, idx: usize) -> Option<&Block> {
        self.blocks.get(idx)
    }

    pub fn n_blocks(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Moves every block by the given displacement.
    pub fn shift(&mut self, displacement: &Vec3<fmg>) {
        self.blocks
            .iter_mut()
            .for_each(|block| block.shift(displacement));
    }

    /// Computes the total magnetic field [T] of all blocks at the given position.
    pub fn field_at(&self, position: &Point3<fmg>) -> Vec3<fmg> {
        self.blocks
            .iter()
            .fold(Vec3::zero(), |mut total, block| {
                total += &block.field_at(position);
                total
            })
    }
}

impl FieldSource for BlockContainer {
    fn field(&self, position: &Point3<fmg>) -> IdkitResult<Vec3<fmg>> {
        Ok(self.field_at(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn blocks() -> Vec<Block> {
        vec![
            Block::new(
                Vec3::new(0.0, 1.2, 0.0),
                Vec3::new(0.02, 0.03, 0.01),
                Point3::new(0.0, 0.02, -0.01),
            )
            .unwrap(),
            Block::new(
                Vec3::new(0.3, -0.2, 1.0),
                Vec3::new(0.01, 0.01, 0.01),
                Point3::new(0.01, -0.02, 0.02),
            )
            .unwrap(),
        ]
    }

    #[test]
    fn empty_container_has_zero_field() {
        let container = BlockContainer::default();
        assert!(container.is_empty());
        assert_eq!(container.field_at(&Point3::new(0.1, 0.2, 0.3)), Vec3::zero());
    }

    #[test]
    fn container_field_is_sum_of_block_fields() {
        let blocks = blocks();
        let position = Point3::new(0.003, 0.001, 0.004);
        let expected = &blocks[0].field_at(&position) + &blocks[1].field_at(&position);
        let container = BlockContainer::new(blocks);
        assert_eq!(container.n_blocks(), 2);
        assert_abs_diff_eq!(container.field_at(&position), expected, epsilon = 1e-15);
        assert_abs_diff_eq!(
            container.fields(&[position.clone()]).unwrap()[0],
            expected,
            epsilon = 1e-15
        );
    }

    #[test]
    fn shifting_container_moves_field_pattern() {
        let mut container = BlockContainer::new(blocks());
        let position = Point3::new(0.003, 0.001, 0.004);
        let before = container.field_at(&position);
        let displacement = Vec3::new(0.001, -0.002, 0.05);
        container.shift(&displacement);
        assert_abs_diff_eq!(
            container.block(1).unwrap().position(),
            &Point3::new(0.011, -0.022, 0.07),
            epsilon = 1e-15
        );
        assert_abs_diff_eq!(
            container.field_at(&(&position + &displacement)),
            before,
            epsilon = 1e-12
        );
    }
}
