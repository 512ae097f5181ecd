//! Insertion devices assembled from several Halbach cassettes.

use super::{block::Block, cassette::HalbachCassette, fmg, FieldSource};
use crate::{
    ensure_valid,
    error::IdkitResult,
    geometry::{
        Dim3::{X, Y, Z},
        Matrix3, Point3, Vec3,
    },
};

/// An insertion device consisting of an arbitrary set of cassettes
/// whose fields superpose.
#[derive(Clone, Debug, PartialEq)]
pub struct InsertionDevice {
    cassettes: Vec<HalbachCassette>,
}

impl InsertionDevice {
    /// Creates a new insertion device from the given cassettes.
    pub fn new(cassettes: Vec<HalbachCassette>) -> IdkitResult<Self> {
        ensure_valid!(
            !cassettes.is_empty(),
            "An insertion device needs at least one cassette"
        );
        Ok(Self { cassettes })
    }

    pub fn cassettes(&self) -> &[HalbachCassette] {
        &self.cassettes
    }

    pub fn n_cassettes(&self) -> usize {
        self.cassettes.len()
    }

    /// Returns a reference to the cassette with the given index, if it exists.
    pub fn cassette(&self, idx: usize) -> Option<&HalbachCassette> {
        self.cassettes.get(idx)
    }

    /// Returns a mutable reference to the cassette with the given index, if it exists.
    pub fn cassette_mut(&mut self, idx: usize) -> Option<&mut HalbachCassette> {
        self.cassettes.get_mut(idx)
    }

    /// Returns the number of periods of the first cassette.
    pub fn nr_periods(&self) -> usize {
        self.cassettes[0].nr_periods()
    }

    /// Computes the total magnetic field [T] of all cassettes at the given position.
    pub fn field_at(&self, position: &Point3<fmg>) -> Vec3<fmg> {
        self.cassettes
            .iter()
            .fold(Vec3::zero(), |mut total, cassette| {
                total += &cassette.field_at(position);
                total
            })
    }
}

impl FieldSource for InsertionDevice {
    fn field(&self, position: &Point3<fmg>) -> IdkitResult<Vec3<fmg>> {
        Ok(self.field_at(position))
    }
}

fn validate_gap(name: &str, gap: fmg) -> IdkitResult<()> {
    ensure_valid!(
        gap.is_finite() && gap >= 0.0,
        "{} must be non-negative, got {}",
        name,
        gap
    );
    Ok(())
}

/// Builds a cassette from the given block after transforming it with `transformation`,
/// conjugating the magnetization rotation accordingly, and centers it at `center`.
fn transformed_cassette(
    block: &Block,
    rotation: &Matrix3<fmg>,
    transformation: &Matrix3<fmg>,
    nr_periods: usize,
    block_separation: fmg,
    center: Point3<fmg>,
) -> IdkitResult<HalbachCassette> {
    let mut cassette = HalbachCassette::new(
        &block.transformed(transformation)?,
        rotation.conjugated_by(transformation),
        nr_periods,
        block_separation,
    )?;
    cassette.set_center_position(center);
    Ok(cassette)
}

/// Elliptically polarizing undulator of the APPLE-II type.
///
/// The four cassettes are the upper right (`csd`), upper left (`cse`),
/// lower right (`cid`) and lower left (`cie`) cassette. The lower cassettes
/// are mirror images of the upper ones through the horizontal midplane.
#[derive(Clone, Debug, PartialEq)]
pub struct Epu {
    device: InsertionDevice,
    magnetic_gap: fmg,
    cassette_separation: fmg,
    block_separation: fmg,
}

impl Epu {
    const CSD: usize = 0;
    const CSE: usize = 1;
    const CID: usize = 2;
    const CIE: usize = 3;

    /// Creates a new EPU.
    ///
    /// # Parameters
    ///
    /// - `block`: Generator block for the upper cassettes (its position is ignored).
    /// - `nr_periods`: Number of periods of each cassette.
    /// - `magnetic_gap`: Vertical distance between the upper and lower cassettes [m].
    /// - `cassette_separation`: Horizontal distance between the left and right cassettes [m].
    /// - `block_separation`: Longitudinal gap between adjacent blocks [m].
    /// - `phase_csd`: Longitudinal center of the upper right cassette [m].
    /// - `phase_cie`: Longitudinal center of the lower left cassette [m].
    pub fn new(
        block: &Block,
        nr_periods: usize,
        magnetic_gap: fmg,
        cassette_separation: fmg,
        block_separation: fmg,
        phase_csd: fmg,
        phase_cie: fmg,
    ) -> IdkitResult<Self> {
        validate_gap("Magnetic gap", magnetic_gap)?;
        validate_gap("Cassette separation", cassette_separation)?;

        let dimension = block.dimension();
        let y = 0.5 * (magnetic_gap + dimension[Y]);
        let x = 0.5 * (cassette_separation + dimension[X]);

        let rotation = Matrix3::rotx90p();
        let mirror = Matrix3::diagonal(-1.0, 1.0, -1.0);

        let cassettes = [
            (Matrix3::identity(), Point3::new(x, y, 0.0)),
            (Matrix3::identity(), Point3::new(-x, y, 0.0)),
            (mirror.clone(), Point3::new(x, -y, 0.0)),
            (mirror, Point3::new(-x, -y, 0.0)),
        ]
        .into_iter()
        .map(|(transformation, center)| {
            transformed_cassette(
                block,
                &rotation,
                &transformation,
                nr_periods,
                block_separation,
                center,
            )
        })
        .collect::<IdkitResult<Vec<_>>>()?;

        let mut epu = Self {
            device: InsertionDevice::new(cassettes)?,
            magnetic_gap,
            cassette_separation,
            block_separation,
        };
        epu.set_phase_csd(phase_csd);
        epu.set_phase_cie(phase_cie);
        Ok(epu)
    }

    pub fn device(&self) -> &InsertionDevice {
        &self.device
    }

    pub fn csd(&self) -> &HalbachCassette {
        &self.device.cassettes[Self::CSD]
    }

    pub fn cse(&self) -> &HalbachCassette {
        &self.device.cassettes[Self::CSE]
    }

    pub fn cid(&self) -> &HalbachCassette {
        &self.device.cassettes[Self::CID]
    }

    pub fn cie(&self) -> &HalbachCassette {
        &self.device.cassettes[Self::CIE]
    }

    pub fn nr_periods(&self) -> usize {
        self.device.nr_periods()
    }

    pub fn magnetic_gap(&self) -> fmg {
        self.magnetic_gap
    }

    pub fn cassette_separation(&self) -> fmg {
        self.cassette_separation
    }

    pub fn block_separation(&self) -> fmg {
        self.block_separation
    }

    /// Returns the longitudinal center of the upper right cassette [m].
    pub fn phase_csd(&self) -> fmg {
        self.csd().center_position()[Z]
    }

    /// Returns the longitudinal center of the lower left cassette [m].
    pub fn phase_cie(&self) -> fmg {
        self.cie().center_position()[Z]
    }

    /// Moves the upper right cassette longitudinally so that its center is at `phase`.
    pub fn set_phase_csd(&mut self, phase: fmg) {
        self.device.cassettes[Self::CSD].set_zcenter(phase);
    }

    /// Moves the lower left cassette longitudinally so that its center is at `phase`.
    pub fn set_phase_cie(&mut self, phase: fmg) {
        self.device.cassettes[Self::CIE].set_zcenter(phase);
    }

    pub fn field_at(&self, position: &Point3<fmg>) -> Vec3<fmg> {
        self.device.field_at(position)
    }
}

impl FieldSource for Epu {
    fn field(&self, position: &Point3<fmg>) -> IdkitResult<Vec3<fmg>> {
        Ok(self.field_at(position))
    }
}

/// DELTA undulator with four cassettes arranged around the beam axis.
///
/// The top (`cs`), right (`cd`), bottom (`ci`) and left (`ce`) cassettes are
/// the top cassette rotated about the longitudinal axis in steps of 90 degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct Delta {
    device: InsertionDevice,
    vertical_gap: fmg,
    horizontal_gap: fmg,
    block_separation: fmg,
}

impl Delta {
    const CS: usize = 0;
    const CD: usize = 1;
    const CI: usize = 2;
    const CE: usize = 3;

    /// Creates a new DELTA undulator.
    ///
    /// # Parameters
    ///
    /// - `block`: Generator block for the top cassette (its position is ignored).
    /// - `nr_periods`: Number of periods of each cassette.
    /// - `vertical_gap`: Distance between the top and bottom cassettes [m].
    /// - `horizontal_gap`: Distance between the left and right cassettes [m].
    /// - `block_separation`: Longitudinal gap between adjacent blocks [m].
    pub fn new(
        block: &Block,
        nr_periods: usize,
        vertical_gap: fmg,
        horizontal_gap: fmg,
        block_separation: fmg,
    ) -> IdkitResult<Self> {
        validate_gap("Vertical gap", vertical_gap)?;
        validate_gap("Horizontal gap", horizontal_gap)?;

        let height = block.dimension()[Y];
        let y = 0.5 * (vertical_gap + height);
        let x = 0.5 * (horizontal_gap + height);

        let rotation = Matrix3::rotx90p();

        let cassettes = [
            (Matrix3::identity(), Point3::new(0.0, y, 0.0)),
            (Matrix3::rotz90n(), Point3::new(x, 0.0, 0.0)),
            (Matrix3::diagonal(-1.0, -1.0, 1.0), Point3::new(0.0, -y, 0.0)),
            (Matrix3::rotz90p(), Point3::new(-x, 0.0, 0.0)),
        ]
        .into_iter()
        .map(|(transformation, center)| {
            transformed_cassette(
                block,
                &rotation,
                &transformation,
                nr_periods,
                block_separation,
                center,
            )
        })
        .collect::<IdkitResult<Vec<_>>>()?;

        Ok(Self {
            device: InsertionDevice::new(cassettes)?,
            vertical_gap,
            horizontal_gap,
            block_separation,
        })
    }

    pub fn device(&self) -> &InsertionDevice {
        &self.device
    }

    pub fn cs(&self) -> &HalbachCassette {
        &self.device.cassettes[Self::CS]
    }

    pub fn cd(&self) -> &HalbachCassette {
        &self.device.cassettes[Self::CD]
    }

    pub fn ci(&self) -> &HalbachCassette {
        &self.device.cassettes[Self::CI]
    }

    pub fn ce(&self) -> &HalbachCassette {
        &self.device.cassettes[Self::CE]
    }

    pub fn nr_periods(&self) -> usize {
        self.device.nr_periods()
    }

    pub fn vertical_gap(&self) -> fmg {
        self.vertical_gap
    }

    pub fn horizontal_gap(&self) -> fmg {
        self.horizontal_gap
    }

    pub fn block_separation(&self) -> fmg {
        self.block_separation
    }

    /// Returns the longitudinal center of the right cassette [m].
    pub fn phase_cd(&self) -> fmg {
        self.cd().center_position()[Z]
    }

    /// Returns the longitudinal center of the left cassette [m].
    pub fn phase_ce(&self) -> fmg {
        self.ce().center_position()[Z]
    }

    /// Moves the right cassette longitudinally so that its center is at `phase`.
    pub fn set_phase_cd(&mut self, phase: fmg) {
        self.device.cassettes[Self::CD].set_zcenter(phase);
    }

    /// Moves the left cassette longitudinally so that its center is at `phase`.
    pub fn set_phase_ce(&mut self, phase: fmg) {
        self.device.cassettes[Self::CE].set_zcenter(phase);
    }

    pub fn field_at(&self, position: &Point3<fmg>) -> Vec3<fmg> {
        self.device.field_at(position)
    }
}

impl FieldSource for Delta {
    fn field(&self, position: &Point3<fmg>) -> IdkitResult<Vec3<fmg>> {
        Ok(self.field_at(position))
    }
}
