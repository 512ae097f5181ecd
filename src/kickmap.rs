//! Kick-maps: tables of the transverse kick received by electrons
//! traversing an insertion device, as a function of entry position.

use crate::{
    ensure_valid,
    error::{IdkitError, IdkitResult},
    geometry::{Dim2, Point3, Vec3},
    grid::RegularGrid2,
    io::{kickmap as kickmap_io, Verbosity},
    magnet::FieldSource,
    mask::Mask,
    tracing::{
        compute_kick, ftr,
        stepping::rk4::{n_steps_for_distance, RungeKuttaStepperConfig},
        Beam, Kick,
    },
};
use indicatif::ParallelProgressIterator;
use ndarray::Array2;
use rayon::prelude::*;
use std::{io, path::Path};

#[cfg(feature = "serialization")]
use serde::Serialize;

/// Configuration parameters for kick-map generation.
#[derive(Clone, Debug, PartialEq)]
pub struct KickMapConfig {
    /// Kinetic energy of the electrons [eV].
    pub energy: ftr,
    /// Longitudinal coordinate where trajectories start [m].
    pub zmin: ftr,
    /// Longitudinal coordinate where trajectories end [m].
    pub zmax: ftr,
    /// Longitudinal length of a Runge–Kutta step [m].
    pub step_length: ftr,
}

impl KickMapConfig {
    pub const DEFAULT_ENERGY: ftr = 3e9;
    pub const DEFAULT_ZMIN: ftr = -1.0;
    pub const DEFAULT_ZMAX: ftr = 1.0;
    pub const DEFAULT_STEP_LENGTH: ftr = RungeKuttaStepperConfig::DEFAULT_STEP_LENGTH;

    /// Checks that the configuration parameters are valid.
    pub fn validate(&self) -> IdkitResult<()> {
        ensure_valid!(
            self.energy.is_finite() && self.energy > 0.0,
            "Energy must be larger than zero, got {}",
            self.energy
        );
        ensure_valid!(
            self.zmin.is_finite() && self.zmax.is_finite() && self.zmax > self.zmin,
            "zmax ({}) must be larger than zmin ({})",
            self.zmax,
            self.zmin
        );
        self.stepper_config().validate()
    }

    /// Returns the length of the traced region, which is taken as the
    /// effective length of the device [m].
    pub fn id_length(&self) -> ftr {
        self.zmax - self.zmin
    }

    /// Creates a stepper configuration allowing exactly the steps needed
    /// to cover the traced region.
    pub fn stepper_config(&self) -> RungeKuttaStepperConfig {
        RungeKuttaStepperConfig {
            step_length: self.step_length,
            max_steps: n_steps_for_distance(self.id_length(), self.step_length).max(1),
        }
    }
}

impl Default for KickMapConfig {
    fn default() -> Self {
        KickMapConfig {
            energy: Self::DEFAULT_ENERGY,
            zmin: Self::DEFAULT_ZMIN,
            zmax: Self::DEFAULT_ZMAX,
            step_length: Self::DEFAULT_STEP_LENGTH,
        }
    }
}

/// Table of horizontal and vertical kicks [T² m²] on a transverse grid.
///
/// Kick tables have shape `(ny, nx)`, and `NaN` marks invalid cells.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct KickMap {
    id_length: ftr,
    x: Vec<ftr>,
    y: Vec<ftr>,
    kick_x: Array2<ftr>,
    kick_y: Array2<ftr>,
}

fn is_strictly_ascending(values: &[ftr]) -> bool {
    values.windows(2).all(|pair| pair[0] < pair[1])
}

impl KickMap {
    /// Creates a new kick-map from its coordinates and kick tables.
    pub fn new(
        id_length: ftr,
        x: Vec<ftr>,
        y: Vec<ftr>,
        kick_x: Array2<ftr>,
        kick_y: Array2<ftr>,
    ) -> IdkitResult<Self> {
        ensure_valid!(
            id_length.is_finite() && id_length >= 0.0,
            "ID length must be non-negative, got {}",
            id_length
        );
        ensure_valid!(
            !x.is_empty() && !y.is_empty(),
            "Kick-map needs at least one point along each axis"
        );
        ensure_valid!(
            is_strictly_ascending(&x) && is_strictly_ascending(&y),
            "Kick-map coordinates must be strictly ascending"
        );
        let shape = (y.len(), x.len());
        ensure_valid!(
            kick_x.dim() == shape && kick_y.dim() == shape,
            "Kick tables must have shape {:?}, got {:?} and {:?}",
            shape,
            kick_x.dim(),
            kick_y.dim()
        );
        Ok(Self {
            id_length,
            x,
            y,
            kick_x,
            kick_y,
        })
    }

    /// Generates a kick-map by tracing electrons through the given field source.
    ///
    /// Electrons start at `zmin` moving along the z-axis from every grid
    /// point, and the kick is recorded when they reach `zmax`. Cells where
    /// the trajectory is outside the mask are `NaN`.
    ///
    /// # Parameters
    ///
    /// - `source`: Magnetic field source.
    /// - `grid`: Grid of start positions.
    /// - `mask`: Aperture restricting valid trajectories.
    /// - `config`: Configuration parameters.
    /// - `verbosity`: Whether and how to report progress.
    ///
    /// # Returns
    ///
    /// A `Result` which is either:
    ///
    /// - `Ok`: Contains the generated kick-map.
    /// - `Err`: Contains an error if the configuration is invalid, a start point
    /// lies outside the domain of the field source, or field evaluation failed.
    pub fn generate<S>(
        source: &S,
        grid: &RegularGrid2,
        mask: &Mask,
        config: &KickMapConfig,
        verbosity: &Verbosity,
    ) -> IdkitResult<Self>
    where
        S: FieldSource + ?Sized,
    {
        config.validate()?;
        let beam = Beam::from_kinetic_energy(config.energy)?;
        let stepper_config = config.stepper_config();
        let (nx, ny) = (grid.nx(), grid.ny());

        if let Some(domain) = source.domain() {
            for i in 0..ny {
                for j in 0..nx {
                    let point = grid.point(i, j);
                    if !mask.contains(&point) {
                        continue;
                    }
                    for &z in &[config.zmin, config.zmax] {
                        let position = Point3::new(point[Dim2::X], point[Dim2::Y], z);
                        if !domain.contains(&position) {
                            return Err(IdkitError::OutOfBounds {
                                position,
                                lower: domain.lower,
                                upper: domain.upper,
                            });
                        }
                    }
                }
            }
        }

        if verbosity.print_messages() {
            println!(
                "Computing kicks for {}x{} grid points with Brho = {:.6} T m",
                nx,
                ny,
                beam.rigidity()
            );
        }

        let direction = Vec3::new(0.0, 0.0, 1.0);
        let kicks = (0..grid.size())
            .into_par_iter()
            .progress_with(verbosity.create_progress_bar(grid.size()))
            .map(|idx| {
                let point = grid.point(idx / nx, idx % nx);
                let start_position = Point3::new(
                    point[Dim2::X],
                    point[Dim2::Y],
                    config.zmin,
                );
                match compute_kick(
                    source,
                    &beam,
                    &start_position,
                    &direction,
                    config.zmax,
                    mask,
                    &stepper_config,
                ) {
                    Err(IdkitError::OutOfBounds { .. }) => Ok(Kick::nan()),
                    result => result,
                }
            })
            .collect::<IdkitResult<Vec<Kick>>>()?;

        let n_invalid = kicks.iter().filter(|kick| kick.is_nan()).count();
        if verbosity.print_messages() && n_invalid > 0 {
            println!("{} of {} kicks are invalid", n_invalid, kicks.len());
        }

        Self::new(
            config.id_length(),
            grid.x().to_vec(),
            grid.y().to_vec(),
            Array2::from_shape_fn((ny, nx), |(i, j)| kicks[i * nx + j].x),
            Array2::from_shape_fn((ny, nx), |(i, j)| kicks[i * nx + j].y),
        )
    }

    /// Reads a kick-map from the given kick-map file.
    pub fn read_from_file<P: AsRef<Path>>(file_path: P) -> io::Result<Self> {
        kickmap_io::read_kick_map(file_path)
    }

    /// Writes the kick-map to the given file.
    pub fn write_to_file<P: AsRef<Path>>(&self, file_path: P) -> io::Result<()> {
        kickmap_io::write_kick_map(self, file_path)
    }

    /// Returns the effective length of the device [m].
    pub fn id_length(&self) -> ftr {
        self.id_length
    }

    pub fn x(&self) -> &[ftr] {
        &self.x
    }

    pub fn y(&self) -> &[ftr] {
        &self.y
    }

    pub fn nx(&self) -> usize {
        self.x.len()
    }

    pub fn ny(&self) -> usize {
        self.y.len()
    }

    /// Returns the horizontal kick table, indexed by `(y, x)`.
    pub fn kick_x(&self) -> &Array2<ftr> {
        &self.kick_x
    }

    /// Returns the vertical kick table, indexed by `(y, x)`.
    pub fn kick_y(&self) -> &Array2<ftr> {
        &self.kick_y
    }

    /// Returns the kick for the given row (y) and column (x) indices.
    pub fn kick(&self, i: usize, j: usize) -> Kick {
        Kick {
            x: self.kick_x[(i, j)],
            y: self.kick_y[(i, j)],
        }
    }

    /// Marks every cell outside the given mask as invalid.
    pub fn apply_mask(&mut self, mask: &Mask) {
        for (i, &y) in self.y.iter().enumerate() {
            for (j, &x) in self.x.iter().enumerate() {
                if !mask.is_inside(x, y) {
                    self.kick_x[(i, j)] = ftr::NAN;
                    self.kick_y[(i, j)] = ftr::NAN;
                }
            }
        }
    }
}

/// Reads a kick-map file, marks every cell outside the mask as invalid
/// and writes the result to the output file.
pub fn pass_through_mask<P, Q>(
    input_file_path: P,
    output_file_path: Q,
    mask: &Mask,
) -> io::Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let mut kick_map = KickMap::read_from_file(input_file_path)?;
    kick_map.apply_mask(mask);
    kick_map.write_to_file(output_file_path)
}
