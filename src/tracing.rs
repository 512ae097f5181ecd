//! Tracing charged particles through magnetic fields.

pub mod stepping;

use self::stepping::{
    rk4::{n_steps_for_distance, RungeKutta4Stepper, RungeKuttaStepperConfig},
    StepperResult, StoppingCause,
};
use crate::{
    constants::{CLIGHT, ELECTRON_REST_ENERGY},
    ensure_valid,
    error::IdkitResult,
    geometry::{
        Dim3::{X, Y, Z},
        Point3, Vec3,
    },
    magnet::FieldSource,
    mask::Mask,
};

#[cfg(feature = "serialization")]
use serde::Serialize;

/// Floating-point precision to use for tracing.
#[allow(non_camel_case_types)]
pub type ftr = f64;

/// Kinematic properties of an electron beam.
#[derive(Clone, Debug, PartialEq)]
pub struct Beam {
    kinetic_energy: ftr,
    rigidity: ftr,
    beta: ftr,
}

impl Beam {
    /// Creates an electron beam with the given kinetic energy [eV].
    pub fn from_kinetic_energy(kinetic_energy: ftr) -> IdkitResult<Self> {
        ensure_valid!(
            kinetic_energy.is_finite() && kinetic_energy > 0.0,
            "Beam energy must be larger than zero, got {}",
            kinetic_energy
        );
        let total_energy = kinetic_energy + ELECTRON_REST_ENERGY;
        let momentum =
            (total_energy * total_energy - ELECTRON_REST_ENERGY * ELECTRON_REST_ENERGY).sqrt();
        Ok(Self {
            kinetic_energy,
            rigidity: momentum / CLIGHT,
            beta: momentum / total_energy,
        })
    }

    /// Returns the kinetic energy of the electrons [eV].
    pub fn kinetic_energy(&self) -> ftr {
        self.kinetic_energy
    }

    /// Returns the magnetic rigidity Brho [T m].
    pub fn rigidity(&self) -> ftr {
        self.rigidity
    }

    /// Returns the electron speed relative to the speed of light.
    pub fn beta(&self) -> ftr {
        self.beta
    }
}

/// Transverse kick [T² m²], with `NaN` components for invalid trajectories.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Kick {
    pub x: ftr,
    pub y: ftr,
}

impl Kick {
    pub fn nan() -> Self {
        Self {
            x: ftr::NAN,
            y: ftr::NAN,
        }
    }

    /// Computes the kick corresponding to the change in the slopes
    /// `x' = t_x/t_z` and `y' = t_y/t_z` between the given directions.
    pub fn from_directions(beam: &Beam, start: &Vec3<ftr>, end: &Vec3<ftr>) -> Self {
        let scale = beam.rigidity() * beam.rigidity();
        Self {
            x: scale * (end[X] / end[Z] - start[X] / start[Z]),
            y: scale * (end[Y] / end[Z] - start[Y] / start[Z]),
        }
    }

    pub fn is_nan(&self) -> bool {
        self.x.is_nan() || self.y.is_nan()
    }
}

/// A sampled position along a trajectory, with the direction of motion there.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct TrajectoryPoint {
    pub position: Point3<ftr>,
    pub direction: Vec3<ftr>,
}

/// A traced trajectory.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Trajectory {
    pub points: Vec<TrajectoryPoint>,
    pub stopping_cause: StoppingCause,
}

impl Trajectory {
    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    /// Returns the last sampled point, if any.
    pub fn last_point(&self) -> Option<&TrajectoryPoint> {
        self.points.last()
    }
}

/// Traces an electron from the given start position until it reaches `zmax`.
///
/// # Parameters
///
/// - `source`: Magnetic field source.
/// - `beam`: Beam properties.
/// - `start_position`: Position where the tracing should start [m].
/// - `start_direction`: Initial direction of motion (need not be normalized).
/// - `zmax`: Longitudinal coordinate where tracing ends [m].
/// - `mask`: Aperture checked at the start and after every step.
/// - `config`: Configuration for the stepper.
/// - `callback`: Closure called with the position and direction at the start and after every step.
///
/// # Returns
///
/// A `Result` which is either:
///
/// - `Ok`: Contains the `StoppingCause` that terminated tracing.
/// - `Err`: Contains an error if the configuration is invalid or a field evaluation failed.
#[allow(clippy::too_many_arguments)]
pub fn trace_trajectory<S, C>(
    source: &S,
    beam: &Beam,
    start_position: &Point3<ftr>,
    start_direction: &Vec3<ftr>,
    zmax: ftr,
    mask: &Mask,
    config: &RungeKuttaStepperConfig,
    callback: &mut C,
) -> IdkitResult<StoppingCause>
where
    S: FieldSource + ?Sized,
    C: FnMut(&Point3<ftr>, &Vec3<ftr>),
{
    config.validate()?;
    let zmin = start_position[Z];
    ensure_valid!(
        zmax >= zmin,
        "End coordinate {} lies before start coordinate {}",
        zmax,
        zmin
    );

    let mut stepper = RungeKutta4Stepper::new(beam.rigidity())?;
    if let StepperResult::Stopped(cause) =
        stepper.place(start_position.clone(), start_direction.clone())
    {
        return Ok(cause);
    }
    if !mask.is_inside(start_position[X], start_position[Y]) {
        return Ok(StoppingCause::OutOfAperture);
    }
    callback(stepper.position(), stepper.direction());

    let n_steps = n_steps_for_distance(zmax - zmin, config.step_length);
    for step_idx in 0..n_steps {
        if step_idx == config.max_steps {
            return Ok(StoppingCause::TooManySteps);
        }
        let next_z = if step_idx + 1 == n_steps {
            zmax
        } else {
            zmin + ((step_idx + 1) as ftr) * config.step_length
        };
        if let StepperResult::Stopped(cause) = stepper.step_to(source, next_z)? {
            return Ok(cause);
        }
        let position = stepper.position();
        if !mask.is_inside(position[X], position[Y]) {
            return Ok(StoppingCause::OutOfAperture);
        }
        callback(position, stepper.direction());
    }
    Ok(StoppingCause::ReachedEnd)
}

/// Computes the net transverse kick received by an electron traversing the field.
///
/// The kick is `NaN` if the electron starts outside or leaves the aperture,
/// turns back, or needs more than the maximum number of steps.
pub fn compute_kick<S>(
    source: &S,
    beam: &Beam,
    start_position: &Point3<ftr>,
    start_direction: &Vec3<ftr>,
    zmax: ftr,
    mask: &Mask,
    config: &RungeKuttaStepperConfig,
) -> IdkitResult<Kick>
where
    S: FieldSource + ?Sized,
{
    let mut end_direction = start_direction.clone();
    let cause = trace_trajectory(
        source,
        beam,
        start_position,
        start_direction,
        zmax,
        mask,
        config,
        &mut |_: &Point3<ftr>, direction: &Vec3<ftr>| end_direction = direction.clone(),
    )?;
    Ok(if cause.is_complete() {
        Kick::from_directions(beam, start_direction, &end_direction)
    } else {
        Kick::nan()
    })
}

/// Computes the full sampled trajectory of an electron traversing the field.
pub fn compute_trajectory<S>(
    source: &S,
    beam: &Beam,
    start_position: &Point3<ftr>,
    start_direction: &Vec3<ftr>,
    zmax: ftr,
    mask: &Mask,
    config: &RungeKuttaStepperConfig,
) -> IdkitResult<Trajectory>
where
    S: FieldSource + ?Sized,
{
    let mut points = Vec::new();
    let stopping_cause = trace_trajectory(
        source,
        beam,
        start_position,
        start_direction,
        zmax,
        mask,
        config,
        &mut |position: &Point3<ftr>, direction: &Vec3<ftr>| {
            points.push(TrajectoryPoint {
                position: position.clone(),
                direction: direction.clone(),
            })
        },
    )?;
    Ok(Trajectory {
        points,
        stopping_cause,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::IdkitError, magnet::fmg};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    struct UniformField(Vec3<fmg>);

    impl FieldSource for UniformField {
        fn field(&self, _position: &Point3<fmg>) -> IdkitResult<Vec3<fmg>> {
            Ok(self.0.clone())
        }
    }

    struct BoundedField;

    impl FieldSource for BoundedField {
        fn field(&self, position: &Point3<fmg>) -> IdkitResult<Vec3<fmg>> {
            if position[Z] > 0.5 {
                Err(IdkitError::invalid("outside"))
            } else {
                Ok(Vec3::zero())
            }
        }
    }

    fn beam() -> Beam {
        Beam::from_kinetic_energy(3e9).unwrap()
    }

    fn forward() -> Vec3<ftr> {
        Vec3::new(0.0, 0.0, 1.0)
    }

    #[test]
    fn beam_rigidity_follows_energy_momentum_relation() {
        let beam = beam();
        let total_energy = 3e9 + ELECTRON_REST_ENERGY;
        let momentum = beam.rigidity() * CLIGHT;
        assert_relative_eq!(
            momentum * momentum + ELECTRON_REST_ENERGY * ELECTRON_REST_ENERGY,
            total_energy * total_energy,
            max_relative = 1e-14
        );
        assert_relative_eq!(beam.rigidity(), 10.008627, max_relative = 1e-6);
        assert!(beam.beta() < 1.0 && beam.beta() > 0.99999998);
        assert!(Beam::from_kinetic_energy(-1.0).is_err());
    }

    #[test]
    fn field_free_trajectory_is_straight() {
        let start = Point3::new(0.001, -0.002, 0.0);
        let direction = Vec3::new(1e-3, 2e-3, 1.0);
        let config = RungeKuttaStepperConfig {
            step_length: 0.1,
            ..RungeKuttaStepperConfig::default()
        };
        let trajectory = compute_trajectory(
            &UniformField(Vec3::zero()),
            &beam(),
            &start,
            &direction,
            0.25,
            &Mask::none(),
            &config,
        )
        .unwrap();
        assert_eq!(trajectory.stopping_cause, StoppingCause::ReachedEnd);
        assert_eq!(trajectory.n_points(), 4);
        let last = trajectory.last_point().unwrap();
        assert_eq!(last.position[Z], 0.25);
        assert_abs_diff_eq!(last.position, Point3::new(0.00125, -0.0015, 0.25), epsilon = 1e-15);

        let kick = compute_kick(
            &UniformField(Vec3::zero()),
            &beam(),
            &start,
            &direction,
            0.25,
            &Mask::none(),
            &config,
        )
        .unwrap();
        assert_abs_diff_eq!(kick.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(kick.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn uniform_field_kick_matches_circular_arc() {
        let beam = beam();
        let field = 0.5;
        let length = 1.0;
        let kick = compute_kick(
            &UniformField(Vec3::new(0.0, field, 0.0)),
            &beam,
            &Point3::origin(),
            &forward(),
            length,
            &Mask::none(),
            &RungeKuttaStepperConfig::default(),
        )
        .unwrap();
        let angle = (length * field / beam.rigidity()).asin();
        let expected = beam.rigidity() * beam.rigidity() * angle.tan();
        assert_relative_eq!(kick.x, expected, max_relative = 1e-9);
        assert_abs_diff_eq!(kick.y, 0.0, epsilon = 1e-12);
        assert!(kick.x > 0.0);
    }

    #[test]
    fn starting_outside_aperture_gives_nan_kick() {
        let mask = Mask::from_shape_name("rectangle", 0.01, 0.01).unwrap();
        let kick = compute_kick(
            &UniformField(Vec3::zero()),
            &beam(),
            &Point3::new(0.006, 0.0, 0.0),
            &forward(),
            1.0,
            &mask,
            &RungeKuttaStepperConfig::default(),
        )
        .unwrap();
        assert!(kick.x.is_nan() && kick.y.is_nan());
    }

    #[test]
    fn leaving_aperture_stops_tracing() {
        let mask = Mask::from_shape_name("rectangle", 0.01, 0.01).unwrap();
        let trajectory = compute_trajectory(
            &UniformField(Vec3::new(0.0, 1.0, 0.0)),
            &beam(),
            &Point3::origin(),
            &forward(),
            2.0,
            &mask,
            &RungeKuttaStepperConfig::default(),
        )
        .unwrap();
        assert_eq!(trajectory.stopping_cause, StoppingCause::OutOfAperture);
        let last_z = trajectory.last_point().unwrap().position[Z];
        assert!(last_z > 0.2 && last_z < 2.0);
    }

    #[test]
    fn exceeding_max_steps_gives_nan_kick() {
        let config = RungeKuttaStepperConfig {
            step_length: 0.1,
            max_steps: 5,
        };
        let trajectory = compute_trajectory(
            &UniformField(Vec3::zero()),
            &beam(),
            &Point3::origin(),
            &forward(),
            1.0,
            &Mask::none(),
            &config,
        )
        .unwrap();
        assert_eq!(trajectory.stopping_cause, StoppingCause::TooManySteps);
        assert_eq!(trajectory.n_points(), 6);
        let kick = compute_kick(
            &UniformField(Vec3::zero()),
            &beam(),
            &Point3::origin(),
            &forward(),
            1.0,
            &Mask::none(),
            &config,
        )
        .unwrap();
        assert!(kick.is_nan());
    }

    #[test]
    fn field_errors_propagate() {
        let result = compute_kick(
            &BoundedField,
            &beam(),
            &Point3::origin(),
            &forward(),
            1.0,
            &Mask::none(),
            &RungeKuttaStepperConfig::default(),
        );
        assert!(result.is_err());
        assert!(compute_kick(
            &BoundedField,
            &beam(),
            &Point3::origin(),
            &forward(),
            -1.0,
            &Mask::none(),
            &RungeKuttaStepperConfig::default(),
        )
        .is_err());
    }
}
