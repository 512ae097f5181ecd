//! Stepping with the classical fourth-order Runge–Kutta method, using the
//! longitudinal coordinate as the independent variable.

use super::{StepperResult, StoppingCause};
use crate::{
    ensure_valid,
    error::IdkitResult,
    geometry::{Dim3::Z, Point3, Vec3},
    magnet::FieldSource,
    tracing::ftr,
};

/// Configuration parameters for Runge–Kutta steppers.
#[derive(Clone, Debug, PartialEq)]
pub struct RungeKuttaStepperConfig {
    /// Longitudinal length of a full step [m].
    pub step_length: ftr,
    /// Maximum number of steps before terminating.
    pub max_steps: usize,
}

impl RungeKuttaStepperConfig {
    pub const DEFAULT_STEP_LENGTH: ftr = 1e-3;
    pub const DEFAULT_MAX_STEPS: usize = 1_000_000;

    /// Checks that the configuration parameters are valid.
    pub fn validate(&self) -> IdkitResult<()> {
        ensure_valid!(
            self.step_length.is_finite() && self.step_length > 0.0,
            "Step length must be larger than zero, got {}",
            self.step_length
        );
        ensure_valid!(
            self.max_steps > 0,
            "Maximum number of steps must be larger than zero"
        );
        Ok(())
    }
}

impl Default for RungeKuttaStepperConfig {
    fn default() -> Self {
        RungeKuttaStepperConfig {
            step_length: Self::DEFAULT_STEP_LENGTH,
            max_steps: Self::DEFAULT_MAX_STEPS,
        }
    }
}

/// Amount by which the ratio of distance to step length may exceed an
/// integer without an extra step being added.
const STEP_COUNT_TOLERANCE: ftr = 1e-9;

/// Returns the number of steps needed to cover the given longitudinal
/// distance, where only the last step may be shorter than `step_length`.
pub fn n_steps_for_distance(distance: ftr, step_length: ftr) -> usize {
    if distance <= 0.0 {
        0
    } else {
        ((distance / step_length - STEP_COUNT_TOLERANCE).ceil() as usize).max(1)
    }
}

/// Fourth-order Runge–Kutta stepper for a charged particle moving
/// through a static magnetic field.
///
/// The state is the particle position and its direction of motion `t`,
/// evolved with `dr/dz = t/t_z` and `dt/dz = -(t × B)/(Brho t_z)`.
#[derive(Clone, Debug)]
pub struct RungeKutta4Stepper {
    rigidity: ftr,
    position: Point3<ftr>,
    direction: Vec3<ftr>,
}

impl RungeKutta4Stepper {
    /// Creates a new stepper for a beam with the given rigidity [T m].
    pub fn new(rigidity: ftr) -> IdkitResult<Self> {
        ensure_valid!(
            rigidity.is_finite() && rigidity > 0.0,
            "Beam rigidity must be larger than zero, got {}",
            rigidity
        );
        Ok(Self {
            rigidity,
            position: Point3::origin(),
            direction: Vec3::new(0.0, 0.0, 1.0),
        })
    }

    /// Places the stepper at the given position with the given direction of motion.
    ///
    /// # Returns
    ///
    /// A `StepperResult<()>` which is either:
    ///
    /// - `Ok`: Stepper placement succeeded.
    /// - `Stopped`: The direction does not point forward along the z-axis.
    pub fn place(&mut self, position: Point3<ftr>, direction: Vec3<ftr>) -> StepperResult<()> {
        self.position = position;
        self.direction = direction.normalized();
        self.check_direction()
    }

    /// Performs a step ending at the given longitudinal coordinate.
    ///
    /// # Returns
    ///
    /// A `Result` which is either:
    ///
    /// - `Ok`: Contains a `StepperResult<()>` which is `Stopped` if the particle turned back.
    /// - `Err`: Contains the error from a field evaluation.
    pub fn step_to<S>(&mut self, source: &S, next_z: ftr) -> IdkitResult<StepperResult<()>>
    where
        S: FieldSource + ?Sized,
    {
        let step_length = next_z - self.position[Z];
        let half_step_length = 0.5 * step_length;

        let (dr1, dt1) = self.derivatives(source, &self.position, &self.direction)?;
        let (dr2, dt2) = self.derivatives(
            source,
            &(&self.position + &(&dr1 * half_step_length)),
            &(&self.direction + &(&dt1 * half_step_length)),
        )?;
        let (dr3, dt3) = self.derivatives(
            source,
            &(&self.position + &(&dr2 * half_step_length)),
            &(&self.direction + &(&dt2 * half_step_length)),
        )?;
        let (dr4, dt4) = self.derivatives(
            source,
            &(&self.position + &(&dr3 * step_length)),
            &(&self.direction + &(&dt3 * step_length)),
        )?;

        let weight = step_length / 6.0;
        let dr = (dr1 + &(dr2 * 2.0) + &(dr3 * 2.0) + &dr4) * weight;
        let dt = (dt1 + &(dt2 * 2.0) + &(dt3 * 2.0) + &dt4) * weight;

        self.position = &self.position + &dr;
        self.position[Z] = next_z;
        self.direction += &dt;

        Ok(self.check_direction())
    }

    fn derivatives<S>(
        &self,
        source: &S,
        position: &Point3<ftr>,
        direction: &Vec3<ftr>,
    ) -> IdkitResult<(Vec3<ftr>, Vec3<ftr>)>
    where
        S: FieldSource + ?Sized,
    {
        let field = source.field(position)?;
        let tz = direction[Z];
        let position_derivative = direction / tz;
        let direction_derivative = direction.cross(&field) / (-self.rigidity * tz);
        Ok((position_derivative, direction_derivative))
    }

    fn check_direction(&self) -> StepperResult<()> {
        if self.direction[Z] > 0.0 {
            StepperResult::Ok(())
        } else {
            StepperResult::Stopped(StoppingCause::Reversed)
        }
    }

    /// Returns a reference to the current stepper position.
    pub fn position(&self) -> &Point3<ftr> {
        &self.position
    }

    /// Returns a reference to the current direction of motion.
    pub fn direction(&self) -> &Vec3<ftr> {
        &self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_count_covers_distance() {
        assert_eq!(n_steps_for_distance(0.0, 0.1), 0);
        assert_eq!(n_steps_for_distance(0.25, 0.1), 3);
        assert_eq!(n_steps_for_distance(0.3, 0.1), 3);
        assert_eq!(n_steps_for_distance(0.7, 0.1), 7);
        assert_eq!(n_steps_for_distance(1e-12, 0.1), 1);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(RungeKuttaStepperConfig::default().validate().is_ok());
        let config = RungeKuttaStepperConfig {
            step_length: 0.0,
            ..RungeKuttaStepperConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn backward_directions_are_stopped() {
        let mut stepper = RungeKutta4Stepper::new(10.0).unwrap();
        assert_eq!(
            stepper.place(Point3::origin(), Vec3::new(1.0, 0.0, -0.1)),
            StepperResult::Stopped(StoppingCause::Reversed)
        );
        assert_eq!(
            stepper.place(Point3::origin(), Vec3::new(0.1, 0.0, 1.0)),
            StepperResult::Ok(())
        );
        assert!(RungeKutta4Stepper::new(0.0).is_err());
    }
}
