//! Stepping particles along their trajectories.

pub mod rk4;

/// A stepper result which is either OK (with an abitrary value) or stopped (with a cause).
#[derive(Clone, Debug, PartialEq)]
pub enum StepperResult<T> {
    Ok(T),
    Stopped(StoppingCause),
}

/// Reason for terminating stepping.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize))]
pub enum StoppingCause {
    /// The particle reached the end of the integration range.
    ReachedEnd,
    /// The particle was outside the aperture.
    OutOfAperture,
    /// The particle no longer moved forward along the z-axis.
    Reversed,
    /// The maximum number of steps was exceeded.
    TooManySteps,
}

impl StoppingCause {
    /// Whether the particle completed its path through the field.
    pub fn is_complete(self) -> bool {
        self == Self::ReachedEnd
    }
}
