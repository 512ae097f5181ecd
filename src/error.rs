//! Error types and error handling macros.

use crate::geometry::{Point3, Vec3};
use std::io;
use thiserror::Error;

/// Errors produced when building models or querying field sources.
#[derive(Error, Debug)]
pub enum IdkitError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Position {position} is outside the field domain [{lower}, {upper}]")]
    OutOfBounds {
        position: Point3<f64>,
        lower: Vec3<f64>,
        upper: Vec3<f64>,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl IdkitError {
    /// Creates an `InvalidConfiguration` error from anything printable.
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

/// Result type for operations that may fail with an `IdkitError`.
pub type IdkitResult<T> = Result<T, IdkitError>;

/// Returns early with an `InvalidConfiguration` error if the given condition is false.
#[macro_export]
macro_rules! ensure_valid {
    ($logic:expr, $($print_arg:tt)*) => {
        if !$logic {
            return Err($crate::error::IdkitError::InvalidConfiguration(format!($($print_arg)*)));
        }
    };
}

/// Converts a `Result` with a printable error into an `io::Result`
/// with an `InvalidData` error.
#[macro_export]
macro_rules! io_result {
    ($result:expr) => {
        $result.map_err(|err| {
            ::std::io::Error::new(::std::io::ErrorKind::InvalidData, err.to_string())
        })
    };
}

#[cfg(not(feature = "for-testing"))]
#[macro_export]
macro_rules! exit_with_error {
    ($($print_arg:tt)*) => {{
        eprintln!($($print_arg)*);
        quit::with_code(1);
    }};
}

#[cfg(feature = "for-testing")]
#[macro_export]
macro_rules! exit_with_error {
    ($($print_arg:tt)*) => {{
        panic!($($print_arg)*);
    }};
}

#[macro_export]
macro_rules! exit_on_error {
    ($result:expr, $($print_arg:tt)*) => {
        match $result {
            Ok(value) => value,
            Err(err) => {
                $crate::exit_with_error!($($print_arg)*, err)
            }
        }
    };
}

#[macro_export]
macro_rules! exit_on_false {
    ($logic:expr, $($print_arg:tt)*) => {
        if $logic {
            true
        } else {
            $crate::exit_with_error!($($print_arg)*)
        }
    };
}
