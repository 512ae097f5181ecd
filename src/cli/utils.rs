//! Utilities for creating the command line interface.

use crate::{exit_on_error, exit_on_false, exit_with_error, io::Verbosity, num::BFloat};
use clap::{Arg, ArgMatches, Command};
use std::{path::PathBuf, str::FromStr};

/// Adds the argument for showing a progress bar.
pub fn add_progress_argument(command: Command<'static>) -> Command<'static> {
    command.arg(
        Arg::new("progress")
            .short('p')
            .long("progress")
            .help("Show progress bar (also implies `verbose`)"),
    )
}

/// Adds the argument for overwriting existing output files.
pub fn add_overwrite_argument(command: Command<'static>) -> Command<'static> {
    command.arg(
        Arg::new("overwrite")
            .long("overwrite")
            .help("Automatically overwrite any existing output file"),
    )
}

/// Determines the verbosity from the global `verbose` flag and, if
/// supported, the `progress` flag.
pub fn parse_verbosity(arguments: &ArgMatches, support_progress: bool) -> Verbosity {
    if support_progress && arguments.is_present("progress") {
        Verbosity::with_progress()
    } else if arguments.is_present("verbose") {
        Verbosity::Messages
    } else {
        Verbosity::Quiet
    }
}

pub fn parse_value_string<T>(argument_name: &str, value_string: &str) -> T
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    exit_on_error!(
        value_string.parse(),
        "Error: Could not parse value for {0}: {1}",
        argument_name
    )
}

fn verify_finite_float_value<F: BFloat>(argument_name: &str, value: F) {
    exit_on_false!(value.is_finite(), "Error: {} must be finite", argument_name);
}

fn verify_argument_value_count<T>(argument_name: &str, values: &[T], required_count: usize) {
    let count = values.len();
    exit_on_false!(
        count == required_count,
        "Error: {} must have {} values, got {}",
        argument_name,
        required_count,
        count
    );
}

fn required_value_of<'a>(arguments: &'a ArgMatches, argument_name: &str) -> &'a str {
    arguments.value_of(argument_name).unwrap_or_else(|| {
        exit_with_error!("Error: No value for argument {}", argument_name)
    })
}

/// Parses the value of an argument that is either required or has a default value.
pub fn get_value_from_required_parseable_argument<T>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> T
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    parse_value_string(argument_name, required_value_of(arguments, argument_name))
}

pub fn get_finite_float_value_from_required_parseable_argument<F>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> F
where
    F: BFloat + FromStr,
    <F as FromStr>::Err: std::fmt::Display,
{
    let value: F = get_value_from_required_parseable_argument(arguments, argument_name);
    verify_finite_float_value(argument_name, value);
    value
}

/// Parses the values of a required argument taking the given number of values.
pub fn get_values_from_required_parseable_argument<T>(
    arguments: &ArgMatches,
    argument_name: &str,
    required_count: usize,
) -> Vec<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    let values: Vec<T> = arguments
        .values_of(argument_name)
        .unwrap_or_else(|| exit_with_error!("Error: No values for argument {}", argument_name))
        .filter(|value_string| !value_string.is_empty())
        .map(|value_string| parse_value_string(argument_name, value_string))
        .collect();
    verify_argument_value_count(argument_name, &values, required_count);
    values
}

pub fn get_finite_float_values_from_required_parseable_argument<F>(
    arguments: &ArgMatches,
    argument_name: &str,
    required_count: usize,
) -> Vec<F>
where
    F: BFloat + FromStr,
    <F as FromStr>::Err: std::fmt::Display,
{
    let values: Vec<F> =
        get_values_from_required_parseable_argument(arguments, argument_name, required_count);
    values
        .iter()
        .for_each(|&value| verify_finite_float_value(argument_name, value));
    values
}

/// Sets the given value to the parsed argument value if the argument is present.
pub fn assign_value_from_parseable_argument<T>(
    value: &mut T,
    arguments: &ArgMatches,
    argument_name: &str,
) where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    if let Some(value_string) = arguments.value_of(argument_name) {
        *value = parse_value_string(argument_name, value_string);
    }
}

/// Returns the path given for the specified output file argument, exiting
/// if the file exists and overwriting was not requested.
pub fn get_output_file_path(arguments: &ArgMatches, argument_name: &str) -> PathBuf {
    let output_file_path = exit_on_error!(
        PathBuf::from_str(required_value_of(arguments, argument_name)),
        "Error: Could not interpret path to output file: {}"
    );
    if output_file_path.exists() && !arguments.is_present("overwrite") {
        exit_with_error!(
            "Error: File {} already exists\n\
             Tip: Use --overwrite to replace it",
            output_file_path.display()
        );
    }
    output_file_path
}
