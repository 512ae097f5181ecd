//! Command line interface for apertures and for masking kick-map files.

use super::utils;
use crate::{exit_on_error, grid::fgr, kickmap, mask::Mask};
use clap::{Arg, ArgMatches, Command};

/// Adds arguments for specifying the aperture mask.
pub fn add_mask_arguments(command: Command<'static>) -> Command<'static> {
    command
        .arg(
            Arg::new("mask-shape")
                .long("mask-shape")
                .require_equals(true)
                .value_name("SHAPE")
                .help("Shape of the aperture mask centered on the beam axis [default: none]")
                .takes_value(true)
                .possible_values(&["none", "ellipse", "rectangle", "diamond"])
                .ignore_case(true),
        )
        .arg(
            Arg::new("mask-dimensions")
                .long("mask-dimensions")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .value_names(&["WIDTH", "HEIGHT"])
                .help("Full width and height of the aperture mask [m]")
                .takes_value(true)
                .number_of_values(2),
        )
        .arg(
            Arg::new("mask-file")
                .long("mask-file")
                .require_equals(true)
                .value_name("PATH")
                .help("File listing the x and y coordinates [m] of the aperture boundary polygon")
                .takes_value(true)
                .conflicts_with_all(&["mask-shape", "mask-dimensions"]),
        )
}

/// Constructs the aperture mask specified by the given arguments.
pub fn construct_mask_from_arguments(arguments: &ArgMatches) -> Mask {
    if let Some(mask_file_path) = arguments.value_of("mask-file") {
        return exit_on_error!(
            Mask::from_file(mask_file_path),
            "Error: Could not read mask file: {}"
        );
    }
    let shape_name = arguments.value_of("mask-shape").unwrap_or("none");
    if shape_name.eq_ignore_ascii_case("none") {
        return Mask::none();
    }
    let dimensions: Vec<fgr> = utils::get_finite_float_values_from_required_parseable_argument(
        arguments,
        "mask-dimensions",
        2,
    );
    exit_on_error!(
        Mask::from_shape_name(shape_name, dimensions[0], dimensions[1]),
        "Error: Could not create mask: {}"
    )
}

/// Builds a representation of the `mask` command line subcommand.
pub fn create_mask_subcommand() -> Command<'static> {
    let command = Command::new("mask")
        .about("Invalidate the kicks of a kick-map file outside an aperture")
        .arg(
            Arg::new("input-file")
                .value_name("INPUT_FILE")
                .help("Path of the kick-map file to mask")
                .required(true)
                .takes_value(true),
        )
        .arg(
            Arg::new("output-file")
                .value_name("OUTPUT_FILE")
                .help("Path where the masked kick-map file should be written")
                .required(true)
                .takes_value(true),
        );
    utils::add_overwrite_argument(add_mask_arguments(command))
}

/// Runs the actions for the `mask` subcommand using the given arguments.
pub fn run_mask_subcommand(arguments: &ArgMatches) {
    let verbosity = utils::parse_verbosity(arguments, false);
    let input_file_path: String =
        utils::get_value_from_required_parseable_argument(arguments, "input-file");
    let output_file_path = utils::get_output_file_path(arguments, "output-file");
    let mask = construct_mask_from_arguments(arguments);

    exit_on_error!(
        kickmap::pass_through_mask(&input_file_path, &output_file_path, &mask),
        "Error: Could not mask kick-map: {}"
    );

    if verbosity.print_messages() {
        println!("Wrote masked kick-map to {}", output_file_path.display());
    }
}
