//! Command line interface for constructing magnetic field sources.

use super::utils;
use crate::{
    exit_on_error, exit_with_error,
    geometry::{Point3, Vec3},
    magnet::{
        block::Block,
        device::{Delta, Epu},
        field_map::FieldMapContainer,
        fmg, FieldSource,
    },
};
use clap::{Arg, ArgMatches, Command};

fn create_vector_argument(
    name: &'static str,
    value_names: &'static [&'static str],
    help: &'static str,
) -> Arg<'static> {
    Arg::new(name)
        .long(name)
        .require_equals(true)
        .use_value_delimiter(true)
        .require_value_delimiter(true)
        .allow_hyphen_values(true)
        .value_names(value_names)
        .help(help)
        .takes_value(true)
        .number_of_values(value_names.len())
}

fn create_value_argument(name: &'static str, help: &'static str) -> Arg<'static> {
    Arg::new(name)
        .long(name)
        .require_equals(true)
        .allow_hyphen_values(true)
        .value_name("VALUE")
        .help(help)
        .takes_value(true)
}

fn add_block_arguments(command: Command<'static>) -> Command<'static> {
    command
        .arg(
            create_vector_argument(
                "block-magnetization",
                &["MX", "MY", "MZ"],
                "Magnetization of the generator block [T]",
            )
            .required(true),
        )
        .arg(
            create_vector_argument(
                "block-dimensions",
                &["DX", "DY", "DZ"],
                "Dimensions of the generator block [m]",
            )
            .required(true),
        )
        .arg(
            Arg::new("periods")
                .short('n')
                .long("periods")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Number of periods of each cassette")
                .takes_value(true)
                .required(true),
        )
        .arg(
            create_value_argument(
                "block-separation",
                "Longitudinal gap between adjacent blocks [m]",
            )
            .default_value("0"),
        )
}

/// Builds a representation of the `epu` field source subcommand.
pub fn create_epu_subcommand() -> Command<'static> {
    add_block_arguments(
        Command::new("epu").about("Use an elliptically polarizing undulator (APPLE-II)"),
    )
        .arg(
            create_value_argument(
                "magnetic-gap",
                "Vertical distance between the upper and lower cassettes [m]",
            )
            .required(true),
        )
        .arg(
            create_value_argument(
                "cassette-separation",
                "Horizontal distance between the left and right cassettes [m]",
            )
            .required(true),
        )
        .arg(
            create_value_argument(
                "phase-csd",
                "Longitudinal shift of the upper right cassette [m]",
            )
            .default_value("0"),
        )
        .arg(
            create_value_argument(
                "phase-cie",
                "Longitudinal shift of the lower left cassette [m]",
            )
            .default_value("0"),
        )
}

/// Builds a representation of the `delta` field source subcommand.
pub fn create_delta_subcommand() -> Command<'static> {
    add_block_arguments(Command::new("delta").about("Use a DELTA undulator"))
        .arg(
            create_value_argument(
                "vertical-gap",
                "Distance between the top and bottom cassettes [m]",
            )
            .required(true),
        )
        .arg(
            create_value_argument(
                "horizontal-gap",
                "Distance between the left and right cassettes [m]",
            )
            .required(true),
        )
        .arg(
            create_value_argument(
                "phase-cd",
                "Longitudinal shift of the right cassette [m]",
            )
            .default_value("0"),
        )
        .arg(
            create_value_argument(
                "phase-ce",
                "Longitudinal shift of the left cassette [m]",
            )
            .default_value("0"),
        )
}

/// Builds a representation of the `field_map` field source subcommand.
pub fn create_field_map_subcommand() -> Command<'static> {
    Command::new("field_map")
        .about("Use a field map read from file")
        .long_about(
            "Use a field map read from file.\n\
             Each data line must hold the position [mm] and field [T] components\n\
             x y z bx by bz, and the samples of all files must together form a\n\
             complete regular grid.",
        )
        .arg(
            Arg::new("input-files")
                .value_name("INPUT_FILES")
                .help("Paths of the field map files")
                .required(true)
                .multiple_values(true)
                .takes_value(true),
        )
        .arg(
            Arg::new("symmetry")
                .long("symmetry")
                .help("Mirror a map covering only y >= 0 to the region y < 0"),
        )
}

/// Adds the field source subcommands to the given command.
pub fn add_field_source_subcommands(command: Command<'static>) -> Command<'static> {
    command
        .subcommand_required(true)
        .subcommand(create_epu_subcommand())
        .subcommand(create_delta_subcommand())
        .subcommand(create_field_map_subcommand())
}

fn construct_generator_block_from_arguments(arguments: &ArgMatches) -> Block {
    let magnetization: Vec<fmg> = utils::get_finite_float_values_from_required_parseable_argument(
        arguments,
        "block-magnetization",
        3,
    );
    let dimensions: Vec<fmg> = utils::get_finite_float_values_from_required_parseable_argument(
        arguments,
        "block-dimensions",
        3,
    );
    exit_on_error!(
        Block::new(
            Vec3::new(magnetization[0], magnetization[1], magnetization[2]),
            Vec3::new(dimensions[0], dimensions[1], dimensions[2]),
            Point3::origin(),
        ),
        "Error: Could not create generator block: {}"
    )
}

fn construct_epu_from_arguments(arguments: &ArgMatches) -> Epu {
    let block = construct_generator_block_from_arguments(arguments);
    let length = |name: &str| {
        utils::get_finite_float_value_from_required_parseable_argument::<fmg>(arguments, name)
    };
    exit_on_error!(
        Epu::new(
            &block,
            utils::get_value_from_required_parseable_argument(arguments, "periods"),
            length("magnetic-gap"),
            length("cassette-separation"),
            length("block-separation"),
            length("phase-csd"),
            length("phase-cie"),
        ),
        "Error: Could not create EPU: {}"
    )
}

fn construct_delta_from_arguments(arguments: &ArgMatches) -> Delta {
    let block = construct_generator_block_from_arguments(arguments);
    let length = |name: &str| {
        utils::get_finite_float_value_from_required_parseable_argument::<fmg>(arguments, name)
    };
    let mut delta = exit_on_error!(
        Delta::new(
            &block,
            utils::get_value_from_required_parseable_argument(arguments, "periods"),
            length("vertical-gap"),
            length("horizontal-gap"),
            length("block-separation"),
        ),
        "Error: Could not create DELTA: {}"
    );
    delta.set_phase_cd(length("phase-cd"));
    delta.set_phase_ce(length("phase-ce"));
    delta
}

fn construct_field_map_from_arguments(arguments: &ArgMatches) -> FieldMapContainer {
    let file_paths: Vec<&str> = arguments
        .values_of("input-files")
        .map(|values| values.collect())
        .unwrap_or_default();
    exit_on_error!(
        FieldMapContainer::from_files(&file_paths, arguments.is_present("symmetry")),
        "Error: Could not read field map: {}"
    )
}

/// Constructs the field source selected by the subcommand of the given arguments.
pub fn construct_field_source_from_arguments(arguments: &ArgMatches) -> Box<dyn FieldSource> {
    match arguments.subcommand() {
        Some(("epu", epu_arguments)) => Box::new(construct_epu_from_arguments(epu_arguments)),
        Some(("delta", delta_arguments)) => {
            Box::new(construct_delta_from_arguments(delta_arguments))
        }
        Some(("field_map", field_map_arguments)) => {
            Box::new(construct_field_map_from_arguments(field_map_arguments))
        }
        _ => exit_with_error!("Error: No field source specified"),
    }
}
