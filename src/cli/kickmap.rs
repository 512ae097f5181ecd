//! Command line interface for generating kick-maps.

use super::{mask, source, utils};
use crate::{
    exit_on_error,
    grid::{fgr, RegularGrid2},
    kickmap::{KickMap, KickMapConfig},
};
use clap::{Arg, ArgMatches, Command};

/// Adds arguments for parameters used in kick-map generation.
pub fn add_kick_map_config_arguments(command: Command<'static>) -> Command<'static> {
    command
        .arg(
            Arg::new("energy")
                .short('e')
                .long("energy")
                .require_equals(true)
                .value_name("VALUE")
                .help("Kinetic energy of the electrons [eV]")
                .takes_value(true)
                .default_value("3e9"),
        )
        .arg(
            Arg::new("zmin")
                .long("zmin")
                .require_equals(true)
                .allow_hyphen_values(true)
                .value_name("VALUE")
                .help("Longitudinal coordinate where tracing starts [m]")
                .takes_value(true)
                .default_value("-1.0"),
        )
        .arg(
            Arg::new("zmax")
                .long("zmax")
                .require_equals(true)
                .allow_hyphen_values(true)
                .value_name("VALUE")
                .help("Longitudinal coordinate where tracing ends [m]")
                .takes_value(true)
                .default_value("1.0"),
        )
        .arg(
            Arg::new("step-length")
                .long("step-length")
                .require_equals(true)
                .value_name("VALUE")
                .help("Longitudinal length of each Runge-Kutta step [m]")
                .takes_value(true)
                .default_value("1e-3"),
        )
}

/// Constructs a kick-map configuration from the given arguments.
pub fn construct_kick_map_config_from_arguments(arguments: &ArgMatches) -> KickMapConfig {
    let mut config = KickMapConfig::default();
    utils::assign_value_from_parseable_argument(&mut config.energy, arguments, "energy");
    utils::assign_value_from_parseable_argument(&mut config.zmin, arguments, "zmin");
    utils::assign_value_from_parseable_argument(&mut config.zmax, arguments, "zmax");
    utils::assign_value_from_parseable_argument(&mut config.step_length, arguments, "step-length");
    exit_on_error!(config.validate(), "Error: {}");
    config
}

fn add_grid_arguments(command: Command<'static>) -> Command<'static> {
    command
        .arg(
            Arg::new("shape")
                .short('s')
                .long("shape")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .value_names(&["NX", "NY"])
                .help("Number of grid points along x and y")
                .takes_value(true)
                .number_of_values(2)
                .required(true),
        )
        .arg(
            Arg::new("x-bounds")
                .short('x')
                .long("x-bounds")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .allow_hyphen_values(true)
                .value_names(&["LOWER", "UPPER"])
                .help("Lower and upper bound for the horizontal grid coordinates [m]")
                .takes_value(true)
                .number_of_values(2)
                .required(true),
        )
        .arg(
            Arg::new("y-bounds")
                .short('y')
                .long("y-bounds")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .allow_hyphen_values(true)
                .value_names(&["LOWER", "UPPER"])
                .help("Lower and upper bound for the vertical grid coordinates [m]")
                .takes_value(true)
                .number_of_values(2)
                .required(true),
        )
}

fn construct_grid_from_arguments(arguments: &ArgMatches) -> RegularGrid2 {
    let shape: Vec<usize> =
        utils::get_values_from_required_parseable_argument(arguments, "shape", 2);
    let x_bounds: Vec<fgr> =
        utils::get_finite_float_values_from_required_parseable_argument(arguments, "x-bounds", 2);
    let y_bounds: Vec<fgr> =
        utils::get_finite_float_values_from_required_parseable_argument(arguments, "y-bounds", 2);
    exit_on_error!(
        RegularGrid2::new(
            shape[0],
            shape[1],
            x_bounds[0],
            x_bounds[1],
            y_bounds[0],
            y_bounds[1]
        ),
        "Error: Invalid grid: {}"
    )
}

/// Builds a representation of the `kickmap` command line subcommand.
pub fn create_kickmap_subcommand() -> Command<'static> {
    let command = Command::new("kickmap")
        .about("Compute a kick-map by tracing electrons through an insertion device")
        .after_help(
            "The field source is specified with a subcommand following the options,\n\
             e.g. `idkit kickmap OUTPUT_FILE --shape=21,11 -x=-0.01,0.01 -y=-0.005,0.005 epu ...`",
        )
        .arg(
            Arg::new("output-file")
                .value_name("OUTPUT_FILE")
                .help("Path where the kick-map file should be written")
                .required(true)
                .takes_value(true),
        );
    let command = add_grid_arguments(command);
    let command = add_kick_map_config_arguments(command);
    let command = mask::add_mask_arguments(command);
    let command = utils::add_overwrite_argument(command);
    let command = utils::add_progress_argument(command);
    source::add_field_source_subcommands(command)
}

/// Runs the actions for the `kickmap` subcommand using the given arguments.
pub fn run_kickmap_subcommand(arguments: &ArgMatches) {
    let verbosity = utils::parse_verbosity(arguments, true);
    let output_file_path = utils::get_output_file_path(arguments, "output-file");
    let grid = construct_grid_from_arguments(arguments);
    let config = construct_kick_map_config_from_arguments(arguments);
    let mask = mask::construct_mask_from_arguments(arguments);
    let field_source = source::construct_field_source_from_arguments(arguments);

    let kick_map = exit_on_error!(
        KickMap::generate(field_source.as_ref(), &grid, &mask, &config, &verbosity),
        "Error: Could not compute kick-map: {}"
    );

    exit_on_error!(
        kick_map.write_to_file(&output_file_path),
        "Error: Could not write kick-map file: {}"
    );

    if verbosity.print_messages() {
        println!("Wrote kick-map to {}", output_file_path.display());
    }
}
