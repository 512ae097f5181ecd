//! Command line interface for tracing single electron trajectories.

use super::{mask, source, utils};
use crate::{
    exit_on_error,
    geometry::{
        Dim3::{X, Y, Z},
        Point3, Vec3,
    },
    tracing::{
        compute_trajectory, ftr,
        stepping::{rk4::RungeKuttaStepperConfig, StoppingCause},
        Beam, Kick, Trajectory,
    },
};
use clap::{Arg, ArgMatches, Command};

/// Builds a representation of the `trajectory` command line subcommand.
pub fn create_trajectory_subcommand() -> Command<'static> {
    let command = Command::new("trajectory")
        .about("Trace a single electron through an insertion device")
        .arg(
            Arg::new("start-position")
                .long("start-position")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .allow_hyphen_values(true)
                .value_names(&["X", "Y", "Z"])
                .help("Position where tracing starts [m]")
                .takes_value(true)
                .number_of_values(3)
                .default_value("0,0,-1"),
        )
        .arg(
            Arg::new("start-direction")
                .long("start-direction")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .allow_hyphen_values(true)
                .value_names(&["TX", "TY", "TZ"])
                .help("Initial direction of motion")
                .takes_value(true)
                .number_of_values(3)
                .default_value("0,0,1"),
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
            Arg::new("energy")
                .short('e')
                .long("energy")
                .require_equals(true)
                .value_name("VALUE")
                .help("Kinetic energy of the electron [eV]")
                .takes_value(true)
                .default_value("3e9"),
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
        .arg(
            Arg::new("max-steps")
                .long("max-steps")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Maximum number of steps before terminating")
                .takes_value(true)
                .default_value("1000000"),
        )
        .arg(
            Arg::new("output-file")
                .short('o')
                .long("output-file")
                .require_equals(true)
                .value_name("PATH")
                .help(
                    "Path of a file where the trajectory should be saved\n\
                     Writes a JSON file if the extension is .json (requires the json feature),\n\
                     otherwise a text table [default: print the table]",
                )
                .takes_value(true),
        );
    let command = mask::add_mask_arguments(command);
    let command = utils::add_overwrite_argument(command);
    source::add_field_source_subcommands(command)
}

fn format_trajectory(trajectory: &Trajectory) -> String {
    let mut text = format!(
        "# Stopping cause: {:?}\n# x [m] y [m] z [m] tx ty tz\n",
        trajectory.stopping_cause
    );
    for point in &trajectory.points {
        text.push_str(&format!(
            "{:+.10e} {:+.10e} {:+.10e} {:+.10e} {:+.10e} {:+.10e}\n",
            point.position[X],
            point.position[Y],
            point.position[Z],
            point.direction[X],
            point.direction[Y],
            point.direction[Z]
        ));
    }
    text
}

fn save_trajectory(trajectory: &Trajectory, arguments: &ArgMatches) {
    let output_file_path = utils::get_output_file_path(arguments, "output-file");
    match output_file_path.extension().and_then(|extension| extension.to_str()) {
        #[cfg(feature = "json")]
        Some("json") => exit_on_error!(
            crate::io::utils::save_data_as_json(&output_file_path, trajectory),
            "Error: Could not save trajectory: {}"
        ),
        #[cfg(not(feature = "json"))]
        Some("json") => crate::exit_with_error!(
            "Error: Compile with json feature in order to write JSON files\n\
             Tip: Use cargo flag --features=json"
        ),
        _ => exit_on_error!(
            crate::io::utils::write_text_file(&format_trajectory(trajectory), &output_file_path),
            "Error: Could not save trajectory: {}"
        ),
    }
}

/// Runs the actions for the `trajectory` subcommand using the given arguments.
pub fn run_trajectory_subcommand(arguments: &ArgMatches) {
    let verbosity = utils::parse_verbosity(arguments, false);
    let vector = |name: &str| {
        utils::get_finite_float_values_from_required_parseable_argument::<ftr>(arguments, name, 3)
    };
    let start_position = vector("start-position");
    let start_direction = vector("start-direction");
    let zmax: ftr =
        utils::get_finite_float_value_from_required_parseable_argument(arguments, "zmax");
    let energy: ftr =
        utils::get_finite_float_value_from_required_parseable_argument(arguments, "energy");

    let mut config = RungeKuttaStepperConfig::default();
    utils::assign_value_from_parseable_argument(&mut config.step_length, arguments, "step-length");
    utils::assign_value_from_parseable_argument(&mut config.max_steps, arguments, "max-steps");

    let mask = mask::construct_mask_from_arguments(arguments);
    let field_source = source::construct_field_source_from_arguments(arguments);
    let beam = exit_on_error!(Beam::from_kinetic_energy(energy), "Error: {}");

    let start_position = Point3::new(start_position[0], start_position[1], start_position[2]);
    let start_direction = Vec3::new(start_direction[0], start_direction[1], start_direction[2]);

    let trajectory = exit_on_error!(
        compute_trajectory(
            field_source.as_ref(),
            &beam,
            &start_position,
            &start_direction,
            zmax,
            &mask,
            &config
        ),
        "Error: Could not trace trajectory: {}"
    );

    if verbosity.print_messages() {
        println!(
            "Traced {} points with Brho = {:.6} T m, stopped due to {:?}",
            trajectory.n_points(),
            beam.rigidity(),
            trajectory.stopping_cause
        );
        if trajectory.stopping_cause == StoppingCause::ReachedEnd {
            if let Some(last_point) = trajectory.last_point() {
                let kick = Kick::from_directions(
                    &beam,
                    &start_direction.normalized(),
                    &last_point.direction,
                );
                println!("Kick: ({:+e}, {:+e}) T2m2", kick.x, kick.y);
            }
        }
    }

    if arguments.is_present("output-file") {
        save_trajectory(&trajectory, arguments);
    } else {
        print!("{}", format_trajectory(&trajectory));
    }
}
