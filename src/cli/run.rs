//! Function for running the command line program.

use super::{
    build, kickmap::run_kickmap_subcommand, mask::run_mask_subcommand,
    trajectory::run_trajectory_subcommand,
};
use clap::ArgMatches;
use std::time::Instant;

/// Runs the `idkit` command line program.
pub fn run() {
    run_with_args(build::build().get_matches());
}

/// Runs the `idkit` command line program with the given parsed arguments.
pub fn run_with_args(arguments: ArgMatches) {
    let start_instant = Instant::now();

    match arguments.subcommand() {
        Some(("kickmap", kickmap_arguments)) => run_kickmap_subcommand(kickmap_arguments),
        Some(("mask", mask_arguments)) => run_mask_subcommand(mask_arguments),
        Some(("trajectory", trajectory_arguments)) => {
            run_trajectory_subcommand(trajectory_arguments)
        }
        _ => {}
    }

    if arguments.is_present("timing") {
        println!("Elapsed time: {} s", start_instant.elapsed().as_secs_f64());
    }
}
