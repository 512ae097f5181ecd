//! Function for building the command line hierarchy.

use super::{
    kickmap::create_kickmap_subcommand, mask::create_mask_subcommand,
    trajectory::create_trajectory_subcommand,
};
use clap::{self, Arg, Command};

/// Build the `idkit` command line hierarchy.
pub fn build() -> Command<'static> {
    Command::new(clap::crate_name!())
        .version(clap::crate_version!())
        .author(clap::crate_authors!())
        .about(clap::crate_description!())
        .disable_help_subcommand(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("timing")
                .short('t')
                .long("timing")
                .help("Display elapsed time when done"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .help("Print status messages"),
        )
        .subcommand(create_kickmap_subcommand())
        .subcommand(create_mask_subcommand())
        .subcommand(create_trajectory_subcommand())
}
