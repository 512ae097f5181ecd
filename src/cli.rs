//! Command line interface.

pub mod build;
pub mod kickmap;
pub mod mask;
pub mod run;
pub mod source;
pub mod trajectory;
pub mod utils;
