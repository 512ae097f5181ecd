//! The `idkit` crate models the magnetic fields of permanent-magnet insertion
//! devices and computes kick-maps for electrons traversing them.

pub mod constants;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod io;
pub mod kickmap;
pub mod magnet;
pub mod mask;
pub mod num;
pub mod tracing;

#[cfg(feature = "cli")]
pub mod cli;
