//! Subcommand modules for the `cnehg` binary.

pub mod cluster;
pub mod ids;
pub mod links;
pub mod overlap;
pub mod remap;
