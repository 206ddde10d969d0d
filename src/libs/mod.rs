pub mod cluster;
pub mod error;
pub mod interval;
pub mod io;
pub mod links;
pub mod overlap;
pub mod pairwise;
pub mod remap;
pub mod species;

pub use error::CneError;
