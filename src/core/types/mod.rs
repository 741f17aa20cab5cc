pub mod config;
mod error;
mod stats;

pub use error::*;
pub use stats::*;
