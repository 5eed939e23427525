//! Compute module - Numerical engine for the Gray-Scott simulation.

mod derive;
mod engine;
mod grid;
mod params;
mod seeds;
mod stepper;

pub use derive::*;
pub use engine::*;
pub use grid::*;
pub use params::*;
pub use seeds::*;
pub use stepper::*;
