//! Schema module - Configuration types for the reaction-diffusion engine.

mod config;

pub use config::*;
