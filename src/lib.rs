//! Gray-Scott reaction-diffusion engine with derived visual fields.
//!
//! This crate simulates a two-species Gray-Scott reaction-diffusion
//! process on a 2D toroidal grid and derives color, height, and
//! surface-normal fields from the concentration state, for real-time
//! visualization and generative-art hosts that recompute a pattern every
//! frame.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration types and validation
//! - `compute`: The double-buffered grid, the stepping pass, seed
//!   injection, and output derivation, tied together by [`Engine`]
//!
//! # Example
//!
//! ```rust,no_run
//! use gray_scott::{Engine, EngineConfig};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut engine = Engine::new(EngineConfig::default()).expect("valid config");
//! let mut rng = StdRng::seed_from_u64(1);
//! engine.reset(&mut rng);
//!
//! // One frame: inject a deposit, advance, read the derived fields.
//! engine.enqueue(128, 128);
//! engine.tick();
//!
//! let height = engine.height_map();
//! println!("center elevation: {}", height[128 * 256 + 128]);
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{ControlMap, Engine, GridStats, OutputFields};
pub use schema::{ConfigError, EngineConfig};
