//! Engine facade - owns all simulation state and drives the tick pipeline.
//!
//! One tick runs: seed flush, `speed` stepping passes (each with its own
//! buffer swap), then output derivation. The stages are strictly ordered;
//! the queue and the stepper never touch the grid concurrently.

use log::{debug, info};
use rand::Rng;

use crate::schema::{ConfigError, EngineConfig, FeedMapConfig, ReactionConfig, ShadingConfig};

use super::{
    Cell, ControlMap, GridState, OutputFields, RateField, SeedQueue, derive_into, stamp_square,
    step_into,
};

/// Gray-Scott simulation engine.
///
/// Exclusively owns both grid buffers and the derived output fields for
/// its whole lifetime. External influence goes through [`Engine::enqueue`],
/// [`Engine::reset`], and the parameter setters; nothing else mutates the
/// buffers.
pub struct Engine {
    config: EngineConfig,
    grid: GridState,
    queue: SeedQueue,
    fields: OutputFields,
    control_map: Option<ControlMap>,
}

impl Engine {
    /// Validate the configuration and allocate all buffers.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let grid = GridState::new(config.width, config.height);
        let mut fields = OutputFields::new(config.width, config.height);
        derive_into(grid.current(), &mut fields, &config.shading);

        let queue = SeedQueue::new(config.seeding.input_max);

        Ok(Self {
            config,
            grid,
            queue,
            fields,
            control_map: None,
        })
    }

    /// Reinitialize every cell to rest, stamp `seed_num` random activator
    /// patches, and drop any queued seed requests.
    pub fn reset(&mut self, rng: &mut impl Rng) {
        let width = self.config.width;
        let height = self.config.height;
        let seed_size = self.config.seeding.seed_size;
        let seed_num = self.config.seeding.seed_num;

        self.grid.clear();
        self.queue.clear();

        for _ in 0..seed_num {
            let x = rng.gen_range(0..width) as i32;
            let y = rng.gen_range(0..height) as i32;
            stamp_square(self.grid.current_mut(), width, height, x, y, seed_size);
        }

        derive_into(self.grid.current(), &mut self.fields, &self.config.shading);
        info!(
            "reset {}x{} grid with {} seed patches",
            width, height, seed_num
        );
    }

    /// Reallocate for new dimensions and reset. Invalid dimensions are
    /// rejected before anything is touched, leaving prior state intact.
    pub fn resize(
        &mut self,
        width: usize,
        height: usize,
        rng: &mut impl Rng,
    ) -> Result<(), ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }

        self.config.width = width;
        self.config.height = height;
        self.grid = GridState::new(width, height);
        self.fields = OutputFields::new(width, height);
        self.reset(rng);
        Ok(())
    }

    /// Request an activator deposit at `(x, y)` (wrapped into the grid).
    /// Dropped silently when the queue is full.
    pub fn enqueue(&mut self, x: i32, y: i32) {
        self.queue.enqueue(x, y);
    }

    /// Request `count` deposits at random grid positions.
    pub fn enqueue_random(&mut self, count: usize, rng: &mut impl Rng) {
        for _ in 0..count {
            let x = rng.gen_range(0..self.config.width as i32);
            let y = rng.gen_range(0..self.config.height as i32);
            self.queue.enqueue(x, y);
        }
    }

    /// Attach or detach the control map sampled in mapped-rate mode.
    pub fn set_control_map(&mut self, map: Option<ControlMap>) {
        debug!(
            "control map {}",
            if map.is_some() { "attached" } else { "detached" }
        );
        self.control_map = map;
    }

    /// Advance one frame: flush seeds, run `speed` stepping passes, derive
    /// the output fields.
    pub fn tick(&mut self) {
        let width = self.config.width;
        let height = self.config.height;

        // Deposits go into the read buffer so the first pass sees them.
        self.queue.flush(
            self.grid.current_mut(),
            width,
            height,
            self.config.seeding.seed_size,
        );

        for _ in 0..self.config.speed {
            let rates = RateField::resolve(
                &self.config.reaction,
                &self.config.feed_map,
                self.control_map.as_ref(),
                width,
                height,
            );
            let (read, write) = self.grid.split_mut();
            step_into(
                read,
                write,
                width,
                height,
                self.config.reaction.da,
                self.config.reaction.db,
                &rates,
            );
            self.grid.swap();
        }

        derive_into(self.grid.current(), &mut self.fields, &self.config.shading);
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    /// The derived output fields from the last derivation pass.
    #[inline]
    pub fn fields(&self) -> &OutputFields {
        &self.fields
    }

    #[inline]
    pub fn color(&self) -> &[[f32; 4]] {
        &self.fields.color
    }

    #[inline]
    pub fn height_map(&self) -> &[f32] {
        &self.fields.height_map
    }

    #[inline]
    pub fn normals(&self) -> &[[f32; 3]] {
        &self.fields.normal
    }

    /// Number of seed requests waiting for the next flush.
    #[inline]
    pub fn pending_seeds(&self) -> usize {
        self.queue.len()
    }

    /// Statistics over the current read buffer.
    pub fn stats(&self) -> GridStats {
        GridStats::from_cells(self.grid.current())
    }

    // Tunable parameters may change between ticks. Dimensions and queue
    // capacity are structural and only change through `new` or `resize`.

    pub fn reaction_mut(&mut self) -> &mut ReactionConfig {
        &mut self.config.reaction
    }

    pub fn shading_mut(&mut self) -> &mut ShadingConfig {
        &mut self.config.shading
    }

    pub fn feed_map_mut(&mut self) -> &mut FeedMapConfig {
        &mut self.config.feed_map
    }

    pub fn set_speed(&mut self, speed: usize) {
        self.config.speed = speed;
    }
}

/// Concentration statistics for monitoring.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GridStats {
    pub min_a: f32,
    pub max_a: f32,
    pub min_b: f32,
    pub max_b: f32,
    pub mean_b: f32,
    pub active_cells: usize,
}

impl GridStats {
    /// Compute statistics from a concentration buffer.
    pub fn from_cells(cells: &[Cell]) -> Self {
        let mut min_a = f32::INFINITY;
        let mut max_a = f32::NEG_INFINITY;
        let mut min_b = f32::INFINITY;
        let mut max_b = f32::NEG_INFINITY;
        let mut total_b = 0.0f32;
        let mut active_cells = 0usize;

        for cell in cells {
            min_a = min_a.min(cell.a);
            max_a = max_a.max(cell.a);
            min_b = min_b.min(cell.b);
            max_b = max_b.max(cell.b);
            total_b += cell.b;
            if cell.b > 1e-6 {
                active_cells += 1;
            }
        }

        Self {
            min_a,
            max_a,
            min_b,
            max_b,
            mean_b: total_b / cells.len() as f32,
            active_cells,
        }
    }
}
