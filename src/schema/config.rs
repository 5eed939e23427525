//! Configuration types for the reaction-diffusion engine.

use serde::{Deserialize, Serialize};

fn default_speed() -> usize {
    1
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Stepping passes per tick. Zero means the grid holds still while
    /// seeds and derivation keep running.
    #[serde(default = "default_speed")]
    pub speed: usize,
    /// Reaction and diffusion rates.
    #[serde(default)]
    pub reaction: ReactionConfig,
    /// Spatially varying feed/kill rates driven by a control map.
    #[serde(default)]
    pub feed_map: FeedMapConfig,
    /// Seed deposit sizing and injection queue capacity.
    #[serde(default)]
    pub seeding: SeedingConfig,
    /// Color, emission, and normal-map parameters for output derivation.
    #[serde(default)]
    pub shading: ShadingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            speed: 1,
            reaction: ReactionConfig::default(),
            feed_map: FeedMapConfig::default(),
            seeding: SeedingConfig::default(),
            shading: ShadingConfig::default(),
        }
    }
}

/// Gray-Scott reaction parameters.
///
/// The defaults sit in the model's mitosis/coral regime and produce a
/// stable spot pattern from almost any seeding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionConfig {
    /// Diffusion rate of the inhibitor species `a`.
    pub da: f32,
    /// Diffusion rate of the activator species `b`.
    pub db: f32,
    /// Feed rate: replenishment of `a` toward 1.
    pub feed: f32,
    /// Kill rate: decay of `b`.
    pub kill: f32,
}

impl Default for ReactionConfig {
    fn default() -> Self {
        Self {
            da: 1.0,
            db: 0.5,
            feed: 0.055,
            kill: 0.062,
        }
    }
}

/// Spatially varying rates sampled from a control map.
///
/// When `enabled` and a control map is attached to the engine, each cell's
/// feed/kill pair is interpolated between the min and max bounds by the
/// map value at that cell. Without a map the engine falls back to the
/// uniform rates in [`ReactionConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedMapConfig {
    /// Switch between uniform and mapped rates.
    pub enabled: bool,
    /// Feed rate where the map reads 0.
    pub min_feed: f32,
    /// Feed rate where the map reads 1.
    pub max_feed: f32,
    /// Kill rate where the map reads 0.
    pub min_kill: f32,
    /// Kill rate where the map reads 1.
    pub max_kill: f32,
}

impl Default for FeedMapConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min_feed: 0.055,
            max_feed: 0.055,
            min_kill: 0.062,
            max_kill: 0.062,
        }
    }
}

/// Seed deposit sizing and injection queue capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedingConfig {
    /// Side length of a square activator deposit, in cells.
    pub seed_size: usize,
    /// Number of random patches stamped on reset.
    pub seed_num: usize,
    /// Injection queue capacity. Requests past this are dropped until the
    /// next flush.
    pub input_max: usize,
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            seed_size: 10,
            seed_num: 10,
            input_max: 32,
        }
    }
}

/// Output derivation parameters: albedo gradient, emission gradient, and
/// normal reconstruction strength.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShadingConfig {
    /// Albedo where the activator weight is 0.
    pub bottom_color: [f32; 3],
    /// Albedo where the activator weight is 1.
    pub top_color: [f32; 3],
    /// Emission color at weight 0.
    pub bottom_emit: [f32; 3],
    /// Emission color at weight 1.
    pub top_emit: [f32; 3],
    /// Multiplier on `bottom_emit`.
    pub bottom_emit_intensity: f32,
    /// Multiplier on `top_emit`.
    pub top_emit_intensity: f32,
    /// Slope scale applied to height differences before normalizing the
    /// surface normal.
    pub normal_strength: f32,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            bottom_color: [0.0, 0.0, 0.0],
            top_color: [1.0, 1.0, 1.0],
            bottom_emit: [0.0, 0.0, 0.0],
            top_emit: [0.0, 0.0, 0.0],
            bottom_emit_intensity: 0.0,
            top_emit_intensity: 0.0,
            normal_strength: 2.0,
        }
    }
}

impl EngineConfig {
    /// Total cell count.
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.width * self.height
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.reaction.da < 0.0 || self.reaction.db < 0.0 {
            return Err(ConfigError::InvalidDiffusion);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid dimensions (width, height) must be non-zero")]
    InvalidDimensions,
    #[error("Diffusion rates (da, db) must be non-negative")]
    InvalidDiffusion,
    #[error("Control map has {got} values, expected {expected}")]
    ControlMapSize { expected: usize, got: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let mut config = EngineConfig::default();
        config.width = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimensions)
        ));

        let mut config = EngineConfig::default();
        config.height = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimensions)
        ));
    }

    #[test]
    fn test_negative_diffusion_rejected() {
        let mut config = EngineConfig::default();
        config.reaction.da = -0.1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDiffusion)
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.width, config.width);
        assert_eq!(parsed.reaction.feed, config.reaction.feed);
        assert_eq!(parsed.shading.top_color, config.shading.top_color);
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let parsed: EngineConfig =
            serde_json::from_str(r#"{"width": 128, "height": 64}"#).unwrap();
        assert_eq!(parsed.width, 128);
        assert_eq!(parsed.height, 64);
        assert_eq!(parsed.speed, 1);
        assert_eq!(parsed.reaction.feed, 0.055);
        assert_eq!(parsed.seeding.input_max, 32);
        assert!(!parsed.feed_map.enabled);
    }
}
