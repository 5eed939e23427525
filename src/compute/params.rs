//! Per-cell feed/kill rate resolution.
//!
//! Rates are either two uniform scalars or a pair interpolated from an
//! external control map. The map is sampled bilinearly at each cell's
//! normalized coordinate with the same toroidal addressing the grid uses,
//! so mapped rates stay seam-free at the edges.

use crate::schema::{ConfigError, FeedMapConfig, ReactionConfig};

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Read-only scalar field in `[0, 1]` supplied by the host to vary rates
/// across the grid. Resampling to the grid footprint happens implicitly
/// through normalized-coordinate sampling, so the map may be any size.
#[derive(Debug, Clone)]
pub struct ControlMap {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl ControlMap {
    pub fn from_values(
        width: usize,
        height: usize,
        values: Vec<f32>,
    ) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if values.len() != width * height {
            return Err(ConfigError::ControlMapSize {
                expected: width * height,
                got: values.len(),
            });
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    /// Bilinear sample at normalized coordinates, wrapping in both axes.
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        let w = self.width as isize;
        let h = self.height as isize;

        let fx = u * self.width as f32 - 0.5;
        let fy = v * self.height as f32 - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;

        let x0 = (x0 as isize).rem_euclid(w);
        let y0 = (y0 as isize).rem_euclid(h);
        let x1 = (x0 + 1).rem_euclid(w);
        let y1 = (y0 + 1).rem_euclid(h);

        let at = |x: isize, y: isize| self.values[y as usize * self.width + x as usize];
        let top = lerp(at(x0, y0), at(x1, y0), tx);
        let bottom = lerp(at(x0, y1), at(x1, y1), tx);
        lerp(top, bottom, ty)
    }
}

/// Per-pass rate resolver handed to the stepper.
///
/// Shared-reference only, so worker threads may call [`RateField::at`]
/// concurrently.
pub enum RateField<'a> {
    /// The configured scalars, unchanged for every cell.
    Uniform { feed: f32, kill: f32 },
    /// Rates interpolated from the control map per cell.
    Mapped {
        map: &'a ControlMap,
        bounds: FeedMapConfig,
        inv_width: f32,
        inv_height: f32,
    },
}

impl<'a> RateField<'a> {
    /// Build the resolver for one stepping pass.
    ///
    /// Mapped mode without an attached control map degrades to the uniform
    /// scalars; a missing map is not an error because the engine has to
    /// stay renderable every frame.
    pub fn resolve(
        reaction: &ReactionConfig,
        feed_map: &FeedMapConfig,
        map: Option<&'a ControlMap>,
        grid_width: usize,
        grid_height: usize,
    ) -> Self {
        match map {
            Some(map) if feed_map.enabled => RateField::Mapped {
                map,
                bounds: feed_map.clone(),
                inv_width: 1.0 / grid_width as f32,
                inv_height: 1.0 / grid_height as f32,
            },
            _ => RateField::Uniform {
                feed: reaction.feed,
                kill: reaction.kill,
            },
        }
    }

    /// Local `(feed, kill)` for the cell at `(x, y)`.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> (f32, f32) {
        match self {
            RateField::Uniform { feed, kill } => (*feed, *kill),
            RateField::Mapped {
                map,
                bounds,
                inv_width,
                inv_height,
            } => {
                let u = (x as f32 + 0.5) * inv_width;
                let v = (y as f32 + 0.5) * inv_height;
                let t = map.sample(u, v);
                (
                    lerp(bounds.min_feed, bounds.max_feed, t),
                    lerp(bounds.min_kill, bounds.max_kill, t),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapped_bounds() -> FeedMapConfig {
        FeedMapConfig {
            enabled: true,
            min_feed: 0.02,
            max_feed: 0.06,
            min_kill: 0.05,
            max_kill: 0.07,
        }
    }

    #[test]
    fn test_uniform_rates_everywhere() {
        let reaction = ReactionConfig::default();
        let feed_map = FeedMapConfig::default();
        let rates = RateField::resolve(&reaction, &feed_map, None, 16, 16);

        for (x, y) in [(0, 0), (7, 3), (15, 15)] {
            assert_eq!(rates.at(x, y), (reaction.feed, reaction.kill));
        }
    }

    #[test]
    fn test_mapped_mode_without_map_falls_back() {
        let reaction = ReactionConfig::default();
        let rates = RateField::resolve(&reaction, &mapped_bounds(), None, 16, 16);
        assert_eq!(rates.at(5, 5), (reaction.feed, reaction.kill));
    }

    #[test]
    fn test_mapped_rates_span_configured_ranges() {
        // Constant map value 0 on the left half, 1 on the right half.
        let mut values = vec![0.0f32; 64 * 64];
        for row in values.chunks_mut(64) {
            for v in &mut row[32..] {
                *v = 1.0;
            }
        }
        let map = ControlMap::from_values(64, 64, values).unwrap();
        let bounds = mapped_bounds();
        let rates = RateField::resolve(&ReactionConfig::default(), &bounds, Some(&map), 64, 64);

        // Deep inside each half the bilinear sample is exact.
        let (feed, kill) = rates.at(10, 32);
        assert!((feed - bounds.min_feed).abs() < 1e-6);
        assert!((kill - bounds.min_kill).abs() < 1e-6);

        let (feed, kill) = rates.at(50, 32);
        assert!((feed - bounds.max_feed).abs() < 1e-6);
        assert!((kill - bounds.max_kill).abs() < 1e-6);
    }

    #[test]
    fn test_sample_wraps_toroidally() {
        // 2x1 map: sampling past the right edge blends back into column 0.
        let map = ControlMap::from_values(2, 1, vec![0.0, 1.0]).unwrap();

        // Cell centers land exactly on texels.
        assert!((map.sample(0.25, 0.5) - 0.0).abs() < 1e-6);
        assert!((map.sample(0.75, 0.5) - 1.0).abs() < 1e-6);
        // Halfway between texel 1 and wrapped texel 0.
        assert!((map.sample(0.0, 0.5) - 0.5).abs() < 1e-6);
        assert!((map.sample(1.0, 0.5) - 0.5).abs() < 1e-6);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Bilinear interpolation is convex: samples stay inside the
            // value range of the map for any coordinate, wrapped or not.
            #[test]
            fn sample_stays_within_map_range(u in -2.0f32..2.0, v in -2.0f32..2.0) {
                let values: Vec<f32> =
                    (0..48).map(|i| (i as f32 * 0.613).sin().abs()).collect();
                let lo = values.iter().cloned().fold(f32::INFINITY, f32::min);
                let hi = values.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
                let map = ControlMap::from_values(8, 6, values).unwrap();

                let s = map.sample(u, v);
                prop_assert!(s >= lo - 1e-6 && s <= hi + 1e-6, "sample {} outside [{}, {}]", s, lo, hi);
            }
        }
    }

    #[test]
    fn test_control_map_size_mismatch_rejected() {
        assert!(matches!(
            ControlMap::from_values(4, 4, vec![0.0; 15]),
            Err(ConfigError::ControlMapSize {
                expected: 16,
                got: 15
            })
        ));
        assert!(matches!(
            ControlMap::from_values(0, 4, vec![]),
            Err(ConfigError::InvalidDimensions)
        ));
    }
}
