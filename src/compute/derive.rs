//! Output derivation: color, height, and normal fields.
//!
//! Converts the settled read buffer into the three presentation fields the
//! host binds as textures. The stage is a pure function of the grid and
//! the shading parameters, so deriving twice from the same state yields
//! identical fields.

use crate::schema::ShadingConfig;

use super::{Cell, params::lerp};

#[inline]
fn lerp3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        lerp(a[0], b[0], t),
        lerp(a[1], b[1], t),
        lerp(a[2], b[2], t),
    ]
}

#[inline]
fn scale3(v: [f32; 3], s: f32) -> [f32; 3] {
    [v[0] * s, v[1] * s, v[2] * s]
}

/// The three derived fields, same footprint as the grid. Allocated once
/// per (re)size and fully overwritten on every derivation pass.
pub struct OutputFields {
    width: usize,
    height: usize,
    /// RGBA albedo plus emissive contribution.
    pub color: Vec<[f32; 4]>,
    /// Scalar elevation per cell, for displacement mapping.
    pub height_map: Vec<f32>,
    /// Unit surface normals reconstructed from the height field.
    pub normal: Vec<[f32; 3]>,
}

impl OutputFields {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            color: vec![[0.0; 4]; size],
            height_map: vec![0.0; size],
            normal: vec![[0.0, 0.0, 1.0]; size],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }
}

/// Recompute all three fields from the read buffer in one pass.
///
/// The activator concentration clamped to `[0, 1]` is the weight for both
/// the color blend and the elevation; normals come from central
/// differences of the height field with toroidal wraparound, so they stay
/// well-defined at the grid edges.
pub fn derive_into(read: &[Cell], fields: &mut OutputFields, shading: &ShadingConfig) {
    let width = fields.width;
    let height = fields.height;
    debug_assert_eq!(read.len(), width * height);

    let bottom_emit = scale3(shading.bottom_emit, shading.bottom_emit_intensity);
    let top_emit = scale3(shading.top_emit, shading.top_emit_intensity);

    for (i, cell) in read.iter().enumerate() {
        let t = cell.b.clamp(0.0, 1.0);
        let albedo = lerp3(shading.bottom_color, shading.top_color, t);
        let emit = lerp3(bottom_emit, top_emit, t);

        fields.height_map[i] = t;
        fields.color[i] = [
            albedo[0] + emit[0],
            albedo[1] + emit[1],
            albedo[2] + emit[2],
            1.0,
        ];
    }

    let OutputFields {
        height_map, normal, ..
    } = fields;
    let strength = shading.normal_strength;

    for y in 0..height {
        let row_prev = ((y + height - 1) % height) * width;
        let row_curr = y * width;
        let row_next = ((y + 1) % height) * width;

        for x in 0..width {
            let x_prev = (x + width - 1) % width;
            let x_next = (x + 1) % width;

            let dh_dx = (height_map[row_curr + x_next] - height_map[row_curr + x_prev]) * 0.5;
            let dh_dy = (height_map[row_next + x] - height_map[row_prev + x]) * 0.5;

            let nx = -dh_dx * strength;
            let ny = -dh_dy * strength;
            let inv_len = 1.0 / (nx * nx + ny * ny + 1.0).sqrt();
            normal[row_curr + x] = [nx * inv_len, ny * inv_len, inv_len];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shading() -> ShadingConfig {
        ShadingConfig {
            bottom_color: [0.1, 0.2, 0.3],
            top_color: [0.9, 0.8, 0.7],
            bottom_emit: [1.0, 0.0, 0.0],
            top_emit: [0.0, 0.0, 1.0],
            bottom_emit_intensity: 0.5,
            top_emit_intensity: 2.0,
            normal_strength: 2.0,
        }
    }

    #[test]
    fn test_color_endpoints() {
        let shading = shading();
        let read = vec![
            Cell { a: 1.0, b: 0.0 },
            Cell { a: 0.0, b: 1.0 },
            Cell { a: 0.0, b: 7.5 }, // out-of-range b clamps to 1
            Cell { a: 1.0, b: -2.0 }, // clamps to 0
        ];
        let mut fields = OutputFields::new(4, 1);
        derive_into(&read, &mut fields, &shading);

        // b = 0: bottom color plus bottom emission.
        let expected = [0.1 + 0.5, 0.2, 0.3, 1.0];
        for (got, want) in fields.color[0].iter().zip(expected) {
            assert!((got - want).abs() < 1e-6, "{} vs {}", got, want);
        }
        // b = 1: top color plus top emission.
        let expected = [0.9, 0.8, 0.7 + 2.0, 1.0];
        for (got, want) in fields.color[1].iter().zip(expected) {
            assert!((got - want).abs() < 1e-6, "{} vs {}", got, want);
        }
        // Clamped weights reproduce the endpoints exactly.
        assert_eq!(fields.color[2], fields.color[1]);
        assert_eq!(fields.color[3], fields.color[0]);

        assert_eq!(fields.height_map, vec![0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_flat_field_has_upward_normals() {
        let read = vec![Cell { a: 1.0, b: 0.4 }; 16];
        let mut fields = OutputFields::new(4, 4);
        derive_into(&read, &mut fields, &shading());

        for n in &fields.normal {
            assert_eq!(*n, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_normals_are_unit_length_and_tilt_downhill() {
        // Single bump: normals around it point away from the peak.
        let width = 8;
        let height = 8;
        let mut read = vec![Cell::REST; width * height];
        read[3 * width + 3].b = 1.0;

        let mut fields = OutputFields::new(width, height);
        derive_into(&read, &mut fields, &shading());

        for n in &fields.normal {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-5, "normal not unit length: {}", len);
        }

        // Left of the bump the surface rises toward +x, so nx < 0.
        let left = fields.normal[3 * width + 2];
        assert!(left[0] < 0.0);
        // Right of the bump it falls, so nx > 0.
        let right = fields.normal[3 * width + 4];
        assert!(right[0] > 0.0);
        // Above (smaller y) the surface rises toward +y, so ny < 0.
        let above = fields.normal[2 * width + 3];
        assert!(above[1] < 0.0);
    }

    #[test]
    fn test_derive_is_idempotent() {
        let width = 8;
        let height = 8;
        let mut read = vec![Cell::REST; width * height];
        for (i, cell) in read.iter_mut().enumerate() {
            cell.b = (i as f32 * 0.37).sin().abs();
            cell.a = 1.0 - cell.b;
        }

        let shading = shading();
        let mut first = OutputFields::new(width, height);
        derive_into(&read, &mut first, &shading);

        let mut second = OutputFields::new(width, height);
        derive_into(&read, &mut second, &shading);
        // And derive again into an already-written buffer.
        derive_into(&read, &mut second, &shading);

        assert_eq!(first.color, second.color);
        assert_eq!(first.height_map, second.height_map);
        assert_eq!(first.normal, second.normal);
    }
}
