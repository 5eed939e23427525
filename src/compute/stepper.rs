//! Gray-Scott stepping pass.
//!
//! One call advances every cell by a single discrete time unit (dt = 1;
//! the diffusion rates absorb any spatial/temporal scaling). The pass
//! reads exclusively from the read buffer and writes exclusively into the
//! write buffer, which makes the per-cell work embarrassingly parallel:
//! rows are dispatched across the rayon pool and the iterator join is the
//! pass barrier. The caller swaps buffer roles after each pass.

use rayon::prelude::*;

use super::{Cell, RateField};

/// 3x3 diffusion stencil weights: four orthogonal neighbors, four diagonal
/// neighbors, center. They sum to zero, so a spatially uniform field has
/// zero diffusion term everywhere.
pub const WEIGHT_ORTHO: f32 = 0.2;
pub const WEIGHT_DIAG: f32 = 0.05;
pub const WEIGHT_CENTER: f32 = -1.0;

/// Advance the grid by one time unit.
///
/// Neighbor lookups wrap at the grid edges in both axes, so the pattern
/// has no boundary artifacts. Concentrations are not clamped; parameters
/// outside the model's stable regime may diverge, which is a property of
/// the model rather than an engine error.
pub fn step_into(
    read: &[Cell],
    write: &mut [Cell],
    width: usize,
    height: usize,
    da: f32,
    db: f32,
    rates: &RateField<'_>,
) {
    debug_assert_eq!(read.len(), width * height);
    debug_assert_eq!(write.len(), width * height);

    write
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row_out)| {
            let row_prev = ((y + height - 1) % height) * width;
            let row_curr = y * width;
            let row_next = ((y + 1) % height) * width;

            for (x, out) in row_out.iter_mut().enumerate() {
                let x_prev = (x + width - 1) % width;
                let x_next = (x + 1) % width;

                let tl = read[row_prev + x_prev];
                let tc = read[row_prev + x];
                let tr = read[row_prev + x_next];
                let ml = read[row_curr + x_prev];
                let mc = read[row_curr + x];
                let mr = read[row_curr + x_next];
                let bl = read[row_next + x_prev];
                let bc = read[row_next + x];
                let br = read[row_next + x_next];

                let lap_a = WEIGHT_DIAG * (tl.a + tr.a + bl.a + br.a)
                    + WEIGHT_ORTHO * (tc.a + ml.a + mr.a + bc.a)
                    + WEIGHT_CENTER * mc.a;
                let lap_b = WEIGHT_DIAG * (tl.b + tr.b + bl.b + br.b)
                    + WEIGHT_ORTHO * (tc.b + ml.b + mr.b + bc.b)
                    + WEIGHT_CENTER * mc.b;

                let (feed, kill) = rates.at(x, y);
                let Cell { a, b } = mc;
                let reaction = a * b * b;

                *out = Cell {
                    a: a + da * lap_a - reaction + feed * (1.0 - a),
                    b: b + db * lap_b + reaction - (kill + feed) * b,
                };
            }
        });
}
