//! Seed injection queue.
//!
//! External callers request activator deposits at grid coordinates; the
//! requests buffer in a bounded queue and materialize into the grid right
//! before the next stepping pass. Overflowing the queue silently drops
//! requests until the next flush, a deliberate best-effort policy.

use super::Cell;

/// Stamp a square activator deposit of side `size` centered at `(cx, cy)`,
/// wrapping at the grid edges. `b` is raised to 1 inside the patch, `a` is
/// left untouched; overlapping patches simply overwrite.
pub fn stamp_square(
    cells: &mut [Cell],
    width: usize,
    height: usize,
    cx: i32,
    cy: i32,
    size: usize,
) {
    let half = (size / 2) as i32;
    for dy in 0..size as i32 {
        for dx in 0..size as i32 {
            let x = (cx - half + dx).rem_euclid(width as i32) as usize;
            let y = (cy - half + dy).rem_euclid(height as i32) as usize;
            cells[y * width + x].b = 1.0;
        }
    }
}

/// Bounded queue of pending deposit coordinates.
pub struct SeedQueue {
    points: Vec<(i32, i32)>,
    capacity: usize,
}

impl SeedQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a request, or drop it silently when the queue is full.
    pub fn enqueue(&mut self, x: i32, y: i32) {
        if self.points.len() < self.capacity {
            self.points.push((x, y));
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Discard all pending requests without touching the grid.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Materialize every pending request into the read buffer and clear
    /// the queue. Must run before the tick's first stepping pass so the
    /// deposits are visible to it; a flush of an empty queue is a no-op.
    pub fn flush(&mut self, cells: &mut [Cell], width: usize, height: usize, seed_size: usize) {
        if self.points.is_empty() {
            return;
        }
        for &(x, y) in &self.points {
            stamp_square(cells, width, height, x, y, seed_size);
        }
        self.points.clear();
    }
}
