use serde::{Deserialize, Serialize};

use crate::random::RandomSource;

/// smallest footprint a mutation may shrink a stroke to (fraction of min(W,H))
pub const SIZE_MIN: f32 = 0.05;
/// largest footprint a mutation may grow a stroke to
pub const SIZE_MAX: f32 = 1.0;

/// one brush application: where, how big, how rotated, which brush, what color.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub x_rel: f32,        // center x as fraction of canvas width, 0..1
    pub y_rel: f32,        // center y as fraction of canvas height, 0..1
    pub size_rel: f32,     // footprint as fraction of min(width, height)
    pub rotation_deg: f32, // degrees, kept within (-360, 360)
    pub brush_index: usize,
    pub color: [u8; 3], // RGB
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            x_rel: 0.5,
            y_rel: 0.5,
            size_rel: 0.2,
            rotation_deg: 0.0,
            brush_index: 0,
            color: [0, 0, 0],
        }
    }
}

impl Stroke {
    pub fn new(
        x_rel: f32,
        y_rel: f32,
        size_rel: f32,
        rotation_deg: f32,
        brush_index: usize,
        color: [u8; 3],
    ) -> Self {
        Self { x_rel, y_rel, size_rel, rotation_deg, brush_index, color }
    }

    /// random stroke used to seed a run. sizes start between 10% and 40% of the short side.
    pub fn random<R: RandomSource + ?Sized>(rng: &mut R, brush_count: usize) -> Self {
        Self {
            x_rel: rng.real_in(0.0, 1.0),
            y_rel: rng.real_in(0.0, 1.0),
            size_rel: rng.real_in(0.1, 0.4),
            rotation_deg: rng.real_in(0.0, 360.0),
            brush_index: rng.index(brush_count),
            color: [
                rng.int_in(0, 255) as u8,
                rng.int_in(0, 255) as u8,
                rng.int_in(0, 255) as u8,
            ],
        }
    }
}

/// ordered strokes; index 0 is painted first and every later stroke paints over
/// the ones before it. the order is part of the value: reordering strokes changes the image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    strokes: Vec<Stroke>,
}

impl Solution {
    pub fn new(strokes: Vec<Stroke>) -> Self {
        Self { strokes }
    }

    pub fn random<R: RandomSource + ?Sized>(
        rng: &mut R,
        stroke_count: usize,
        brush_count: usize,
    ) -> Self {
        profiling::scope!("Solution::random");
        let strokes = (0..stroke_count).map(|_| Stroke::random(rng, brush_count)).collect();
        Self { strokes }
    }

    /// strokes in paint order (back to front)
    #[inline]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    #[inline]
    pub fn strokes_mut(&mut self) -> &mut [Stroke] {
        &mut self.strokes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}
