use serde::{Deserialize, Serialize};

use crate::dna::{Solution, Stroke, SIZE_MAX, SIZE_MIN};
use crate::random::RandomSource;

/// the 8 mutable parameters of a stroke. each kind knows its own noise and bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrokeParam {
    X,
    Y,
    Size,
    Rotation,
    Red,
    Green,
    Blue,
    Brush,
}

/// amplitude of the uniform noise added to x_rel / y_rel
pub const POSITION_NOISE: f32 = 0.05;
/// amplitude of the uniform noise added to size_rel
pub const SIZE_NOISE: f32 = 0.02;
/// amplitude of the rotation noise, degrees
pub const ROTATION_NOISE: f32 = 10.0;
/// amplitude of the integer noise added to one color channel
pub const COLOR_NOISE: i32 = 15;

impl StrokeParam {
    /// report/column order, also the order counters are stored in
    pub const ALL: [StrokeParam; 8] = [
        StrokeParam::X,
        StrokeParam::Y,
        StrokeParam::Size,
        StrokeParam::Rotation,
        StrokeParam::Red,
        StrokeParam::Green,
        StrokeParam::Blue,
        StrokeParam::Brush,
    ];

    pub const COUNT: usize = Self::ALL.len();

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// column label used in run reports
    pub fn label(self) -> &'static str {
        match self {
            StrokeParam::X => "Mut_X",
            StrokeParam::Y => "Mut_Y",
            StrokeParam::Size => "Mut_Size",
            StrokeParam::Rotation => "Mut_Rot",
            StrokeParam::Red => "Mut_R",
            StrokeParam::Green => "Mut_G",
            StrokeParam::Blue => "Mut_B",
            StrokeParam::Brush => "Mut_Type",
        }
    }

    /// perturb this parameter of `stroke` in place and re-establish its bound.
    /// the brush kind draws a fresh index instead of adding noise.
    pub fn apply<R: RandomSource + ?Sized>(
        self,
        stroke: &mut Stroke,
        rng: &mut R,
        brush_count: usize,
    ) {
        match self {
            StrokeParam::X => {
                let d = rng.real_in(-POSITION_NOISE, POSITION_NOISE);
                stroke.x_rel = (stroke.x_rel + d).clamp(0.0, 1.0);
            }
            StrokeParam::Y => {
                let d = rng.real_in(-POSITION_NOISE, POSITION_NOISE);
                stroke.y_rel = (stroke.y_rel + d).clamp(0.0, 1.0);
            }
            StrokeParam::Size => {
                let d = rng.real_in(-SIZE_NOISE, SIZE_NOISE);
                stroke.size_rel = (stroke.size_rel + d).clamp(SIZE_MIN, SIZE_MAX);
            }
            // fmod keeps the sign of the dividend, negative angles stay negative
            StrokeParam::Rotation => {
                let d = rng.real_in(-ROTATION_NOISE, ROTATION_NOISE);
                stroke.rotation_deg = (stroke.rotation_deg + d) % 360.0;
            }
            StrokeParam::Red | StrokeParam::Green | StrokeParam::Blue => {
                let channel = self.index() - StrokeParam::Red.index();
                let d = rng.int_in(-COLOR_NOISE, COLOR_NOISE);
                shift_channel(&mut stroke.color[channel], d);
            }
            StrokeParam::Brush => {
                stroke.brush_index = rng.index(brush_count);
            }
        }
    }
}

#[inline]
fn shift_channel(channel: &mut u8, delta: i32) {
    *channel = (*channel as i32 + delta).clamp(0, 255) as u8;
}

/// which stroke and which parameter a neighbor differs in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mutation {
    pub stroke_index: usize,
    pub param: StrokeParam,
}

/// single-parameter neighbor generator
#[derive(Clone, Copy, Debug)]
pub struct Mutator {
    brush_count: usize,
}

impl Mutator {
    /// `brush_count` must be at least 1
    pub fn new(brush_count: usize) -> Self {
        Self { brush_count }
    }

    /// copy of `solution` with one parameter of one uniformly chosen stroke perturbed.
    /// an empty solution comes back unchanged with no mutation.
    pub fn mutate<R: RandomSource + ?Sized>(
        &self,
        solution: &Solution,
        rng: &mut R,
    ) -> (Solution, Option<Mutation>) {
        profiling::scope!("mutate");
        let mut neighbor = solution.clone();
        if neighbor.is_empty() {
            return (neighbor, None);
        }

        let stroke_index = rng.index(neighbor.len());
        let param = StrokeParam::ALL[rng.index(StrokeParam::COUNT)];
        param.apply(&mut neighbor.strokes_mut()[stroke_index], rng, self.brush_count);

        (neighbor, Some(Mutation { stroke_index, param }))
    }
}
