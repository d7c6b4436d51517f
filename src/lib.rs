//! brushtrace: approximate a target image with textured brush strokes found by
//! simulated annealing.

pub mod canvas;
pub mod dna;
pub mod engine;
pub mod error;
pub mod fitness;
pub mod io;
pub mod logging;
pub mod mutate;
pub mod random;
pub mod render;
pub mod report;
pub mod settings;

pub use canvas::{BrushMask, BrushSet, Canvas};
pub use dna::{Solution, Stroke};
pub use engine::{AcceptanceStats, AnnealOutcome, Annealer, CoolingStep};
pub use error::{Error, Result};
pub use fitness::CostModel;
pub use mutate::{Mutation, Mutator, StrokeParam};
pub use random::{make_rng, RandomSource};
pub use render::CpuRenderer;
pub use settings::AnnealSettings;
