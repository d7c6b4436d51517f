// cost evaluation: render a candidate into a private scratch canvas and
// compare it with the target using mean squared error over RGB samples.

pub mod metrics;

pub use metrics::{psnr_from_mse, MetricsSnapshot};

use crate::canvas::Canvas;
use crate::dna::Solution;
use crate::render::CpuRenderer;

/// mean of squared per-channel differences. both buffers must be the same size.
/// zero-area input gives f64::MAX so a degenerate target can never look "solved".
pub fn mse_rgb(target: &[u8], current: &[u8]) -> f64 {
    profiling::scope!("mse_rgb");
    debug_assert_eq!(target.len(), current.len());
    if target.is_empty() {
        return f64::MAX;
    }

    // exact integer accumulation, max per sample is 255^2
    let sum: u64 = target
        .iter()
        .zip(current)
        .map(|(&t, &c)| {
            let d = t as i64 - c as i64;
            (d * d) as u64
        })
        .sum();

    sum as f64 / target.len() as f64
}

/// scores solutions against a fixed target. owns its scratch canvas, so one
/// CostModel must not be shared between concurrent evaluations.
pub struct CostModel<'a> {
    renderer: &'a CpuRenderer,
    target: &'a Canvas,
    scratch: Canvas,
}

impl<'a> CostModel<'a> {
    pub fn new(renderer: &'a CpuRenderer, target: &'a Canvas) -> Self {
        Self {
            renderer,
            target,
            scratch: Canvas::new(target.width, target.height),
        }
    }

    #[inline]
    pub fn renderer(&self) -> &'a CpuRenderer {
        self.renderer
    }

    /// render into the scratch canvas (cleared first) and return the MSE against the target
    pub fn cost(&mut self, solution: &Solution) -> f64 {
        profiling::scope!("CostModel::cost");
        if self.target.is_empty() {
            return f64::MAX;
        }
        self.renderer.render(solution, &mut self.scratch);
        mse_rgb(&self.target.rgb, &self.scratch.rgb)
    }

    /// the canvas produced by the most recent `cost` call
    #[inline]
    pub fn last_render(&self) -> &Canvas {
        &self.scratch
    }

    /// render a solution at the working resolution into a fresh canvas (snapshots, final output)
    pub fn render_to_canvas(&self, solution: &Solution) -> Canvas {
        let mut out = Canvas::new(self.target.width, self.target.height);
        self.renderer.render(solution, &mut out);
        out
    }
}
