use tracing::{debug, info};

use crate::dna::Solution;
use crate::fitness::CostModel;
use crate::mutate::{Mutator, StrokeParam};
use crate::random::RandomSource;
use crate::settings::AnnealSettings;

/// how often (in cooling steps) a progress line is logged at info level
const LOG_EVERY_STEPS: u64 = 10;

/// accepted-move counters, one per parameter kind (indexed by `StrokeParam::index`)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AcceptanceStats {
    pub accepted_by_param: [u64; StrokeParam::COUNT],
    pub accepted: u64,
    pub iterations: u64,
}

impl AcceptanceStats {
    #[inline]
    pub fn accepted_for(&self, param: StrokeParam) -> u64 {
        self.accepted_by_param[param.index()]
    }

    #[inline]
    fn record(&mut self, param: Option<StrokeParam>) {
        self.accepted += 1;
        if let Some(p) = param {
            self.accepted_by_param[p.index()] += 1;
        }
    }

    pub fn acceptance_rate(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.accepted as f64 / self.iterations as f64
        }
    }
}

/// view of the search handed to the progress callback after each cooling step
pub struct CoolingStep<'s> {
    pub step: u64,
    pub iterations: u64,
    pub temperature: f64, // after cooling
    pub current_cost: f64,
    pub best_cost: f64,
    pub best: &'s Solution,
}

/// result of a finished run
#[derive(Clone, Debug)]
pub struct AnnealOutcome {
    pub best: Solution,
    pub best_cost: f64,
    pub initial_cost: f64,
    pub stats: AcceptanceStats,
    /// best cost after each cooling step, one entry per step
    pub cost_history: Vec<f64>,
    pub cooling_steps: u64,
    pub final_temperature: f64,
}

/// simulated annealing over stroke solutions with geometric cooling
pub struct Annealer<'a, R: RandomSource> {
    settings: AnnealSettings,
    cost: CostModel<'a>,
    mutator: Mutator,
    rng: R,
}

impl<'a, R: RandomSource> Annealer<'a, R> {
    /// `settings` are expected to have passed `AnnealSettings::validate`
    pub fn new(settings: AnnealSettings, cost: CostModel<'a>, rng: R) -> Self {
        let mutator = Mutator::new(cost.renderer().brushes().len());
        Self { settings, cost, mutator, rng }
    }

    #[inline]
    pub fn cost_model(&self) -> &CostModel<'a> {
        &self.cost
    }

    /// run from a fresh random solution
    pub fn run<F>(&mut self, on_step: F) -> AnnealOutcome
    where
        F: FnMut(&CoolingStep<'_>),
    {
        let initial = Solution::random(
            &mut self.rng,
            self.settings.stroke_count,
            self.cost.renderer().brushes().len(),
        );
        self.run_from(initial, on_step)
    }

    /// run from a given starting solution. halts once T <= final temperature.
    pub fn run_from<F>(&mut self, initial: Solution, mut on_step: F) -> AnnealOutcome
    where
        F: FnMut(&CoolingStep<'_>),
    {
        profiling::scope!("Annealer::run");
        let iters_per_temp = self.settings.iterations_per_temperature;
        let alpha = self.settings.cooling_factor;
        let t_final = self.settings.final_temperature;

        let mut temperature = self.settings.initial_temperature;
        let mut current = initial;
        let mut current_cost = self.cost.cost(&current);
        let initial_cost = current_cost;

        let mut best = current.clone();
        let mut best_cost = current_cost;

        let mut stats = AcceptanceStats::default();
        let mut cost_history = Vec::new();
        let mut step = 0u64;

        info!(
            strokes = current.len(),
            t_init = temperature,
            t_final,
            alpha,
            iters_per_temp,
            initial_mse = initial_cost,
            "annealing started"
        );

        while temperature > t_final {
            profiling::scope!("temperature_step");
            for _ in 0..iters_per_temp {
                let (neighbor, mutation) = self.mutator.mutate(&current, &mut self.rng);
                let neighbor_cost = self.cost.cost(&neighbor);
                stats.iterations += 1;

                let delta = neighbor_cost - current_cost;
                if !self.accept(delta, temperature) {
                    continue;
                }

                current = neighbor;
                current_cost = neighbor_cost;
                stats.record(mutation.map(|m| m.param));

                if current_cost < best_cost {
                    best = current.clone();
                    best_cost = current_cost;
                }
            }

            temperature *= alpha;
            step += 1;
            cost_history.push(best_cost);

            debug!(
                step,
                temperature,
                current_mse = current_cost,
                best_mse = best_cost,
                "cooling step"
            );
            if step % LOG_EVERY_STEPS == 0 {
                info!(iterations = stats.iterations, temperature, best_mse = best_cost, "progress");
            }

            on_step(&CoolingStep {
                step,
                iterations: stats.iterations,
                temperature,
                current_cost,
                best_cost,
                best: &best,
            });
        }

        info!(
            cooling_steps = step,
            iterations = stats.iterations,
            accepted = stats.accepted,
            best_mse = best_cost,
            "annealing finished"
        );

        AnnealOutcome {
            best,
            best_cost,
            initial_cost,
            stats,
            cost_history,
            cooling_steps: step,
            final_temperature: temperature,
        }
    }

    /// Metropolis rule: improvements always pass, otherwise pass with probability exp(-delta/T).
    /// a zero delta gives exp(0) = 1 > u for every u in [0,1), so sideways moves always pass.
    #[inline]
    fn accept(&mut self, delta: f64, temperature: f64) -> bool {
        if delta < 0.0 {
            return true;
        }
        let p = (-delta / temperature).exp();
        self.rng.unit() < p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{BrushMask, BrushSet, Canvas, WHITE};
    use crate::render::CpuRenderer;
    use crate::random::make_rng;
    use rand_pcg::Pcg32;

    fn opaque_2x2() -> CpuRenderer {
        CpuRenderer::new(BrushSet::new(vec![BrushMask::filled(2, 2, 255).unwrap()]).unwrap())
    }

    fn textured() -> CpuRenderer {
        CpuRenderer::new(
            BrushSet::new(vec![
                BrushMask::filled(4, 4, 255).unwrap(),
                BrushMask::new(3, 3, vec![0, 90, 0, 90, 255, 90, 0, 90, 0]).unwrap(),
            ])
            .unwrap(),
        )
    }

    fn gradient_target(w: u32, h: u32) -> Canvas {
        let mut c = Canvas::new(w, h);
        for y in 0..h {
            for x in 0..w {
                c.set_pixel(x as i32, y as i32, [(x * 255 / w) as u8, (y * 255 / h) as u8, 128]);
            }
        }
        c
    }

    fn settings(t_init: f64, t_final: f64, alpha: f64, iters: u32, n: usize) -> AnnealSettings {
        AnnealSettings {
            stroke_count: n,
            initial_temperature: t_init,
            final_temperature: t_final,
            cooling_factor: alpha,
            iterations_per_temperature: iters,
            ..Default::default()
        }
    }

    #[test]
    fn test_exact_cooling_step_count() {
        let r = textured();
        let target = gradient_target(8, 8);
        let s = settings(100.0, 1.0, 0.5, 5, 3);
        let mut annealer = Annealer::new(s, CostModel::new(&r, &target), make_rng(Some(1)));

        let mut calls = 0;
        let out = annealer.run(|_| calls += 1);

        assert_eq!(out.cooling_steps, 7);
        assert_eq!(calls, 7);
        assert_eq!(out.cost_history.len(), 7);
        assert_eq!(out.stats.iterations, 7 * 5);
        assert!(out.final_temperature <= 1.0);
    }

    #[test]
    fn test_start_below_final_temperature_does_no_work() {
        let r = textured();
        let target = gradient_target(4, 4);
        let s = settings(0.5, 1.0, 0.5, 10, 2);
        let mut annealer = Annealer::new(s, CostModel::new(&r, &target), make_rng(Some(2)));
        let out = annealer.run(|_| {});
        assert_eq!(out.cooling_steps, 0);
        assert_eq!(out.stats.iterations, 0);
        assert_eq!(out.best_cost, out.initial_cost);
    }

    #[test]
    fn test_best_cost_never_increases() {
        let r = textured();
        let target = gradient_target(12, 10);
        let s = settings(500.0, 1.0, 0.8, 40, 6);
        let mut annealer = Annealer::new(s, CostModel::new(&r, &target), make_rng(Some(3)));

        let mut seen = Vec::new();
        let out = annealer.run(|step| {
            assert!(step.best_cost <= step.current_cost);
            seen.push(step.best_cost);
        });

        assert_eq!(seen, out.cost_history);
        for pair in out.cost_history.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
        assert!(out.best_cost <= out.initial_cost);
        assert_eq!(out.cost_history.last().copied(), Some(out.best_cost));
    }

    #[test]
    fn test_acceptance_counters_sum_to_total() {
        let r = textured();
        let target = gradient_target(10, 10);
        let s = settings(2_000.0, 10.0, 0.7, 30, 4);
        let mut annealer = Annealer::new(s, CostModel::new(&r, &target), make_rng(Some(4)));
        let out = annealer.run(|_| {});

        let sum: u64 = out.stats.accepted_by_param.iter().sum();
        assert_eq!(sum, out.stats.accepted);
        assert!(out.stats.accepted > 0);
        assert!(out.stats.accepted <= out.stats.iterations);
        assert!((0.0..=1.0).contains(&out.stats.acceptance_rate()));
    }

    #[test]
    fn test_reported_best_matches_its_cost() {
        let r = textured();
        let target = gradient_target(9, 7);
        let s = settings(300.0, 5.0, 0.6, 20, 5);
        let mut annealer = Annealer::new(s, CostModel::new(&r, &target), make_rng(Some(5)));
        let out = annealer.run(|_| {});

        // best is an independent copy, re-scoring it reproduces the tracked cost
        let mut model = CostModel::new(&r, &target);
        assert_eq!(model.cost(&out.best), out.best_cost);
        assert_eq!(out.best.len(), 5);
    }

    #[test]
    fn test_same_seed_same_run() {
        let r = textured();
        let target = gradient_target(8, 8);
        let s = settings(100.0, 1.0, 0.7, 15, 3);

        let mut first = Annealer::new(s.clone(), CostModel::new(&r, &target), make_rng(Some(6)));
        let mut second = Annealer::new(s, CostModel::new(&r, &target), make_rng(Some(6)));
        let a = first.run(|_| {});
        let b = second.run(|_| {});
        assert_eq!(a.best, b.best);
        assert_eq!(a.cost_history, b.cost_history);
        assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn test_zero_delta_always_accepted() {
        let r = opaque_2x2();
        let target = Canvas::new(4, 4);
        let mut annealer = Annealer::new(
            settings(1.0, 0.5, 0.5, 1, 1),
            CostModel::new(&r, &target),
            make_rng(Some(7)),
        );
        for _ in 0..1_000 {
            assert!(annealer.accept(0.0, 1e-9));
        }
        assert!(annealer.accept(-1.0, 1e-9));
    }

    #[test]
    fn test_huge_delta_at_low_temperature_rejected() {
        let r = opaque_2x2();
        let target = Canvas::new(4, 4);
        let mut annealer = Annealer::new(
            settings(1.0, 0.5, 0.5, 1, 1),
            CostModel::new(&r, &target),
            make_rng(Some(8)),
        );
        for _ in 0..1_000 {
            assert!(!annealer.accept(1e6, 1.0));
        }
    }

    #[test]
    fn test_white_target_run_paints_stroke_footprint() {
        let r = opaque_2x2();
        let target = Canvas::new(4, 4);
        let s = settings(10.0, 1.0, 0.9, 250, 1);
        let expected_steps = s.cooling_steps();
        let rng = Pcg32::new(0xcafe, 0xf00d);
        let mut annealer = Annealer::new(s, CostModel::new(&r, &target), rng);
        let out = annealer.run(|_| {});

        assert_eq!(out.cooling_steps, expected_steps);
        assert_eq!(out.cooling_steps, 22);
        assert!(out.best_cost <= out.initial_cost);

        // the opaque brush covers the center pixel with the stroke color,
        // and nothing outside the footprint around that center is painted
        let stroke = out.best.strokes()[0];
        let rendered = annealer.cost_model().render_to_canvas(&out.best);
        let cx = ((stroke.x_rel * 4.0).round() as i32).clamp(0, 3);
        let cy = ((stroke.y_rel * 4.0).round() as i32).clamp(0, 3);
        let reach = ((stroke.size_rel * 4.0).round() as i32).max(1);
        assert_eq!(rendered.pixel(cx as u32, cy as u32), stroke.color);
        for y in 0..4u32 {
            for x in 0..4u32 {
                if rendered.pixel(x, y) != WHITE {
                    assert!((x as i32 - cx).abs() <= reach && (y as i32 - cy).abs() <= reach);
                }
            }
        }
    }
}
