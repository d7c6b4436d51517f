use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use brushtrace::fitness::MetricsSnapshot;
use brushtrace::{io, logging, report};
use brushtrace::{make_rng, AnnealSettings, Annealer, CostModel, CpuRenderer};

#[derive(Parser, Debug)]
#[command(
    name = "brushtrace",
    version,
    about = "Approximate an image with brush strokes via simulated annealing"
)]
struct Args {
    /// target image
    target: PathBuf,

    /// grayscale brush mask, repeat for several brushes (order sets the brush index)
    #[arg(short, long = "brush", required = true)]
    brushes: Vec<PathBuf>,

    /// geometric cooling factor, T *= alpha per cooling step
    #[arg(short, long)]
    alpha: Option<f64>,

    /// strokes per solution
    #[arg(short = 'n', long)]
    strokes: Option<usize>,

    #[arg(long)]
    t_init: Option<f64>,

    #[arg(long)]
    t_final: Option<f64>,

    /// iterations per temperature
    #[arg(long)]
    iters: Option<u32>,

    #[arg(long)]
    seed: Option<u64>,

    /// cooling steps between snapshot images, 0 disables them
    #[arg(long)]
    snapshot_interval: Option<u32>,

    /// JSON settings file used as the base; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// directory that receives the run folder
    #[arg(short, long, default_value = "output")]
    out: PathBuf,

    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn settings(&self) -> anyhow::Result<AnnealSettings> {
        let mut s = match &self.config {
            Some(path) => AnnealSettings::load(path)
                .with_context(|| format!("reading settings from {}", path.display()))?,
            None => AnnealSettings::default(),
        };
        if let Some(v) = self.alpha {
            s.cooling_factor = v;
        }
        if let Some(v) = self.strokes {
            s.stroke_count = v;
        }
        if let Some(v) = self.t_init {
            s.initial_temperature = v;
        }
        if let Some(v) = self.t_final {
            s.final_temperature = v;
        }
        if let Some(v) = self.iters {
            s.iterations_per_temperature = v;
        }
        if self.seed.is_some() {
            s.seed = self.seed;
        }
        if let Some(v) = self.snapshot_interval {
            s.snapshot_interval = v;
        }
        s.validate()?;
        Ok(s)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let settings = args.settings()?;
    let brushes = io::load_brush_set(args.brushes.as_slice())?;
    info!(count = brushes.len(), "loaded brushes");

    let target = io::load_target_image(&args.target)?;
    info!(width = target.width, height = target.height, "loaded target");
    if target.is_empty() {
        warn!("target has zero area, the search cannot improve on it");
    }

    let run_dir = report::run_dir(&args.out, &args.target, settings.cooling_factor);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("creating run directory {}", run_dir.display()))?;

    let renderer = CpuRenderer::new(brushes);
    let cost = CostModel::new(&renderer, &target);
    let rng = make_rng(settings.seed);
    let snapshot_every = settings.snapshot_interval as u64;
    let mut annealer = Annealer::new(settings, cost, rng);

    let started = Instant::now();
    let mut snapshot_error = None;
    let outcome = annealer.run(|step| {
        if snapshot_every == 0 || step.step % snapshot_every != 0 || snapshot_error.is_some() {
            return;
        }
        let mut canvas = brushtrace::Canvas::new(target.width, target.height);
        renderer.render(step.best, &mut canvas);
        let path = run_dir.join(report::snapshot_name(step.step));
        if let Err(e) = io::save_image(&canvas, &path) {
            snapshot_error = Some(e);
        }
    });
    let elapsed = started.elapsed().as_secs_f64();
    if let Some(e) = snapshot_error {
        return Err(e).context("writing snapshot");
    }

    let final_canvas = annealer.cost_model().render_to_canvas(&outcome.best);
    io::save_image(&final_canvas, &run_dir.join(report::FINAL_IMAGE))?;
    report::write_solution(&run_dir, &outcome.best)?;
    let report_path = report::write_report(&run_dir, &outcome, elapsed)?;

    let metrics = MetricsSnapshot::from_mse(outcome.best_cost);
    info!(
        initial_mse = outcome.initial_cost,
        best_mse = outcome.best_cost,
        psnr_db = metrics.psnr,
        accepted = outcome.stats.accepted,
        iterations = outcome.stats.iterations,
        secs = elapsed,
        "done"
    );
    info!(report = %report_path.display(), "artifacts written to {}", run_dir.display());
    Ok(())
}
