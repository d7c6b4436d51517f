// run artifacts: output directory naming, the plain-text acceptance report
// and the JSON dump of the best solution.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::dna::Solution;
use crate::engine::AnnealOutcome;
use crate::error::Result;
use crate::mutate::StrokeParam;

pub const REPORT_FILE: &str = "report.txt";
pub const SOLUTION_FILE: &str = "solution.json";
pub const FINAL_IMAGE: &str = "final.png";
pub const HISTORY_HEADER: &str = "--- MSE history ---";

/// `<out_dir>/<target-stem>_<alpha>`
pub fn run_dir(out_dir: &Path, target: &Path, cooling_factor: f64) -> PathBuf {
    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "target".to_owned());
    out_dir.join(format!("{stem}_{cooling_factor}"))
}

pub fn snapshot_name(step: u64) -> String {
    format!("snapshot_{step}.png")
}

/// accepted-move counts per parameter plus elapsed seconds, then the best-cost history
pub fn format_report(outcome: &AnnealOutcome, elapsed_secs: f64) -> String {
    let mut out = String::new();

    let header: Vec<&str> = StrokeParam::ALL
        .iter()
        .map(|p| p.label())
        .chain(["Time_Sec"])
        .collect();
    out.push_str(&header.join(" "));
    out.push('\n');

    let mut values: Vec<String> = StrokeParam::ALL
        .iter()
        .map(|&p| outcome.stats.accepted_for(p).to_string())
        .collect();
    values.push(format!("{elapsed_secs:.3}"));
    out.push_str(&values.join(" "));
    out.push_str("\n\n");

    out.push_str(HISTORY_HEADER);
    out.push('\n');
    for cost in &outcome.cost_history {
        let _ = writeln!(out, "{cost}");
    }
    out
}

pub fn write_report(dir: &Path, outcome: &AnnealOutcome, elapsed_secs: f64) -> Result<PathBuf> {
    let path = dir.join(REPORT_FILE);
    std::fs::write(&path, format_report(outcome, elapsed_secs))?;
    Ok(path)
}

pub fn write_solution(dir: &Path, solution: &Solution) -> Result<PathBuf> {
    let path = dir.join(SOLUTION_FILE);
    std::fs::write(&path, serde_json::to_string_pretty(solution)?)?;
    Ok(path)
}

pub fn read_solution(path: &Path) -> Result<Solution> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}
