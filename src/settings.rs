/// run configuration for the annealer.
/// every field is an input to the search, nothing here is baked into the algorithm.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealSettings {
    /// strokes per solution (N), >= 1
    pub stroke_count: usize,
    /// starting temperature, > 0
    pub initial_temperature: f64,
    /// the loop stops once T <= final_temperature, > 0
    pub final_temperature: f64,
    /// geometric cooling factor (T *= alpha per cooling step), in (0, 1)
    pub cooling_factor: f64,
    /// inner iterations between cooling steps, >= 1
    pub iterations_per_temperature: u32,
    /// fixed seed for reproducible runs; None draws from OS entropy
    pub seed: Option<u64>,
    /// cooling steps between snapshot images of the best solution (0 = off)
    pub snapshot_interval: u32,
}

impl Default for AnnealSettings {
    fn default() -> Self {
        Self {
            stroke_count: 50,
            initial_temperature: 10_000.0,
            final_temperature: 0.1,
            cooling_factor: 0.99,
            iterations_per_temperature: 250,
            seed: None,
            snapshot_interval: 10,
        }
    }
}

impl AnnealSettings {
    /// reject anything the search loop can't run with. call before starting a run.
    pub fn validate(&self) -> Result<()> {
        if self.stroke_count == 0 {
            return Err(invalid("stroke_count", self.stroke_count, ">= 1"));
        }
        let alpha = self.cooling_factor;
        if alpha.is_nan() || alpha <= 0.0 || alpha >= 1.0 {
            return Err(invalid("cooling_factor", alpha, "a value in (0, 1)"));
        }
        // below MIN_POSITIVE, T * alpha can round back to T and cooling stalls
        let t_final = self.final_temperature;
        if !t_final.is_finite() || t_final < f64::MIN_POSITIVE {
            return Err(invalid("final_temperature", t_final, "a finite, normal value > 0"));
        }
        let t_init = self.initial_temperature;
        if t_init <= 0.0 || !t_init.is_finite() {
            return Err(invalid("initial_temperature", t_init, "a finite value > 0"));
        }
        let iters = self.iterations_per_temperature;
        if iters == 0 {
            return Err(invalid("iterations_per_temperature", iters, ">= 1"));
        }
        Ok(())
    }

    /// number of cooling steps the schedule will take. only meaningful on validated settings.
    pub fn cooling_steps(&self) -> u64 {
        let mut t = self.initial_temperature;
        let mut steps = 0;
        while t > self.final_temperature {
            t *= self.cooling_factor;
            steps += 1;
        }
        steps
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

fn invalid(name: &'static str, value: impl ToString, expected: &'static str) -> Error {
    Error::InvalidParameter { name, value: value.to_string(), expected }
}
