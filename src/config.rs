use crate::solver::SolveParams;
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

/// Configuration of a loading run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingConfig {
    /// Capacity of each truck type, one entry per type
    pub capacities: Vec<f64>,
    /// Relative optimality gap at which each solve stops
    pub gap: f64,
    /// Wall-clock limit per solve, in seconds
    pub time_limit_secs: f64,
    /// Threads the solver may use per solve
    pub threads: usize,
    /// Show the solver's own log
    pub solver_output: bool,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            capacities: vec![22.2, 27.6],
            gap: 0.001,
            time_limit_secs: 150.0,
            threads: 10,
            solver_output: false,
        }
    }
}

impl LoadingConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("could not open config file: {}", path.display()))?;
        let config: Self = serde_json::from_reader(BufReader::new(file))
            .context("incorrect config file format")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.capacities.is_empty(), "at least one truck capacity is required");
        ensure!(
            self.capacities.iter().all(|c| c.is_finite() && *c > 0.0),
            "truck capacities must be positive, got {:?}",
            self.capacities
        );
        ensure!(
            self.gap.is_finite() && self.gap >= 0.0,
            "gap must be non-negative, got {}",
            self.gap
        );
        ensure!(
            self.time_limit_secs.is_finite() && self.time_limit_secs > 0.0,
            "time limit must be positive, got {}",
            self.time_limit_secs
        );
        ensure!(self.threads >= 1, "at least one thread is required");
        Ok(())
    }

    pub fn solve_params(&self) -> SolveParams {
        SolveParams {
            gap: self.gap,
            time_limit: Duration::from_secs_f64(self.time_limit_secs),
            threads: self.threads,
        }
    }
}
