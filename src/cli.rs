use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use crate::config::LoadingConfig;

/// Loads rolls onto a minimal-capacity mix of trucks.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Weight file: one roll per row, optionally with a `weight` header column
    #[arg(short, long, value_name = "FILE", conflicts_with = "weights")]
    pub input_file: Option<PathBuf>,
    /// Inline weights; `WxN` stands for N rolls of weight W
    #[arg(value_name = "WEIGHT", required_unless_present = "input_file")]
    pub weights: Vec<String>,
    /// Column to read from a weight file with a header row
    #[arg(long, value_name = "NAME", default_value = "weight")]
    pub column: String,
    #[arg(short, long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,
    /// Truck capacity, once per truck type; replaces the configured capacities
    #[arg(long = "capacity", value_name = "CAPACITY")]
    pub capacities: Vec<f64>,
    #[arg(long)]
    pub gap: Option<f64>,
    /// Time limit per solve in seconds
    #[arg(long, value_name = "SECONDS")]
    pub time_limit: Option<f64>,
    #[arg(long)]
    pub threads: Option<usize>,
    /// Print one summary line per phase
    #[arg(long)]
    pub phases: bool,
    #[arg(long, value_name = "FILE")]
    pub json_output: Option<PathBuf>,
    #[arg(long, value_name = "FILE")]
    pub png_output: Option<PathBuf>,
    #[arg(
        short,
        long,
        value_name = "[off, error, warn, info, debug, trace]",
        default_value = "warn"
    )]
    pub log_level: LevelFilter,
}

impl Cli {
    /// Applies command-line overrides on top of `config`.
    pub fn apply_overrides(&self, config: &mut LoadingConfig) {
        if !self.capacities.is_empty() {
            config.capacities = self.capacities.clone();
        }
        if let Some(gap) = self.gap {
            config.gap = gap;
        }
        if let Some(time_limit) = self.time_limit {
            config.time_limit_secs = time_limit;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
    }
}
