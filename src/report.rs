//! Report sinks for a finished [`LoadingPlan`].

use crate::phase::LoadingPlan;
use anyhow::{Context, Result};
use image::{ImageBuffer, Rgb, RgbImage};
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub trait ReportSink {
    fn render(&mut self, plan: &LoadingPlan) -> Result<()>;
}

/// Human-readable text: specific load, then one line per used truck.
pub struct ConsoleReport<W: Write> {
    out: W,
    show_phases: bool,
}

impl<W: Write> ConsoleReport<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            show_phases: false,
        }
    }

    /// Also print one line per phase.
    pub fn with_phases(mut self, show_phases: bool) -> Self {
        self.show_phases = show_phases;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for ConsoleReport<W> {
    fn render(&mut self, plan: &LoadingPlan) -> Result<()> {
        let packing = &plan.packing;
        let out = &mut self.out;

        if self.show_phases {
            writeln!(out, "Phases:")?;
            for p in &plan.phases {
                writeln!(
                    out,
                    "  {}: available {:?}, used {:?}, objective {}, gap {:.4}",
                    p.phase, p.available, p.used, p.objective, p.gap
                )?;
            }
        }

        writeln!(out)?;
        writeln!(out, "The optimal specific load: {}", packing.specific_load)?;
        if !plan.is_proven() {
            writeln!(
                out,
                "Not proven optimal, worst gap over all phases: {:.4}",
                plan.worst_gap()
            )?;
        }
        writeln!(out, "Load of trucks:")?;
        for truck in &packing.trucks {
            writeln!(
                out,
                "Truck {} ({}) is loaded with rolls: {:?} with weights: {:?}.",
                truck.display_index, truck.capacity, truck.items, truck.weights
            )?;
        }
        out.flush()?;
        Ok(())
    }
}

/// The whole plan as pretty-printed JSON.
pub struct JsonReport {
    path: PathBuf,
}

impl JsonReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportSink for JsonReport {
    fn render(&mut self, plan: &LoadingPlan) -> Result<()> {
        let file = File::create(&self.path)
            .with_context(|| format!("could not create {}", self.path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, plan)?;
        writer.flush()?;
        info!("[REPORT] plan written to {}", self.path.display());
        Ok(())
    }
}

/// A bar chart of truck loads, one bar per used truck.
///
/// Bars share one scale: the full height is the largest capacity in use. The
/// grey part of a bar is the truck's capacity, the blue blocks stacked on it
/// are the rolls in load order.
pub struct PngReport {
    path: PathBuf,
}

impl PngReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

const BAR_WIDTH: u32 = 24;
const BORDER: u32 = 4;
const CHART_HEIGHT: u32 = 240;

impl ReportSink for PngReport {
    fn render(&mut self, plan: &LoadingPlan) -> Result<()> {
        let img = draw_load_chart(plan);
        save_png(&img, &self.path)
    }
}

/// Draws the chart described on [`PngReport`].
pub fn draw_load_chart(plan: &LoadingPlan) -> RgbImage {
    let trucks = &plan.packing.trucks;
    let n = trucks.len() as u32;
    let width = n * BAR_WIDTH + (n + 1) * BORDER;
    let height = CHART_HEIGHT + 2 * BORDER;
    let white = Rgb([255, 255, 255]);
    let grey = Rgb([220, 220, 220]);
    let blues = [Rgb([0, 100, 200]), Rgb([60, 150, 230])];

    let mut img: RgbImage = ImageBuffer::from_pixel(width, height, white);

    let max_capacity = trucks.iter().map(|t| t.capacity).fold(0.0, f64::max);
    if max_capacity <= 0.0 {
        return img;
    }
    let scale = CHART_HEIGHT as f64 / max_capacity;
    // y grows downwards; the bar's foot sits on the bottom border
    let foot = height - BORDER;

    let fill = |img: &mut RgbImage, x0: u32, from: f64, to: f64, color: Rgb<u8>| {
        let top = foot.saturating_sub((to * scale).round() as u32);
        let bottom = foot.saturating_sub((from * scale).round() as u32);
        for y in top..bottom {
            for x in x0..x0 + BAR_WIDTH {
                img.put_pixel(x, y, color);
            }
        }
    };

    for (k, truck) in trucks.iter().enumerate() {
        let x0 = BORDER + k as u32 * (BAR_WIDTH + BORDER);
        fill(&mut img, x0, 0.0, truck.capacity, grey);

        let mut level = 0.0_f64;
        for (j, &weight) in truck.weights.iter().enumerate() {
            fill(&mut img, x0, level, level + weight, blues[j % blues.len()]);
            level += weight;
        }
    }

    img
}

fn save_png(img: &RgbImage, path: &Path) -> Result<()> {
    img.save(path)
        .with_context(|| format!("could not write {}", path.display()))?;
    info!("[REPORT] load chart written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{LoadedTruck, Packing};
    use crate::phase::{Phase, PhaseSummary};
    use crate::solver::SolveStatus;
    use std::time::Duration;

    fn plan(status: SolveStatus) -> LoadingPlan {
        LoadingPlan {
            capacities: vec![15.0, 20.0],
            phases: vec![PhaseSummary {
                phase: Phase::Combined,
                available: vec![3, 2],
                used: vec![1, 1],
                objective: 35.0,
                gap: if status.is_proven() { 0.0 } else { 0.1 },
                status: status.clone(),
                wall_time: Duration::ZERO,
            }],
            packing: Packing {
                specific_load: 30.0 / 35.0,
                objective: 35.0,
                gap: 0.0,
                status,
                trucks: vec![
                    LoadedTruck {
                        display_index: 1,
                        slot_index: 0,
                        type_index: 0,
                        capacity: 15.0,
                        items: vec![1],
                        weights: vec![10.0],
                    },
                    LoadedTruck {
                        display_index: 2,
                        slot_index: 3,
                        type_index: 1,
                        capacity: 20.0,
                        items: vec![2, 3],
                        weights: vec![10.0, 10.0],
                    },
                ],
            },
        }
    }

    #[test]
    fn console_lists_used_trucks() {
        let mut report = ConsoleReport::new(Vec::new());
        report.render(&plan(SolveStatus::Optimal)).unwrap();
        let text = String::from_utf8(report.into_inner()).unwrap();

        assert!(text.contains("The optimal specific load: 0.857"));
        assert!(text.contains("Truck 1 (15) is loaded with rolls: [1] with weights: [10.0]."));
        assert!(
            text.contains("Truck 2 (20) is loaded with rolls: [2, 3] with weights: [10.0, 10.0].")
        );
        assert!(!text.contains("Not proven optimal"));
        assert!(!text.contains("Phases:"));
    }

    #[test]
    fn console_flags_unproven_plans() {
        let mut report = ConsoleReport::new(Vec::new()).with_phases(true);
        report
            .render(&plan(SolveStatus::LimitReached("TimeLimit".into())))
            .unwrap();
        let text = String::from_utf8(report.into_inner()).unwrap();

        assert!(text.contains("Phases:"));
        assert!(text.contains("trucks of all types: available [3, 2], used [1, 1]"));
        assert!(text.contains("Not proven optimal, worst gap over all phases: 0.1000"));
    }

    #[test]
    fn json_holds_the_whole_plan() {
        let path =
            std::env::temp_dir().join(format!("roll-loading-plan-{}.json", std::process::id()));
        JsonReport::new(&path).render(&plan(SolveStatus::Optimal)).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["capacities"], serde_json::json!([15.0, 20.0]));
        assert_eq!(json["phases"][0]["used"], serde_json::json!([1, 1]));
        assert_eq!(json["packing"]["objective"], 35.0);
        let trucks = json["packing"]["trucks"].as_array().unwrap();
        assert_eq!(trucks.len(), 2);
        assert_eq!(trucks[1]["items"], serde_json::json!([2, 3]));
    }

    #[test]
    fn json_report_fails_on_missing_directory() {
        let path = std::env::temp_dir().join("roll-loading-missing-dir").join("plan.json");
        assert!(JsonReport::new(path).render(&plan(SolveStatus::Optimal)).is_err());
    }

    #[test]
    fn chart_has_one_bar_per_truck() {
        let img = draw_load_chart(&plan(SolveStatus::Optimal));
        assert_eq!(img.width(), 2 * BAR_WIDTH + 3 * BORDER);
        assert_eq!(img.height(), CHART_HEIGHT + 2 * BORDER);

        let foot = img.height() - BORDER - 1;
        // the 20-capacity bar is full height, the 15-capacity one is not
        assert_eq!(*img.get_pixel(BORDER, BORDER), Rgb([255, 255, 255]));
        assert_ne!(*img.get_pixel(2 * BORDER + BAR_WIDTH, BORDER), Rgb([255, 255, 255]));
        // both carry a roll at the bottom
        assert_eq!(*img.get_pixel(BORDER, foot), Rgb([0, 100, 200]));
        assert_eq!(*img.get_pixel(2 * BORDER + BAR_WIDTH, foot), Rgb([0, 100, 200]));
        // space between bars stays white
        assert_eq!(*img.get_pixel(BORDER + BAR_WIDTH, foot), Rgb([255, 255, 255]));
    }
}
