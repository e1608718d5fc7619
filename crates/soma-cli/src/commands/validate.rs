//! Validate a saved snapshot.

use anyhow::{Context, Result};
use colored::Colorize;
use soma::prelude::*;
use std::path::Path;

use crate::config::Config;

pub fn run(snapshot_path: &str, radius: Option<f64>, target: Option<usize>) -> Result<bool> {
    let path = Path::new(snapshot_path);
    println!("{} Loading snapshot...", "→".blue());
    let snapshot = read_snapshot_json(path)
        .with_context(|| format!("Failed to load snapshot: {}", path.display()))?;
    println!(
        "  Loaded: {} cells at tick {}",
        snapshot.len().to_string().cyan(),
        snapshot.tick.to_string().cyan()
    );

    let config = Config::load()?;
    let criterion = criterion_for(&config, snapshot.len(), radius, target);
    let report = criterion.evaluate(&snapshot.cells);
    print_report(&criterion, &report);

    Ok(report.is_well_clustered())
}

/// The configured criterion with command-line overrides applied.
pub fn criterion_for(
    config: &Config,
    cells: usize,
    radius: Option<f64>,
    target: Option<usize>,
) -> ClusterCriterion {
    let mut criterion = config.criterion(cells);
    if let Some(r) = radius {
        criterion.radius = r;
    }
    if let Some(t) = target {
        criterion.target = t;
    }
    criterion
}

pub fn print_report(criterion: &ClusterCriterion, report: &ClusterReport) {
    println!();
    println!(
        "{} radius {}, target {}",
        "Cluster criterion:".bold(),
        criterion.radius,
        criterion.target
    );
    println!(
        "  Subvolume: {} of {} cells (half-width {}, ratio {:.3})",
        report.subvolume_count.to_string().cyan(),
        report.total_cells,
        report.subvolume_half_width,
        report.density_ratio
    );
    if let Some(pairs) = report.pairs {
        println!(
            "  Close pairs: {} ({} same type, {} opposite)",
            pairs.close.to_string().cyan(),
            pairs.same_close,
            pairs.opposite_close
        );
    }
    if let Some(coefficient) = report.correctness_coefficient {
        println!("  Correctness coefficient: {:.4}", coefficient);
    }
    if let Some(avg) = report.avg_same_neighbors {
        println!("  Average same-type neighbors: {:.2}", avg);
    }

    println!();
    if report.is_well_clustered() {
        println!("{} {}", "PASS".green().bold(), report.verdict.describe());
    } else {
        println!("{} {}", "FAIL".red().bold(), report.verdict.describe());
    }
}
