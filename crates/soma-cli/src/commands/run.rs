//! Run the simulation and validate the result.

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use soma::prelude::*;
use std::path::Path;
use tracing::info;

use crate::commands::validate::{criterion_for, print_report};
use crate::config::Config;

/// Command-line values that take precedence over soma.toml.
#[derive(Debug, Default)]
pub struct RunOverrides {
    pub steps: Option<u64>,
    pub cells: Option<usize>,
    pub seed: Option<u64>,
    pub radius: Option<f64>,
    pub target: Option<usize>,
    pub output: Option<String>,
}

pub fn run(overrides: RunOverrides, verbose: bool) -> Result<bool> {
    let config = Config::load()?;
    let steps = overrides.steps.unwrap_or(config.simulation.steps);
    let cell_count = overrides.cells.unwrap_or(config.cells.count);
    let seed = overrides.seed.unwrap_or(config.simulation.seed);
    info!(steps, cells = cell_count, seed, "starting run");

    println!("{} Building colony...", "→".blue());
    let mut colony = build_colony(&config, cell_count, seed)?;
    let bounds = colony.config().bounds;
    println!(
        "  Placed: {} cells in [{}, {}]³ (seed {})",
        colony.cell_count().to_string().cyan(),
        bounds.min,
        bounds.max,
        seed
    );

    println!("{} Running {} steps...", "→".blue(), steps.to_string().cyan());

    let pb = ProgressBar::new(steps);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} steps")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );

    let report_every = (steps / 10).max(1);
    colony.run_with(steps, |tick| {
        if verbose && tick % report_every == 0 {
            pb.println(format!("  tick {}", tick));
        }
        pb.inc(1);
    });
    pb.finish_with_message("done");

    let stats = colony.stats();
    println!();
    println!("{} Simulation complete!", "✓".green().bold());
    for substance in &stats.substance_totals {
        println!("  {}: total {:.3}", substance.name, substance.total);
    }

    let snapshot = colony.snapshot();
    if let Some(output) = &overrides.output {
        let path = Path::new(output);
        write_snapshot_json(&snapshot, path)
            .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;
        println!("  {} Saved snapshot to {}", "✓".green(), path.display());
    }

    let criterion = criterion_for(&config, snapshot.len(), overrides.radius, overrides.target);
    let report = criterion.evaluate(&snapshot.cells);
    print_report(&criterion, &report);

    Ok(report.is_well_clustered())
}

/// Half the cells of each type, placed at random with the configured
/// diameter and reference behaviors.
pub fn build_colony(config: &Config, cell_count: usize, seed: u64) -> Result<Colony> {
    let colony = ColonyBuilder::new()
        .with_config(config.colony_config())
        .seed(seed)
        .add_random_cells(
            cell_count / 2,
            CellType::POSITIVE,
            config.cells.diameter,
            Behavior::reference_set(),
        )
        .add_random_cells(
            cell_count / 2,
            CellType::NEGATIVE,
            config.cells.diameter,
            Behavior::reference_set(),
        )
        .build()
        .context("Failed to build colony")?;
    Ok(colony)
}
