//! Cluster validity: did the cells sort themselves by type?
//!
//! A one-shot analysis over a population snapshot:
//! 1. Keep the cells inside a sampling cube of half-width `N / 8` around
//!    (0.5, 0.5, 0.5), in snapshot order.
//! 2. Reject the sample if it holds fewer than a quarter, or more than four
//!    times, the target population.
//! 3. Classify every unordered pair closer than the radius as same-type or
//!    opposite-type.
//! 4. Reject if opposite-type pairs make up more than 10% of close pairs
//!    (`opposite / (close + 1)`).
//! 5. Reject if cells average fewer than 5 close same-type partners.
//!
//! The pair pass is a rayon fork-join over the outer index. Each worker
//! counts into its own `PairCounts` and the partial counts are merged by
//! integer addition, so the result does not depend on the thread count.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use soma_core::types::*;
use std::ops::{Add, AddAssign};
use tracing::info;

/// Centre of the sampling cube on every axis.
pub const SUBVOLUME_CENTER: f64 = 0.5;
/// Below this sample-to-target ratio the sample is too sparse to judge.
pub const MIN_DENSITY_RATIO: f64 = 0.25;
/// Above this sample-to-target ratio the sample is too dense.
pub const MAX_DENSITY_RATIO: f64 = 4.0;
/// Largest tolerated share of opposite-type close pairs.
pub const MAX_CORRECTNESS_COEFFICIENT: f64 = 0.1;
/// Smallest tolerated number of close same-type partners per cell.
pub const MIN_AVG_SAME_NEIGHBORS: f64 = 5.0;

/// Close-pair counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairCounts {
    /// Pairs closer than the radius.
    pub close: u64,
    /// Close pairs whose label product is negative.
    pub opposite_close: u64,
    /// All other close pairs.
    pub same_close: u64,
}

impl Add for PairCounts {
    type Output = PairCounts;

    fn add(self, rhs: PairCounts) -> PairCounts {
        PairCounts {
            close: self.close + rhs.close,
            opposite_close: self.opposite_close + rhs.opposite_close,
            same_close: self.same_close + rhs.same_close,
        }
    }
}

impl AddAssign for PairCounts {
    fn add_assign(&mut self, rhs: PairCounts) {
        *self = *self + rhs;
    }
}

/// Why the validator reached its verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Every check passed.
    WellClustered,
    /// Too few cells in the sampling cube.
    TooSparse,
    /// Too many cells in the sampling cube.
    TooDense,
    /// Too many opposite-type cells within the radius of each other.
    Intermixed,
    /// Cells have too few same-type neighbors.
    SparseClusters,
}

impl Verdict {
    pub fn is_pass(self) -> bool {
        self == Verdict::WellClustered
    }

    pub fn describe(self) -> &'static str {
        match self {
            Verdict::WellClustered => "cells in subvolume are well clustered",
            Verdict::TooSparse => "not enough cells in subvolume",
            Verdict::TooDense => "too many cells in subvolume",
            Verdict::Intermixed => "cells in subvolume are not well clustered",
            Verdict::SparseClusters => "cells in subvolume do not have enough neighbors",
        }
    }
}

/// Parameters of the cluster criterion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterCriterion {
    /// Two cells closer than this are a close pair.
    pub radius: f64,
    /// Expected number of cells in the sampling cube.
    pub target: usize,
}

impl ClusterCriterion {
    pub fn new(radius: f64, target: usize) -> Self {
        Self { radius, target }
    }

    /// Radius 5 and a target of a quarter of the population.
    pub fn reference(population: usize) -> Self {
        Self::new(5.0, population / 4)
    }

    pub fn evaluate(&self, cells: &[CellRecord]) -> ClusterReport {
        evaluate(cells, self.radius, self.target)
    }
}

/// Verdict plus every intermediate value that led to it.
///
/// Values computed after the deciding check are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterReport {
    pub verdict: Verdict,
    pub total_cells: usize,
    pub subvolume_half_width: f64,
    pub subvolume_count: usize,
    pub density_ratio: f64,
    pub pairs: Option<PairCounts>,
    pub correctness_coefficient: Option<f64>,
    pub avg_same_neighbors: Option<f64>,
}

impl ClusterReport {
    pub fn is_well_clustered(&self) -> bool {
        self.verdict.is_pass()
    }
}

/// Half-width of the sampling cube for a population of `n` cells.
///
/// Integer division: 20 000 cells give 2500, 15 cells give 1.
pub fn subvolume_half_width(n: usize) -> f64 {
    (n / 8) as f64
}

/// Cells strictly inside the sampling cube, in their original order.
pub fn filter_subvolume(cells: &[CellRecord]) -> Vec<CellRecord> {
    let half_width = subvolume_half_width(cells.len());
    cells
        .iter()
        .filter(|c| {
            c.position
                .to_array()
                .iter()
                .all(|&coord| (coord - SUBVOLUME_CENTER).abs() < half_width)
        })
        .copied()
        .collect()
}

/// Count close pairs among `cells`, in parallel over the outer index.
pub fn count_close_pairs(cells: &[CellRecord], radius: f64) -> PairCounts {
    (0..cells.len())
        .into_par_iter()
        .map(|i| {
            let a = &cells[i];
            let mut counts = PairCounts::default();
            for b in &cells[i + 1..] {
                if a.position.distance_to(&b.position) < radius {
                    counts.close += 1;
                    if a.cell_type.is_opposite(b.cell_type) {
                        counts.opposite_close += 1;
                    } else {
                        counts.same_close += 1;
                    }
                }
            }
            counts
        })
        .reduce(PairCounts::default, |a, b| a + b)
}

/// Run the full criterion and report how it was decided.
pub fn evaluate(cells: &[CellRecord], radius: f64, target: usize) -> ClusterReport {
    let subvolume = filter_subvolume(cells);
    let n_sub = subvolume.len();
    let density_ratio = n_sub as f64 / target as f64;

    let mut report = ClusterReport {
        verdict: Verdict::WellClustered,
        total_cells: cells.len(),
        subvolume_half_width: subvolume_half_width(cells.len()),
        subvolume_count: n_sub,
        density_ratio,
        pairs: None,
        correctness_coefficient: None,
        avg_same_neighbors: None,
    };

    info!(subvolume_count = n_sub, total = cells.len(), "number of cells in subvolume");

    // An empty sample stops here, so nothing below divides by zero.
    if n_sub == 0 || density_ratio < MIN_DENSITY_RATIO {
        report.verdict = Verdict::TooSparse;
        info!(subvolume_count = n_sub, target, "{}", report.verdict.describe());
        return report;
    }
    if density_ratio > MAX_DENSITY_RATIO {
        report.verdict = Verdict::TooDense;
        info!(subvolume_count = n_sub, target, "{}", report.verdict.describe());
        return report;
    }

    let pairs = count_close_pairs(&subvolume, radius);
    report.pairs = Some(pairs);

    let coefficient = pairs.opposite_close as f64 / (pairs.close as f64 + 1.0);
    report.correctness_coefficient = Some(coefficient);
    if coefficient > MAX_CORRECTNESS_COEFFICIENT {
        report.verdict = Verdict::Intermixed;
        info!(correctness_coefficient = coefficient, "{}", report.verdict.describe());
        return report;
    }

    let avg_same_neighbors = pairs.same_close as f64 / n_sub as f64;
    report.avg_same_neighbors = Some(avg_same_neighbors);
    info!(avg_same_neighbors, "average neighbors in subvolume");
    if avg_same_neighbors < MIN_AVG_SAME_NEIGHBORS {
        report.verdict = Verdict::SparseClusters;
        info!(avg_same_neighbors, "{}", report.verdict.describe());
        return report;
    }

    info!(correctness_coefficient = coefficient, "{}", report.verdict.describe());
    report
}

/// `true` when the snapshot passes every check.
pub fn is_well_clustered(cells: &[CellRecord], radius: f64, target: usize) -> bool {
    evaluate(cells, radius, target).is_well_clustered()
}
