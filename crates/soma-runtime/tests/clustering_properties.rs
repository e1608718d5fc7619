//! Cluster validator properties on hand-built snapshots.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use soma_core::types::*;
use soma_runtime::clustering::*;

fn rec(x: f64, y: f64, z: f64, t: i32) -> CellRecord {
    CellRecord::new(Position::new(x, y, z), CellType(t))
}

fn pair_counts(close: u64, opposite_close: u64, same_close: u64) -> PairCounts {
    PairCounts {
        close,
        opposite_close,
        same_close,
    }
}

/// `count` cells on a short line starting at `origin`, all within 0.5 of
/// each other.
fn tight_cluster(origin: f64, count: usize, types: impl Fn(usize) -> i32) -> Vec<CellRecord> {
    (0..count)
        .map(|i| rec(origin + i as f64 * 0.02, origin, origin, types(i)))
        .collect()
}

/// Two well separated single-type clusters of 12, 24 cells total.
/// Half-width 3, so every cell sits inside the sampling cube.
fn sorted_colony() -> Vec<CellRecord> {
    let mut cells = tight_cluster(-2.0, 12, |_| 1);
    cells.extend(tight_cluster(2.5, 12, |_| -1));
    cells
}

fn random_colony(seed: u64, n: usize, extent: f64) -> Vec<CellRecord> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            rec(
                rng.random_range(-extent..extent),
                rng.random_range(-extent..extent),
                rng.random_range(-extent..extent),
                if i % 2 == 0 { 1 } else { -1 },
            )
        })
        .collect()
}

#[test]
fn sorted_clusters_pass() {
    let report = evaluate(&sorted_colony(), 1.0, 24);
    assert_eq!(report.verdict, Verdict::WellClustered);
    assert_eq!(report.subvolume_count, 24);
    assert_eq!(report.pairs, Some(pair_counts(132, 0, 132)));
    assert_eq!(report.correctness_coefficient, Some(0.0));
    assert_eq!(report.avg_same_neighbors, Some(5.5));
    assert!(report.is_well_clustered());
    assert!(is_well_clustered(&sorted_colony(), 1.0, 24));
}

#[test]
fn alternating_types_are_intermixed() {
    let cells = tight_cluster(0.0, 24, |i| if i % 2 == 0 { 1 } else { -1 });
    let report = evaluate(&cells, 1.0, 24);
    assert_eq!(report.verdict, Verdict::Intermixed);
    let pairs = report.pairs.unwrap();
    assert_eq!(pairs.close, 276);
    assert_eq!(pairs.opposite_close, 144);
    assert_eq!(report.avg_same_neighbors, None);
}

#[test]
fn scattered_cells_have_too_few_neighbors() {
    // 24 cells on a lattice with spacing 2, radius 1: no close pairs at all.
    let mut cells = Vec::new();
    for i in 0..24 {
        let x = (i % 3) as f64 * 2.0 - 2.0;
        let y = ((i / 3) % 3) as f64 * 2.0 - 2.0;
        let z = (i / 9) as f64 * 2.0 - 2.0;
        cells.push(rec(x, y, z, 1));
    }
    let report = evaluate(&cells, 1.0, 24);
    assert_eq!(report.verdict, Verdict::SparseClusters);
    assert_eq!(report.correctness_coefficient, Some(0.0));
    assert_eq!(report.avg_same_neighbors, Some(0.0));
}

#[test]
fn density_ratio_bounds_are_inclusive() {
    // 16 cells -> half-width 2; everything at 100 lies outside.
    let with_inside = |inside: usize| {
        let mut cells = vec![rec(100.0, 100.0, 100.0, 1); 16 - inside];
        cells.extend(tight_cluster(0.0, inside, |_| 1));
        cells
    };

    // 5 / 20 is exactly the lower bound.
    assert_ne!(evaluate(&with_inside(5), 1.0, 20).verdict, Verdict::TooSparse);
    assert_eq!(evaluate(&with_inside(4), 1.0, 20).verdict, Verdict::TooSparse);

    // 8 / 2 is exactly the upper bound.
    assert_ne!(evaluate(&with_inside(8), 1.0, 2).verdict, Verdict::TooDense);
    assert_eq!(evaluate(&with_inside(9), 1.0, 2).verdict, Verdict::TooDense);
}

#[test]
fn nothing_in_subvolume_is_too_sparse() {
    let cells = vec![rec(100.0, 100.0, 100.0, 1); 40];
    let report = evaluate(&cells, 5.0, 10);
    assert_eq!(report.verdict, Verdict::TooSparse);
    assert_eq!(report.subvolume_count, 0);
    assert_eq!(report.pairs, None);
}

#[test]
fn flipping_every_label_changes_nothing() {
    let cells = random_colony(3, 400, 40.0);
    let flipped: Vec<CellRecord> = cells
        .iter()
        .map(|c| CellRecord::new(c.position, CellType(-c.cell_type.0)))
        .collect();
    assert_eq!(evaluate(&cells, 5.0, 100), evaluate(&flipped, 5.0, 100));
}

#[test]
fn order_of_cells_does_not_matter() {
    let cells = random_colony(11, 400, 40.0);
    let mut reversed = cells.clone();
    reversed.reverse();
    assert_eq!(evaluate(&cells, 5.0, 100), evaluate(&reversed, 5.0, 100));
}

#[test]
fn only_negative_products_count_as_opposite() {
    let cells = vec![
        rec(0.0, 0.0, 0.0, 2),
        rec(0.1, 0.0, 0.0, -3),
        rec(0.2, 0.0, 0.0, 0),
    ];
    // (2,-3) opposite; (2,0) and (-3,0) have product zero and count as same.
    assert_eq!(count_close_pairs(&cells, 1.0), pair_counts(3, 1, 2));
}

#[test]
fn result_is_independent_of_thread_count() {
    let cells = random_colony(7, 3000, 60.0);
    let run_on = |threads: usize| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap()
            .install(|| evaluate(&cells, 5.0, 750))
    };

    let single = run_on(1);
    assert!(single.pairs.is_some(), "sample should reach the pair pass");
    assert_eq!(single, run_on(4));
    assert_eq!(single, run_on(8));
}

#[test]
fn criterion_reference_uses_quarter_population() {
    let criterion = ClusterCriterion::reference(20_000);
    assert_eq!(criterion.radius, 5.0);
    assert_eq!(criterion.target, 5000);
    assert_eq!(
        criterion.evaluate(&sorted_colony()).verdict,
        evaluate(&sorted_colony(), 5.0, 5000).verdict
    );
}
