//! # Soma
//!
//! Chemotactic cell sorting in three dimensions.
//!
//! A population of two cell types is scattered at random inside a cube.
//! Every step each cell secretes a substance chosen by its type and moves
//! up the gradient of a substance. Over time like cells gather into
//! single-type clusters. A validator then decides, from a snapshot, whether
//! the population really did sort.
//!
//! ## Quick Start
//!
//! ```rust
//! use soma::prelude::*;
//!
//! // Half the cells of each type, random placement, reference behaviors
//! let mut colony = ColonyBuilder::reference(200).seed(1).build().unwrap();
//!
//! // Run the simulation
//! colony.run(10);
//!
//! // Judge the final arrangement
//! let snapshot = colony.snapshot();
//! let report = ClusterCriterion::reference(snapshot.len()).evaluate(&snapshot.cells);
//! println!("{:?}: {}", report.verdict, report.verdict.describe());
//! ```
//!
//! ## Architecture
//!
//! - [`soma_core`] - Cell, positions, the field accessor contract, errors
//! - [`soma_agents`] - Secretion and chemotaxis behaviors, `SomaCell`
//! - [`soma_runtime`] - Diffusion grids, colony stepping, cluster validation
//!
//! ## Key Concepts
//!
//! | Behavior | What It Does |
//! |----------|--------------|
//! | Secretion | Deposit one unit of the cell's substance at its position |
//! | Chemotaxis | Move along the weighted gradient of a substance |
//!
//! Cells of type +1 secrete `Substance_1` and follow `Substance_0`. Every
//! other type secretes `Substance_0` and follows `Substance_1`, so each type
//! is drawn toward the substance the opposite type secretes.
//!
//! ## Cluster Criterion
//!
//! 1. Sample the cells inside a cube of half-width `N / 8` around (0.5, 0.5, 0.5)
//! 2. The sample must hold between a quarter and four times the target
//! 3. At most 10% of close pairs may be of opposite type
//! 4. Cells need at least 5 close same-type partners on average
//!
//! ## Snapshots
//!
//! ```rust,ignore
//! use soma::prelude::*;
//! use std::path::Path;
//!
//! write_snapshot_json(&colony.snapshot(), Path::new("snapshot.json"))?;
//! let snapshot = read_snapshot_json(Path::new("snapshot.json"))?;
//! ```

// Re-export all subcrates
pub use soma_core as core;
pub use soma_runtime as runtime;
pub use soma_agents as agents;

/// Prelude module for convenient imports.
///
/// ```rust
/// use soma::prelude::*;
/// ```
pub mod prelude {
    pub use soma_runtime::prelude::*;
}
