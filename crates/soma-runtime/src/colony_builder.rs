//! Colony builder with random initial placement.
//!
//! Populations are described first and placed on `build()`, once the
//! bounds are known to be valid. Placement is uniform inside the bounds and
//! driven by a seeded `SmallRng`, so the same seed always produces the same
//! initial colony.
//!
//! # Example
//!
//! ```rust
//! use soma_runtime::colony_builder::ColonyBuilder;
//! use soma_core::types::CellType;
//! use soma_agents::behavior::Behavior;
//!
//! let mut colony = ColonyBuilder::new()
//!     .seed(7)
//!     .add_random_cells(50, CellType::POSITIVE, 10.0, Behavior::reference_set())
//!     .add_random_cells(50, CellType::NEGATIVE, 10.0, Behavior::reference_set())
//!     .build()
//!     .unwrap();
//!
//! colony.run(3);
//! assert_eq!(colony.cell_count(), 100);
//! ```

use crate::colony::{Colony, ColonyConfig};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use soma_agents::behavior::Behavior;
use soma_agents::soma_cell::SomaCell;
use soma_core::error::Result;
use soma_core::types::*;

/// Number of cells in the reference scenario.
pub const REFERENCE_CELL_COUNT: usize = 20_000;
/// Diameter of every reference cell.
pub const REFERENCE_DIAMETER: f64 = 10.0;
/// Steps the reference scenario runs before validation.
pub const REFERENCE_STEPS: u64 = 3001;

/// A batch of identical cells placed at random.
#[derive(Debug, Clone)]
struct Population {
    count: usize,
    cell_type: CellType,
    diameter: f64,
    behaviors: Vec<Behavior>,
}

/// Builder for creating colonies.
pub struct ColonyBuilder {
    colony_config: ColonyConfig,
    seed: u64,
    populations: Vec<Population>,
    cells: Vec<SomaCell>,
}

impl Default for ColonyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ColonyBuilder {
    /// Create a new colony builder with default settings.
    pub fn new() -> Self {
        Self {
            colony_config: ColonyConfig::default(),
            seed: 0,
            populations: Vec::new(),
            cells: Vec::new(),
        }
    }

    /// Half the cells of type +1, half of type -1, reference diameter and
    /// behaviors, default configuration.
    pub fn reference(num_cells: usize) -> Self {
        Self::new()
            .add_random_cells(
                num_cells / 2,
                CellType::POSITIVE,
                REFERENCE_DIAMETER,
                Behavior::reference_set(),
            )
            .add_random_cells(
                num_cells / 2,
                CellType::NEGATIVE,
                REFERENCE_DIAMETER,
                Behavior::reference_set(),
            )
    }

    /// Set the colony configuration for simulation parameters.
    pub fn with_config(mut self, config: ColonyConfig) -> Self {
        self.colony_config = config;
        self
    }

    /// Seed for random placement.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Place one explicitly positioned cell.
    pub fn add_cell(mut self, cell: SomaCell) -> Self {
        self.cells.push(cell);
        self
    }

    /// Place `count` cells uniformly at random inside the bounds.
    pub fn add_random_cells(
        mut self,
        count: usize,
        cell_type: CellType,
        diameter: f64,
        behaviors: impl IntoIterator<Item = Behavior>,
    ) -> Self {
        self.populations.push(Population {
            count,
            cell_type,
            diameter,
            behaviors: behaviors.into_iter().collect(),
        });
        self
    }

    /// Total number of cells the built colony will hold.
    pub fn cell_count(&self) -> usize {
        self.cells.len() + self.populations.iter().map(|p| p.count).sum::<usize>()
    }

    /// Place every population and build the colony.
    pub fn build(self) -> Result<Colony> {
        self.colony_config.validate()?;

        let Bounds { min, max } = self.colony_config.bounds;
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut cells = self.cells;
        cells.reserve(self.populations.iter().map(|p| p.count).sum());

        for population in &self.populations {
            for _ in 0..population.count {
                let position = Position::new(
                    rng.random_range(min..max),
                    rng.random_range(min..max),
                    rng.random_range(min..max),
                );
                cells.push(
                    SomaCell::new(position, population.cell_type, population.diameter)
                        .with_behaviors(population.behaviors.iter().copied()),
                );
            }
        }

        Colony::new(self.colony_config, cells)
    }
}
