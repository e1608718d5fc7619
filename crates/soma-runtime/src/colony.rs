//! Colony — the step driver.
//!
//! The colony owns every cell and the substrate they share. Each step:
//! 1. All cells run their behaviors in parallel against `&SubstrateImpl`
//! 2. Positions are clamped into the bounds
//! 3. Every substance diffuses, decays and refreshes its gradient
//! 4. The step counter advances
//!
//! Cells only meet through the substrate. The cell pass reads gradients
//! computed in the previous step and deposits atomically, so cells may run
//! in any order and on any number of threads.

use crate::diffusion::SubstanceConfig;
use crate::substrate_impl::SubstrateImpl;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use soma_agents::soma_cell::SomaCell;
use soma_core::error::{Result, SomaError};
use soma_core::field::{FieldAccessor, SUBSTANCE_0, SUBSTANCE_1};
use soma_core::types::*;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Configuration for colony simulation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColonyConfig {
    /// Cubic simulation bounds (default: [0, 250] on every axis).
    pub bounds: Bounds,
    /// Time step used for diffusion (default: 1.0).
    pub time_step: f64,
    /// Substances available to cells (default: Substance_0 and Substance_1).
    pub substances: Vec<SubstanceConfig>,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            time_step: 1.0,
            substances: vec![
                SubstanceConfig::new(SUBSTANCE_0),
                SubstanceConfig::new(SUBSTANCE_1),
            ],
        }
    }
}

impl ColonyConfig {
    pub fn validate(&self) -> Result<()> {
        let Bounds { min, max } = self.bounds;
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(SomaError::invalid_config(
                "bounds",
                format!("[{}, {}]", min, max),
                "min must be finite and strictly below max",
            ));
        }
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(SomaError::invalid_config(
                "time_step",
                self.time_step.to_string(),
                "must be positive",
            ));
        }
        for substance in &self.substances {
            substance.validate(&self.bounds, self.time_step)?;
        }
        Ok(())
    }
}

/// Cell count for one type label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    pub cell_type: CellType,
    pub count: usize,
}

/// Total concentration of one substance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstanceTotal {
    pub name: String,
    pub total: f64,
}

/// Statistics about the colony.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColonyStats {
    pub tick: Tick,
    pub cells: usize,
    pub type_counts: Vec<TypeCount>,
    pub substance_totals: Vec<SubstanceTotal>,
}

/// An immutable capture of every cell's position and type.
///
/// Taken between steps, so it never contains a half-updated population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColonySnapshot {
    pub tick: Tick,
    pub bounds: Bounds,
    pub cells: Vec<CellRecord>,
}

impl ColonySnapshot {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// The colony — owns the cells and the substrate and advances time.
pub struct Colony {
    substrate: SubstrateImpl,
    cells: Vec<SomaCell>,
    config: ColonyConfig,
}

impl Colony {
    /// Create a colony from a configuration and an initial population.
    ///
    /// Fails if the configuration is invalid, a cell has a non-positive
    /// diameter or lies outside the bounds, or a cell's behaviors need a
    /// substance the configuration does not define.
    pub fn new(config: ColonyConfig, cells: Vec<SomaCell>) -> Result<Self> {
        config.validate()?;

        let mut substrate = SubstrateImpl::new(config.bounds);
        for substance in &config.substances {
            substrate.define_substance(substance, config.time_step)?;
        }

        for (idx, cell) in cells.iter().enumerate() {
            let record = cell.cell();
            if !record.diameter.is_finite() || record.diameter <= 0.0 {
                return Err(SomaError::invalid_config(
                    format!("cells[{}].diameter", idx),
                    record.diameter.to_string(),
                    "must be positive",
                ));
            }
            if !record.position.is_finite() || !config.bounds.contains(&record.position) {
                return Err(SomaError::invalid_config(
                    format!("cells[{}].position", idx),
                    format!("{:?}", record.position.to_array()),
                    "must lie inside the simulation bounds",
                ));
            }
            for name in cell.required_substances() {
                if !substrate.has_field(name) {
                    return Err(SomaError::unknown_substance(name));
                }
            }
        }

        info!(
            cells = cells.len(),
            substances = config.substances.len(),
            "colony created"
        );

        Ok(Self {
            substrate,
            cells,
            config,
        })
    }

    pub fn config(&self) -> &ColonyConfig {
        &self.config
    }

    /// Run a single simulation step.
    pub fn step(&mut self) {
        let substrate = &self.substrate;
        let bounds = self.config.bounds;

        self.cells.par_iter_mut().for_each(|cell| {
            cell.tick(substrate);
            let clamped = bounds.clamp(cell.position());
            cell.cell_mut().set_position(clamped);
        });

        self.substrate.update_fields(self.config.time_step);
        self.substrate.advance_tick();
        debug!(tick = self.substrate.current_tick(), "step complete");
    }

    /// Run `steps` simulation steps.
    pub fn run(&mut self, steps: u64) {
        self.run_with(steps, |_| {});
    }

    /// Run `steps` simulation steps, calling `on_step` with the new tick
    /// after each one.
    pub fn run_with<F: FnMut(Tick)>(&mut self, steps: u64, mut on_step: F) {
        for _ in 0..steps {
            self.step();
            on_step(self.substrate.current_tick());
        }
        info!(tick = self.substrate.current_tick(), steps, "run complete");
    }

    pub fn current_tick(&self) -> Tick {
        self.substrate.current_tick()
    }

    pub fn stats(&self) -> ColonyStats {
        let mut by_type: BTreeMap<CellType, usize> = BTreeMap::new();
        for cell in &self.cells {
            *by_type.entry(cell.cell_type()).or_default() += 1;
        }

        ColonyStats {
            tick: self.substrate.current_tick(),
            cells: self.cells.len(),
            type_counts: by_type
                .into_iter()
                .map(|(cell_type, count)| TypeCount { cell_type, count })
                .collect(),
            substance_totals: self
                .substrate
                .substance_names()
                .into_iter()
                .filter_map(|name| {
                    let grid = self.substrate.grid(name)?;
                    Some(SubstanceTotal {
                        name: name.to_string(),
                        total: grid.total_concentration(),
                    })
                })
                .collect(),
        }
    }

    /// Capture every cell's (position, type), in population order.
    pub fn snapshot(&self) -> ColonySnapshot {
        ColonySnapshot {
            tick: self.substrate.current_tick(),
            bounds: self.config.bounds,
            cells: self.cells.iter().map(|c| c.cell().record()).collect(),
        }
    }

    pub fn substrate(&self) -> &SubstrateImpl {
        &self.substrate
    }

    pub fn cells(&self) -> &[SomaCell] {
        &self.cells
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}
