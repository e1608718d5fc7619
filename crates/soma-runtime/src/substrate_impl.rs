//! Concrete field accessor backed by diffusion grids.
//!
//! In-memory substrate with:
//! - One `DiffusionGrid` per defined substance, looked up by name
//! - Atomic deposits, so the cell pass can share `&SubstrateImpl`
//! - A step counter advanced by the colony

use crate::diffusion::{DiffusionGrid, SubstanceConfig};
use soma_core::error::{ConfigError, Result, SomaError};
use soma_core::field::FieldAccessor;
use soma_core::types::*;

/// The extracellular space: every substance cells secrete into.
pub struct SubstrateImpl {
    bounds: Bounds,
    grids: Vec<DiffusionGrid>,
    tick: Tick,
}

impl SubstrateImpl {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            grids: Vec::new(),
            tick: 0,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Define a new substance. Names must be unique.
    pub fn define_substance(&mut self, config: &SubstanceConfig, time_step: f64) -> Result<()> {
        if self.grid(&config.name).is_some() {
            return Err(ConfigError::DuplicateSubstance(config.name.clone()).into());
        }
        config.validate(&self.bounds, time_step)?;
        self.grids.push(DiffusionGrid::new(config, self.bounds));
        Ok(())
    }

    pub fn grid(&self, name: &str) -> Option<&DiffusionGrid> {
        self.grids.iter().find(|g| g.name() == name)
    }

    /// Like `grid`, but an undefined name is a configuration error.
    pub fn require_grid(&self, name: &str) -> Result<&DiffusionGrid> {
        self.grid(name).ok_or_else(|| SomaError::unknown_substance(name))
    }

    fn expect_grid(&self, name: &str) -> &DiffusionGrid {
        match self.grid(name) {
            Some(g) => g,
            None => panic!("substance `{}` was never defined", name),
        }
    }

    pub fn substance_names(&self) -> Vec<&str> {
        self.grids.iter().map(|g| g.name()).collect()
    }

    /// Diffuse every substance by `dt`, then refresh its gradient.
    pub fn update_fields(&mut self, dt: f64) {
        for grid in &mut self.grids {
            grid.diffuse(dt);
            grid.calculate_gradient();
        }
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }
}

impl FieldAccessor for SubstrateImpl {
    fn gradient_at(&self, name: &str, position: &Position) -> Vector3 {
        self.expect_grid(name).gradient_at(position)
    }

    fn deposit_at(&self, name: &str, position: &Position, amount: f64) {
        debug_assert!(amount >= 0.0, "negative deposit into {}", name);
        self.expect_grid(name).increase_concentration_by(position, amount);
    }

    fn concentration_at(&self, name: &str, position: &Position) -> f64 {
        self.expect_grid(name).concentration_at(position)
    }

    fn has_field(&self, name: &str) -> bool {
        self.grid(name).is_some()
    }
}
