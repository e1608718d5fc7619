//! Diffusion grid — one secreted substance over the simulation bounds.
//!
//! The bounds are split into `resolution³` cubic boxes. Each box holds one
//! concentration value and one gradient vector.
//!
//! - Concentrations live in `AtomicU64` cells (f64 bit patterns), so cells
//!   stepping in parallel can deposit through a shared reference.
//! - Gradients are refreshed once per step by `calculate_gradient` and are
//!   only read during the cell pass.
//!
//! Each step the grid integrates `∂c/∂t = D∇²c − μc` with one explicit Euler
//! step and closed (zero-flux) boundaries.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use soma_core::error::{Result, SomaError};
use soma_core::types::*;
use std::sync::atomic::{AtomicU64, Ordering};

/// Definition of one substance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstanceConfig {
    pub name: String,
    /// Diffusion coefficient D (default: 0.5).
    #[serde(default = "default_diffusion_coefficient")]
    pub diffusion_coefficient: f64,
    /// Decay constant μ per unit time (default: 0.1).
    #[serde(default = "default_decay_constant")]
    pub decay_constant: f64,
    /// Boxes per axis (default: 25).
    #[serde(default = "default_resolution")]
    pub resolution: usize,
}

fn default_diffusion_coefficient() -> f64 {
    0.5
}
fn default_decay_constant() -> f64 {
    0.1
}
fn default_resolution() -> usize {
    25
}

impl SubstanceConfig {
    /// A substance with the reference diffusion, decay and resolution.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            diffusion_coefficient: default_diffusion_coefficient(),
            decay_constant: default_decay_constant(),
            resolution: default_resolution(),
        }
    }

    pub fn with_diffusion_coefficient(mut self, d: f64) -> Self {
        self.diffusion_coefficient = d;
        self
    }

    pub fn with_decay_constant(mut self, mu: f64) -> Self {
        self.decay_constant = mu;
        self
    }

    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    /// Check the definition against the bounds and time step it will run with.
    pub fn validate(&self, bounds: &Bounds, time_step: f64) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SomaError::invalid_config("substance.name", "\"\"", "must not be empty"));
        }
        if self.resolution == 0 {
            return Err(SomaError::invalid_config(
                format!("{}.resolution", self.name),
                "0",
                "must be at least 1",
            ));
        }
        if !self.diffusion_coefficient.is_finite() || self.diffusion_coefficient < 0.0 {
            return Err(SomaError::invalid_config(
                format!("{}.diffusion_coefficient", self.name),
                self.diffusion_coefficient.to_string(),
                "must be a finite, non-negative number",
            ));
        }
        if !self.decay_constant.is_finite() || self.decay_constant < 0.0 {
            return Err(SomaError::invalid_config(
                format!("{}.decay_constant", self.name),
                self.decay_constant.to_string(),
                "must be a finite, non-negative number",
            ));
        }

        // Explicit Euler is stable while dt * (6D/h² + μ) <= 1.
        let h = bounds.extent() / self.resolution as f64;
        let rate = time_step * (6.0 * self.diffusion_coefficient / (h * h) + self.decay_constant);
        if rate > 1.0 {
            return Err(SomaError::invalid_config(
                format!("{}.resolution", self.name),
                self.resolution.to_string(),
                format!("explicit diffusion step is unstable (rate {:.3} > 1)", rate),
            ));
        }
        Ok(())
    }
}

/// Concentration and gradient storage for one substance.
pub struct DiffusionGrid {
    name: String,
    bounds: Bounds,
    resolution: usize,
    box_length: f64,
    diffusion_coefficient: f64,
    decay_constant: f64,
    concentrations: Vec<AtomicU64>,
    gradients: Vec<Vector3>,
}

impl DiffusionGrid {
    /// Allocate a zeroed grid. Call `SubstanceConfig::validate` first.
    pub fn new(config: &SubstanceConfig, bounds: Bounds) -> Self {
        let resolution = config.resolution.max(1);
        let total = resolution * resolution * resolution;
        Self {
            name: config.name.clone(),
            bounds,
            resolution,
            box_length: bounds.extent() / resolution as f64,
            diffusion_coefficient: config.diffusion_coefficient,
            decay_constant: config.decay_constant,
            concentrations: (0..total).map(|_| AtomicU64::new(0.0f64.to_bits())).collect(),
            gradients: vec![Vector3::ZERO; total],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn box_length(&self) -> f64 {
        self.box_length
    }

    #[inline]
    fn index_of(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.resolution + y) * self.resolution + x
    }

    /// Box coordinate along one axis. Positions outside the bounds map to
    /// the nearest edge box.
    #[inline]
    fn axis_box(&self, coord: f64) -> usize {
        let b = ((coord - self.bounds.min) / self.box_length).floor();
        if b <= 0.0 {
            0
        } else {
            (b as usize).min(self.resolution - 1)
        }
    }

    fn box_index(&self, position: &Position) -> usize {
        self.index_of(
            self.axis_box(position.x),
            self.axis_box(position.y),
            self.axis_box(position.z),
        )
    }

    #[inline]
    fn load(&self, idx: usize) -> f64 {
        f64::from_bits(self.concentrations[idx].load(Ordering::Acquire))
    }

    /// Atomically add `amount` to the box containing `position`.
    pub fn increase_concentration_by(&self, position: &Position, amount: f64) {
        let idx = self.box_index(position);
        // The closure always returns Some, so the update cannot fail.
        let _ = self.concentrations[idx].fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
            Some((f64::from_bits(bits) + amount).to_bits())
        });
    }

    pub fn concentration_at(&self, position: &Position) -> f64 {
        self.load(self.box_index(position))
    }

    /// Gradient of the box containing `position`, as of the last
    /// `calculate_gradient`.
    pub fn gradient_at(&self, position: &Position) -> Vector3 {
        self.gradients[self.box_index(position)]
    }

    /// Sum of all box concentrations.
    pub fn total_concentration(&self) -> f64 {
        (0..self.concentrations.len()).map(|i| self.load(i)).sum()
    }

    /// Copy of every box concentration, x fastest.
    pub fn concentrations(&self) -> Vec<f64> {
        (0..self.concentrations.len()).map(|i| self.load(i)).collect()
    }

    /// One explicit Euler step of diffusion and decay.
    pub fn diffuse(&mut self, dt: f64) {
        let r = self.resolution;
        let h2 = self.box_length * self.box_length;
        let d = self.diffusion_coefficient;
        let mu = self.decay_constant;
        let current = self.concentrations();

        let next: Vec<f64> = (0..current.len())
            .into_par_iter()
            .map(|idx| {
                let x = idx % r;
                let y = (idx / r) % r;
                let z = idx / (r * r);
                let c = current[idx];

                // Missing neighbors mirror the centre box (zero flux).
                let at = |xx: usize, yy: usize, zz: usize| current[(zz * r + yy) * r + xx];
                let west = if x > 0 { at(x - 1, y, z) } else { c };
                let east = if x + 1 < r { at(x + 1, y, z) } else { c };
                let south = if y > 0 { at(x, y - 1, z) } else { c };
                let north = if y + 1 < r { at(x, y + 1, z) } else { c };
                let bottom = if z > 0 { at(x, y, z - 1) } else { c };
                let top = if z + 1 < r { at(x, y, z + 1) } else { c };

                let laplacian = (west + east + south + north + bottom + top - 6.0 * c) / h2;
                (c + dt * (d * laplacian - mu * c)).max(0.0)
            })
            .collect();

        self.concentrations
            .par_iter_mut()
            .zip(next.par_iter())
            .for_each(|(cell, value)| *cell.get_mut() = value.to_bits());
    }

    /// Refresh the gradient of every box by finite differences.
    ///
    /// Interior boxes use central differences, edge boxes one-sided ones.
    /// A single-box axis has zero gradient.
    pub fn calculate_gradient(&mut self) {
        let r = self.resolution;
        let h = self.box_length;
        let current = self.concentrations();

        let diff = |lo_idx: usize, hi_idx: usize, steps: usize| -> f64 {
            if steps == 0 {
                0.0
            } else {
                (current[hi_idx] - current[lo_idx]) / (steps as f64 * h)
            }
        };

        self.gradients = (0..current.len())
            .into_par_iter()
            .map(|idx| {
                let x = idx % r;
                let y = (idx / r) % r;
                let z = idx / (r * r);
                let at = |xx: usize, yy: usize, zz: usize| (zz * r + yy) * r + xx;

                let (x_lo, x_hi) = (x.saturating_sub(1), (x + 1).min(r - 1));
                let (y_lo, y_hi) = (y.saturating_sub(1), (y + 1).min(r - 1));
                let (z_lo, z_hi) = (z.saturating_sub(1), (z + 1).min(r - 1));

                Vector3::new(
                    diff(at(x_lo, y, z), at(x_hi, y, z), x_hi - x_lo),
                    diff(at(x, y_lo, z), at(x, y_hi, z), y_hi - y_lo),
                    diff(at(x, y, z_lo), at(x, y, z_hi), z_hi - z_lo),
                )
            })
            .collect();
    }
}
