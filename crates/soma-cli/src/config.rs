//! Configuration management for Soma CLI.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use soma::prelude::*;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "soma.toml";

/// Soma project configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub cells: CellsConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default = "default_substances")]
    pub substances: Vec<SubstanceConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_steps")]
    pub steps: u64,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_min_bound")]
    pub min_bound: f64,
    #[serde(default = "default_max_bound")]
    pub max_bound: f64,
    #[serde(default = "default_time_step")]
    pub time_step: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellsConfig {
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default = "default_diameter")]
    pub diameter: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_radius")]
    pub radius: f64,
    /// Expected subvolume population; a quarter of the cells when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<usize>,
}

// Default value functions
fn default_steps() -> u64 {
    REFERENCE_STEPS
}
fn default_min_bound() -> f64 {
    0.0
}
fn default_max_bound() -> f64 {
    250.0
}
fn default_time_step() -> f64 {
    1.0
}
fn default_count() -> usize {
    REFERENCE_CELL_COUNT
}
fn default_diameter() -> f64 {
    REFERENCE_DIAMETER
}
fn default_radius() -> f64 {
    5.0
}
fn default_substances() -> Vec<SubstanceConfig> {
    ColonyConfig::default().substances
}

impl Default for Config {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            cells: CellsConfig::default(),
            validation: ValidationConfig::default(),
            substances: default_substances(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            seed: 0,
            min_bound: default_min_bound(),
            max_bound: default_max_bound(),
            time_step: default_time_step(),
        }
    }
}

impl Default for CellsConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
            diameter: default_diameter(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            target: None,
        }
    }
}

impl Config {
    /// Load config from soma.toml in the current or parent directories.
    pub fn load() -> Result<Self> {
        match find_config_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = Self::to_toml(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Generate default config as TOML string.
    pub fn default_toml() -> Result<String> {
        Self::to_toml(&Config::default())
    }

    fn to_toml(config: &Config) -> Result<String> {
        toml::to_string_pretty(config).context("Failed to serialize config")
    }

    /// Library configuration for building the colony.
    pub fn colony_config(&self) -> ColonyConfig {
        ColonyConfig {
            bounds: Bounds::new(self.simulation.min_bound, self.simulation.max_bound),
            time_step: self.simulation.time_step,
            substances: self.substances.clone(),
        }
    }

    /// Cluster criterion for a population of `cells`.
    pub fn criterion(&self, cells: usize) -> ClusterCriterion {
        ClusterCriterion::new(
            self.validation.radius,
            self.validation.target.unwrap_or(cells / 4),
        )
    }
}

/// Find soma.toml in current or parent directories.
fn find_config_file() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_reference_scenario() {
        let config = Config::default();
        assert_eq!(config.simulation.steps, 3001);
        assert_eq!(config.cells.count, 20_000);
        assert_eq!(config.colony_config(), ColonyConfig::default());

        let criterion = config.criterion(config.cells.count);
        assert_eq!(criterion.radius, 5.0);
        assert_eq!(criterion.target, 5000);
    }

    #[test]
    fn default_toml_parses_back() {
        let text = Config::default_toml().unwrap();
        assert!(text.contains("[simulation]"));
        assert!(text.contains("[[substances]]"));
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [cells]
            count = 400

            [validation]
            target = 90
            "#,
        )
        .unwrap();
        assert_eq!(config.cells.count, 400);
        assert_eq!(config.cells.diameter, 10.0);
        assert_eq!(config.simulation, SimulationConfig::default());
        assert_eq!(config.substances.len(), 2);
        assert_eq!(config.criterion(400).target, 90);
    }

    #[test]
    fn substances_can_be_overridden() {
        let config: Config = toml::from_str(
            r#"
            [[substances]]
            name = "Substance_0"
            diffusion_coefficient = 0.2

            [[substances]]
            name = "Substance_1"
            decay_constant = 0.0
            resolution = 10
            "#,
        )
        .unwrap();
        let colony = config.colony_config();
        assert_eq!(colony.substances[0].diffusion_coefficient, 0.2);
        assert_eq!(colony.substances[0].decay_constant, 0.1);
        assert_eq!(colony.substances[1].resolution, 10);
    }

    #[test]
    fn save_then_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut config = Config::default();
        config.simulation.seed = 17;
        config.validation.target = Some(123);
        config.save(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }
}
