//! Configuration types for the simulation.

use crate::{Error, Result, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Automaton grid dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Width of the cell grid
    pub width: usize,
    /// Height of the cell grid
    pub height: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        // 200 cells rendered at 0.95 scale
        Self {
            width: 210,
            height: 210,
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "grid dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// How many of each named pattern to stamp onto the initial grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedConfig {
    pub num_gliders: u32,
    pub num_guns: u32,
    pub num_small_gliders: u32,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            num_gliders: 30,
            num_guns: 15,
            num_small_gliders: 50,
        }
    }
}

impl SeedConfig {
    pub fn new(num_gliders: u32, num_guns: u32, num_small_gliders: u32) -> Self {
        Self {
            num_gliders,
            num_guns,
            num_small_gliders,
        }
    }

    /// Build from raw signed counts, rejecting negatives
    pub fn from_signed(num_gliders: i64, num_guns: i64, num_small_gliders: i64) -> Result<Self> {
        Ok(Self {
            num_gliders: non_negative("glider count", num_gliders)?,
            num_guns: non_negative("gun count", num_guns)?,
            num_small_gliders: non_negative("small glider count", num_small_gliders)?,
        })
    }

    pub fn total(&self) -> u64 {
        self.num_gliders as u64 + self.num_guns as u64 + self.num_small_gliders as u64
    }
}

fn non_negative(what: &str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        Error::InvalidConfig(format!("{what} must be a non-negative 32-bit count, got {value}"))
    })
}

/// Starting state of the single entity every population begins with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeedEntity {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl Default for SeedEntity {
    fn default() -> Self {
        Self {
            position: Vec2::new(100.0, 100.0),
            velocity: Vec2::new(5.0, 5.0),
        }
    }
}

/// Bouncing-entity population parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Area entities bounce inside
    pub boundary: Size,
    /// Collision footprint of every entity
    pub footprint: Size,
    /// Hard cap on the number of entities
    pub max_population: usize,
    pub seed_entity: SeedEntity,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            boundary: Size::new(800, 600),
            footprint: Size::new(120, 30),
            max_population: 50,
            seed_entity: SeedEntity::default(),
        }
    }
}

impl PopulationConfig {
    /// Replace the cap with a raw signed value, rejecting zero and negatives
    pub fn with_max_population(mut self, max_population: i64) -> Result<Self> {
        if max_population <= 0 {
            return Err(Error::InvalidConfig(format!(
                "maximum population must be greater than 0, got {max_population}"
            )));
        }
        self.max_population = usize::try_from(max_population).map_err(|_| {
            Error::InvalidConfig(format!("maximum population {max_population} is too large"))
        })?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_population == 0 {
            return Err(Error::InvalidConfig(
                "maximum population must be greater than 0".to_string(),
            ));
        }
        if !self.boundary.strictly_contains(&self.footprint) {
            return Err(Error::InvalidConfig(format!(
                "footprint {} must be smaller than boundary {}",
                self.footprint, self.boundary
            )));
        }
        Ok(())
    }
}

/// Top-level simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaverConfig {
    /// Random seed for reproducibility
    pub rng_seed: u64,
    pub grid: GridConfig,
    pub seed: SeedConfig,
    pub population: PopulationConfig,
    /// Emit a population snapshot every N ticks (0 disables)
    pub log_every: u64,
}

impl Default for SaverConfig {
    fn default() -> Self {
        Self {
            rng_seed: 0,
            grid: GridConfig::default(),
            seed: SeedConfig::default(),
            population: PopulationConfig::default(),
            log_every: 600,
        }
    }
}

impl SaverConfig {
    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        self.population.validate()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SaverConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let grid = GridConfig::default();
        assert_eq!(grid.width, 210);
        assert_eq!(grid.height, 210);

        let population = PopulationConfig::default();
        assert_eq!(population.boundary, Size::new(800, 600));
        assert_eq!(population.footprint, Size::new(120, 30));
        assert_eq!(population.seed_entity.position, Vec2::new(100.0, 100.0));

        assert!(SaverConfig::default().validate().is_ok());
    }

    #[test]
    fn test_seed_config_rejects_negative_counts() {
        assert!(SeedConfig::from_signed(3, 0, 7).is_ok());
        assert!(matches!(
            SeedConfig::from_signed(-1, 0, 0),
            Err(Error::InvalidConfig(_))
        ));
        assert!(SeedConfig::from_signed(0, -5, 0).is_err());
        assert!(SeedConfig::from_signed(0, 0, -2).is_err());
    }

    #[test]
    fn test_population_cap_validation() {
        let config = PopulationConfig::default();
        assert!(config.clone().with_max_population(0).is_err());
        assert!(config.clone().with_max_population(-3).is_err());

        let config = config.with_max_population(12).unwrap();
        assert_eq!(config.max_population, 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_footprint_must_fit_boundary() {
        let config = PopulationConfig {
            boundary: Size::new(100, 100),
            footprint: Size::new(120, 30),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_sized_grid_rejected() {
        let grid = GridConfig {
            width: 0,
            height: 10,
        };
        assert!(grid.validate().is_err());
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = SaverConfig {
            rng_seed: 7,
            seed: SeedConfig::new(1, 2, 3),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let loaded = SaverConfig::from_json_str(&json).unwrap();
        assert_eq!(loaded.rng_seed, 7);
        assert_eq!(loaded.seed, SeedConfig::new(1, 2, 3));
        assert_eq!(loaded.population.max_population, 50);
    }

    #[test]
    fn test_invalid_json_config_rejected() {
        let mut config = SaverConfig::default();
        config.population.max_population = 0;
        let json = serde_json::to_string(&config).unwrap();
        assert!(matches!(
            SaverConfig::from_json_str(&json),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            SaverConfig::from_json_str("{ not json"),
            Err(Error::Serialization(_))
        ));
    }
}
