//! Gridlock Simulation Core
//!
//! Platform-agnostic logic for a two-part commuter simulation: an A*
//! shortest-path search over a small obstacle grid, and a
//! congestion-weighted stochastic route sampler. The two components share
//! configuration but no runtime state; rendering and printing are left to
//! platform-specific callers that consume the plain data this crate
//! returns.

pub mod congestion;
pub mod constants;
pub mod grid;
pub mod pathfind;
pub mod routes;

// Re-export commonly used types
pub use congestion::{CongestionLevel, CongestionResponse};
pub use grid::{GridConfig, GridError, OccupancyGrid, Point};
pub use pathfind::{Endpoint, PathError, shortest_path};
pub use routes::{RouteCatalog, RouteCfg, RouteSampler, SamplerConfig, SamplerError, UsageTally};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Any failure the simulation core can report.
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Sampler(#[from] SamplerError),
}

/// Complete simulation configuration. The grid scenario and the route
/// sampler are independent; they are composed here only so one document
/// can describe a whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub grid: GridConfig,
    #[serde(default = "RouteCatalog::default_config")]
    pub catalog: RouteCatalog,
    #[serde(default)]
    pub sampler: SamplerConfig,
}

impl SimulationConfig {
    /// Load a full configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or either
    /// component's validation fails.
    pub fn from_json(json_str: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json_str)
            .map_err(|e| SimError::Grid(GridError::Parse(e.to_string())))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate both component configurations.
    ///
    /// # Errors
    ///
    /// Returns the first violation found in either component.
    pub fn validate(&self) -> Result<(), SimError> {
        self.grid.validate()?;
        self.catalog.validate()?;
        self.sampler.validate()?;
        Ok(())
    }

    /// Embedded default scenario covering both components.
    #[must_use]
    pub fn default_config() -> Self {
        Self {
            grid: GridConfig::default_config(),
            catalog: RouteCatalog::default_config(),
            sampler: SamplerConfig::default(),
        }
    }
}

/// Entry point tying both components to one validated configuration.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
}

impl Simulation {
    /// Validate the configuration and wrap it for running.
    ///
    /// # Errors
    ///
    /// Returns the first configuration violation found.
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run the grid search for the configured scenario.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Path` when an endpoint is invalid or the goal
    /// is unreachable.
    pub fn shortest_path(&self) -> Result<Vec<Point>, SimError> {
        let grid = self.config.grid.build_grid()?;
        let path = shortest_path(&grid, self.config.grid.start, self.config.grid.goal)?;
        Ok(path)
    }

    /// Run the route sampler with a fresh RNG stream seeded from `seed`.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Sampler` when the catalog or sampler
    /// configuration is degenerate.
    pub fn sample_routes(&self, seed: u64) -> Result<UsageTally, SimError> {
        let mut sampler = RouteSampler::from_seed(seed);
        let tally = sampler.run(&self.config.catalog, &self.config.sampler)?;
        Ok(tally)
    }
}
