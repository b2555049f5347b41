//! Route catalog and congestion-weighted random sampling
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use thiserror::Error;

use crate::congestion::{CongestionLevel, CongestionResponse};
use crate::constants::{
    DEFAULT_CONGESTION_CADENCE, DEFAULT_CONGESTION_STEP, DEFAULT_ITERATIONS, FAST_BASE_WEIGHT,
    FAST_CEILING, FAST_FLOOR, FAST_SLOPE, MEDIUM_BASE_WEIGHT, MEDIUM_CEILING, MEDIUM_FLOOR,
    MEDIUM_SLOPE, ROUTE_FAST, ROUTE_MEDIUM, ROUTE_SLOW, SLOW_BASE_WEIGHT, SLOW_CEILING,
    SLOW_FLOOR, SLOW_SLOPE,
};

/// Final per-route usage counts for one run, keyed by route name.
pub type UsageTally = HashMap<String, u64>;

/// Errors raised by sampler configuration or a sampling run.
#[derive(Debug, Error, PartialEq)]
pub enum SamplerError {
    #[error("route catalog has no routes")]
    EmptyCatalog,
    #[error("route {name}: base weight {weight:.3} outside [0, 1]")]
    BaseWeightRange { name: String, weight: f64 },
    #[error("route {name}: clamp floor {floor:.3} exceeds ceiling {ceiling:.3}")]
    ClampBounds {
        name: String,
        floor: f64,
        ceiling: f64,
    },
    #[error("congestion cadence must be at least 1")]
    ZeroCadence,
    #[error("congestion step must be non-negative (got {step:.3})")]
    NegativeStep { step: f64 },
    #[error("adjusted weights sum to {total:.3} at congestion {congestion:.3}; nothing to draw")]
    NonPositiveWeights { total: f64, congestion: f64 },
    #[error("catalog parse error: {0}")]
    Parse(String),
}

/// One named route with its base weight and congestion response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCfg {
    pub name: String,
    pub base_weight: f64,
    #[serde(default = "CongestionResponse::flat")]
    pub response: CongestionResponse,
}

impl RouteCfg {
    /// Relative selection weight at the given congestion level.
    #[must_use]
    pub fn adjusted_weight(&self, congestion: f64) -> f64 {
        self.response.adjusted(self.base_weight, congestion)
    }
}

/// Ordered list of candidate routes. Draws iterate in catalog order, so
/// the order fixes which route absorbs rounding slop at the tail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RouteCatalog {
    pub routes: Vec<RouteCfg>,
}

impl RouteCatalog {
    /// Load a catalog from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or validation fails.
    pub fn from_json(json_str: &str) -> Result<Self, SamplerError> {
        let catalog: Self =
            serde_json::from_str(json_str).map_err(|e| SamplerError::Parse(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check catalog invariants: at least one route, base weights in
    /// [0, 1], and coherent clamp bounds.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant as a `SamplerError`.
    pub fn validate(&self) -> Result<(), SamplerError> {
        if self.routes.is_empty() {
            return Err(SamplerError::EmptyCatalog);
        }
        for route in &self.routes {
            if !route.base_weight.is_finite() || !(0.0..=1.0).contains(&route.base_weight) {
                return Err(SamplerError::BaseWeightRange {
                    name: route.name.clone(),
                    weight: route.base_weight,
                });
            }
            if route.response.floor > route.response.ceiling {
                return Err(SamplerError::ClampBounds {
                    name: route.name.clone(),
                    floor: route.response.floor,
                    ceiling: route.response.ceiling,
                });
            }
        }
        Ok(())
    }

    /// Embedded default catalog: the fast route sheds weight as
    /// congestion grows while the two slower routes absorb it.
    #[must_use]
    pub fn default_config() -> Self {
        Self {
            routes: vec![
                RouteCfg {
                    name: ROUTE_FAST.to_string(),
                    base_weight: FAST_BASE_WEIGHT,
                    response: CongestionResponse {
                        slope: FAST_SLOPE,
                        floor: FAST_FLOOR,
                        ceiling: FAST_CEILING,
                    },
                },
                RouteCfg {
                    name: ROUTE_MEDIUM.to_string(),
                    base_weight: MEDIUM_BASE_WEIGHT,
                    response: CongestionResponse {
                        slope: MEDIUM_SLOPE,
                        floor: MEDIUM_FLOOR,
                        ceiling: MEDIUM_CEILING,
                    },
                },
                RouteCfg {
                    name: ROUTE_SLOW.to_string(),
                    base_weight: SLOW_BASE_WEIGHT,
                    response: CongestionResponse {
                        slope: SLOW_SLOPE,
                        floor: SLOW_FLOOR,
                        ceiling: SLOW_CEILING,
                    },
                },
            ],
        }
    }
}

/// Run parameters for the sampler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    #[serde(default = "SamplerConfig::default_iterations")]
    pub iterations: u64,
    #[serde(default = "SamplerConfig::default_congestion_step")]
    pub congestion_step: f64,
    #[serde(default = "SamplerConfig::default_congestion_cadence")]
    pub congestion_cadence: u64,
}

impl SamplerConfig {
    const fn default_iterations() -> u64 {
        DEFAULT_ITERATIONS
    }

    const fn default_congestion_step() -> f64 {
        DEFAULT_CONGESTION_STEP
    }

    const fn default_congestion_cadence() -> u64 {
        DEFAULT_CONGESTION_CADENCE
    }

    /// # Errors
    ///
    /// Returns `SamplerError` when the cadence is zero or the congestion
    /// step is negative or non-finite.
    pub fn validate(&self) -> Result<(), SamplerError> {
        if self.congestion_cadence == 0 {
            return Err(SamplerError::ZeroCadence);
        }
        if !self.congestion_step.is_finite() || self.congestion_step < 0.0 {
            return Err(SamplerError::NegativeStep {
                step: self.congestion_step,
            });
        }
        Ok(())
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            iterations: Self::default_iterations(),
            congestion_step: Self::default_congestion_step(),
            congestion_cadence: Self::default_congestion_cadence(),
        }
    }
}

/// Congestion-weighted route sampler owning its seedable RNG stream.
#[derive(Debug, Clone)]
pub struct RouteSampler {
    rng: ChaCha20Rng,
}

impl RouteSampler {
    /// Construct a sampler whose draw sequence is reproducible from `seed`.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Simulate `iterations` independent commuters. Every iteration whose
    /// 0-based index is a multiple of the cadence first raises congestion
    /// by the configured step, so the very first draw already sees one
    /// step of congestion unless the step is zero.
    ///
    /// The returned tally holds every catalog route, including routes
    /// that were never chosen, and its counts sum to `iterations`.
    ///
    /// # Errors
    ///
    /// Returns `SamplerError` when the catalog or config is invalid, or
    /// when the adjusted weights at some step leave nothing to draw.
    pub fn run(
        &mut self,
        catalog: &RouteCatalog,
        cfg: &SamplerConfig,
    ) -> Result<UsageTally, SamplerError> {
        catalog.validate()?;
        cfg.validate()?;

        let mut congestion = CongestionLevel::default();
        let mut counts = vec![0_u64; catalog.routes.len()];
        for iteration in 0..cfg.iterations {
            if iteration % cfg.congestion_cadence == 0 {
                congestion.advance(cfg.congestion_step);
            }
            let chosen = draw_route_index(catalog, congestion.level(), &mut self.rng)?;
            counts[chosen] += 1;
        }

        Ok(catalog
            .routes
            .iter()
            .zip(counts)
            .map(|(route, count)| (route.name.clone(), count))
            .collect())
    }
}

/// One weighted draw over the catalog at the given congestion level.
///
/// Rolls in `[0, total)` and walks the catalog subtracting weights, the
/// same scheme the selection probability contract describes: each route
/// wins with probability weight / total, and zero-weight routes are
/// skipped outright. Rounding slop at the tail falls to the last route
/// with positive weight.
fn draw_route_index<R: Rng>(
    catalog: &RouteCatalog,
    congestion: f64,
    rng: &mut R,
) -> Result<usize, SamplerError> {
    let weights: SmallVec<[f64; 4]> = catalog
        .routes
        .iter()
        .map(|route| route.adjusted_weight(congestion))
        .collect();
    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return Err(SamplerError::NonPositiveWeights { total, congestion });
    }

    let mut roll = rng.gen_range(0.0..total);
    let mut winner = None;
    for (idx, &weight) in weights.iter().enumerate() {
        if weight <= 0.0 {
            continue;
        }
        winner = Some(idx);
        if roll < weight {
            break;
        }
        roll -= weight;
    }
    winner.ok_or(SamplerError::NonPositiveWeights { total, congestion })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_catalog(weights: &[(&str, f64)]) -> RouteCatalog {
        RouteCatalog {
            routes: weights
                .iter()
                .map(|&(name, base_weight)| RouteCfg {
                    name: name.to_string(),
                    base_weight,
                    response: CongestionResponse::flat(),
                })
                .collect(),
        }
    }

    #[test]
    fn empty_catalog_fails_fast() {
        let mut sampler = RouteSampler::from_seed(1);
        let err = sampler
            .run(&RouteCatalog::default(), &SamplerConfig::default())
            .unwrap_err();
        assert_eq!(err, SamplerError::EmptyCatalog);
    }

    #[test]
    fn config_validation_rejects_degenerate_runs() {
        let catalog = RouteCatalog::default_config();
        let mut sampler = RouteSampler::from_seed(1);

        let zero_cadence = SamplerConfig {
            congestion_cadence: 0,
            ..SamplerConfig::default()
        };
        assert_eq!(
            sampler.run(&catalog, &zero_cadence),
            Err(SamplerError::ZeroCadence)
        );

        let negative_step = SamplerConfig {
            congestion_step: -0.5,
            ..SamplerConfig::default()
        };
        assert_eq!(
            sampler.run(&catalog, &negative_step),
            Err(SamplerError::NegativeStep { step: -0.5 })
        );
    }

    #[test]
    fn catalog_validation_rejects_bad_weights() {
        let catalog = fixed_catalog(&[("Detour", 1.5)]);
        assert_eq!(
            catalog.validate(),
            Err(SamplerError::BaseWeightRange {
                name: "Detour".to_string(),
                weight: 1.5,
            })
        );

        let mut inverted = fixed_catalog(&[("Detour", 0.5)]);
        inverted.routes[0].response = CongestionResponse {
            slope: 0.0,
            floor: 0.8,
            ceiling: 0.2,
        };
        assert!(matches!(
            inverted.validate(),
            Err(SamplerError::ClampBounds { .. })
        ));
    }

    #[test]
    fn tally_counts_sum_to_iteration_count() {
        let catalog = RouteCatalog::default_config();
        let cfg = SamplerConfig {
            iterations: 5_000,
            ..SamplerConfig::default()
        };
        let tally = RouteSampler::from_seed(42).run(&catalog, &cfg).unwrap();
        assert_eq!(tally.len(), catalog.routes.len());
        assert_eq!(tally.values().sum::<u64>(), 5_000);
    }

    #[test]
    fn zero_weight_routes_are_never_chosen() {
        let catalog = fixed_catalog(&[("Open", 0.7), ("Closed", 0.0), ("Backup", 0.3)]);
        let cfg = SamplerConfig {
            iterations: 2_000,
            congestion_step: 0.0,
            congestion_cadence: 1,
        };
        let tally = RouteSampler::from_seed(7).run(&catalog, &cfg).unwrap();
        assert_eq!(tally["Closed"], 0);
        assert_eq!(tally["Open"] + tally["Backup"], 2_000);
    }

    #[test]
    fn all_zero_weights_surface_as_an_error() {
        let catalog = fixed_catalog(&[("A", 0.0), ("B", 0.0)]);
        let cfg = SamplerConfig {
            iterations: 1,
            congestion_step: 0.0,
            congestion_cadence: 1,
        };
        let err = RouteSampler::from_seed(3).run(&catalog, &cfg).unwrap_err();
        assert!(matches!(err, SamplerError::NonPositiveWeights { .. }));
    }

    #[test]
    fn identical_seeds_reproduce_the_tally() {
        let catalog = RouteCatalog::default_config();
        let cfg = SamplerConfig {
            iterations: 1_000,
            ..SamplerConfig::default()
        };
        let first = RouteSampler::from_seed(99).run(&catalog, &cfg).unwrap();
        let second = RouteSampler::from_seed(99).run(&catalog, &cfg).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn catalog_roundtrips_through_json() {
        let catalog = RouteCatalog::default_config();
        let json = serde_json::to_string(&catalog).unwrap();
        assert_eq!(RouteCatalog::from_json(&json).unwrap(), catalog);
    }

    #[test]
    fn response_defaults_to_flat_when_omitted() {
        let catalog =
            RouteCatalog::from_json(r#"{"routes":[{"name":"Only","base_weight":0.4}]}"#).unwrap();
        assert_eq!(catalog.routes[0].response, CongestionResponse::flat());
    }
}
