//! Centralized tuning constants for the gridlock simulation core.
//!
//! These values define the deterministic math for route-choice weighting
//! and grid search. Keeping them together ensures that simulation balance
//! can only be adjusted via code changes reviewed in version control,
//! rather than through external JSON assets.

// Route catalog defaults ---------------------------------------------------
pub(crate) const ROUTE_FAST: &str = "Fast";
pub(crate) const ROUTE_MEDIUM: &str = "Medium";
pub(crate) const ROUTE_SLOW: &str = "Slow";

pub(crate) const FAST_BASE_WEIGHT: f64 = 0.6;
pub(crate) const FAST_SLOPE: f64 = -1.0;
pub(crate) const FAST_FLOOR: f64 = 0.2;
pub(crate) const FAST_CEILING: f64 = 0.6;

pub(crate) const MEDIUM_BASE_WEIGHT: f64 = 0.3;
pub(crate) const MEDIUM_SLOPE: f64 = 0.5;
pub(crate) const MEDIUM_FLOOR: f64 = 0.3;
pub(crate) const MEDIUM_CEILING: f64 = 0.5;

pub(crate) const SLOW_BASE_WEIGHT: f64 = 0.1;
pub(crate) const SLOW_SLOPE: f64 = 0.5;
pub(crate) const SLOW_FLOOR: f64 = 0.1;
pub(crate) const SLOW_CEILING: f64 = 0.3;

// Sampler defaults ---------------------------------------------------------
pub(crate) const DEFAULT_ITERATIONS: u64 = 10_000;
pub(crate) const DEFAULT_CONGESTION_STEP: f64 = 0.05;
pub(crate) const DEFAULT_CONGESTION_CADENCE: u64 = 100;

// Grid search --------------------------------------------------------------
/// Fixed neighbor expansion order: up, down, left, right. Changing this
/// order changes which of several equal-length paths the search prefers.
pub(crate) const NEIGHBOR_OFFSETS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
