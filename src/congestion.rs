//! Congestion level tracking and clamped-linear weight response
use serde::{Deserialize, Serialize};

/// Accumulated congestion for one simulation run.
///
/// Starts at zero and only ever moves up; the sampler advances it by a
/// fixed step at a fixed iteration cadence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct CongestionLevel(f64);

impl CongestionLevel {
    #[must_use]
    pub const fn level(self) -> f64 {
        self.0
    }

    /// Raise the level by `step`. Callers validate that the step is
    /// non-negative, which keeps the level monotone.
    pub fn advance(&mut self, step: f64) {
        self.0 += step;
    }
}

/// How a route's selection weight responds to congestion.
///
/// The adjusted weight at congestion `c` is
/// `clamp(base + slope * c, floor, ceiling)`. Routes that commuters
/// abandon under load carry a negative slope; overflow routes carry a
/// positive one. Adjusted weights are consumed as raw relative weights
/// and are never renormalized, so their sum may drift from 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CongestionResponse {
    pub slope: f64,
    pub floor: f64,
    pub ceiling: f64,
}

impl CongestionResponse {
    /// A weight that ignores congestion entirely.
    #[must_use]
    pub const fn flat() -> Self {
        Self {
            slope: 0.0,
            floor: 0.0,
            ceiling: 1.0,
        }
    }

    /// Adjusted weight for `base` at congestion level `congestion`.
    #[must_use]
    pub fn adjusted(&self, base: f64, congestion: f64) -> f64 {
        (base + self.slope * congestion).clamp(self.floor, self.ceiling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{
        FAST_BASE_WEIGHT, FAST_CEILING, FAST_FLOOR, FAST_SLOPE, MEDIUM_BASE_WEIGHT,
        MEDIUM_CEILING, MEDIUM_FLOOR, MEDIUM_SLOPE, SLOW_BASE_WEIGHT, SLOW_CEILING, SLOW_FLOOR,
        SLOW_SLOPE,
    };

    #[test]
    fn level_accumulates_monotonically() {
        let mut level = CongestionLevel::default();
        assert_eq!(level.level(), 0.0);
        level.advance(0.1);
        level.advance(0.0);
        level.advance(0.4);
        assert!((level.level() - 0.5).abs() < 1e-12);
    }

    // Sweep congestion 0..=10 in steps of 0.1 and check that every
    // adjusted weight stays inside its clamp band and moves monotonically.
    #[test]
    fn adjusted_weights_clamp_and_stay_monotone() {
        let fast = CongestionResponse {
            slope: FAST_SLOPE,
            floor: FAST_FLOOR,
            ceiling: FAST_CEILING,
        };
        let medium = CongestionResponse {
            slope: MEDIUM_SLOPE,
            floor: MEDIUM_FLOOR,
            ceiling: MEDIUM_CEILING,
        };
        let slow = CongestionResponse {
            slope: SLOW_SLOPE,
            floor: SLOW_FLOOR,
            ceiling: SLOW_CEILING,
        };

        let mut previous: Option<(f64, f64, f64)> = None;
        for tick in 0..=100 {
            let c = f64::from(tick) * 0.1;
            let f = fast.adjusted(FAST_BASE_WEIGHT, c);
            let m = medium.adjusted(MEDIUM_BASE_WEIGHT, c);
            let s = slow.adjusted(SLOW_BASE_WEIGHT, c);

            assert!((FAST_FLOOR..=FAST_CEILING).contains(&f), "fast={f} at c={c}");
            assert!(
                (MEDIUM_FLOOR..=MEDIUM_CEILING).contains(&m),
                "medium={m} at c={c}"
            );
            assert!((SLOW_FLOOR..=SLOW_CEILING).contains(&s), "slow={s} at c={c}");

            if let Some((pf, pm, ps)) = previous {
                assert!(f <= pf, "fast weight rose with congestion");
                assert!(m >= pm, "medium weight fell with congestion");
                assert!(s >= ps, "slow weight fell with congestion");
            }
            previous = Some((f, m, s));
        }
    }

    #[test]
    fn saturated_weights_sum_to_one() {
        let fast = CongestionResponse {
            slope: FAST_SLOPE,
            floor: FAST_FLOOR,
            ceiling: FAST_CEILING,
        };
        let medium = CongestionResponse {
            slope: MEDIUM_SLOPE,
            floor: MEDIUM_FLOOR,
            ceiling: MEDIUM_CEILING,
        };
        let slow = CongestionResponse {
            slope: SLOW_SLOPE,
            floor: SLOW_FLOOR,
            ceiling: SLOW_CEILING,
        };
        let total = fast.adjusted(FAST_BASE_WEIGHT, 50.0)
            + medium.adjusted(MEDIUM_BASE_WEIGHT, 50.0)
            + slow.adjusted(SLOW_BASE_WEIGHT, 50.0);
        assert!((total - 1.0).abs() < 1e-12);
    }
}
