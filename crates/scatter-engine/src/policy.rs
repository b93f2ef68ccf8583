//! Random sizing and target selection.
//!
//! All randomness flows through a caller-supplied [`Rng`], so a seeded
//! generator makes a round fully reproducible.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How scatter amounts are drawn between the configured bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScatterPolicy {
    /// `|U·(max−min) − min| + min`. Bunches up near `min` with a long tail
    /// and exceeds `max` whenever `max < 2·min`. Kept for compatibility with
    /// existing deployments.
    #[default]
    Legacy,
    /// `min + U·(max−min)`, uniform over `[min, max)`.
    Uniform,
}

impl ScatterPolicy {
    /// Draw one unrounded scatter amount.
    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R, min: f64, max: f64) -> f64 {
        let u: f64 = rng.r#gen();
        match self {
            ScatterPolicy::Legacy => (u * (max - min) - min).abs() + min,
            ScatterPolicy::Uniform => min + u * (max - min),
        }
    }
}

impl fmt::Display for ScatterPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScatterPolicy::Legacy => f.write_str("legacy"),
            ScatterPolicy::Uniform => f.write_str("uniform"),
        }
    }
}

impl FromStr for ScatterPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(ScatterPolicy::Legacy),
            "uniform" => Ok(ScatterPolicy::Uniform),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Normal distribution for stake top-up sizes.
///
/// Samples are not clamped; rounding to eight decimals is the only
/// post-processing.
#[derive(Clone, Copy, Debug)]
pub struct StakeSampler {
    normal: Normal<f64>,
}

impl StakeSampler {
    pub fn new(mean: f64, sd: f64) -> Result<Self, ConfigError> {
        if !mean.is_finite() || !sd.is_finite() || sd < 0.0 {
            return Err(ConfigError::InvalidStakeDistribution { mean, sd });
        }
        Normal::new(mean, sd)
            .map(|normal| Self { normal })
            .map_err(|_| ConfigError::InvalidStakeDistribution { mean, sd })
    }

    /// Draw one unrounded stake amount.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.normal.sample(rng)
    }
}

/// Pick a scatter target uniformly from `[1, pool]` excluding `source`.
///
/// Draws from `[1, pool - 1]` and shifts draws at or above `source` up by
/// one, so it never loops. Returns `None` when there is no other account,
/// that is `pool < 2` or `source` outside the pool.
pub fn pick_target<R: Rng + ?Sized>(rng: &mut R, source: u32, pool: u32) -> Option<u32> {
    if pool < 2 || !(1..=pool).contains(&source) {
        return None;
    }
    let draw = rng.gen_range(1..pool);
    Some(if draw >= source { draw + 1 } else { draw })
}
