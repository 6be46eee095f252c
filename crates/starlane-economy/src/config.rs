//! Tunable constants of the nodal analysis.

use serde::{Deserialize, Serialize};

/// How the per-planet production/demand trackers of a system are folded into
/// the system's intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Use the population-weighted sums over every inhabited planet.
    #[default]
    SystemTotal,
    /// Use only the trackers of the last inhabited planet visited.
    LastPlanet,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be finite and positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must be finite and non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },
    #[error("power_base must be greater than 1, got {0}")]
    PowerBase(f64),
}

/// Economy tuning. Every field has a default so partial config files work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Resistance of every jump before nebula and faction adjustments.
    pub base_resistance: f64,
    /// Self-resistance tying each system to the reference potential.
    pub self_resistance: f64,
    /// Fraction of `base_resistance` added between enemies and removed
    /// between allies.
    pub faction_modifier: f64,
    /// Mean-reversion rate of the production trackers.
    pub production_variability: f64,
    /// Mean-reversion rate of the demand trackers.
    pub demand_variability: f64,
    /// Base of the exponential intensity response. Must exceed 1.
    pub power_base: f64,
    /// Divisor applied to `demand - production` before exponentiation.
    pub production_modifier: f64,
    pub aggregation: Aggregation,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            base_resistance: 30.0,
            self_resistance: 3.0,
            faction_modifier: 0.1,
            production_variability: 0.01,
            demand_variability: 0.01,
            power_base: 1.1,
            production_modifier: 1.0,
            aggregation: Aggregation::SystemTotal,
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

impl EconomyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("base_resistance", self.base_resistance)?;
        positive("self_resistance", self.self_resistance)?;
        positive("production_modifier", self.production_modifier)?;
        non_negative("production_variability", self.production_variability)?;
        non_negative("demand_variability", self.demand_variability)?;
        if !self.faction_modifier.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "faction_modifier",
                value: self.faction_modifier,
            });
        }
        if !(self.power_base.is_finite() && self.power_base > 1.0) {
            return Err(ConfigError::PowerBase(self.power_base));
        }
        Ok(())
    }
}
