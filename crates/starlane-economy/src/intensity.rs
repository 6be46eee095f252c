//! Per-system source/sink intensities.
//!
//! Every inhabited planet keeps a production and a demand tracker per
//! commodity. Each pass nudges both trackers using the commodity's raw
//! supply/demand sample, scales them by the square root of the population
//! and folds them into one intensity per system:
//!
//! ```text
//! I = power_base ^ ((demand - production) / production_modifier)
//! ```
//!
//! Demand-heavy systems become strong sources, production-heavy systems
//! tend towards zero.

use starlane_core::commodity::SupplyDemandSource;
use starlane_core::id::{CommodityId, SystemId};
use starlane_core::universe::Universe;

use crate::admittance::SystemIndex;
use crate::config::{Aggregation, EconomyConfig};
use crate::state::PriceTable;

/// Advance one tracker: drift by `var * dt`, then apply the reversion term
/// towards `raw`. Clamped at zero.
fn advance(tracker: f64, raw: f64, var: f64, dt: f64) -> f64 {
    let mut t = tracker + var * dt;
    t -= var * (raw - t) * dt;
    if t.is_finite() { t.max(0.0) } else { 0.0 }
}

fn clamp_raw(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Intensity of a single system for one commodity.
///
/// Mutates the trackers of every inhabited planet in the system. Planets
/// without a row in `table` are skipped. A system with no inhabited planet
/// returns zero.
pub fn system_intensity(
    dt: f64,
    universe: &Universe,
    system: SystemId,
    commodity: CommodityId,
    source: &mut dyn SupplyDemandSource,
    table: &mut PriceTable,
    config: &EconomyConfig,
) -> f64 {
    let mut production = 0.0;
    let mut demand = 0.0;
    let mut last: Option<(f64, f64)> = None;

    for (planet_id, planet) in universe.planets_in(system) {
        if !planet.inhabited {
            continue;
        }
        let Some(state) = table.get_mut(planet_id, commodity) else {
            continue;
        };
        let raw = source.evaluate();
        let raw_supply = clamp_raw(raw.supply);
        let raw_demand = clamp_raw(raw.demand);

        state.supply = advance(state.supply, raw_supply, config.production_variability, dt);
        state.demand = advance(state.demand, raw_demand, config.demand_variability, dt);

        let weight = (planet.population as f64).sqrt();
        production += state.supply * weight;
        demand += state.demand * weight;
        last = Some((state.supply, state.demand));
    }

    let Some((last_supply, last_demand)) = last else {
        return 0.0;
    };
    let delta = match config.aggregation {
        Aggregation::SystemTotal => demand - production,
        Aggregation::LastPlanet => last_demand - last_supply,
    };
    config.power_base.powf(delta / config.production_modifier)
}

/// Intensity vector of one commodity, ordered like `index`.
pub fn intensity_vector(
    dt: f64,
    universe: &Universe,
    index: &SystemIndex,
    commodity: CommodityId,
    source: &mut dyn SupplyDemandSource,
    table: &mut PriceTable,
    config: &EconomyConfig,
) -> Vec<f64> {
    index
        .systems()
        .iter()
        .map(|&system| system_intensity(dt, universe, system, commodity, source, table, config))
        .collect()
}
