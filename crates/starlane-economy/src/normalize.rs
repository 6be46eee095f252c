//! Mapping solved potentials back to prices.

use starlane_core::commodity::Catalog;
use starlane_core::credits::Credits;
use starlane_core::id::CommodityId;
use starlane_core::universe::Universe;

use crate::admittance::SystemIndex;
use crate::state::PriceTable;

/// Multiplier used when every system sits at the same potential.
pub const FLAT_MULTIPLIER: f64 = 0.5;

/// Rescale `potentials` in place to `[0, 1]` via `(x - min) / (max - min)`.
///
/// The mapping is scale-invariant: only a range that vanishes relative to the
/// magnitude of the values, or one that is not finite, counts as flat and maps
/// every entry to [`FLAT_MULTIPLIER`]. Returns the `(min, max)` of
/// the result, or `None` for an empty slice.
pub fn normalize(potentials: &mut [f64]) -> Option<(f64, f64)> {
    if potentials.is_empty() {
        return None;
    }
    let (min, max) = potentials
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        });
    let range = max - min;
    let tolerance = 1e-12 * max.abs().max(min.abs());

    if !range.is_finite() || range <= tolerance {
        potentials.fill(FLAT_MULTIPLIER);
        return Some((FLAT_MULTIPLIER, FLAT_MULTIPLIER));
    }

    for x in potentials.iter_mut() {
        *x = ((*x - min) / range).clamp(0.0, 1.0);
    }
    Some((0.0, 1.0))
}

/// `base_price * multiplier`, rounded to whole credits.
pub fn scaled_price(base_price: Credits, multiplier: f64) -> Credits {
    (base_price as f64 * multiplier).round() as Credits
}

/// Write the prices of one commodity to every planet of every indexed system.
///
/// Prices follow the multipliers directly, so planets in the lowest-potential
/// system are priced at 0 credits and those in the highest at the full base
/// price. A flat pass prices everything at half of base.
pub fn write_prices(
    universe: &Universe,
    index: &SystemIndex,
    catalog: &Catalog,
    commodity: CommodityId,
    multipliers: &[f64],
    table: &mut PriceTable,
) {
    let Some(base_price) = catalog.base_price(commodity) else {
        return;
    };
    for (&system, &multiplier) in index.systems().iter().zip(multipliers) {
        for (planet, _) in universe.planets_in(system) {
            if let Some(state) = table.get_mut(planet, commodity) {
                state.price = scaled_price(base_price, multiplier);
            }
        }
    }
}
