//! Galaxy-wide price statistics.

use starlane_core::id::CommodityId;
use starlane_core::universe::Universe;

use crate::state::PriceTable;

/// Mean and population standard deviation of a commodity's price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSummary {
    pub mean: f64,
    pub std_dev: f64,
    pub samples: usize,
}

/// Summarize the price of `commodity` over every planet that trades it.
/// Returns `None` when no planet does.
pub fn average_price(
    universe: &Universe,
    table: &PriceTable,
    commodity: CommodityId,
) -> Option<PriceSummary> {
    let prices: Vec<f64> = universe
        .planets()
        .filter(|(_, planet)| planet.trades(commodity))
        .filter_map(|(id, _)| table.get(id, commodity))
        .map(|state| state.price as f64)
        .collect();
    if prices.is_empty() {
        return None;
    }
    let n = prices.len() as f64;
    let mean = prices.iter().sum::<f64>() / n;
    let variance = prices.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n;
    Some(PriceSummary {
        mean,
        std_dev: variance.sqrt(),
        samples: prices.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use starlane_core::test_utils::*;

    #[test]
    fn summary_over_trading_planets() {
        let catalog = standard_catalog();
        let galaxy = chain_galaxy(2, 10, &[food()]);
        let mut table = PriceTable::new(&galaxy.universe, &catalog);
        table.get_mut(galaxy.planets[0], food()).unwrap().price = 80;
        table.get_mut(galaxy.planets[1], food()).unwrap().price = 120;

        let summary = average_price(&galaxy.universe, &table, food()).unwrap();
        assert_eq!(summary.samples, 2);
        assert_eq!(summary.mean, 100.0);
        assert_eq!(summary.std_dev, 20.0);
    }

    #[test]
    fn no_trading_planet_is_none() {
        let catalog = standard_catalog();
        let galaxy = chain_galaxy(2, 10, &[food()]);
        let table = PriceTable::new(&galaxy.universe, &catalog);
        assert!(average_price(&galaxy.universe, &table, ore()).is_none());
    }
}
