//! Per-planet, per-commodity market state.

use slotmap::SecondaryMap;
use starlane_core::commodity::Catalog;
use starlane_core::credits::Credits;
use starlane_core::id::{CommodityId, PlanetId};
use starlane_core::universe::Universe;

/// Market state of one commodity at one planet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetCommodityState {
    /// Production tracker. Never negative.
    pub supply: f64,
    /// Demand tracker. Never negative.
    pub demand: f64,
    /// Current tradable price.
    pub price: Credits,
}

impl PlanetCommodityState {
    pub fn new(base_price: Credits) -> Self {
        Self {
            supply: 0.0,
            demand: 0.0,
            price: base_price,
        }
    }
}

/// Planet rows, each sized to the catalog.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    rows: SecondaryMap<PlanetId, Vec<PlanetCommodityState>>,
    base_prices: Vec<Credits>,
}

/// What a [`PriceTable::sync`] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub added: usize,
    pub removed: usize,
}

impl PriceTable {
    /// Allocate a row for every planet, prices starting at base price.
    pub fn new(universe: &Universe, catalog: &Catalog) -> Self {
        let mut table = Self {
            rows: SecondaryMap::new(),
            base_prices: catalog.iter().map(|(_, c)| c.base_price).collect(),
        };
        table.sync(universe);
        table
    }

    fn fresh_row(&self) -> Vec<PlanetCommodityState> {
        self.base_prices
            .iter()
            .map(|&price| PlanetCommodityState::new(price))
            .collect()
    }

    /// Add rows for new planets and drop rows of planets that are gone.
    pub fn sync(&mut self, universe: &Universe) -> SyncReport {
        let before = self.rows.len();
        self.rows.retain(|planet, _| universe.planet(planet).is_some());
        let removed = before - self.rows.len();

        let mut added = 0;
        for (planet, _) in universe.planets() {
            if !self.rows.contains_key(planet) {
                let row = self.fresh_row();
                self.rows.insert(planet, row);
                added += 1;
            }
        }
        SyncReport { added, removed }
    }

    pub fn get(&self, planet: PlanetId, commodity: CommodityId) -> Option<&PlanetCommodityState> {
        self.rows.get(planet)?.get(commodity.index())
    }

    pub fn get_mut(
        &mut self,
        planet: PlanetId,
        commodity: CommodityId,
    ) -> Option<&mut PlanetCommodityState> {
        self.rows.get_mut(planet)?.get_mut(commodity.index())
    }

    pub fn contains(&self, planet: PlanetId) -> bool {
        self.rows.contains_key(planet)
    }

    /// Number of planet rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of commodity columns.
    pub fn width(&self) -> usize {
        self.base_prices.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlanetId, &[PlanetCommodityState])> {
        self.rows.iter().map(|(id, row)| (id, row.as_slice()))
    }
}
