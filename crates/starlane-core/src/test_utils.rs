//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::commodity::{Catalog, CatalogBuilder, ConstantSource, SupplyDemandSource};
use crate::credits::Credits;
use crate::id::*;
use crate::universe::{Planet, StarSystem, Universe};

// ===========================================================================
// Catalogs
// ===========================================================================

pub fn food() -> CommodityId {
    CommodityId(0)
}
pub fn ore() -> CommodityId {
    CommodityId(1)
}
pub fn luxury() -> CommodityId {
    CommodityId(2)
}

/// Food (100), Ore (200) and Luxury Goods (800), all with constant sources.
///
/// Food is demand heavy, Ore supply heavy, Luxury Goods balanced.
pub fn standard_catalog() -> Catalog {
    catalog_with(&[
        ("Food", 100, Some((1.0, 3.0))),
        ("Ore", 200, Some((3.0, 1.0))),
        ("Luxury Goods", 800, Some((2.0, 2.0))),
    ])
}

/// Build a catalog from `(name, base_price, Some((supply, demand)))` rows. A
/// `None` curve registers a static commodity.
pub fn catalog_with(rows: &[(&str, Credits, Option<(f64, f64)>)]) -> Catalog {
    let mut builder = CatalogBuilder::new();
    for (name, price, curve) in rows {
        builder.register(name, "", *price);
        if let Some((supply, demand)) = curve {
            builder
                .attach_source(name, Box::new(ConstantSource::new(*supply, *demand)))
                .unwrap();
        }
    }
    builder.build().unwrap()
}

/// A single-commodity catalog driven by an arbitrary source.
pub fn single_commodity(
    name: &str,
    base_price: Credits,
    source: Box<dyn SupplyDemandSource>,
) -> Catalog {
    let mut builder = CatalogBuilder::new();
    builder.register(name, "", base_price);
    builder.attach_source(name, source).unwrap();
    builder.build().unwrap()
}

// ===========================================================================
// Universes
// ===========================================================================

/// A universe plus the ids of what was created, in creation order.
#[derive(Debug)]
pub struct Galaxy {
    pub universe: Universe,
    pub systems: Vec<SystemId>,
    pub planets: Vec<PlanetId>,
}

/// Every commodity id in `0..count`.
pub fn all_commodities(count: u32) -> Vec<CommodityId> {
    (0..count).map(CommodityId).collect()
}

/// `n` systems connected in a line, one planet each trading `commodities`.
pub fn chain_galaxy(n: usize, population: u64, commodities: &[CommodityId]) -> Galaxy {
    let mut galaxy = isolated_galaxy(n, population, commodities);
    for pair in galaxy.systems.windows(2) {
        galaxy.universe.connect(pair[0], pair[1]).unwrap();
    }
    galaxy
}

/// Like [`chain_galaxy`] but the last system also links back to the first.
pub fn ring_galaxy(n: usize, population: u64, commodities: &[CommodityId]) -> Galaxy {
    let mut galaxy = chain_galaxy(n, population, commodities);
    if n > 2 {
        let (first, last) = (galaxy.systems[0], galaxy.systems[n - 1]);
        galaxy.universe.connect(last, first).unwrap();
    }
    galaxy
}

/// `n` systems with no jumps between them.
pub fn isolated_galaxy(n: usize, population: u64, commodities: &[CommodityId]) -> Galaxy {
    let mut universe = Universe::new();
    let mut systems = Vec::with_capacity(n);
    let mut planets = Vec::with_capacity(n);
    for i in 0..n {
        let sys = universe.add_system(StarSystem::new(&format!("System {i}")));
        let planet = Planet::new(&format!("Planet {i}"), population)
            .with_commodities(commodities.to_vec());
        planets.push(universe.add_planet(sys, planet).unwrap());
        systems.push(sys);
    }
    Galaxy {
        universe,
        systems,
        planets,
    }
}
