//! Integration test: prices across a chain galaxy with a drain.
//!
//! Four inhabited systems in a line, plus an empty system hanging off one
//! end. The empty system has zero intensity, so it pulls potentials down
//! near its end of the chain and the closest planet gets the lowest price.
//! Removing it makes every system identical and prices settle at half of
//! base.

use starlane_core::id::CommodityId;
use starlane_core::test_utils::*;
use starlane_core::universe::StarSystem;
use starlane_economy::solver::{ConjugateGradientSolver, SparseSolver};
use starlane_economy::{EconomyConfig, EconomyContext, EconomyEvent, EconomyState};

/// Chain A-B-C-D with one planet each, plus an empty system E linked to A.
fn drained_chain() -> Galaxy {
    let mut galaxy = chain_galaxy(4, 10_000, &all_commodities(3));
    let drain = galaxy.universe.add_system(StarSystem::new("Drain"));
    galaxy.universe.connect(drain, galaxy.systems[0]).unwrap();
    galaxy.systems.push(drain);
    galaxy
}

fn prices<S: SparseSolver>(
    economy: &EconomyContext<S>,
    galaxy: &Galaxy,
    commodity: CommodityId,
) -> Vec<i64> {
    galaxy
        .planets
        .iter()
        .map(|&planet| economy.price(planet, commodity).unwrap())
        .collect()
}

#[test]
fn drain_lowers_nearby_prices() {
    let galaxy = drained_chain();
    let mut economy = EconomyContext::new(standard_catalog(), EconomyConfig::default()).unwrap();
    let events = economy.init(&galaxy.universe).unwrap();

    assert!(economy.is_ready());
    assert_eq!(
        events[0],
        EconomyEvent::Refreshed {
            systems: 5,
            entries: 5 + 2 * 4,
        }
    );

    assert_eq!(prices(&economy, &galaxy, food()), vec![92, 99, 100, 100]);
    assert_eq!(prices(&economy, &galaxy, ore()), vec![183, 199, 200, 200]);
}

#[test]
fn uniform_intensities_keep_prices() {
    let galaxy = drained_chain();
    let mut economy = EconomyContext::new(standard_catalog(), EconomyConfig::default()).unwrap();
    economy.init(&galaxy.universe).unwrap();
    let before = prices(&economy, &galaxy, luxury());

    for _ in 0..5 {
        let events = economy.update(&galaxy.universe, 1.0);
        assert_eq!(events.len(), 3);
        assert!(
            events
                .iter()
                .all(|e| matches!(e, EconomyEvent::PricesUpdated { .. }))
        );
    }

    // Every inhabited system shares the same population and sources, so the
    // intensity vector only changes by a common factor.
    assert_eq!(prices(&economy, &galaxy, luxury()), before);
}

#[test]
fn removing_the_drain_flattens_prices() {
    let mut galaxy = drained_chain();
    let mut economy = EconomyContext::new(standard_catalog(), EconomyConfig::default()).unwrap();
    economy.init(&galaxy.universe).unwrap();

    let drain = galaxy.systems.pop().unwrap();
    galaxy.universe.remove_system(drain);
    economy.queue_refresh();
    assert!(economy.refresh_queued());

    let events = economy.exec_queued(&galaxy.universe).unwrap();
    assert!(!economy.refresh_queued());
    assert_eq!(economy.state(), EconomyState::Ready);
    assert!(matches!(events[0], EconomyEvent::Refreshed { systems: 4, .. }));

    assert_eq!(prices(&economy, &galaxy, food()), vec![50; 4]);
    assert_eq!(prices(&economy, &galaxy, luxury()), vec![400; 4]);

    let summary = economy.average_price(&galaxy.universe, food()).unwrap();
    assert_eq!(summary.mean, 50.0);
    assert_eq!(summary.std_dev, 0.0);
    assert_eq!(summary.samples, 4);
}

#[test]
fn iterative_solver_matches_cholesky() {
    let galaxy = drained_chain();
    let mut direct = EconomyContext::new(standard_catalog(), EconomyConfig::default()).unwrap();
    let mut iterative = EconomyContext::with_solver(
        standard_catalog(),
        EconomyConfig::default(),
        ConjugateGradientSolver::default(),
    )
    .unwrap();
    direct.init(&galaxy.universe).unwrap();
    iterative.init(&galaxy.universe).unwrap();

    for step in 1..=3 {
        direct.update_at(&galaxy.universe, step as f64);
        iterative.update_at(&galaxy.universe, step as f64);
    }

    for commodity in [food(), ore(), luxury()] {
        let a = prices(&direct, &galaxy, commodity);
        let b = prices(&iterative, &galaxy, commodity);
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() <= 1, "{commodity:?}: {a:?} vs {b:?}");
        }
    }
}

#[test]
fn destroy_then_reinit() {
    let galaxy = drained_chain();
    let mut economy = EconomyContext::new(standard_catalog(), EconomyConfig::default()).unwrap();
    economy.init(&galaxy.universe).unwrap();

    economy.destroy();
    assert_eq!(economy.state(), EconomyState::Uninitialized);
    assert!(economy.update(&galaxy.universe, 1.0).is_empty());
    assert_eq!(economy.price(galaxy.planets[0], food()), None);

    economy.init(&galaxy.universe).unwrap();
    assert_eq!(prices(&economy, &galaxy, food()), vec![92, 99, 100, 100]);
}
