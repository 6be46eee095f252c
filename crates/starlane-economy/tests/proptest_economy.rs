//! Property-based tests for the economy.
//!
//! Uses proptest to generate random universes (nebulae, factions, jumps,
//! planets) and verify the structural invariants of the admittance matrix
//! and the price update.

use proptest::prelude::*;
use starlane_core::commodity::{CatalogBuilder, ConstantSource, JitteredSource};
use starlane_core::id::{CommodityId, FactionId};
use starlane_core::universe::{JumpFlags, Planet, StarSystem, Universe};
use starlane_economy::admittance::build_admittance;
use starlane_economy::solver::{CholeskySolver, SparseSolver};
use starlane_economy::{EconomyConfig, EconomyContext, EconomyEvent};

// ===========================================================================
// Generators
// ===========================================================================

#[derive(Debug, Clone)]
struct SystemShape {
    density: f64,
    volatility: f64,
    faction: Option<u32>,
    populations: Vec<u64>,
}

fn arb_system() -> impl Strategy<Value = SystemShape> {
    (
        0.0..1000.0f64,
        0.0..100.0f64,
        proptest::option::of(0..3u32),
        proptest::collection::vec(0..50_000u64, 0..3),
    )
        .prop_map(|(density, volatility, faction, populations)| SystemShape {
            density,
            volatility,
            faction,
            populations,
        })
}

/// A random universe with up to `max_systems` systems, random one-way jumps
/// and random alliances/hostilities between three factions.
fn arb_universe(max_systems: usize) -> impl Strategy<Value = Universe> {
    (1..=max_systems).prop_flat_map(|n| {
        (
            proptest::collection::vec(arb_system(), n),
            proptest::collection::vec((0..n, 0..n, any::<bool>(), any::<bool>()), 0..n * 3),
            proptest::collection::vec((0..3u32, 0..3u32, any::<bool>()), 0..4),
        )
            .prop_map(|(systems, jumps, relations)| {
                let mut universe = Universe::new();
                let mut ids = Vec::new();
                for (i, shape) in systems.iter().enumerate() {
                    let mut system = StarSystem::new(&format!("S{i}"))
                        .with_nebula(shape.density, shape.volatility);
                    system.faction = shape.faction.map(FactionId);
                    let id = universe.add_system(system);
                    for (k, &population) in shape.populations.iter().enumerate() {
                        let planet = Planet::new(&format!("S{i}-{k}"), population)
                            .with_commodities(vec![CommodityId(0), CommodityId(1)]);
                        universe.add_planet(id, planet).unwrap();
                    }
                    ids.push(id);
                }
                for (a, b, exit_only, hidden) in jumps {
                    let flags = JumpFlags { exit_only, hidden };
                    universe.add_jump(ids[a], ids[b], flags).unwrap();
                }
                for (a, b, allied) in relations {
                    if allied {
                        universe.factions_mut().set_allies(FactionId(a), FactionId(b));
                    } else {
                        universe.factions_mut().set_enemies(FactionId(a), FactionId(b));
                    }
                }
                universe
            })
    })
}

fn economy(seed: u64) -> EconomyContext {
    let mut builder = CatalogBuilder::new();
    builder.register("Food", "", 100);
    builder.register("Ore", "", 250);
    builder.register("Water", "", 30);
    builder
        .attach_source("Food", Box::new(JitteredSource::new(0.5, 0.8, 0.2, seed)))
        .unwrap();
    builder
        .attach_source("Ore", Box::new(ConstantSource::new(0.9, 0.1)))
        .unwrap();
    EconomyContext::new(builder.build().unwrap(), EconomyConfig::default()).unwrap()
}

fn snapshot(economy: &EconomyContext) -> Vec<(f64, f64, i64)> {
    economy
        .table()
        .iter()
        .flat_map(|(_, row)| row.iter().map(|s| (s.supply, s.demand, s.price)))
        .collect()
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// G[i][j] == G[j][i] for every stored entry.
    #[test]
    fn matrix_is_symmetric(universe in arb_universe(12)) {
        let (_, matrix) = build_admittance(&universe, &EconomyConfig::default()).unwrap();
        for (r, c, v) in matrix.entries() {
            prop_assert_eq!(v, matrix.get(c, r));
        }
    }

    /// |G[i][i]| > sum of |G[i][j]|, j != i.
    #[test]
    fn matrix_is_strictly_diagonally_dominant(universe in arb_universe(12)) {
        let (index, matrix) = build_admittance(&universe, &EconomyConfig::default()).unwrap();
        let mut off = vec![0.0; index.len()];
        for (r, c, v) in matrix.entries() {
            if r != c {
                off[r] += v.abs();
            }
        }
        for (i, sum) in off.iter().enumerate() {
            prop_assert!(matrix.get(i, i).abs() > *sum);
        }
    }

    /// Default resistances never produce a matrix the solver rejects.
    #[test]
    fn solver_never_fails(universe in arb_universe(12), seed in any::<u64>()) {
        let mut economy = economy(seed);
        let mut events = economy.init(&universe).unwrap();
        for step in 1..=5 {
            events.extend(economy.update(&universe, step as f64));
        }
        let failed = events.iter().any(|e| matches!(e, EconomyEvent::SolveFailed { .. }));
        prop_assert!(!failed);
    }

    /// Trackers stay non-negative and prices stay within [0, base price].
    #[test]
    fn trackers_and_prices_stay_bounded(
        universe in arb_universe(10),
        seed in any::<u64>(),
        dts in proptest::collection::vec(0.0..50.0f64, 1..10),
    ) {
        let mut economy = economy(seed);
        economy.init(&universe).unwrap();
        for dt in dts {
            economy.update(&universe, dt);
            for (_, row) in economy.table().iter() {
                for (i, state) in row.iter().enumerate() {
                    let base = economy.catalog().base_price(CommodityId(i as u32)).unwrap();
                    prop_assert!(state.supply >= 0.0);
                    prop_assert!(state.demand >= 0.0);
                    prop_assert!((0..=base).contains(&state.price));
                }
            }
        }
    }

    /// Multipliers reported by every pass lie in [0, 1].
    #[test]
    fn multipliers_are_normalized(universe in arb_universe(10), dt in 0.0..20.0f64) {
        let mut economy = economy(7);
        let mut events = economy.init(&universe).unwrap();
        events.extend(economy.update(&universe, dt));
        for event in events {
            if let EconomyEvent::PricesUpdated { min_multiplier, max_multiplier, .. } = event {
                prop_assert!((0.0..=1.0).contains(&min_multiplier));
                prop_assert!((0.0..=1.0).contains(&max_multiplier));
                prop_assert!(min_multiplier <= max_multiplier);
            }
        }
    }

    /// Two zero-length updates in a row produce identical state, given
    /// deterministic sources.
    #[test]
    fn zero_dt_is_idempotent(universe in arb_universe(10), dt in 0.0..20.0f64) {
        let mut builder = CatalogBuilder::new();
        builder.register("Ore", "", 250);
        builder
            .attach_source("Ore", Box::new(ConstantSource::new(0.9, 0.1)))
            .unwrap();
        let mut economy =
            EconomyContext::new(builder.build().unwrap(), EconomyConfig::default()).unwrap();
        economy.init(&universe).unwrap();
        economy.update(&universe, dt);

        economy.update(&universe, 0.0);
        let first = snapshot(&economy);
        economy.update(&universe, 0.0);
        prop_assert_eq!(first, snapshot(&economy));
    }

    /// An isolated system's potential is its intensity times the self
    /// resistance, whatever the rest of the galaxy looks like.
    #[test]
    fn isolated_system_potential_is_local(
        universe in arb_universe(8),
        intensity in 0.1..100.0f64,
    ) {
        let mut universe = universe;
        let lonely = universe.add_system(StarSystem::new("Lonely"));
        let config = EconomyConfig::default();
        let (index, matrix) = build_admittance(&universe, &config).unwrap();
        let pos = index.position(lonely).unwrap();
        prop_assert_eq!(matrix.get(pos, pos), 1.0 / config.self_resistance);

        let mut rhs = vec![1.0; index.len()];
        rhs[pos] = intensity;
        let solver = CholeskySolver;
        let prepared = solver.prepare(&matrix).unwrap();
        solver.solve(&prepared, &mut rhs).unwrap();
        let expected = intensity * config.self_resistance;
        prop_assert!((rhs[pos] - expected).abs() <= 1e-9 * expected);
    }
}
