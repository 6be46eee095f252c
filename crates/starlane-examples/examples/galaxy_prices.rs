//! Galaxy prices example: nodal-analysis pricing over a small galaxy.
//!
//! Builds a handful of star systems with nebulae, factions and planets,
//! runs the economy for a few simulated days and prints the price table.
//! Pass a data directory to load the galaxy from files instead.
//!
//! Run with: `cargo run -p starlane-examples --example galaxy_prices [data-dir]`
//! Set `RUST_LOG=debug` to see the economy's own log output.

use std::path::Path;

use starlane_core::commodity::{Catalog, CatalogBuilder, ConstantSource, JitteredSource};
use starlane_core::credits::format_credits;
use starlane_core::id::FactionId;
use starlane_core::universe::{Planet, StarSystem, Universe};
use starlane_data::load_galaxy_data;
use starlane_economy::{EconomyConfig, EconomyContext, EconomyEvent};
use tracing_subscriber::EnvFilter;

fn built_in_galaxy() -> (Catalog, Universe) {
    let mut builder = CatalogBuilder::new();
    let food = builder.register("Food", "Staple rations.", 120);
    let ore = builder.register("Ore", "Unrefined metals.", 450);
    let medicine = builder.register("Medicine", "Vaccines and trauma kits.", 2_300);
    let luxury = builder.register("Luxury Goods", "Silks, spirits, art.", 1_250_000);
    builder
        .attach_source("Food", Box::new(JitteredSource::new(1.0, 1.5, 0.2, 42)))
        .unwrap();
    builder
        .attach_source("Ore", Box::new(ConstantSource::new(1.2, 0.6)))
        .unwrap();
    builder
        .attach_source("Medicine", Box::new(JitteredSource::new(0.4, 0.9, 0.1, 7)))
        .unwrap();
    builder
        .attach_source("Luxury Goods", Box::new(ConstantSource::new(0.2, 0.3)))
        .unwrap();
    let catalog = builder.build().unwrap();

    let empire = FactionId(0);
    let guild = FactionId(1);
    let raiders = FactionId(2);

    let mut universe = Universe::new();
    universe.factions_mut().set_allies(empire, guild);
    universe.factions_mut().set_enemies(empire, raiders);
    universe.factions_mut().set_enemies(guild, raiders);

    let sol = universe.add_system(StarSystem::new("Sol").with_faction(empire));
    let vega = universe.add_system(StarSystem::new("Vega").with_faction(empire));
    let altair = universe.add_system(
        StarSystem::new("Altair")
            .with_faction(guild)
            .with_nebula(250.0, 10.0),
    );
    let rigel = universe.add_system(
        StarSystem::new("Rigel")
            .with_faction(raiders)
            .with_nebula(800.0, 60.0),
    );
    let deneb = universe.add_system(StarSystem::new("Deneb"));

    universe.connect(sol, vega).unwrap();
    universe.connect(sol, altair).unwrap();
    universe.connect(vega, rigel).unwrap();
    universe.connect(altair, deneb).unwrap();
    universe.connect(rigel, deneb).unwrap();

    let planets = [
        (sol, "Earth", 8_000_000, vec![food, ore, medicine, luxury]),
        (sol, "Mars", 250_000, vec![food, ore]),
        (vega, "Vega Prime", 1_200_000, vec![food, medicine, luxury]),
        (altair, "Guildhall", 600_000, vec![ore, medicine, luxury]),
        (rigel, "Blackport", 90_000, vec![food, ore, luxury]),
        (deneb, "Deneb Outpost", 3_000, vec![food, ore, medicine]),
    ];
    for (system, name, population, commodities) in planets {
        universe
            .add_planet(system, Planet::new(name, population).with_commodities(commodities))
            .unwrap();
    }
    (catalog, universe)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (catalog, universe, config) = match std::env::args().nth(1) {
        Some(dir) => {
            let data = load_galaxy_data(Path::new(&dir)).unwrap_or_else(|e| {
                eprintln!("failed to load {dir}: {e}");
                std::process::exit(1);
            });
            (data.catalog, data.universe, data.config)
        }
        None => {
            let (catalog, universe) = built_in_galaxy();
            (catalog, universe, EconomyConfig::default())
        }
    };

    tracing::info!(
        systems = universe.system_count(),
        planets = universe.planet_count(),
        commodities = catalog.len(),
        "galaxy ready"
    );

    let mut economy = EconomyContext::new(catalog, config).unwrap();
    let events = economy.init(&universe).unwrap();
    println!("=== Initial solve ===\n");
    print_events(&events);

    for day in 1..=10 {
        let events = economy.update_at(&universe, day as f64);
        if day % 5 == 0 {
            println!("\n=== Day {day} ===\n");
            print_events(&events);
        }
    }

    println!("\n=== Price table ===\n");
    let commodities = economy.catalog().by_value();
    print!("{:<16}", "");
    for &id in &commodities {
        print!("{:>14}", economy.catalog().commodity(id).unwrap().name);
    }
    println!();
    for (planet_id, planet) in universe.planets() {
        print!("{:<16}", planet.name);
        for &id in &commodities {
            let cell = match economy.price(planet_id, id) {
                Some(price) if planet.trades(id) => format_credits(price, 2),
                _ => "-".to_string(),
            };
            print!("{cell:>14}");
        }
        println!();
    }

    println!("\n=== Galaxy averages ===\n");
    for &id in &commodities {
        let name = &economy.catalog().commodity(id).unwrap().name;
        if let Some(summary) = economy.average_price(&universe, id) {
            println!(
                "  {name:<14} mean {:>10}  spread {:>8.1}  over {} planets",
                format_credits(summary.mean.round() as i64, 2),
                summary.std_dev,
                summary.samples
            );
        }
    }
}

fn print_events(events: &[EconomyEvent]) {
    for event in events {
        println!("  Event: {event:?}");
    }
}
