//! Integration test: a galaxy loaded from data files.
//!
//! An empty hub controlled by the Empire links to one Pirate world and one
//! Trader world. The Empire is at war with the Pirates and allied with the
//! Traders, so the allied route has the lower resistance and the Trader
//! world loses more of its potential to the hub.

use std::fs;
use std::path::{Path, PathBuf};

use starlane_core::credits::format_credits;
use starlane_data::load_galaxy_data;
use starlane_economy::config::Aggregation;
use starlane_economy::{EconomyContext, EconomyEvent};

fn make_test_dir(suffix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "starlane_integration_{suffix}_{}",
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn cleanup(dir: &Path) {
    let _ = fs::remove_dir_all(dir);
}

fn write_hub_galaxy(dir: &Path) {
    fs::write(
        dir.join("commodities.ron"),
        r#"[
            (name: "Food", price: 100, curve: Some((supply: 1.0, demand: 3.0))),
            (name: "Luxury Goods", price: 8000000, curve: Some((supply: 2.0, demand: 2.0))),
            (name: "Relics", price: 5000),
        ]"#,
    )
    .unwrap();
    fs::write(
        dir.join("factions.toml"),
        r#"
        [[factions]]
        name = "Empire"
        enemies = ["Pirates"]
        allies = ["Traders"]

        [[factions]]
        name = "Pirates"

        [[factions]]
        name = "Traders"
        "#,
    )
    .unwrap();
    fs::write(
        dir.join("systems.json"),
        r#"[
            {
                "name": "Hub",
                "faction": "Empire",
                "jumps": [{"target": "Tortuga"}, {"target": "Bazaar"}]
            },
            {
                "name": "Tortuga",
                "faction": "Pirates",
                "planets": [{"name": "Tortuga Prime", "population": 4000,
                             "commodities": ["Food", "Luxury Goods", "Relics"]}]
            },
            {
                "name": "Bazaar",
                "faction": "Traders",
                "planets": [{"name": "Bazaar Station", "population": 4000,
                             "commodities": ["Food", "Luxury Goods", "Relics"]}]
            }
        ]"#,
    )
    .unwrap();
}

#[test]
fn faction_routes_shape_prices() {
    let dir = make_test_dir("faction_routes");
    write_hub_galaxy(&dir);

    let data = load_galaxy_data(&dir).unwrap();
    let tortuga = data.planets["Tortuga Prime"];
    let bazaar = data.planets["Bazaar Station"];
    let food = data.catalog.find("Food").unwrap();
    let luxury = data.catalog.find("Luxury Goods").unwrap();
    let relics = data.catalog.find("Relics").unwrap();

    let mut economy = EconomyContext::new(data.catalog, data.config).unwrap();
    let events = economy.init(&data.universe).unwrap();

    // One-way jumps still count as routes: 3 diagonal + 2 pairs.
    assert!(matches!(
        events[0],
        EconomyEvent::Refreshed {
            systems: 3,
            entries: 7
        }
    ));
    // Relics have no source and are never repriced.
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, EconomyEvent::PricesUpdated { .. }))
            .count(),
        2
    );

    assert_eq!(economy.price(tortuga, food), Some(100));
    assert_eq!(economy.price(bazaar, food), Some(98));
    assert_eq!(economy.price(bazaar, relics), Some(5000));

    let luxury_price = economy.price(bazaar, luxury).unwrap();
    assert_eq!(luxury_price, 7_854_545);
    assert_eq!(format_credits(luxury_price, 1), "7.9M");

    let summary = economy.average_price(&data.universe, food).unwrap();
    assert_eq!(summary.mean, 99.0);
    assert_eq!(summary.std_dev, 1.0);

    cleanup(&dir);
}

#[test]
fn economy_file_overrides_defaults() {
    let dir = make_test_dir("economy_override");
    write_hub_galaxy(&dir);
    fs::write(
        dir.join("economy.ron"),
        "(faction_modifier: 0.0, aggregation: last_planet)",
    )
    .unwrap();

    let data = load_galaxy_data(&dir).unwrap();
    assert_eq!(data.config.aggregation, Aggregation::LastPlanet);
    let tortuga = data.planets["Tortuga Prime"];
    let bazaar = data.planets["Bazaar Station"];
    let food = data.catalog.find("Food").unwrap();

    let mut economy = EconomyContext::new(data.catalog, data.config).unwrap();
    economy.init(&data.universe).unwrap();

    // Without faction terms both routes are identical.
    assert_eq!(economy.price(tortuga, food), economy.price(bazaar, food));
    assert_eq!(economy.price(tortuga, food), Some(100));

    cleanup(&dir);
}
