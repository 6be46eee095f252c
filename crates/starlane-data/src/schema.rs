//! Serde data file structs for galaxy definitions.
//!
//! These structs define the on-disk format for commodities, factions and star
//! systems. They are deserialized from RON, JSON, or TOML data files and then
//! resolved into core types by the loader.

use serde::Deserialize;

// ===========================================================================
// Commodities
// ===========================================================================

/// A commodity definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct CommodityData {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Base price in credits.
    pub price: i64,
    /// Supply/demand script, relative to the data directory.
    #[serde(default)]
    pub script: Option<String>,
    /// Built-in supply/demand curve, used when there is no script or the
    /// script fails to load.
    #[serde(default)]
    pub curve: Option<CurveData>,
}

/// A built-in supply/demand curve.
#[derive(Debug, Clone, Deserialize)]
pub struct CurveData {
    pub supply: f64,
    pub demand: f64,
    /// Relative noise amplitude. Zero gives a constant curve.
    #[serde(default)]
    pub jitter: f64,
    #[serde(default)]
    pub seed: u64,
}

// ===========================================================================
// Factions
// ===========================================================================

/// A faction and its standing towards other factions.
#[derive(Debug, Clone, Deserialize)]
pub struct FactionData {
    pub name: String,
    #[serde(default)]
    pub allies: Vec<String>,
    #[serde(default)]
    pub enemies: Vec<String>,
}

// ===========================================================================
// Systems
// ===========================================================================

/// A star system definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemData {
    pub name: String,
    #[serde(default)]
    pub nebula_density: f64,
    #[serde(default)]
    pub nebula_volatility: f64,
    /// Controlling faction by name.
    #[serde(default)]
    pub faction: Option<String>,
    #[serde(default)]
    pub jumps: Vec<JumpData>,
    #[serde(default)]
    pub planets: Vec<PlanetData>,
}

/// An outgoing jump, referencing the target system by name.
#[derive(Debug, Clone, Deserialize)]
pub struct JumpData {
    pub target: String,
    #[serde(default)]
    pub exit_only: bool,
    #[serde(default)]
    pub hidden: bool,
}

/// A planet orbiting a system.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanetData {
    pub name: String,
    #[serde(default)]
    pub population: u64,
    /// Defaults to `population > 0`.
    #[serde(default)]
    pub inhabited: Option<bool>,
    /// Traded commodities by name.
    #[serde(default)]
    pub commodities: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commodity_defaults() {
        let c: CommodityData = ron::from_str(r#"(name: "Food", price: 100)"#).unwrap();
        assert_eq!(c.description, "");
        assert!(c.script.is_none());
        assert!(c.curve.is_none());
    }

    #[test]
    fn commodity_with_curve() {
        let c: CommodityData = ron::from_str(
            r#"(name: "Ore", price: 200, curve: Some((supply: 2.0, demand: 1.0, jitter: 0.05)))"#,
        )
        .unwrap();
        let curve = c.curve.unwrap();
        assert_eq!(curve.supply, 2.0);
        assert_eq!(curve.jitter, 0.05);
        assert_eq!(curve.seed, 0);
    }

    #[test]
    fn system_json() {
        let s: SystemData = serde_json::from_str(
            r#"{
                "name": "Alpha",
                "nebula_density": 120.0,
                "faction": "Empire",
                "jumps": [{"target": "Beta", "hidden": true}],
                "planets": [{"name": "Alpha I", "population": 5000, "commodities": ["Food"]}]
            }"#,
        )
        .unwrap();
        assert_eq!(s.nebula_volatility, 0.0);
        assert!(s.jumps[0].hidden);
        assert!(!s.jumps[0].exit_only);
        assert_eq!(s.planets[0].inhabited, None);
    }

    #[test]
    fn faction_toml() {
        let f: FactionData = toml::from_str(
            r#"
            name = "Empire"
            enemies = ["Pirates"]
            "#,
        )
        .unwrap();
        assert!(f.allies.is_empty());
        assert_eq!(f.enemies, ["Pirates"]);
    }
}
