//! Jump-route resistance.
//!
//! Every jump is modelled as a resistor between its two systems. Dense or
//! volatile nebulae make a route slightly more expensive, hostile factions
//! on either end raise it and allied factions lower it.

use starlane_core::universe::{FactionRelations, StarSystem};

use crate::config::EconomyConfig;

/// Resistance of the route between `a` and `b`.
///
/// ```text
/// R = base + (density_a + density_b) / 1000 + (volatility_a + volatility_b) / 100
/// ```
///
/// then `faction_modifier * base` is added when the two controlling factions
/// are enemies, or subtracted when they are allies. Unclaimed space on either
/// end leaves the faction term out. The result is not clamped.
pub fn route_resistance(
    a: &StarSystem,
    b: &StarSystem,
    factions: &FactionRelations,
    config: &EconomyConfig,
) -> f64 {
    let base = config.base_resistance;
    let mut r = base;
    r += (a.nebula.density + b.nebula.density) / 1000.0;
    r += (a.nebula.volatility + b.nebula.volatility) / 100.0;

    if let (Some(fa), Some(fb)) = (a.faction, b.faction) {
        if factions.are_enemies(fa, fb) {
            r += config.faction_modifier * base;
        } else if factions.are_allies(fa, fb) {
            r -= config.faction_modifier * base;
        }
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use starlane_core::id::FactionId;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn clear_unclaimed_space_is_base() {
        let a = StarSystem::new("A");
        let b = StarSystem::new("B");
        let r = route_resistance(&a, &b, &FactionRelations::new(), &EconomyConfig::default());
        assert!(close(r, 30.0), "got {r}");
    }

    #[test]
    fn nebula_terms_add_up() {
        let a = StarSystem::new("A").with_nebula(100.0, 5.0);
        let b = StarSystem::new("B").with_nebula(300.0, 15.0);
        let r = route_resistance(&a, &b, &FactionRelations::new(), &EconomyConfig::default());
        // 30 + 400/1000 + 20/100
        assert!(close(r, 30.6), "got {r}");
    }

    #[test]
    fn enemies_raise_resistance() {
        let mut relations = FactionRelations::new();
        relations.set_enemies(FactionId(0), FactionId(1));
        let a = StarSystem::new("A").with_faction(FactionId(0));
        let b = StarSystem::new("B").with_faction(FactionId(1));
        let r = route_resistance(&a, &b, &relations, &EconomyConfig::default());
        assert!(close(r, 33.0), "got {r}");
    }

    #[test]
    fn allies_lower_resistance() {
        let mut relations = FactionRelations::new();
        relations.set_allies(FactionId(0), FactionId(1));
        let a = StarSystem::new("A").with_faction(FactionId(0));
        let b = StarSystem::new("B").with_faction(FactionId(1));
        let r = route_resistance(&a, &b, &relations, &EconomyConfig::default());
        assert!(close(r, 27.0), "got {r}");
    }

    #[test]
    fn same_faction_counts_as_allied() {
        let a = StarSystem::new("A").with_faction(FactionId(4));
        let b = StarSystem::new("B").with_faction(FactionId(4));
        let r = route_resistance(&a, &b, &FactionRelations::new(), &EconomyConfig::default());
        assert!(close(r, 27.0), "got {r}");
    }

    #[test]
    fn neutral_factions_leave_base() {
        let a = StarSystem::new("A").with_faction(FactionId(0));
        let b = StarSystem::new("B").with_faction(FactionId(1));
        let r = route_resistance(&a, &b, &FactionRelations::new(), &EconomyConfig::default());
        assert!(close(r, 30.0), "got {r}");
    }

    #[test]
    fn unclaimed_end_skips_faction_term() {
        let a = StarSystem::new("A").with_faction(FactionId(0));
        let b = StarSystem::new("B");
        let r = route_resistance(&a, &b, &FactionRelations::new(), &EconomyConfig::default());
        assert!(close(r, 30.0), "got {r}");
    }

    #[test]
    fn symmetric_in_endpoints() {
        let mut relations = FactionRelations::new();
        relations.set_enemies(FactionId(0), FactionId(1));
        let a = StarSystem::new("A")
            .with_nebula(12.0, 3.0)
            .with_faction(FactionId(0));
        let b = StarSystem::new("B")
            .with_nebula(40.0, 0.5)
            .with_faction(FactionId(1));
        let config = EconomyConfig::default();
        assert_eq!(
            route_resistance(&a, &b, &relations, &config),
            route_resistance(&b, &a, &relations, &config)
        );
    }
}
