//! The star-system topology the economy is solved over.
//!
//! Systems and planets live in `SlotMap`s so their ids stay valid while other
//! systems are added or removed. Nothing here knows about prices: the economy
//! crate reads nebula attributes, factions, jumps and planet populations and
//! derives everything else.

use std::collections::HashSet;

use slotmap::SlotMap;

use crate::id::{CommodityId, FactionId, PlanetId, SystemId};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when editing the universe.
#[derive(Debug, thiserror::Error)]
pub enum UniverseError {
    #[error("system not found: {0:?}")]
    SystemNotFound(SystemId),
    #[error("planet not found: {0:?}")]
    PlanetNotFound(PlanetId),
}

// ---------------------------------------------------------------------------
// Systems, jumps, planets
// ---------------------------------------------------------------------------

/// Nebula attributes of a star system. Both default to zero (clear space).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Nebula {
    pub density: f64,
    pub volatility: f64,
}

/// Flags carried by a jump route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JumpFlags {
    /// The jump can only be used to leave the system.
    pub exit_only: bool,
    /// The jump is not shown on maps until discovered.
    pub hidden: bool,
}

/// An outgoing jump route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpPoint {
    pub target: SystemId,
    pub flags: JumpFlags,
}

/// A star system node.
#[derive(Debug, Clone)]
pub struct StarSystem {
    pub name: String,
    pub nebula: Nebula,
    /// Controlling faction, `None` for unclaimed space.
    pub faction: Option<FactionId>,
    jumps: Vec<JumpPoint>,
    planets: Vec<PlanetId>,
}

impl StarSystem {
    /// A system in clear, unclaimed space with no jumps or planets.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nebula: Nebula::default(),
            faction: None,
            jumps: Vec::new(),
            planets: Vec::new(),
        }
    }

    pub fn with_nebula(mut self, density: f64, volatility: f64) -> Self {
        self.nebula = Nebula {
            density,
            volatility,
        };
        self
    }

    pub fn with_faction(mut self, faction: FactionId) -> Self {
        self.faction = Some(faction);
        self
    }

    /// Outgoing jumps, in insertion order.
    pub fn jumps(&self) -> &[JumpPoint] {
        &self.jumps
    }

    /// Planets orbiting this system, in insertion order.
    pub fn planets(&self) -> &[PlanetId] {
        &self.planets
    }
}

/// A planet. Only inhabited planets take part in supply and demand.
#[derive(Debug, Clone)]
pub struct Planet {
    pub name: String,
    pub population: u64,
    pub inhabited: bool,
    /// Commodities traded at this planet's market.
    pub commodities: Vec<CommodityId>,
    system: SystemId,
}

impl Planet {
    /// A planet that counts as inhabited whenever it has any population.
    pub fn new(name: &str, population: u64) -> Self {
        Self {
            name: name.to_string(),
            population,
            inhabited: population > 0,
            commodities: Vec::new(),
            system: SystemId::default(),
        }
    }

    pub fn uninhabited(name: &str) -> Self {
        Self::new(name, 0)
    }

    pub fn with_commodities(mut self, commodities: Vec<CommodityId>) -> Self {
        self.commodities = commodities;
        self
    }

    /// The system this planet orbits. Set when the planet is added.
    pub fn system(&self) -> SystemId {
        self.system
    }

    pub fn trades(&self, commodity: CommodityId) -> bool {
        self.commodities.contains(&commodity)
    }
}

// ---------------------------------------------------------------------------
// Faction relations
// ---------------------------------------------------------------------------

/// Symmetric alliance/hostility table between factions.
#[derive(Debug, Clone, Default)]
pub struct FactionRelations {
    allies: HashSet<(FactionId, FactionId)>,
    enemies: HashSet<(FactionId, FactionId)>,
}

fn pair(a: FactionId, b: FactionId) -> (FactionId, FactionId) {
    if a <= b { (a, b) } else { (b, a) }
}

impl FactionRelations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark two factions as allied. Clears any hostility between them.
    pub fn set_allies(&mut self, a: FactionId, b: FactionId) {
        let key = pair(a, b);
        self.enemies.remove(&key);
        self.allies.insert(key);
    }

    /// Mark two factions as enemies. Clears any alliance between them.
    pub fn set_enemies(&mut self, a: FactionId, b: FactionId) {
        let key = pair(a, b);
        self.allies.remove(&key);
        self.enemies.insert(key);
    }

    /// Reset two factions to neutral.
    pub fn clear(&mut self, a: FactionId, b: FactionId) {
        let key = pair(a, b);
        self.allies.remove(&key);
        self.enemies.remove(&key);
    }

    /// A faction is always allied with itself.
    pub fn are_allies(&self, a: FactionId, b: FactionId) -> bool {
        a == b || self.allies.contains(&pair(a, b))
    }

    pub fn are_enemies(&self, a: FactionId, b: FactionId) -> bool {
        a != b && self.enemies.contains(&pair(a, b))
    }
}

// ---------------------------------------------------------------------------
// Universe
// ---------------------------------------------------------------------------

/// All star systems, planets and faction relations.
///
/// Edits do not notify anyone: whoever changes the topology is expected to
/// tell the economy to refresh.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    systems: SlotMap<SystemId, StarSystem>,
    planets: SlotMap<PlanetId, Planet>,
    factions: FactionRelations,
}

impl Universe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a system. Any jumps or planets already listed on it are dropped.
    pub fn add_system(&mut self, mut system: StarSystem) -> SystemId {
        system.jumps.clear();
        system.planets.clear();
        self.systems.insert(system)
    }

    /// Remove a system, its planets, and every jump that leads to it.
    pub fn remove_system(&mut self, id: SystemId) -> Option<StarSystem> {
        let system = self.systems.remove(id)?;
        for planet in &system.planets {
            self.planets.remove(*planet);
        }
        for other in self.systems.values_mut() {
            other.jumps.retain(|jump| jump.target != id);
        }
        Some(system)
    }

    /// Add a planet to a system.
    pub fn add_planet(
        &mut self,
        system: SystemId,
        mut planet: Planet,
    ) -> Result<PlanetId, UniverseError> {
        if !self.systems.contains_key(system) {
            return Err(UniverseError::SystemNotFound(system));
        }
        planet.system = system;
        let id = self.planets.insert(planet);
        if let Some(sys) = self.systems.get_mut(system) {
            sys.planets.push(id);
        }
        Ok(id)
    }

    pub fn remove_planet(&mut self, id: PlanetId) -> Option<Planet> {
        let planet = self.planets.remove(id)?;
        if let Some(sys) = self.systems.get_mut(planet.system) {
            sys.planets.retain(|p| *p != id);
        }
        Some(planet)
    }

    /// Add a one-way jump. Re-adding an existing jump only updates its flags.
    pub fn add_jump(
        &mut self,
        from: SystemId,
        to: SystemId,
        flags: JumpFlags,
    ) -> Result<(), UniverseError> {
        if !self.systems.contains_key(to) {
            return Err(UniverseError::SystemNotFound(to));
        }
        let system = self
            .systems
            .get_mut(from)
            .ok_or(UniverseError::SystemNotFound(from))?;
        match system.jumps.iter_mut().find(|jump| jump.target == to) {
            Some(existing) => existing.flags = flags,
            None => system.jumps.push(JumpPoint { target: to, flags }),
        }
        Ok(())
    }

    /// Add plain jumps in both directions.
    pub fn connect(&mut self, a: SystemId, b: SystemId) -> Result<(), UniverseError> {
        self.add_jump(a, b, JumpFlags::default())?;
        self.add_jump(b, a, JumpFlags::default())
    }

    /// Remove the jumps between two systems in both directions.
    pub fn disconnect(&mut self, a: SystemId, b: SystemId) {
        if let Some(sys) = self.systems.get_mut(a) {
            sys.jumps.retain(|jump| jump.target != b);
        }
        if let Some(sys) = self.systems.get_mut(b) {
            sys.jumps.retain(|jump| jump.target != a);
        }
    }

    pub fn set_faction(
        &mut self,
        id: SystemId,
        faction: Option<FactionId>,
    ) -> Result<(), UniverseError> {
        let system = self
            .systems
            .get_mut(id)
            .ok_or(UniverseError::SystemNotFound(id))?;
        system.faction = faction;
        Ok(())
    }

    pub fn set_nebula(&mut self, id: SystemId, nebula: Nebula) -> Result<(), UniverseError> {
        let system = self
            .systems
            .get_mut(id)
            .ok_or(UniverseError::SystemNotFound(id))?;
        system.nebula = nebula;
        Ok(())
    }

    pub fn system(&self, id: SystemId) -> Option<&StarSystem> {
        self.systems.get(id)
    }

    pub fn planet(&self, id: PlanetId) -> Option<&Planet> {
        self.planets.get(id)
    }

    pub fn planet_mut(&mut self, id: PlanetId) -> Option<&mut Planet> {
        self.planets.get_mut(id)
    }

    pub fn systems(&self) -> impl Iterator<Item = (SystemId, &StarSystem)> {
        self.systems.iter()
    }

    pub fn planets(&self) -> impl Iterator<Item = (PlanetId, &Planet)> {
        self.planets.iter()
    }

    /// Planets orbiting `system`, in the order they were added.
    pub fn planets_in(&self, system: SystemId) -> impl Iterator<Item = (PlanetId, &Planet)> {
        self.systems
            .get(system)
            .map(|sys| sys.planets.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(|id| self.planets.get(*id).map(|planet| (*id, planet)))
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    pub fn planet_count(&self) -> usize {
        self.planets.len()
    }

    pub fn factions(&self) -> &FactionRelations {
        &self.factions
    }

    pub fn factions_mut(&mut self) -> &mut FactionRelations {
        &mut self.factions
    }
}

// ===========================================================================
// Tests
// ===========================================================================
