use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a star system in the universe.
    pub struct SystemId;

    /// Identifies a planet in the universe.
    pub struct PlanetId;
}

/// Identifies a commodity in the catalog. Cheap to copy and compare.
///
/// The wrapped value is the commodity's position in the catalog, so it
/// doubles as the column index of per-planet price tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CommodityId(pub u32);

impl CommodityId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies a faction controlling star systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FactionId(pub u32);
