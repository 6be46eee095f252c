//! Commodity definitions and their supply/demand sources.
//!
//! The catalog follows a two-phase lifecycle: commodities are registered on a
//! [`CatalogBuilder`], then frozen into an immutable [`Catalog`]. The only
//! state that stays mutable afterwards is each commodity's attached
//! [`SupplyDemandSource`], which may carry its own internal state (an RNG, a
//! script interpreter, ...).

use std::collections::HashMap;
use std::fmt;

use crate::credits::Credits;
use crate::id::CommodityId;
use crate::rng::SimRng;

// ---------------------------------------------------------------------------
// Supply/demand capability
// ---------------------------------------------------------------------------

/// A raw supply/demand sample. Values may be negative or non-finite; the
/// economy clamps them before use.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SupplyDemand {
    pub supply: f64,
    pub demand: f64,
}

impl SupplyDemand {
    pub fn new(supply: f64, demand: f64) -> Self {
        Self { supply, demand }
    }
}

/// Something that can be asked for a commodity's current supply and demand.
///
/// Called once per inhabited planet per update pass. Implementations must be
/// synchronous and must not call back into the economy.
pub trait SupplyDemandSource: fmt::Debug {
    fn evaluate(&mut self) -> SupplyDemand;
}

/// Always yields the same pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantSource {
    pub value: SupplyDemand,
}

impl ConstantSource {
    pub fn new(supply: f64, demand: f64) -> Self {
        Self {
            value: SupplyDemand::new(supply, demand),
        }
    }
}

impl SupplyDemandSource for ConstantSource {
    fn evaluate(&mut self) -> SupplyDemand {
        self.value
    }
}

/// A base pair perturbed by approximately normal noise.
///
/// Each sample is `base * (1 + jitter * g)` with `g` drawn from [`SimRng`],
/// so two sources built with the same seed produce the same sequence.
#[derive(Debug, Clone)]
pub struct JitteredSource {
    base: SupplyDemand,
    jitter: f64,
    rng: SimRng,
}

impl JitteredSource {
    pub fn new(supply: f64, demand: f64, jitter: f64, seed: u64) -> Self {
        Self {
            base: SupplyDemand::new(supply, demand),
            jitter,
            rng: SimRng::new(seed),
        }
    }
}

impl SupplyDemandSource for JitteredSource {
    fn evaluate(&mut self) -> SupplyDemand {
        let supply = self.base.supply * (1.0 + self.jitter * self.rng.next_gaussian());
        let demand = self.base.demand * (1.0 + self.jitter * self.rng.next_gaussian());
        SupplyDemand { supply, demand }
    }
}

/// Adapts a closure into a source.
pub struct FnSource<F> {
    f: F,
}

impl<F> FnSource<F>
where
    F: FnMut() -> SupplyDemand,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> fmt::Debug for FnSource<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSource").finish_non_exhaustive()
    }
}

impl<F> SupplyDemandSource for FnSource<F>
where
    F: FnMut() -> SupplyDemand,
{
    fn evaluate(&mut self) -> SupplyDemand {
        (self.f)()
    }
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// Immutable identity of a tradable good.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commodity {
    pub name: String,
    pub description: String,
    pub base_price: Credits,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate commodity: {0}")]
    Duplicate(String),
    #[error("commodity {name} has negative base price {price}")]
    NegativePrice { name: String, price: Credits },
    #[error("not found: {0}")]
    NotFound(String),
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Collects commodity definitions before freezing them into a [`Catalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    commodities: Vec<Commodity>,
    sources: Vec<Option<Box<dyn SupplyDemandSource>>>,
    name_to_id: HashMap<String, CommodityId>,
    duplicates: Vec<String>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a commodity. Returns its ID.
    ///
    /// Registering a name twice is recorded and reported by [`build`](Self::build).
    pub fn register(&mut self, name: &str, description: &str, base_price: Credits) -> CommodityId {
        let id = CommodityId(self.commodities.len() as u32);
        self.commodities.push(Commodity {
            name: name.to_string(),
            description: description.to_string(),
            base_price,
        });
        self.sources.push(None);
        if self.name_to_id.insert(name.to_string(), id).is_some() {
            self.duplicates.push(name.to_string());
        }
        id
    }

    /// Attach (or replace) the supply/demand source of a registered commodity.
    pub fn attach_source(
        &mut self,
        name: &str,
        source: Box<dyn SupplyDemandSource>,
    ) -> Result<(), CatalogError> {
        let id = self
            .name_to_id
            .get(name)
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))?;
        self.sources[id.index()] = Some(source);
        Ok(())
    }

    pub fn id(&self, name: &str) -> Option<CommodityId> {
        self.name_to_id.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.commodities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commodities.is_empty()
    }

    /// Validate and freeze.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        if let Some(name) = self.duplicates.into_iter().next() {
            return Err(CatalogError::Duplicate(name));
        }
        if let Some(bad) = self.commodities.iter().find(|c| c.base_price < 0) {
            return Err(CatalogError::NegativePrice {
                name: bad.name.clone(),
                price: bad.base_price,
            });
        }
        Ok(Catalog {
            commodities: self.commodities,
            sources: self.sources,
            name_to_id: self.name_to_id,
        })
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Frozen commodity catalog. Definitions cannot change after build.
#[derive(Debug, Default)]
pub struct Catalog {
    commodities: Vec<Commodity>,
    sources: Vec<Option<Box<dyn SupplyDemandSource>>>,
    name_to_id: HashMap<String, CommodityId>,
}

impl Catalog {
    /// Look up a commodity by name, warning when it does not exist.
    pub fn get(&self, name: &str) -> Option<CommodityId> {
        let id = self.find(name);
        if id.is_none() {
            tracing::warn!(commodity = name, "commodity not found");
        }
        id
    }

    /// Look up a commodity by name without warning.
    pub fn find(&self, name: &str) -> Option<CommodityId> {
        self.name_to_id.get(name).copied()
    }

    pub fn commodity(&self, id: CommodityId) -> Option<&Commodity> {
        self.commodities.get(id.index())
    }

    pub fn base_price(&self, id: CommodityId) -> Option<Credits> {
        self.commodity(id).map(|c| c.base_price)
    }

    pub fn has_source(&self, id: CommodityId) -> bool {
        matches!(self.sources.get(id.index()), Some(Some(_)))
    }

    /// The attached source, if any. Sources keep internal state so access is
    /// mutable even though the definitions are not.
    pub fn source_mut(&mut self, id: CommodityId) -> Option<&mut (dyn SupplyDemandSource + 'static)> {
        self.sources.get_mut(id.index())?.as_deref_mut()
    }

    /// Drop the source of a commodity, turning it into a static good.
    pub fn detach_source(&mut self, id: CommodityId) -> Option<Box<dyn SupplyDemandSource>> {
        self.sources.get_mut(id.index())?.take()
    }

    pub fn len(&self) -> usize {
        self.commodities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commodities.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = CommodityId> + '_ {
        (0..self.commodities.len() as u32).map(CommodityId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CommodityId, &Commodity)> {
        self.commodities
            .iter()
            .enumerate()
            .map(|(i, c)| (CommodityId(i as u32), c))
    }

    /// Commodity ids ordered by base price descending, then by name.
    pub fn by_value(&self) -> Vec<CommodityId> {
        let mut ids: Vec<CommodityId> = self.ids().collect();
        ids.sort_by(|a, b| {
            let ca = &self.commodities[a.index()];
            let cb = &self.commodities[b.index()];
            cb.base_price
                .cmp(&ca.base_price)
                .then_with(|| ca.name.cmp(&cb.name))
        });
        ids
    }
}
