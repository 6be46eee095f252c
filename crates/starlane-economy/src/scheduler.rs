//! The economy lifecycle: init, refresh, update, destroy.
//!
//! ```text
//! Uninitialized --init--> Initialized --refresh--> Refreshing --> Ready
//!       ^                                                           |
//!       +------------------------- destroy -------------------------+
//! ```
//!
//! `refresh` is required after every permanent change to the universe
//! (systems, jumps, factions, nebulae, planets). `update` is called once per
//! simulated step and only does work while `Ready`.

use starlane_core::commodity::Catalog;
use starlane_core::credits::Credits;
use starlane_core::id::{CommodityId, PlanetId};
use starlane_core::universe::Universe;

use crate::admittance::{AdmittanceMatrix, SystemIndex, build_admittance};
use crate::config::EconomyConfig;
use crate::error::EconomyError;
use crate::event::EconomyEvent;
use crate::intensity::intensity_vector;
use crate::normalize::{normalize, write_prices};
use crate::solver::{CholeskySolver, SparseSolver};
use crate::state::PriceTable;
use crate::stats::{PriceSummary, average_price};

/// Lifecycle state of an [`EconomyContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EconomyState {
    Uninitialized,
    /// Per-planet state exists but there is no usable matrix.
    Initialized,
    /// The matrix is being rebuilt.
    Refreshing,
    Ready,
}

/// Owns everything the economy needs between passes: the catalog, per-planet
/// market state and the prepared admittance matrix.
///
/// The universe is borrowed per call and never stored.
#[derive(Debug)]
pub struct EconomyContext<S: SparseSolver = CholeskySolver> {
    catalog: Catalog,
    config: EconomyConfig,
    solver: S,
    state: EconomyState,
    table: PriceTable,
    index: SystemIndex,
    matrix: AdmittanceMatrix,
    prepared: Option<S::Prepared>,
    last_update: Option<f64>,
    refresh_queued: bool,
}

impl EconomyContext<CholeskySolver> {
    /// A context using sparse Cholesky factorization.
    pub fn new(catalog: Catalog, config: EconomyConfig) -> Result<Self, EconomyError> {
        Self::with_solver(catalog, config, CholeskySolver)
    }
}

impl<S: SparseSolver> EconomyContext<S> {
    pub fn with_solver(
        catalog: Catalog,
        config: EconomyConfig,
        solver: S,
    ) -> Result<Self, EconomyError> {
        config.validate()?;
        Ok(Self {
            catalog,
            config,
            solver,
            state: EconomyState::Uninitialized,
            table: PriceTable::default(),
            index: SystemIndex::default(),
            matrix: AdmittanceMatrix::default(),
            prepared: None,
            last_update: None,
            refresh_queued: false,
        })
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Allocate per-planet state and perform the first refresh.
    /// Does nothing if already initialized.
    pub fn init(&mut self, universe: &Universe) -> Result<Vec<EconomyEvent>, EconomyError> {
        if self.state != EconomyState::Uninitialized {
            tracing::debug!(state = ?self.state, "economy already initialized");
            return Ok(Vec::new());
        }
        self.table = PriceTable::new(universe, &self.catalog);
        self.state = EconomyState::Initialized;
        tracing::info!(
            planets = self.table.len(),
            commodities = self.catalog.len(),
            "economy initialized"
        );
        self.refresh(universe)
    }

    /// Rebuild the admittance matrix from the current universe, then run a
    /// zero-length update so prices reflect the new topology.
    ///
    /// On failure the context falls back to `Initialized` and later updates
    /// do nothing until a refresh succeeds.
    pub fn refresh(&mut self, universe: &Universe) -> Result<Vec<EconomyEvent>, EconomyError> {
        if self.state == EconomyState::Uninitialized {
            return Ok(Vec::new());
        }
        self.state = EconomyState::Refreshing;
        self.refresh_queued = false;

        let sync = self.table.sync(universe);
        if sync.added > 0 || sync.removed > 0 {
            tracing::debug!(added = sync.added, removed = sync.removed, "planet rows synced");
        }

        let built = build_admittance(universe, &self.config).and_then(|(index, matrix)| {
            let prepared = self.solver.prepare(&matrix)?;
            Ok((index, matrix, prepared))
        });
        let (index, matrix, prepared) = match built {
            Ok(parts) => parts,
            Err(e) => {
                tracing::error!(error = %e, "economy refresh failed");
                self.prepared = None;
                self.state = EconomyState::Initialized;
                return Err(e.into());
            }
        };

        let mut events = vec![EconomyEvent::Refreshed {
            systems: index.len(),
            entries: matrix.nnz(),
        }];
        self.index = index;
        self.matrix = matrix;
        self.prepared = Some(prepared);
        self.state = EconomyState::Ready;
        tracing::info!(systems = self.index.len(), "economy refreshed");

        events.extend(self.update(universe, 0.0));
        Ok(events)
    }

    /// Ask for a refresh to be run by the next [`exec_queued`](Self::exec_queued).
    pub fn queue_refresh(&mut self) {
        self.refresh_queued = true;
    }

    pub fn refresh_queued(&self) -> bool {
        self.refresh_queued
    }

    /// Run a queued refresh, if any.
    pub fn exec_queued(&mut self, universe: &Universe) -> Result<Vec<EconomyEvent>, EconomyError> {
        if !self.refresh_queued {
            return Ok(Vec::new());
        }
        self.refresh(universe)
    }

    /// Release the matrix and all per-planet state. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if self.state == EconomyState::Uninitialized {
            return;
        }
        self.table = PriceTable::default();
        self.index = SystemIndex::default();
        self.matrix = AdmittanceMatrix::default();
        self.prepared = None;
        self.last_update = None;
        self.refresh_queued = false;
        self.state = EconomyState::Uninitialized;
        tracing::info!("economy destroyed");
    }

    // -----------------------------------------------------------------------
    // Updates
    // -----------------------------------------------------------------------

    /// Advance every simulated commodity by `dt` and write new prices.
    ///
    /// A failed solve keeps that commodity's previous prices and is reported
    /// as [`EconomyEvent::SolveFailed`]; the other commodities still update.
    pub fn update(&mut self, universe: &Universe, dt: f64) -> Vec<EconomyEvent> {
        let mut events = Vec::new();
        if self.state != EconomyState::Ready {
            return events;
        }
        let Some(prepared) = self.prepared.as_ref() else {
            return events;
        };
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            tracing::warn!(dt, "invalid elapsed time treated as zero");
            0.0
        };

        for raw in 0..self.catalog.len() {
            let commodity = CommodityId(raw as u32);
            let Some(source) = self.catalog.source_mut(commodity) else {
                continue;
            };
            let mut potentials = intensity_vector(
                dt,
                universe,
                &self.index,
                commodity,
                source,
                &mut self.table,
                &self.config,
            );

            if let Err(reason) = self.solver.solve(prepared, &mut potentials) {
                tracing::warn!(?commodity, error = %reason, "economy solve failed, keeping prices");
                events.push(EconomyEvent::SolveFailed { commodity, reason });
                continue;
            }

            let Some((min_multiplier, max_multiplier)) = normalize(&mut potentials) else {
                continue;
            };
            write_prices(
                universe,
                &self.index,
                &self.catalog,
                commodity,
                &potentials,
                &mut self.table,
            );
            events.push(EconomyEvent::PricesUpdated {
                commodity,
                min_multiplier,
                max_multiplier,
            });
        }
        tracing::debug!(dt, events = events.len(), "economy updated");
        events
    }

    /// Update using an absolute timestamp. The first call after init uses a
    /// zero interval.
    pub fn update_at(&mut self, universe: &Universe, now: f64) -> Vec<EconomyEvent> {
        if self.state != EconomyState::Ready {
            return Vec::new();
        }
        let dt = self.last_update.map_or(0.0, |last| now - last);
        self.last_update = Some(now);
        self.update(universe, dt)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Current price of a commodity at a planet. Warns when either is unknown.
    pub fn price(&self, planet: PlanetId, commodity: CommodityId) -> Option<Credits> {
        if self.catalog.commodity(commodity).is_none() {
            tracing::warn!(?commodity, "price requested for unknown commodity");
            return None;
        }
        match self.table.get(planet, commodity) {
            Some(state) => Some(state.price),
            None => {
                tracing::warn!(?planet, "price requested for planet without market state");
                None
            }
        }
    }

    /// Mean and spread of a commodity's price over the planets trading it.
    pub fn average_price(&self, universe: &Universe, commodity: CommodityId) -> Option<PriceSummary> {
        average_price(universe, &self.table, commodity)
    }

    pub fn state(&self) -> EconomyState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == EconomyState::Ready
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    pub fn config(&self) -> &EconomyConfig {
        &self.config
    }

    pub fn table(&self) -> &PriceTable {
        &self.table
    }

    pub fn matrix(&self) -> &AdmittanceMatrix {
        &self.matrix
    }

    pub fn system_index(&self) -> &SystemIndex {
        &self.index
    }
}

// ===========================================================================
// Tests
// ===========================================================================
