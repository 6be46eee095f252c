//! Assembly of the sparse admittance (conductance) matrix.
//!
//! Systems are nodes, jump routes are resistors between them and every
//! system is additionally tied to ground through a fixed self-resistance.
//! The resulting matrix is symmetric and strictly diagonally dominant as long
//! as every route conductance is positive, which keeps it positive definite.

use std::collections::HashSet;

use nalgebra_sparse::{CooMatrix, CscMatrix};
use slotmap::SecondaryMap;
use starlane_core::id::SystemId;
use starlane_core::universe::Universe;

use crate::config::EconomyConfig;
use crate::error::BuildError;
use crate::resistance::route_resistance;

// ---------------------------------------------------------------------------
// System index
// ---------------------------------------------------------------------------

/// Dense `0..N` numbering of the systems that existed at the last build.
#[derive(Debug, Clone, Default)]
pub struct SystemIndex {
    order: Vec<SystemId>,
    positions: SecondaryMap<SystemId, usize>,
}

impl SystemIndex {
    pub fn new(universe: &Universe) -> Self {
        let mut order = Vec::with_capacity(universe.system_count());
        let mut positions = SecondaryMap::new();
        for (id, _) in universe.systems() {
            positions.insert(id, order.len());
            order.push(id);
        }
        Self { order, positions }
    }

    pub fn position(&self, id: SystemId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn system(&self, position: usize) -> Option<SystemId> {
        self.order.get(position).copied()
    }

    pub fn systems(&self) -> &[SystemId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Matrix
// ---------------------------------------------------------------------------

/// Square symmetric conductance matrix in compressed sparse column form.
#[derive(Debug, Clone)]
pub struct AdmittanceMatrix {
    csc: CscMatrix<f64>,
}

impl Default for AdmittanceMatrix {
    fn default() -> Self {
        Self {
            csc: CscMatrix::zeros(0, 0),
        }
    }
}

impl AdmittanceMatrix {
    /// Build from triplets. Entries at the same position are summed.
    pub fn from_triplets(
        dim: usize,
        triplets: impl IntoIterator<Item = (usize, usize, f64)>,
    ) -> Result<Self, BuildError> {
        let mut coo = CooMatrix::new(dim, dim);
        for (row, col, value) in triplets {
            if row >= dim || col >= dim {
                return Err(BuildError::OutOfBounds { row, col, dim });
            }
            coo.push(row, col, value);
        }
        Ok(Self {
            csc: CscMatrix::from(&coo),
        })
    }

    pub fn dim(&self) -> usize {
        self.csc.nrows()
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.csc.nnz()
    }

    /// Value at `(row, col)`; zero when not stored or out of range.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.csc
            .get_entry(row, col)
            .map_or(0.0, |entry| entry.into_value())
    }

    /// Stored `(row, col, value)` entries in column-major order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.csc.triplet_iter().map(|(r, c, &v)| (r, c, v))
    }

    pub fn csc(&self) -> &CscMatrix<f64> {
        &self.csc
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Assemble the admittance matrix of `universe`.
///
/// Each unordered pair of connected systems contributes its conductance
/// `g = 1 / R` once, no matter how many jumps (or in which directions) link
/// them. Jumps to systems that no longer exist and routes with a non-finite
/// conductance are skipped with a warning.
pub fn build_admittance(
    universe: &Universe,
    config: &EconomyConfig,
) -> Result<(SystemIndex, AdmittanceMatrix), BuildError> {
    let self_conductance = 1.0 / config.self_resistance;
    if !(self_conductance.is_finite() && self_conductance > 0.0) {
        return Err(BuildError::SelfResistance(config.self_resistance));
    }

    let index = SystemIndex::new(universe);
    let n = index.len();
    let mut triplets = Vec::with_capacity(n * 3);
    let mut seen = HashSet::new();

    for (id, system) in universe.systems() {
        let Some(i) = index.position(id) else {
            continue;
        };
        for jump in system.jumps() {
            let (Some(j), Some(target)) = (index.position(jump.target), universe.system(jump.target))
            else {
                tracing::warn!(from = %system.name, "jump to missing system ignored");
                continue;
            };
            if i == j || !seen.insert((i.min(j), i.max(j))) {
                continue;
            }
            let resistance = route_resistance(system, target, universe.factions(), config);
            let g = 1.0 / resistance;
            if !g.is_finite() {
                tracing::warn!(
                    from = %system.name,
                    to = %target.name,
                    resistance,
                    "non-finite route conductance ignored"
                );
                continue;
            }
            triplets.push((i, j, -g));
            triplets.push((j, i, -g));
            triplets.push((i, i, g));
            triplets.push((j, j, g));
        }
    }

    for i in 0..n {
        triplets.push((i, i, self_conductance));
    }

    let matrix = AdmittanceMatrix::from_triplets(n, triplets)?;
    tracing::debug!(systems = n, routes = seen.len(), nnz = matrix.nnz(), "admittance matrix built");
    Ok((index, matrix))
}
