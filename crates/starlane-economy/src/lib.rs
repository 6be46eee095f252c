//! Starlane Economy -- galaxy-wide commodity prices by nodal analysis.
//!
//! The universe is treated as an electrical network: star systems are nodes,
//! jump routes are resistors and every system leaks to ground through a fixed
//! self-resistance. For each simulated commodity the economy injects a
//! per-system intensity (demand pushes current in, production pulls it out),
//! solves `G * x = I` for the node potentials and rescales those potentials
//! into price multipliers.
//!
//! # Update Pipeline
//!
//! 1. **Refresh** (only after the universe changes) -- assemble the sparse
//!    admittance matrix `G` and factorize it.
//! 2. **Intensity** -- advance each inhabited planet's production and demand
//!    trackers and fold them into one value per system.
//! 3. **Solve** -- reuse the factorization to solve for potentials.
//! 4. **Normalize** -- map potentials to `[0, 1]` and write
//!    `base_price * multiplier` to every planet of the system.
//!
//! # Key Types
//!
//! - [`scheduler::EconomyContext`] -- Lifecycle owner: `init`, `refresh`,
//!   `update`, `destroy`.
//! - [`admittance::AdmittanceMatrix`] -- Symmetric sparse conductance matrix.
//! - [`solver::SparseSolver`] -- Prepare-once, solve-many solver seam, with a
//!   sparse Cholesky and a conjugate gradient implementation.
//! - [`state::PriceTable`] -- Per-planet, per-commodity supply, demand and
//!   price.
//! - [`config::EconomyConfig`] -- Resistances, variabilities and the
//!   intensity response.
//!
//! ```rust,ignore
//! let mut economy = EconomyContext::new(catalog, EconomyConfig::default())?;
//! economy.init(&universe)?;
//! for now in ticks {
//!     for event in economy.update_at(&universe, now) { /* ... */ }
//! }
//! ```

pub mod admittance;
pub mod config;
pub mod error;
pub mod event;
pub mod intensity;
pub mod normalize;
pub mod resistance;
pub mod scheduler;
pub mod solver;
pub mod state;
pub mod stats;

pub use config::{Aggregation, EconomyConfig};
pub use error::{BuildError, EconomyError, SolveError};
pub use event::EconomyEvent;
pub use scheduler::{EconomyContext, EconomyState};
