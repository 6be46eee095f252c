use starlane_core::id::CommodityId;

use crate::error::SolveError;

/// Something observable that happened during an economy pass.
#[derive(Debug, Clone, PartialEq)]
pub enum EconomyEvent {
    /// The admittance matrix was rebuilt.
    Refreshed {
        systems: usize,
        /// Stored matrix entries.
        entries: usize,
    },
    /// New prices were written for a commodity.
    PricesUpdated {
        commodity: CommodityId,
        min_multiplier: f64,
        max_multiplier: f64,
    },
    /// The solve for a commodity failed. Its previous prices were kept.
    SolveFailed {
        commodity: CommodityId,
        reason: SolveError,
    },
}
