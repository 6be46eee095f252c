//! Hook for commodity supply/demand scripts.
//!
//! This crate does not embed an interpreter. A host that has one implements
//! [`ScriptHost`] and hands back a [`SupplyDemandSource`] per script.

use std::path::Path;

use starlane_core::commodity::SupplyDemandSource;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ScriptError(pub String);

/// Turns a commodity script into a supply/demand source.
pub trait ScriptHost {
    fn load(
        &mut self,
        commodity: &str,
        path: &Path,
    ) -> Result<Box<dyn SupplyDemandSource>, ScriptError>;
}

/// A host without an interpreter. Every script fails to load.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScripts;

impl ScriptHost for NoScripts {
    fn load(
        &mut self,
        _commodity: &str,
        path: &Path,
    ) -> Result<Box<dyn SupplyDemandSource>, ScriptError> {
        Err(ScriptError(format!(
            "no script host available for {}",
            path.display()
        )))
    }
}
