//! Starlane Data -- galaxy definitions from RON, TOML or JSON files.
//!
//! A data directory holds `commodities`, `systems`, and optionally `factions`
//! and `economy` files, each in exactly one of the supported formats. The
//! loader resolves every name reference and produces a ready-to-simulate
//! [`GalaxyData`].

pub mod loader;
pub mod schema;
pub mod script;

pub use loader::{DataLoadError, GalaxyData, load_galaxy_data, load_galaxy_data_with};
pub use script::{NoScripts, ScriptError, ScriptHost};
