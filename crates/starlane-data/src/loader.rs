//! Galaxy loading: commodity, faction and system files become a [`Catalog`]
//! and a [`Universe`], with names swapped for ids along the way.
//!
//! Each file may be written as RON, JSON or TOML; [`load_galaxy_data`] picks
//! whichever one is present.

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use starlane_core::commodity::{
    Catalog, CatalogBuilder, CatalogError, ConstantSource, JitteredSource, SupplyDemandSource,
};
use starlane_core::id::{CommodityId, FactionId, PlanetId, SystemId};
use starlane_core::universe::{JumpFlags, Planet, StarSystem, Universe, UniverseError};
use starlane_economy::config::{ConfigError, EconomyConfig};

use crate::schema::{CommodityData, CurveData, FactionData, SystemData};
use crate::script::{NoScripts, ScriptHost};

// ===========================================================================
// Errors
// ===========================================================================

/// Why a galaxy directory could not be turned into [`GalaxyData`].
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// `commodities` or `systems` is absent.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: &'static str, dir: PathBuf },

    /// Extension other than `.ron`, `.json` or `.toml`.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// e.g. both `systems.ron` and `systems.json`.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A faction, commodity or jump target that nothing defines.
    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    /// Names must be unique per kind across the whole galaxy.
    #[error("duplicate name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("universe error: {0}")]
    Universe(#[from] UniverseError),

    #[error("invalid economy config in {file}: {source}")]
    Config {
        file: PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Format from the file extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Path of `<base_name>.{ron,toml,json}` in `dir`, if exactly one exists.
///
/// Two or more spellings of the same file are rejected rather than letting
/// one silently shadow the other.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing,
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// [`find_data_file`] for files a galaxy cannot do without.
pub fn require_data_file(dir: &Path, base_name: &'static str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name,
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

fn parse_error(path: &Path, detail: impl ToString) -> DataLoadError {
    DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: detail.to_string(),
    }
}

/// Parse a single value, such as the economy settings.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(path, e)),
    }
}

/// Parse a list of records. RON and JSON hold the list at the top level; TOML
/// has no top-level arrays, so the list lives under `toml_key`
/// (`[[systems]]`, `[[factions]]`).
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => {
            let table: toml::Table = toml::from_str(&content).map_err(|e| parse_error(path, e))?;
            let array = table
                .get(toml_key)
                .ok_or_else(|| parse_error(path, format!("missing key '{toml_key}' in TOML file")))?
                .clone();
            array
                .try_into()
                .map_err(|e: toml::de::Error| parse_error(path, e))
        }
    }
}

// ===========================================================================
// Name resolution helpers
// ===========================================================================

/// Id behind a referenced name.
pub fn resolve_name<'a, V>(
    map: &'a HashMap<String, V>,
    name: &str,
    file: &Path,
    expected_kind: &'static str,
) -> Result<&'a V, DataLoadError> {
    map.get(name).ok_or_else(|| DataLoadError::UnresolvedRef {
        file: file.to_path_buf(),
        name: name.to_string(),
        expected_kind,
    })
}

/// Fails with [`DataLoadError::DuplicateName`] when `name` is already taken.
pub fn check_duplicate<V>(
    map: &HashMap<String, V>,
    name: &str,
    file: &Path,
) -> Result<(), DataLoadError> {
    if map.contains_key(name) {
        Err(DataLoadError::DuplicateName {
            file: file.to_path_buf(),
            name: name.to_string(),
        })
    } else {
        Ok(())
    }
}

// ===========================================================================
// Galaxy loading
// ===========================================================================

/// Everything needed to start an economy, plus name lookups for the host.
#[derive(Debug)]
pub struct GalaxyData {
    pub catalog: Catalog,
    pub universe: Universe,
    pub config: EconomyConfig,
    pub systems: HashMap<String, SystemId>,
    pub planets: HashMap<String, PlanetId>,
    pub factions: HashMap<String, FactionId>,
}

/// Load a galaxy from `dir` without script support. Commodities that name a
/// script fall back to their curve.
pub fn load_galaxy_data(dir: &Path) -> Result<GalaxyData, DataLoadError> {
    load_galaxy_data_with(dir, &mut NoScripts)
}

/// Load a galaxy from `dir`, asking `scripts` for each commodity script.
pub fn load_galaxy_data_with(
    dir: &Path,
    scripts: &mut dyn ScriptHost,
) -> Result<GalaxyData, DataLoadError> {
    let catalog = load_catalog(dir, scripts)?;
    let commodity_ids: HashMap<String, CommodityId> = catalog
        .iter()
        .map(|(id, c)| (c.name.clone(), id))
        .collect();

    let mut universe = Universe::new();
    let factions = load_factions(dir, &mut universe)?;

    let systems_path = require_data_file(dir, "systems")?;
    let system_data: Vec<SystemData> = deserialize_list(&systems_path, "systems")?;

    // Pass 1: systems and planets.
    let mut systems: HashMap<String, SystemId> = HashMap::new();
    let mut planets: HashMap<String, PlanetId> = HashMap::new();
    for data in &system_data {
        check_duplicate(&systems, &data.name, &systems_path)?;
        let mut system =
            StarSystem::new(&data.name).with_nebula(data.nebula_density, data.nebula_volatility);
        if let Some(faction) = &data.faction {
            system.faction = Some(*resolve_name(&factions, faction, &systems_path, "faction")?);
        }
        let system_id = universe.add_system(system);
        systems.insert(data.name.clone(), system_id);

        for planet_data in &data.planets {
            check_duplicate(&planets, &planet_data.name, &systems_path)?;
            let commodities = planet_data
                .commodities
                .iter()
                .map(|name| resolve_name(&commodity_ids, name, &systems_path, "commodity").copied())
                .collect::<Result<Vec<_>, _>>()?;
            let mut planet =
                Planet::new(&planet_data.name, planet_data.population).with_commodities(commodities);
            if let Some(inhabited) = planet_data.inhabited {
                planet.inhabited = inhabited;
            }
            let planet_id = universe.add_planet(system_id, planet)?;
            planets.insert(planet_data.name.clone(), planet_id);
        }
    }

    // Pass 2: jumps, now that every system has an id.
    for data in &system_data {
        let from = *resolve_name(&systems, &data.name, &systems_path, "system")?;
        for jump in &data.jumps {
            let to = *resolve_name(&systems, &jump.target, &systems_path, "system")?;
            let flags = JumpFlags {
                exit_only: jump.exit_only,
                hidden: jump.hidden,
            };
            universe.add_jump(from, to, flags)?;
        }
    }

    let config = match find_data_file(dir, "economy")? {
        Some(path) => {
            let config: EconomyConfig = deserialize_file(&path)?;
            config
                .validate()
                .map_err(|source| DataLoadError::Config { file: path, source })?;
            config
        }
        None => EconomyConfig::default(),
    };

    tracing::info!(
        commodities = catalog.len(),
        systems = universe.system_count(),
        planets = universe.planet_count(),
        factions = factions.len(),
        "galaxy data loaded"
    );

    Ok(GalaxyData {
        catalog,
        universe,
        config,
        systems,
        planets,
        factions,
    })
}

fn curve_source(curve: &CurveData) -> Box<dyn SupplyDemandSource> {
    if curve.jitter > 0.0 {
        Box::new(JitteredSource::new(
            curve.supply,
            curve.demand,
            curve.jitter,
            curve.seed,
        ))
    } else {
        Box::new(ConstantSource::new(curve.supply, curve.demand))
    }
}

fn load_catalog(dir: &Path, scripts: &mut dyn ScriptHost) -> Result<Catalog, DataLoadError> {
    let path = require_data_file(dir, "commodities")?;
    let data: Vec<CommodityData> = deserialize_list(&path, "commodities")?;

    let mut builder = CatalogBuilder::new();
    for commodity in &data {
        if builder.id(&commodity.name).is_some() {
            return Err(DataLoadError::DuplicateName {
                file: path,
                name: commodity.name.clone(),
            });
        }
        builder.register(&commodity.name, &commodity.description, commodity.price);

        let mut source = None;
        if let Some(script) = &commodity.script {
            match scripts.load(&commodity.name, &dir.join(script)) {
                Ok(loaded) => source = Some(loaded),
                Err(e) => tracing::warn!(
                    commodity = %commodity.name,
                    script = %script,
                    error = %e,
                    "commodity script failed to load"
                ),
            }
        }
        if source.is_none() {
            source = commodity.curve.as_ref().map(curve_source);
        }
        if let Some(source) = source {
            builder.attach_source(&commodity.name, source)?;
        }
    }
    Ok(builder.build()?)
}

fn load_factions(
    dir: &Path,
    universe: &mut Universe,
) -> Result<HashMap<String, FactionId>, DataLoadError> {
    let mut ids: HashMap<String, FactionId> = HashMap::new();
    let Some(path) = find_data_file(dir, "factions")? else {
        return Ok(ids);
    };
    let data: Vec<FactionData> = deserialize_list(&path, "factions")?;

    for faction in &data {
        check_duplicate(&ids, &faction.name, &path)?;
        ids.insert(faction.name.clone(), FactionId(ids.len() as u32));
    }
    for faction in &data {
        let id = *resolve_name(&ids, &faction.name, &path, "faction")?;
        for ally in &faction.allies {
            let other = *resolve_name(&ids, ally, &path, "faction")?;
            universe.factions_mut().set_allies(id, other);
        }
        for enemy in &faction.enemies {
            let other = *resolve_name(&ids, enemy, &path, "faction")?;
            universe.factions_mut().set_enemies(id, other);
        }
    }
    Ok(ids)
}

// ===========================================================================
// Tests
// ===========================================================================
