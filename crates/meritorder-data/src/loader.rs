//! Scenario loading: finds data files, deserializes them, and converts them
//! into engine types.
//!
//! A scenario directory holds up to four files, each in RON, TOML, or JSON:
//!
//! - `history.*` (required) -- the rounds of per-team submissions.
//! - `catalog.*` -- plant table; the standard catalog when absent.
//! - `scoring.*` -- scoring tunables; defaults when absent.
//! - `buildings.*` -- building consumption per team; zero when absent.

use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use meritorder_core::fixed::{Fixed64, f64_to_fixed64};
use meritorder_core::{
    CatalogError, DispatchRequest, History, PlantCatalog, PlantKind, PlantSpec, ProductionBlock,
    Round, TeamId,
};
use meritorder_scoring::{ScoringConfig, ScoringError};

use crate::schema::{BuildingsData, PlantData, RoundData};

/// Largest quantity accepted from a data file. One round of this size clears
/// against the standard catalog; dearer catalogs can still overflow, which
/// scoring reports as an error.
pub const MAX_QUANTITY: f64 = 1.0e7;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: &'static str, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A value parsed but is outside what the engine accepts.
    #[error("invalid value in {file}: {detail}")]
    Invalid { file: PathBuf, detail: String },

    /// The same plant kind appears twice in a catalog file.
    #[error("duplicate plant '{kind}' in {file}")]
    DuplicatePlant { file: PathBuf, kind: PlantKind },

    /// The catalog file describes an invalid catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The scoring file holds tunables the aggregator would reject.
    #[error("{file}: {source}")]
    Scoring {
        file: PathBuf,
        #[source]
        source: ScoringError,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
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

/// Scan a directory for a data file with the given base name (without extension).
///
/// Looks for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`.
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let extensions = ["ron", "toml", "json"];
    let mut found: Option<PathBuf> = None;

    for ext in &extensions {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(ref existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing.clone(),
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
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

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(path, e)),
    }
}

/// Deserialize a list from a file. For TOML files, extracts the array at the
/// given `toml_key` from a top-level table. For RON and JSON, deserializes
/// directly as `Vec<T>`.
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
            let table: toml::Value = toml::from_str(&content).map_err(|e| parse_error(path, e))?;
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
// Conversion
// ===========================================================================

/// Range-check a quantity and convert it to fixed-point.
pub fn quantity(value: f64, what: &str, file: &Path) -> Result<Fixed64, DataLoadError> {
    if !value.is_finite() || !(0.0..=MAX_QUANTITY).contains(&value) {
        return Err(DataLoadError::Invalid {
            file: file.to_path_buf(),
            detail: format!("{what} must lie in 0..={MAX_QUANTITY}, got {value}"),
        });
    }
    Ok(f64_to_fixed64(value))
}

fn build_catalog(rows: Vec<PlantData>, file: &Path) -> Result<PlantCatalog, DataLoadError> {
    let mut seen = BTreeSet::new();
    let mut builder = PlantCatalog::builder();
    for row in rows {
        if !seen.insert(row.kind) {
            return Err(DataLoadError::DuplicatePlant {
                file: file.to_path_buf(),
                kind: row.kind,
            });
        }
        for (what, v) in [
            ("price", row.price),
            ("co2_intensity", row.co2_intensity),
            ("derating", row.derating),
        ] {
            if !v.is_finite() || v.abs() > MAX_QUANTITY {
                return Err(DataLoadError::Invalid {
                    file: file.to_path_buf(),
                    detail: format!("{what} of {} is out of range: {v}", row.kind),
                });
            }
        }
        builder.register(
            row.kind,
            PlantSpec::new(row.price, row.co2_intensity, row.derating),
        );
    }
    Ok(builder.build()?)
}

fn build_round(data: RoundData, file: &Path) -> Result<Round, DataLoadError> {
    data.into_iter()
        .map(|(team, req)| {
            let productions = req
                .productions
                .iter()
                .map(|&(kind, output)| {
                    Ok(ProductionBlock {
                        kind,
                        output: quantity(output, "production output", file)?,
                    })
                })
                .collect::<Result<Vec<_>, DataLoadError>>()?;
            let demand = quantity(req.total_consumption, "total_consumption", file)?;
            Ok((TeamId::new(team), DispatchRequest { productions, demand }))
        })
        .collect()
}

fn build_buildings(
    data: BuildingsData,
    file: &Path,
) -> Result<BTreeMap<TeamId, Fixed64>, DataLoadError> {
    data.into_iter()
        .map(|(team, v)| Ok((TeamId::new(team), quantity(v, "building consumption", file)?)))
        .collect()
}

// ===========================================================================
// Scenario
// ===========================================================================

/// Everything needed to score one game.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub catalog: PlantCatalog,
    pub config: ScoringConfig,
    pub history: History,
    pub building_consumptions: BTreeMap<TeamId, Fixed64>,
}

/// Load a scenario directory. See the module docs for the expected files.
pub fn load_scenario(dir: &Path) -> Result<Scenario, DataLoadError> {
    let catalog = match find_data_file(dir, "catalog")? {
        Some(path) => build_catalog(deserialize_list(&path, "plants")?, &path)?,
        None => PlantCatalog::standard(),
    };

    let config = match find_data_file(dir, "scoring")? {
        Some(path) => {
            let config: ScoringConfig = deserialize_file(&path)?;
            config
                .validate()
                .map_err(|source| DataLoadError::Scoring { file: path, source })?;
            config
        }
        None => ScoringConfig::default(),
    };

    let history_path = require_data_file(dir, "history")?;
    let rounds: Vec<RoundData> = deserialize_list(&history_path, "rounds")?;
    let history = History::new(
        rounds
            .into_iter()
            .map(|r| build_round(r, &history_path))
            .collect::<Result<_, _>>()?,
    );

    let building_consumptions = match find_data_file(dir, "buildings")? {
        Some(path) => build_buildings(deserialize_file(&path)?, &path)?,
        None => BTreeMap::new(),
    };

    tracing::debug!(
        dir = %dir.display(),
        plants = catalog.len(),
        rounds = history.round_count(),
        teams = history.teams().len(),
        "scenario loaded"
    );

    Ok(Scenario {
        catalog,
        config,
        history,
        building_consumptions,
    })
}
