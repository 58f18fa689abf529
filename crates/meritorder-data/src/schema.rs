//! Serde structs for the on-disk scenario format.
//!
//! These mirror the data files one to one. They are deserialized from RON,
//! JSON, or TOML and then converted into engine types by the loader, which
//! is where quantities are range-checked and turned into fixed-point.

use std::collections::BTreeMap;

use meritorder_core::PlantKind;
use serde::Deserialize;

// ===========================================================================
// Catalog
// ===========================================================================

/// One row of the plant catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct PlantData {
    pub kind: PlantKind,
    pub price: f64,
    pub co2_intensity: f64,
    pub derating: f64,
}

// ===========================================================================
// History
// ===========================================================================

/// One team's submission for one round.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestData {
    /// `(kind, output)` pairs in submission order.
    #[serde(default)]
    pub productions: Vec<(PlantKind, f64)>,
    pub total_consumption: f64,
}

/// All submissions of one round, keyed by team name.
pub type RoundData = BTreeMap<String, RequestData>;

// ===========================================================================
// Buildings
// ===========================================================================

/// Building consumption per team name.
pub type BuildingsData = BTreeMap<String, f64>;
