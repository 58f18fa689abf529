use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::fixed::Fixed64;

/// The closed set of generation technologies a team can build.
///
/// Kinds carry no data of their own: price, emissions and derating come from
/// the [`PlantCatalog`](crate::catalog::PlantCatalog) the dispatch runs
/// against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlantKind {
    Coal,
    Gas,
    Nuclear,
    Water,
    WaterStorage,
    Wind,
    Photovoltaic,
    Battery,
}

impl PlantKind {
    /// Every kind, in declaration order.
    pub const ALL: [PlantKind; 8] = [
        PlantKind::Coal,
        PlantKind::Gas,
        PlantKind::Nuclear,
        PlantKind::Water,
        PlantKind::WaterStorage,
        PlantKind::Wind,
        PlantKind::Photovoltaic,
        PlantKind::Battery,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PlantKind::Coal => "COAL",
            PlantKind::Gas => "GAS",
            PlantKind::Nuclear => "NUCLEAR",
            PlantKind::Water => "WATER",
            PlantKind::WaterStorage => "WATER_STORAGE",
            PlantKind::Wind => "WIND",
            PlantKind::Photovoltaic => "PHOTOVOLTAIC",
            PlantKind::Battery => "BATTERY",
        }
    }
}

impl fmt::Display for PlantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown plant kind: {0}")]
pub struct ParsePlantKindError(pub String);

impl FromStr for PlantKind {
    type Err = ParsePlantKindError;

    /// Accepts the canonical upper-case names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlantKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParsePlantKindError(s.to_string()))
    }
}

/// Static attributes of one plant kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantSpec {
    /// Marginal generation price, currency per MWh.
    pub price: Fixed64,
    /// Emissions, tonnes CO2-eq per MWh.
    pub co2_intensity: Fixed64,
    /// Availability score in `[0, 100]`.
    pub derating: Fixed64,
}

impl PlantSpec {
    pub fn new(price: f64, co2_intensity: f64, derating: f64) -> Self {
        Self {
            price: Fixed64::from_num(price),
            co2_intensity: Fixed64::from_num(co2_intensity),
            derating: Fixed64::from_num(derating),
        }
    }
}
