use std::collections::BTreeMap;

use crate::fixed::Fixed64;
use crate::plant::{PlantKind, PlantSpec};

/// Builder for constructing an immutable [`PlantCatalog`].
///
/// Registering the same kind twice keeps the last spec. Validation happens
/// once, in [`build`](Self::build).
#[derive(Debug, Default)]
pub struct PlantCatalogBuilder {
    plants: BTreeMap<PlantKind, PlantSpec>,
}

impl PlantCatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the spec for a kind.
    pub fn register(&mut self, kind: PlantKind, spec: PlantSpec) -> &mut Self {
        self.plants.insert(kind, spec);
        self
    }

    /// Validate and freeze the catalog.
    pub fn build(self) -> Result<PlantCatalog, CatalogError> {
        let hundred = Fixed64::from_num(100);
        for (&kind, spec) in &self.plants {
            if spec.price < Fixed64::ZERO {
                return Err(CatalogError::NegativeValue { kind, field: "price" });
            }
            if spec.co2_intensity < Fixed64::ZERO {
                return Err(CatalogError::NegativeValue {
                    kind,
                    field: "co2_intensity",
                });
            }
            if spec.derating < Fixed64::ZERO || spec.derating > hundred {
                return Err(CatalogError::DeratingOutOfRange {
                    kind,
                    derating: spec.derating.to_num::<f64>(),
                });
            }
        }
        Ok(PlantCatalog {
            plants: self.plants,
        })
    }
}

/// Immutable per-kind price, emission and derating table.
///
/// Frozen after [`PlantCatalogBuilder::build`]; shared read-only by every
/// dispatch, so it is safe to hand one `&PlantCatalog` to many threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantCatalog {
    plants: BTreeMap<PlantKind, PlantSpec>,
}

impl PlantCatalog {
    pub fn builder() -> PlantCatalogBuilder {
        PlantCatalogBuilder::new()
    }

    /// The game's default table.
    pub fn standard() -> Self {
        let table = [
            (PlantKind::Coal, PlantSpec::new(101.0, 1.0, 87.9)),
            (PlantKind::Gas, PlantSpec::new(132.0, 0.5, 95.0)),
            (PlantKind::Nuclear, PlantSpec::new(15.0, 0.0, 92.1)),
            (PlantKind::Water, PlantSpec::new(0.0, 0.0, 41.0)),
            (PlantKind::WaterStorage, PlantSpec::new(0.0, 0.0, 41.0)),
            (PlantKind::Wind, PlantSpec::new(0.0, 0.0, 7.3)),
            (PlantKind::Photovoltaic, PlantSpec::new(0.0, 0.0, 2.7)),
            (PlantKind::Battery, PlantSpec::new(0.0, 0.0, 0.0)),
        ];
        Self {
            plants: table.into_iter().collect(),
        }
    }

    pub fn spec(&self, kind: PlantKind) -> Result<&PlantSpec, CatalogError> {
        self.plants.get(&kind).ok_or(CatalogError::MissingPlant(kind))
    }

    pub fn price(&self, kind: PlantKind) -> Result<Fixed64, CatalogError> {
        self.spec(kind).map(|s| s.price)
    }

    pub fn co2_intensity(&self, kind: PlantKind) -> Result<Fixed64, CatalogError> {
        self.spec(kind).map(|s| s.co2_intensity)
    }

    pub fn derating(&self, kind: PlantKind) -> Result<Fixed64, CatalogError> {
        self.spec(kind).map(|s| s.derating)
    }

    pub fn contains(&self, kind: PlantKind) -> bool {
        self.plants.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.plants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }

    /// Registered kinds with their specs, in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (PlantKind, &PlantSpec)> {
        self.plants.iter().map(|(&k, s)| (k, s))
    }

    /// Most expensive generation price in the table (zero when empty).
    pub fn max_price(&self) -> Fixed64 {
        self.plants
            .values()
            .map(|s| s.price)
            .fold(Fixed64::ZERO, Fixed64::max)
    }

    /// Dirtiest CO2 intensity in the table (zero when empty).
    pub fn max_co2_intensity(&self) -> Fixed64 {
        self.plants
            .values()
            .map(|s| s.co2_intensity)
            .fold(Fixed64::ZERO, Fixed64::max)
    }
}

impl Default for PlantCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("plant kind {0} has no catalog entry")]
    MissingPlant(PlantKind),
    #[error("derating {derating} for {kind} is outside 0..=100")]
    DeratingOutOfRange { kind: PlantKind, derating: f64 },
    #[error("negative {field} for {kind}")]
    NegativeValue { kind: PlantKind, field: &'static str },
}
