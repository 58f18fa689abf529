use std::collections::BTreeMap;
use std::fmt;

use meritorder_core::fixed::{self, Fixed128};
use meritorder_core::TeamId;
use serde::{Deserialize, Serialize};

use crate::config::PolicyKind;

/// Names of the published metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Ecology,
    Finance,
    Stability,
    Balance,
    Popularity,
    Combined,
}

impl Metric {
    pub fn name(self) -> &'static str {
        match self {
            Self::Ecology => "ecology",
            Self::Finance => "finance",
            Self::Stability => "stability",
            Self::Balance => "balance",
            Self::Popularity => "popularity",
            Self::Combined => "combined",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One team's published metrics, rounded to two decimals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FinalScore {
    metrics: BTreeMap<Metric, f64>,
}

impl FinalScore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `value` under `metric`, rounding it.
    pub fn with(mut self, metric: Metric, value: Fixed128) -> Self {
        self.metrics.insert(metric, fixed::publish(value));
        self
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.metrics.get(&metric).copied()
    }

    pub fn metrics(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.metrics.iter().map(|(m, v)| (*m, *v))
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// Final scores of every team. Serializes as `{team: {metric: value}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scoreboard {
    #[serde(skip)]
    policy: PolicyKind,
    scores: BTreeMap<TeamId, FinalScore>,
}

impl Scoreboard {
    pub fn new(policy: PolicyKind, scores: BTreeMap<TeamId, FinalScore>) -> Self {
        Self { policy, scores }
    }

    pub fn policy(&self) -> PolicyKind {
        self.policy
    }

    pub fn get(&self, team: &TeamId) -> Option<&FinalScore> {
        self.scores.get(team)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TeamId, &FinalScore)> {
        self.scores.iter()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Teams ordered by `metric`, best first. Ties keep team order.
    pub fn ranking(&self, metric: Metric) -> Vec<(&TeamId, f64)> {
        let mut ranked: Vec<_> = self
            .scores
            .iter()
            .filter_map(|(team, score)| score.get(metric).map(|v| (team, v)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}
