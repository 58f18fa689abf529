use std::fmt;

use meritorder_core::Fixed64;
use meritorder_core::fixed::f64_to_fixed64;
use serde::{Deserialize, Serialize};

use crate::error::ScoringError;

/// Largest magnitude a tunable may take so it stays inside the Q32.32 range
/// once multiplied by a round count or a percentage.
const MAX_TUNABLE: f64 = 1.0e7;

/// Which normalization turns a team ledger into its final metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Min-max ranking against the other teams, offset by `score_offset`.
    #[default]
    Relative,
    /// Percentages against catalog bounds; adds `balance` and `combined`.
    Absolute,
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relative => f.write_str("relative"),
            Self::Absolute => f.write_str("absolute"),
        }
    }
}

/// Scoring tunables, as read from `scoring.{ron,toml,json}`.
///
/// Every field has a default, so a partial file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub policy: PolicyKind,
    /// A round is a blackout once |offered output - demand| exceeds this.
    pub blackout_offset: f64,
    /// Stability contribution of a blackout round, in [0, 100].
    pub blackout_penalty: f64,
    /// Balance tolerance as a percentage of consumption (absolute policy).
    pub balance_cutoff_percent: f64,
    /// Added to every relative metric.
    pub score_offset: f64,
    /// Building consumption worth 100 popularity (absolute policy).
    pub max_popularity_bound: f64,
    /// Popularity credited per unit of building consumption (relative policy).
    pub popularity_per_unit: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::Relative,
            blackout_offset: 50.0,
            blackout_penalty: 50.0,
            balance_cutoff_percent: 10.0,
            score_offset: 248.2,
            max_popularity_bound: 1000.0,
            popularity_per_unit: 0.5,
        }
    }
}

impl ScoringConfig {
    pub fn with_policy(mut self, policy: PolicyKind) -> Self {
        self.policy = policy;
        self
    }

    /// Reject tunables that make the run meaningless. Called once before any
    /// round is replayed.
    pub fn validate(&self) -> Result<(), ScoringError> {
        let fields = [
            ("blackout_offset", self.blackout_offset),
            ("blackout_penalty", self.blackout_penalty),
            ("balance_cutoff_percent", self.balance_cutoff_percent),
            ("score_offset", self.score_offset),
            ("max_popularity_bound", self.max_popularity_bound),
            ("popularity_per_unit", self.popularity_per_unit),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value.abs() > MAX_TUNABLE {
                return Err(ScoringError::InvalidConfig {
                    field,
                    reason: "must be a finite number of moderate magnitude",
                });
            }
        }

        let non_negative = [
            ("blackout_offset", self.blackout_offset),
            ("balance_cutoff_percent", self.balance_cutoff_percent),
            ("score_offset", self.score_offset),
            ("popularity_per_unit", self.popularity_per_unit),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(ScoringError::InvalidConfig {
                    field,
                    reason: "must not be negative",
                });
            }
        }

        if !(0.0..=100.0).contains(&self.blackout_penalty) {
            return Err(ScoringError::InvalidConfig {
                field: "blackout_penalty",
                reason: "must lie in 0..=100",
            });
        }
        if self.max_popularity_bound <= 0.0 {
            return Err(ScoringError::InvalidConfig {
                field: "max_popularity_bound",
                reason: "must be positive",
            });
        }
        Ok(())
    }

    /// Fixed-point view of the tunables. Only meaningful after `validate`.
    pub(crate) fn tunables(&self) -> Tunables {
        Tunables {
            blackout_offset: f64_to_fixed64(self.blackout_offset),
            blackout_penalty: f64_to_fixed64(self.blackout_penalty),
            balance_cutoff_percent: f64_to_fixed64(self.balance_cutoff_percent),
            score_offset: f64_to_fixed64(self.score_offset),
            max_popularity_bound: f64_to_fixed64(self.max_popularity_bound),
            popularity_per_unit: f64_to_fixed64(self.popularity_per_unit),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Tunables {
    pub blackout_offset: Fixed64,
    pub blackout_penalty: Fixed64,
    pub balance_cutoff_percent: Fixed64,
    pub score_offset: Fixed64,
    pub max_popularity_bound: Fixed64,
    pub popularity_per_unit: Fixed64,
}
