//! Per-round normalization across teams.
//!
//! Once every team of a round has been dispatched, the round is assessed as a
//! whole: blackouts are flagged and each team's popularity merit is ranked
//! against the others. A round is a synchronization point; the assessment of
//! one team depends on every other team of the same round.

use std::collections::BTreeMap;
use std::ops::Sub;

use meritorder_core::fixed::{self, Fixed64};
use meritorder_core::{DispatchRequest, DispatchResult, TeamId};

use crate::config::ScoringConfig;

/// One team's dispatched submission, before cross-team normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundEntry {
    pub demand: Fixed64,
    /// Offered output, not the dispatched share.
    pub total_output: Fixed64,
    pub result: DispatchResult,
}

impl RoundEntry {
    pub fn new(request: &DispatchRequest, result: DispatchResult) -> Self {
        Self {
            demand: request.demand,
            total_output: request.total_output(),
            result,
        }
    }
}

/// One team's round after normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundAssessment {
    pub clearing_price: Fixed64,
    pub demand: Fixed64,
    pub total_output: Fixed64,
    pub blackout: bool,
    /// Dispatch stability, or the blackout penalty when `blackout` is set.
    pub stability: Fixed64,
    /// Popularity merit in [0, 1].
    pub popularity: Fixed64,
    pub result: DispatchResult,
}

#[derive(Debug, Clone, Copy)]
pub struct RoundNormalizer {
    blackout_offset: Fixed64,
    blackout_penalty: Fixed64,
}

impl RoundNormalizer {
    pub fn new(blackout_offset: Fixed64, blackout_penalty: Fixed64) -> Self {
        Self {
            blackout_offset,
            blackout_penalty,
        }
    }

    pub fn from_config(config: &ScoringConfig) -> Self {
        let t = config.tunables();
        Self::new(t.blackout_offset, t.blackout_penalty)
    }

    /// Offered output missing demand by more than the offset, either way.
    pub fn is_blackout(&self, total_output: Fixed64, demand: Fixed64) -> bool {
        (total_output - demand).abs() > self.blackout_offset
    }

    pub fn normalize(
        &self,
        round: &BTreeMap<TeamId, RoundEntry>,
    ) -> BTreeMap<TeamId, RoundAssessment> {
        let Some(price) = MinMax::over(round.values().map(|e| e.result.clearing_price)) else {
            return BTreeMap::new();
        };
        let demand = MinMax::over(round.values().map(|e| e.demand)).unwrap_or_default();
        let half = Fixed64::from_num(0.5);

        round
            .iter()
            .map(|(team, entry)| {
                let blackout = self.is_blackout(entry.total_output, entry.demand);
                if blackout {
                    tracing::debug!(
                        team = %team,
                        demand = %entry.demand,
                        offered = %entry.total_output,
                        "blackout"
                    );
                }

                // Cheaper than the others is better; growing faster is better.
                let price_merit = fixed::ratio_or(
                    price.max - entry.result.clearing_price,
                    price.spread(),
                    half,
                );
                let growth_merit = fixed::ratio_or(entry.demand - demand.min, demand.spread(), half);

                let assessment = RoundAssessment {
                    clearing_price: entry.result.clearing_price,
                    demand: entry.demand,
                    total_output: entry.total_output,
                    blackout,
                    stability: if blackout {
                        self.blackout_penalty
                    } else {
                        entry.result.stability_score
                    },
                    popularity: half * price_merit + half * growth_merit,
                    result: entry.result,
                };
                (team.clone(), assessment)
            })
            .collect()
    }
}

/// Smallest and largest of a set of values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinMax<T = Fixed64> {
    pub min: T,
    pub max: T,
}

impl<T: Copy + Ord + Sub<Output = T>> MinMax<T> {
    /// `None` on an empty iterator.
    pub fn over(mut values: impl Iterator<Item = T>) -> Option<Self> {
        let first = values.next()?;
        Some(values.fold(Self { min: first, max: first }, |acc, v| Self {
            min: acc.min.min(v),
            max: acc.max.max(v),
        }))
    }

    pub fn spread(&self) -> T {
        self.max - self.min
    }
}
