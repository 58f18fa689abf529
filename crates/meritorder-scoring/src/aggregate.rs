//! Whole-game replay and final scoring.
//!
//! Scoring runs in phases with a barrier between each:
//!
//! 1. **Dispatch** -- every (round, team) submission is cleared on its own.
//!    Submissions share nothing but the read-only catalog, so with the
//!    `parallel` feature they run on the rayon pool.
//! 2. **Normalize** -- each round is assessed across its teams.
//! 3. **Fold** -- assessments are folded into one ledger per team, in round
//!    order.
//! 4. **Score** -- cohort bounds are taken over all ledgers, then the policy
//!    scores each team.
//!
//! All arithmetic is fixed-point and every map is ordered, so the scoreboard
//! is identical whether or not phases ran in parallel.

use std::collections::BTreeMap;

use meritorder_core::fixed::Fixed64;
use meritorder_core::{
    DispatchError, DispatchRequest, History, PlantCatalog, TeamId, dispatch,
};

use crate::config::ScoringConfig;
use crate::error::ScoringError;
use crate::ledger::TeamLedger;
use crate::policy::{CohortBounds, ScoringPolicy, policy_for};
use crate::round::{RoundAssessment, RoundEntry, RoundNormalizer};
use crate::score::{FinalScore, Scoreboard};

/// Intermediate state of a scored game, kept for inspection and reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct Replay {
    pub rounds: Vec<BTreeMap<TeamId, RoundAssessment>>,
    /// One ledger per team, ordered by team id.
    pub ledgers: Vec<TeamLedger>,
}

impl Replay {
    pub fn ledger(&self, team: &TeamId) -> Option<&TeamLedger> {
        self.ledgers.iter().find(|l| &l.team == team)
    }
}

/// Scores a recorded game against a frozen catalog.
pub struct ScoreAggregator<'c> {
    catalog: &'c PlantCatalog,
    config: ScoringConfig,
    normalizer: RoundNormalizer,
    policy: Box<dyn ScoringPolicy>,
}

impl<'c> ScoreAggregator<'c> {
    pub fn new(catalog: &'c PlantCatalog, config: ScoringConfig) -> Result<Self, ScoringError> {
        config.validate()?;
        Ok(Self {
            catalog,
            normalizer: RoundNormalizer::from_config(&config),
            policy: policy_for(&config, catalog),
            config,
        })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Run the dispatch, normalize and fold phases.
    pub fn replay(
        &self,
        history: &History,
        building_consumptions: &BTreeMap<TeamId, Fixed64>,
    ) -> Result<Replay, ScoringError> {
        let teams = history.teams();
        for team in building_consumptions.keys() {
            if !teams.contains(team) {
                tracing::warn!(team = %team, "building consumption for unknown team ignored");
            }
        }

        let submissions = submissions(history);
        let cleared = dispatch_all(&submissions, self.catalog)?;

        let mut entries: Vec<BTreeMap<TeamId, RoundEntry>> =
            vec![BTreeMap::new(); history.round_count()];
        for (submission, entry) in submissions.iter().zip(cleared) {
            entries[submission.round].insert(submission.team.clone(), entry);
        }

        let rounds: Vec<BTreeMap<TeamId, RoundAssessment>> = entries
            .iter()
            .enumerate()
            .map(|(index, round)| {
                let assessed = self.normalizer.normalize(round);
                tracing::debug!(
                    round = index,
                    teams = assessed.len(),
                    blackouts = assessed.values().filter(|a| a.blackout).count(),
                    "round normalized"
                );
                assessed
            })
            .collect();

        let mut ledgers: BTreeMap<TeamId, TeamLedger> = history
            .team_histories(building_consumptions)
            .iter()
            .map(|team| (team.team.clone(), TeamLedger::open(team)))
            .collect();
        for round in &rounds {
            for (team, assessment) in round {
                if let Some(ledger) = ledgers.get_mut(team) {
                    ledger.record(assessment);
                }
            }
        }

        Ok(Replay {
            rounds,
            ledgers: ledgers.into_values().collect(),
        })
    }

    /// Replay the game and publish every team's final metrics.
    pub fn score(
        &self,
        history: &History,
        building_consumptions: &BTreeMap<TeamId, Fixed64>,
    ) -> Result<Scoreboard, ScoringError> {
        let replay = self.replay(history, building_consumptions)?;
        Ok(self.score_replay(&replay))
    }

    /// Score an already replayed game.
    pub fn score_replay(&self, replay: &Replay) -> Scoreboard {
        let cohort = CohortBounds::from_ledgers(&replay.ledgers);
        let scores = score_all(self.policy.as_ref(), &replay.ledgers, &cohort);
        tracing::info!(
            policy = %self.policy.kind(),
            teams = replay.ledgers.len(),
            rounds = replay.rounds.len(),
            "game scored"
        );
        Scoreboard::new(
            self.policy.kind(),
            replay
                .ledgers
                .iter()
                .map(|l| l.team.clone())
                .zip(scores)
                .collect(),
        )
    }
}

/// One team's request in one round.
struct Submission<'h> {
    round: usize,
    team: &'h TeamId,
    request: &'h DispatchRequest,
}

/// Every submission of the game, round by round, teams in name order.
fn submissions(history: &History) -> Vec<Submission<'_>> {
    history
        .rounds()
        .iter()
        .enumerate()
        .flat_map(|(round, requests)| {
            requests.iter().map(move |(team, request)| Submission {
                round,
                team,
                request,
            })
        })
        .collect()
}

impl Submission<'_> {
    fn clear(&self, catalog: &PlantCatalog) -> Result<RoundEntry, ScoringError> {
        let result = dispatch(self.request, catalog).map_err(|e| {
            tracing::error!(round = self.round, team = %self.team, error = %e, "dispatch failed");
            match e {
                DispatchError::Catalog(e) => ScoringError::Catalog(e),
                DispatchError::Overflow { quantity } => ScoringError::Overflow {
                    round: self.round,
                    team: self.team.clone(),
                    quantity,
                },
            }
        })?;
        Ok(RoundEntry::new(self.request, result))
    }
}

#[cfg(feature = "parallel")]
use parallel::{dispatch_all, score_all};
#[cfg(not(feature = "parallel"))]
use serial::{dispatch_all, score_all};

#[cfg_attr(feature = "parallel", allow(dead_code))]
mod serial {
    use super::*;

    pub(super) fn dispatch_all(
        submissions: &[Submission<'_>],
        catalog: &PlantCatalog,
    ) -> Result<Vec<RoundEntry>, ScoringError> {
        submissions.iter().map(|s| s.clear(catalog)).collect()
    }

    pub(super) fn score_all(
        policy: &dyn ScoringPolicy,
        ledgers: &[TeamLedger],
        cohort: &CohortBounds,
    ) -> Vec<FinalScore> {
        ledgers.iter().map(|l| policy.score_team(l, cohort)).collect()
    }
}

#[cfg(feature = "parallel")]
mod parallel {
    use rayon::prelude::*;

    use super::*;

    pub(super) fn dispatch_all(
        submissions: &[Submission<'_>],
        catalog: &PlantCatalog,
    ) -> Result<Vec<RoundEntry>, ScoringError> {
        submissions.par_iter().map(|s| s.clear(catalog)).collect()
    }

    pub(super) fn score_all(
        policy: &dyn ScoringPolicy,
        ledgers: &[TeamLedger],
        cohort: &CohortBounds,
    ) -> Vec<FinalScore> {
        ledgers.par_iter().map(|l| policy.score_team(l, cohort)).collect()
    }
}
