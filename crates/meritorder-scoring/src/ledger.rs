use meritorder_core::fixed::{self, Fixed64, Fixed128};
use meritorder_core::{TeamHistory, TeamId};

use crate::round::RoundAssessment;

/// One round as seen by a single team.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundRecord {
    pub consumption: Fixed64,
    /// Offered output.
    pub production: Fixed64,
    pub blackout: bool,
    pub stability: Fixed64,
    pub popularity: Fixed64,
}

/// Everything a team accumulated over the game, ready for final scoring.
///
/// Built by folding the team's round assessments in round order; a ledger is
/// never edited once scoring starts. Totals are kept wide: one round always
/// fits a `Fixed64`, a whole game need not.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamLedger {
    pub team: TeamId,
    pub building_consumption: Fixed64,
    pub rounds: Vec<RoundRecord>,
    pub total_co2: Fixed128,
    pub total_profit: Fixed128,
    pub total_expense: Fixed128,
    pub total_consumption: Fixed128,
    pub blackouts: usize,
}

impl TeamLedger {
    pub fn new(team: TeamId, building_consumption: Fixed64) -> Self {
        Self {
            team,
            building_consumption,
            rounds: Vec::new(),
            total_co2: Fixed128::ZERO,
            total_profit: Fixed128::ZERO,
            total_expense: Fixed128::ZERO,
            total_consumption: Fixed128::ZERO,
            blackouts: 0,
        }
    }

    /// Empty ledger sized for the rounds the team played.
    pub fn open(history: &TeamHistory) -> Self {
        let mut ledger = Self::new(history.team.clone(), history.building_consumption);
        ledger.rounds.reserve_exact(history.rounds());
        ledger
    }

    pub fn record(&mut self, assessment: &RoundAssessment) {
        self.total_co2 += fixed::widen(assessment.result.co2_released);
        self.total_profit += fixed::widen(assessment.result.total_profit);
        self.total_expense += fixed::widen(assessment.result.total_expense);
        self.total_consumption += fixed::widen(assessment.demand);
        if assessment.blackout {
            self.blackouts += 1;
        }
        self.rounds.push(RoundRecord {
            consumption: assessment.demand,
            production: assessment.total_output,
            blackout: assessment.blackout,
            stability: assessment.stability,
            popularity: assessment.popularity,
        });
    }

    /// Rounds this team actually took part in.
    pub fn rounds_played(&self) -> usize {
        self.rounds.len()
    }

    pub fn mean_stability(&self) -> Fixed64 {
        self.mean(|r| r.stability)
    }

    pub fn mean_popularity(&self) -> Fixed64 {
        self.mean(|r| r.popularity)
    }

    fn mean(&self, f: impl Fn(&RoundRecord) -> Fixed64) -> Fixed64 {
        let sum = self.rounds.iter().fold(Fixed64::ZERO, |acc, r| acc + f(r));
        fixed::ratio_or(
            sum,
            Fixed64::from_num(self.rounds.len()),
            Fixed64::ZERO,
        )
    }
}
