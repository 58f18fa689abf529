//! Game history: rounds of per-team submissions.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::dispatch::DispatchRequest;
use crate::fixed::Fixed64;
use crate::id::TeamId;

/// One round: every participating team's submission.
pub type Round = BTreeMap<TeamId, DispatchRequest>;

/// The full, ordered record of a game.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    rounds: Vec<Round>,
}

impl History {
    pub fn new(rounds: Vec<Round>) -> Self {
        Self { rounds }
    }

    /// Append a round.
    pub fn push_round(&mut self, round: Round) {
        self.rounds.push(round);
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Every team that submitted at least once, in name order.
    pub fn teams(&self) -> BTreeSet<TeamId> {
        self.rounds
            .iter()
            .flat_map(|round| round.keys().cloned())
            .collect()
    }

    /// Regroup the history per team, attaching building consumptions.
    ///
    /// Teams missing from `building_consumptions` get zero.
    pub fn team_histories(
        &self,
        building_consumptions: &BTreeMap<TeamId, Fixed64>,
    ) -> Vec<TeamHistory> {
        self.teams()
            .into_iter()
            .map(|team| {
                let requests = self
                    .rounds
                    .iter()
                    .filter_map(|round| round.get(&team).cloned())
                    .collect();
                let building_consumption = building_consumptions
                    .get(&team)
                    .copied()
                    .unwrap_or(Fixed64::ZERO);
                TeamHistory {
                    team,
                    requests,
                    building_consumption,
                }
            })
            .collect()
    }
}

/// One team's submissions across the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamHistory {
    pub team: TeamId,
    /// One request per round the team played, in round order.
    pub requests: Vec<DispatchRequest>,
    /// External building load, contributes to popularity.
    pub building_consumption: Fixed64,
}

impl TeamHistory {
    pub fn rounds(&self) -> usize {
        self.requests.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plant::PlantKind;

    fn round(entries: &[(&str, f64)]) -> Round {
        entries
            .iter()
            .map(|&(team, demand)| {
                (
                    TeamId::from(team),
                    DispatchRequest::from_pairs(&[(PlantKind::Wind, demand)], demand),
                )
            })
            .collect()
    }

    #[test]
    fn teams_collects_every_participant() {
        let history = History::new(vec![
            round(&[("Team A", 10.0), ("Team B", 20.0)]),
            round(&[("Team C", 5.0)]),
        ]);
        let teams: Vec<_> = history.teams().into_iter().map(|t| t.0).collect();
        assert_eq!(teams, vec!["Team A", "Team B", "Team C"]);
        assert_eq!(history.round_count(), 2);
    }

    #[test]
    fn team_histories_keep_round_order() {
        let mut history = History::default();
        history.push_round(round(&[("Team A", 10.0)]));
        history.push_round(round(&[("Team A", 30.0), ("Team B", 5.0)]));

        let mut buildings = BTreeMap::new();
        buildings.insert(TeamId::from("Team A"), Fixed64::from_num(500));

        let per_team = history.team_histories(&buildings);
        assert_eq!(per_team.len(), 2);

        let a = &per_team[0];
        assert_eq!(a.team.as_str(), "Team A");
        assert_eq!(a.rounds(), 2);
        assert_eq!(a.requests[1].demand, Fixed64::from_num(30));
        assert_eq!(a.building_consumption, Fixed64::from_num(500));

        let b = &per_team[1];
        assert_eq!(b.rounds(), 1);
        assert_eq!(b.building_consumption, Fixed64::ZERO);
    }

    #[test]
    fn empty_history_has_no_teams() {
        let history = History::default();
        assert!(history.is_empty());
        assert!(history.teams().is_empty());
        assert!(history.team_histories(&BTreeMap::new()).is_empty());
    }
}
