//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use std::collections::BTreeMap;

use crate::dispatch::DispatchRequest;
use crate::fixed::{Fixed64, Fixed128};
use crate::history::{History, Round};
use crate::id::TeamId;
use crate::plant::PlantKind::{self, *};

// ===========================================================================
// Fixed-point helpers
// ===========================================================================

pub fn fixed(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

pub fn wide(v: f64) -> Fixed128 {
    Fixed128::from_num(v)
}

/// Assert two fixed-point values agree to within `eps`.
#[track_caller]
pub fn assert_close(actual: Fixed64, expected: f64, eps: f64) {
    let actual = actual.to_num::<f64>();
    assert!(
        (actual - expected).abs() <= eps,
        "expected {expected} (+/- {eps}), got {actual}"
    );
}

// ===========================================================================
// Request constructors
// ===========================================================================

pub fn request(pairs: &[(PlantKind, f64)], demand: f64) -> DispatchRequest {
    DispatchRequest::from_pairs(pairs, demand)
}

/// Build a round from `(team, pairs, demand)` entries.
pub fn round(entries: &[(&str, &[(PlantKind, f64)], f64)]) -> Round {
    entries
        .iter()
        .map(|&(team, pairs, demand)| (TeamId::from(team), request(pairs, demand)))
        .collect()
}

pub fn buildings(entries: &[(&str, f64)]) -> BTreeMap<TeamId, Fixed64> {
    entries
        .iter()
        .map(|&(team, v)| (TeamId::from(team), fixed(v)))
        .collect()
}

// ===========================================================================
// Showcase game: five teams, ten rounds
// ===========================================================================

/// Building consumptions of the showcase game.
pub fn showcase_buildings() -> BTreeMap<TeamId, Fixed64> {
    buildings(&[
        ("Team A", 500.0),
        ("Team B", 600.0),
        ("Team C", 450.0),
        ("Team D", 700.0),
        ("Team E", 750.0),
    ])
}

/// The showcase game. Team E runs short in rounds 3, 5, 6 and 8.
pub fn showcase_history() -> History {
    History::new(vec![
        round(&[
            ("Team A", &[(Nuclear, 1500.0), (Wind, 100.0)], 1600.0),
            ("Team B", &[(Coal, 1000.0), (Gas, 800.0)], 1800.0),
            ("Team C", &[(Nuclear, 800.0), (Gas, 400.0), (Wind, 100.0)], 1300.0),
            ("Team D", &[(Water, 2500.0)], 2000.0),
            ("Team E", &[(Wind, 1200.0), (Photovoltaic, 400.0)], 1500.0),
        ]),
        round(&[
            ("Team A", &[(Nuclear, 1500.0), (Wind, 300.0)], 1800.0),
            ("Team B", &[(Coal, 1200.0), (Gas, 800.0)], 2000.0),
            ("Team C", &[(Nuclear, 800.0), (Gas, 500.0), (Wind, 200.0)], 1500.0),
            ("Team D", &[(Water, 2500.0)], 2200.0),
            ("Team E", &[(Wind, 1400.0), (Photovoltaic, 600.0)], 1700.0),
        ]),
        round(&[
            ("Team A", &[(Nuclear, 1500.0), (Wind, 500.0), (Photovoltaic, 100.0)], 2000.0),
            ("Team B", &[(Coal, 1300.0), (Gas, 900.0)], 2200.0),
            ("Team C", &[(Nuclear, 900.0), (Gas, 500.0), (Wind, 300.0)], 1700.0),
            ("Team D", &[(Water, 2500.0), (Gas, 100.0)], 2400.0),
            ("Team E", &[(Wind, 1000.0), (Photovoltaic, 400.0)], 1900.0),
        ]),
        round(&[
            ("Team A", &[(Nuclear, 2000.0), (Wind, 500.0)], 2200.0),
            ("Team B", &[(Coal, 1500.0), (Gas, 1000.0)], 2400.0),
            ("Team C", &[(Nuclear, 900.0), (Gas, 600.0), (Wind, 400.0)], 1900.0),
            ("Team D", &[(Water, 2500.0), (Gas, 300.0)], 2600.0),
            ("Team E", &[(Wind, 2000.0), (Photovoltaic, 800.0)], 2100.0),
        ]),
        round(&[
            ("Team A", &[(Nuclear, 2000.0), (Wind, 700.0), (Photovoltaic, 100.0)], 2400.0),
            ("Team B", &[(Coal, 1600.0), (Gas, 1100.0)], 2600.0),
            ("Team C", &[(Nuclear, 1000.0), (Gas, 600.0), (Wind, 500.0)], 2100.0),
            ("Team D", &[(Water, 2500.0), (Gas, 500.0)], 2800.0),
            ("Team E", &[(Wind, 1500.0), (Photovoltaic, 600.0), (Gas, 100.0)], 2300.0),
        ]),
        round(&[
            ("Team A", &[(Nuclear, 2000.0), (Wind, 900.0), (Photovoltaic, 300.0)], 2600.0),
            ("Team B", &[(Coal, 1800.0), (Gas, 1200.0)], 2800.0),
            ("Team C", &[(Nuclear, 1000.0), (Gas, 700.0), (Wind, 600.0)], 2300.0),
            ("Team D", &[(Water, 2500.0), (Coal, 500.0)], 3000.0),
            ("Team E", &[(Wind, 1200.0), (Photovoltaic, 500.0), (Gas, 100.0)], 2500.0),
        ]),
        round(&[
            ("Team A", &[(Nuclear, 2500.0), (Wind, 1000.0)], 2800.0),
            ("Team B", &[(Coal, 2000.0), (Gas, 1200.0)], 3000.0),
            ("Team C", &[(Nuclear, 1200.0), (Gas, 700.0), (Wind, 700.0)], 2500.0),
            ("Team D", &[(Water, 2500.0), (Coal, 800.0)], 3200.0),
            ("Team E", &[(Wind, 2500.0), (Photovoltaic, 1000.0), (Gas, 200.0)], 2700.0),
        ]),
        round(&[
            ("Team A", &[(Nuclear, 2500.0), (Wind, 1200.0), (Photovoltaic, 300.0)], 3000.0),
            ("Team B", &[(Coal, 2200.0), (Gas, 1300.0)], 3200.0),
            ("Team C", &[(Nuclear, 1200.0), (Gas, 800.0), (Wind, 800.0)], 2700.0),
            ("Team D", &[(Water, 2500.0), (Coal, 1000.0)], 3400.0),
            ("Team E", &[(Wind, 1800.0), (Photovoltaic, 800.0), (Gas, 200.0)], 2900.0),
        ]),
        round(&[
            ("Team A", &[(Nuclear, 2500.0), (Wind, 1500.0), (Photovoltaic, 400.0)], 3200.0),
            ("Team B", &[(Coal, 2400.0), (Gas, 1400.0)], 3400.0),
            ("Team C", &[(Nuclear, 1200.0), (Gas, 900.0), (Wind, 900.0)], 2900.0),
            ("Team D", &[(Water, 2500.0), (Coal, 1200.0)], 3600.0),
            ("Team E", &[(Wind, 3000.0), (Photovoltaic, 1200.0), (Gas, 200.0)], 3100.0),
        ]),
        round(&[
            ("Team A", &[(Nuclear, 3000.0), (Wind, 1500.0)], 3400.0),
            ("Team B", &[(Coal, 2500.0), (Gas, 1500.0)], 3600.0),
            ("Team C", &[(Nuclear, 1500.0), (Gas, 1000.0), (Wind, 1000.0)], 3100.0),
            ("Team D", &[(Water, 2500.0), (Coal, 1500.0)], 3800.0),
            ("Team E", &[(Wind, 2000.0), (Photovoltaic, 1000.0), (Gas, 500.0)], 3300.0),
        ]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn showcase_has_five_teams_and_ten_rounds() {
        let history = showcase_history();
        assert_eq!(history.round_count(), 10);
        assert_eq!(history.teams().len(), 5);
        assert_eq!(showcase_buildings().len(), 5);
    }

    #[test]
    fn assert_close_accepts_small_error() {
        assert_close(fixed(1.0 / 3.0), 0.333_333, 1e-6);
    }

    #[test]
    #[should_panic(expected = "expected 2")]
    fn assert_close_rejects_large_error() {
        assert_close(fixed(1.0), 2.0, 1e-6);
    }
}
