//! Criterion benchmarks for whole-game scoring.
//!
//! - `showcase_relative` / `showcase_absolute`: the five-team, ten-round game
//! - `large_game`: 40 teams over 50 rounds, relative policy

use std::collections::BTreeMap;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use meritorder_core::test_utils::*;
use meritorder_core::*;
use meritorder_scoring::*;

fn large_game() -> (History, BTreeMap<TeamId, Fixed64>) {
    let teams: Vec<TeamId> = (0..40).map(|i| TeamId::new(format!("Team {i:02}"))).collect();
    let rounds = (0..50)
        .map(|r| {
            teams
                .iter()
                .enumerate()
                .map(|(t, team)| {
                    let demand = 1_000.0 + (r * 37 + t * 53) as f64 % 2_000.0;
                    let blocks = (0..6)
                        .map(|b| {
                            let kind = PlantKind::ALL[(t + b) % 7];
                            ProductionBlock::new(kind, demand / 5.0 + b as f64 * 10.0)
                        })
                        .collect();
                    (team.clone(), DispatchRequest::new(blocks, demand))
                })
                .collect()
        })
        .collect();
    let buildings = teams
        .iter()
        .enumerate()
        .map(|(t, team)| (team.clone(), fixed(t as f64 * 25.0)))
        .collect();
    (History::new(rounds), buildings)
}

fn bench_showcase(c: &mut Criterion) {
    let catalog = PlantCatalog::standard();
    let history = showcase_history();
    let buildings = showcase_buildings();
    for (name, policy) in [
        ("showcase_relative", PolicyKind::Relative),
        ("showcase_absolute", PolicyKind::Absolute),
    ] {
        let agg =
            ScoreAggregator::new(&catalog, ScoringConfig::default().with_policy(policy)).unwrap();
        c.bench_function(name, |b| {
            b.iter(|| agg.score(black_box(&history), &buildings).unwrap())
        });
    }
}

fn bench_large(c: &mut Criterion) {
    let catalog = PlantCatalog::standard();
    let (history, buildings) = large_game();
    let agg = ScoreAggregator::new(&catalog, ScoringConfig::default()).unwrap();
    c.bench_function("large_game", |b| {
        b.iter(|| agg.score(black_box(&history), &buildings).unwrap())
    });
}

criterion_group!(benches, bench_showcase, bench_large);
criterion_main!(benches);
