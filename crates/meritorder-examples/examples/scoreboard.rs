//! Scoreboard example: load a recorded game and score it.
//!
//! Loads the showcase scenario from `data/showcase`, scores it under the
//! configured policy and under the other one, and prints both scoreboards as
//! JSON. Pass a directory to score a different scenario.
//!
//! Run with: `cargo run -p meritorder-examples --example scoreboard [DIR]`
//!
//! Set `RUST_LOG=debug` to see blackouts and per-round normalization.

use std::error::Error;
use std::path::PathBuf;

use meritorder_data::load_scenario;
use meritorder_scoring::{Metric, PolicyKind, ScoreAggregator};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();

    let dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/showcase"));
    let scenario = load_scenario(&dir)?;
    tracing::info!(
        dir = %dir.display(),
        rounds = scenario.history.round_count(),
        "scenario loaded"
    );

    let other = match scenario.config.policy {
        PolicyKind::Relative => PolicyKind::Absolute,
        PolicyKind::Absolute => PolicyKind::Relative,
    };

    for policy in [scenario.config.policy, other] {
        let config = scenario.config.clone().with_policy(policy);
        let aggregator = ScoreAggregator::new(&scenario.catalog, config)?;
        let replay = aggregator.replay(&scenario.history, &scenario.building_consumptions)?;
        let board = aggregator.score_replay(&replay);

        println!("=== {policy} policy ===");
        println!("{}", serde_json::to_string_pretty(&board)?);

        for ledger in &replay.ledgers {
            if ledger.blackouts > 0 {
                println!(
                    "  {} had {} blackout round(s) out of {}",
                    ledger.team,
                    ledger.blackouts,
                    ledger.rounds_played()
                );
            }
        }

        let headline = match policy {
            PolicyKind::Relative => Metric::Finance,
            PolicyKind::Absolute => Metric::Combined,
        };
        if let Some((team, value)) = board.ranking(headline).first() {
            println!("  best {headline}: {team} ({value:.2})");
        }
        println!();
    }

    Ok(())
}
