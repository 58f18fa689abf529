//! Meritorder Scoring -- turns a recorded game into a scoreboard.
//!
//! A game is a [`History`](meritorder_core::History) of rounds, each holding
//! one dispatch request per team. The [`ScoreAggregator`] clears every
//! request, assesses each round across its teams, folds the outcomes into a
//! [`TeamLedger`] per team and finally lets a [`ScoringPolicy`] publish the
//! metrics.
//!
//! ```rust,ignore
//! let catalog = PlantCatalog::standard();
//! let aggregator = ScoreAggregator::new(&catalog, ScoringConfig::default())?;
//! let board = aggregator.score(&history, &building_consumptions)?;
//! println!("{}", serde_json::to_string_pretty(&board)?);
//! ```
//!
//! # Policies
//!
//! - [`RelativePolicy`] -- ecology and finance ranked min-max against the
//!   other teams; publishes `ecology`, `finance`, `stability`, `popularity`.
//! - [`AbsolutePolicy`] -- percentages against catalog worst cases;
//!   publishes `ecology`, `finance`, `balance`, `popularity`, `combined`.
//!
//! # Features
//!
//! - `parallel` -- dispatch and final scoring run on the rayon pool. Results
//!   are identical to the serial build.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod ledger;
pub mod policy;
pub mod round;
pub mod score;

pub use aggregate::{Replay, ScoreAggregator};
pub use config::{PolicyKind, ScoringConfig};
pub use error::ScoringError;
pub use ledger::{RoundRecord, TeamLedger};
pub use policy::{AbsolutePolicy, CohortBounds, RelativePolicy, ScoringPolicy, policy_for};
pub use round::{MinMax, RoundAssessment, RoundEntry, RoundNormalizer};
pub use score::{FinalScore, Metric, Scoreboard};
