use meritorder_core::{CatalogError, TeamId};

/// Errors that abort a scoring run. No partial scoreboard is ever returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("invalid scoring config `{field}`: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
    /// A submission too large to clear in fixed point.
    #[error("round {round}, team {team}: {quantity} exceeds the fixed-point range")]
    Overflow {
        round: usize,
        team: TeamId,
        quantity: &'static str,
    },
}
