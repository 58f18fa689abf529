//! Meritorder Core -- the market-clearing engine of the power grid game.
//!
//! Each round every team offers a stack of generation blocks and states the
//! consumption it must cover. This crate clears that offer with merit-order
//! economic dispatch and reports the clearing price, the money flows, the
//! emissions and a grid-stability score.
//!
//! # Dispatch
//!
//! 1. **Rank** -- Blocks are sorted by catalog price, cheapest first; equal
//!    prices keep submission order.
//! 2. **Accumulate** -- Outputs are summed along the ranking until demand is
//!    covered. The covering block is marginal and sets the clearing price.
//! 3. **Allocate** -- Blocks before the marginal one run flat out, the
//!    marginal block runs only for the remaining demand.
//! 4. **Settle** -- Cost, expense, profit, CO2 and stability are reduced
//!    from the allocation.
//!
//! ```rust,ignore
//! let catalog = PlantCatalog::standard();
//! let request = DispatchRequest::from_pairs(&[(PlantKind::Nuclear, 1000.0)], 600.0);
//! let result = dispatch(&request, &catalog)?;
//! assert_eq!(result.clearing_price, Fixed64::from_num(15));
//! ```
//!
//! # Key Types
//!
//! - [`plant::PlantKind`] -- The closed set of generation technologies.
//! - [`catalog::PlantCatalog`] -- Immutable price / CO2 / derating table,
//!   frozen at startup and passed to every dispatch.
//! - [`dispatch::DispatchRequest`] -- One team's offer for one round.
//! - [`dispatch::MeritOrder`] -- The ranked allocation table.
//! - [`dispatch::DispatchResult`] -- The settled outcome.
//! - [`history::History`] -- Rounds of per-team requests.
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point type for deterministic math.
//! - [`fixed::Fixed128`] -- Q64.64 type for totals across a whole game.

pub mod catalog;
pub mod dispatch;
pub mod fixed;
pub mod history;
pub mod id;
pub mod plant;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use catalog::{CatalogError, PlantCatalog, PlantCatalogBuilder};
pub use dispatch::{
    Allocation, DispatchError, DispatchRequest, DispatchResult, MeritOrder, ProductionBlock, dispatch,
    merit_order,
};
pub use fixed::{Fixed64, Fixed128};
pub use history::{History, Round, TeamHistory};
pub use id::TeamId;
pub use plant::{PlantKind, PlantSpec};
