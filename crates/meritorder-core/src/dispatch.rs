//! Merit-order economic dispatch for one team and one round.
//!
//! Blocks are ranked cheapest first (stable on equal prices), accumulated
//! until demand is covered, and the block that covers it sets the uniform
//! clearing price.
//!
//! # Undersupply
//!
//! When the offered output never reaches demand there is no marginal block:
//! the clearing price is zero and every block runs at full output. All
//! accumulations are therefore capped at `min(total output, demand)`, which
//! is `demand` whenever supply suffices. Cost is zero, profit is the negated
//! expense, and stability reflects only the share of demand actually served.
//!
//! # Preconditions
//!
//! Outputs and demand are expected to be non-negative. They are not
//! validated here; negative values give meaningless (but finite) numbers.
//!
//! # Range
//!
//! Every running sum and product is checked. A request whose totals leave
//! the `Fixed64` range fails with [`DispatchError::Overflow`] instead of
//! wrapping.

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogError, PlantCatalog};
use crate::fixed::{self, Fixed64};
use crate::plant::{PlantKind, PlantSpec};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// One generation block offered by a team for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionBlock {
    pub kind: PlantKind,
    /// Offered output in MWh for the round. Non-negative.
    pub output: Fixed64,
}

impl ProductionBlock {
    pub fn new(kind: PlantKind, output: f64) -> Self {
        Self {
            kind,
            output: Fixed64::from_num(output),
        }
    }
}

/// One team's submission for one round.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DispatchRequest {
    /// Offered blocks in submission order. Duplicated kinds are fine.
    pub productions: Vec<ProductionBlock>,
    /// Consumption to cover, MWh. Non-negative.
    pub demand: Fixed64,
}

impl DispatchRequest {
    pub fn new(productions: Vec<ProductionBlock>, demand: f64) -> Self {
        Self {
            productions,
            demand: Fixed64::from_num(demand),
        }
    }

    /// Build a request from `(kind, output)` pairs.
    pub fn from_pairs(pairs: &[(PlantKind, f64)], demand: f64) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|&(kind, output)| ProductionBlock::new(kind, output))
                .collect(),
            demand,
        )
    }

    /// Sum of all offered output, dispatched or not.
    pub fn total_output(&self) -> Fixed64 {
        self.productions
            .iter()
            .fold(Fixed64::ZERO, |acc, b| acc + b.output)
    }
}

// ---------------------------------------------------------------------------
// Merit order
// ---------------------------------------------------------------------------

/// One row of the merit order: a block with its place in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Allocation {
    pub kind: PlantKind,
    pub output: Fixed64,
    pub spec: PlantSpec,
    /// Running sum of offered output up to and including this block.
    pub cumulative: Fixed64,
    /// Quantity actually run. Full output before the marginal block, the
    /// remaining demand at the marginal block, zero after it.
    pub dispatched: Fixed64,
    pub marginal: bool,
}

/// The sorted allocation table behind a [`DispatchResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeritOrder {
    allocations: Vec<Allocation>,
    demand: Fixed64,
    marginal: Option<usize>,
}

impl MeritOrder {
    /// Rank the request's blocks and allocate demand over them.
    ///
    /// Every kind is resolved against the catalog first; a single missing
    /// entry fails the whole call.
    pub fn build(request: &DispatchRequest, catalog: &PlantCatalog) -> Result<Self, DispatchError> {
        let mut ranked = request
            .productions
            .iter()
            .map(|block| catalog.spec(block.kind).map(|spec| (*block, *spec)))
            .collect::<Result<Vec<(ProductionBlock, PlantSpec)>, CatalogError>>()?;

        // `sort_by_key` is stable: equal prices keep submission order.
        ranked.sort_by_key(|(_, spec)| spec.price);

        let demand = request.demand;
        let mut allocations = Vec::with_capacity(ranked.len());
        let mut marginal = None;
        let mut cumulative = Fixed64::ZERO;

        for (block, spec) in ranked {
            let before = cumulative;
            cumulative = fixed::checked_add_64(cumulative, block.output)
                .ok_or(DispatchError::Overflow { quantity: "offered output" })?;

            let dispatched = if marginal.is_some() {
                Fixed64::ZERO
            } else if cumulative >= demand {
                marginal = Some(allocations.len());
                demand - before
            } else {
                block.output
            };

            allocations.push(Allocation {
                kind: block.kind,
                output: block.output,
                spec,
                cumulative,
                dispatched,
                marginal: marginal == Some(allocations.len()),
            });
        }

        Ok(Self {
            allocations,
            demand,
            marginal,
        })
    }

    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }

    pub fn demand(&self) -> Fixed64 {
        self.demand
    }

    /// Index of the price-setting block, if demand was met.
    pub fn marginal_index(&self) -> Option<usize> {
        self.marginal
    }

    pub fn marginal(&self) -> Option<&Allocation> {
        self.marginal.map(|i| &self.allocations[i])
    }

    /// True when offered output never reached demand.
    pub fn is_undersupplied(&self) -> bool {
        self.marginal.is_none()
    }

    /// Price of the marginal block, or zero under undersupply.
    pub fn clearing_price(&self) -> Fixed64 {
        self.marginal().map_or(Fixed64::ZERO, |a| a.spec.price)
    }

    pub fn total_output(&self) -> Fixed64 {
        self.allocations.last().map_or(Fixed64::ZERO, |a| a.cumulative)
    }

    /// Total quantity run. Never more than demand or total output, so it
    /// stays in range whenever the stack could be built.
    pub fn dispatched(&self) -> Fixed64 {
        self.allocations
            .iter()
            .fold(Fixed64::ZERO, |acc, a| acc + a.dispatched)
    }

    /// `Σ dispatched × f(spec)` over the stack.
    fn sum(
        &self,
        quantity: &'static str,
        f: impl Fn(&PlantSpec) -> Fixed64,
    ) -> Result<Fixed64, DispatchError> {
        self.allocations.iter().try_fold(Fixed64::ZERO, |acc, a| {
            fixed::checked_mul_64(a.dispatched, f(&a.spec))
                .and_then(|v| fixed::checked_add_64(acc, v))
                .ok_or(DispatchError::Overflow { quantity })
        })
    }

    /// Reduce the stack to the round's economic and physical outcome.
    pub fn result(&self) -> Result<DispatchResult, DispatchError> {
        let hundred = Fixed64::from_num(100);
        let clearing_price = self.clearing_price();
        let total_cost = fixed::checked_mul_64(clearing_price, self.demand)
            .ok_or(DispatchError::Overflow { quantity: "total cost" })?;
        let total_expense = self.sum("total expense", |s| s.price)?;
        let stability_score = if self.demand <= Fixed64::ZERO {
            hundred
        } else {
            fixed::clamp(
                self.sum("weighted derating", |s| s.derating)? / self.demand,
                Fixed64::ZERO,
                hundred,
            )
        };
        let shortfall = (self.demand - self.total_output()).max(Fixed64::ZERO);

        Ok(DispatchResult {
            clearing_price,
            total_cost,
            // Σ q·(p* − p) collapses to cost − expense because Σ q equals
            // demand whenever p* is non-zero.
            total_profit: total_cost - total_expense,
            total_expense,
            co2_released: self.sum("co2 released", |s| s.co2_intensity)?,
            stability_score,
            dispatched: self.dispatched(),
            shortfall,
        })
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Outcome of clearing one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DispatchResult {
    /// Uniform price paid for every dispatched MWh.
    pub clearing_price: Fixed64,
    /// `clearing_price × demand`.
    pub total_cost: Fixed64,
    /// Revenue at the clearing price minus each block's own cost.
    pub total_profit: Fixed64,
    /// Each dispatched block paid at its own marginal price.
    pub total_expense: Fixed64,
    /// Tonnes CO2-eq emitted by dispatched blocks.
    pub co2_released: Fixed64,
    /// Demand-weighted derating of dispatched blocks, `[0, 100]`.
    pub stability_score: Fixed64,
    /// Total quantity run.
    pub dispatched: Fixed64,
    /// Demand left unserved; zero unless undersupplied.
    pub shortfall: Fixed64,
}

impl DispatchResult {
    pub fn is_undersupplied(&self) -> bool {
        self.shortfall > Fixed64::ZERO
    }
}

/// Why a request could not be cleared.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// A running sum or product left the `Fixed64` range.
    #[error("{quantity} exceeds the fixed-point range")]
    Overflow { quantity: &'static str },
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Build the merit order for a request.
pub fn merit_order(
    request: &DispatchRequest,
    catalog: &PlantCatalog,
) -> Result<MeritOrder, DispatchError> {
    MeritOrder::build(request, catalog)
}

/// Clear one request against the catalog.
pub fn dispatch(
    request: &DispatchRequest,
    catalog: &PlantCatalog,
) -> Result<DispatchResult, DispatchError> {
    let order = MeritOrder::build(request, catalog)?;
    let result = order.result()?;
    tracing::trace!(
        blocks = order.allocations().len(),
        clearing_price = %result.clearing_price,
        shortfall = %result.shortfall,
        "dispatched request"
    );
    Ok(result)
}

// ===========================================================================
// Tests
// ===========================================================================
