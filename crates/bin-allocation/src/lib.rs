//! Discretized liquidity placement engine for bin-based ("liquidity
//! book") market makers.
//!
//! Given a contiguous range of price bins, a strategy shape, and budgets
//! of the two pool tokens, the engine computes how much of each token
//! lands in every bin, and quotes the counterpart amount a single-sided
//! deposit needs to stay balanced. Two generations of strategy front-ends
//! share the same allocation core: [`v1`] splits a deposit into
//! independently curved bid and ask sub-ranges, [`v2`] shapes one curve
//! across the whole range and reconciles the budget the binding side left
//! unspent.
//!
//! All arithmetic is arbitrary precision; token amounts floor toward zero
//! wherever they are materialized, so emitted totals never exceed the
//! caller's budgets.

pub mod amounts;
pub mod error;
pub mod strategy;
pub mod v1;
pub mod v2;
pub mod weights;

pub use {
    amounts::{ActiveBinReserves, BinAllocation, BinAmount},
    error::Error,
    strategy::StrategyType,
    weights::{BinRange, WeightEntry, WeightLimits},
};
