//! First-generation strategy front-end.
//!
//! An in-range deposit is split into a bid sub-range and an ask sub-range,
//! each shaped by its own freshly generated single-sided curve, so the
//! active bin never has to absorb both tokens. Budget remainders stay
//! unspent; there is no reconciliation pass in this generation. When the
//! active bin falls outside the range the deposit degenerates into one
//! whole-range curve through the balanced allocator.

use {
    crate::{
        amounts::{self, ActiveBinReserves, BinAllocation, BinAmount},
        error::Error,
        strategy::StrategyType,
        weights::{self, BinRange, WeightEntry, WeightLimits},
    },
    primitive_types::U256,
};

/// Weight magnitude convention of this front-end.
pub const WEIGHT_LIMITS: WeightLimits = WeightLimits { max: 2_000, min: 200 };

/// Per-bin deposit amounts for both tokens under the given strategy.
pub fn amounts_both_side_by_strategy(
    active_id: i32,
    bin_step: u16,
    range: BinRange,
    amount_x: U256,
    amount_y: U256,
    active_reserves: ActiveBinReserves,
    strategy: StrategyType,
) -> Result<Vec<BinAllocation>, Error> {
    tracing::trace!(
        active_id,
        bin_step,
        ?range,
        ?strategy,
        "splitting deposit into side curves"
    );

    if !range.contains(active_id) {
        let weights = out_of_range_weights(range, active_id, strategy);
        return amounts::both_sides(
            active_id,
            bin_step,
            amount_x,
            amount_y,
            active_reserves,
            &weights,
        );
    }

    let (bid_shape, ask_shape) = side_shapes(strategy);
    let single_sided_x = amount_y.is_zero();
    let mut allocations = Vec::new();

    if single_sided_x {
        if range.min < active_id {
            let weights = bid_shape(BinRange::new(range.min, active_id - 1));
            let amounts = amounts::bid_side(active_id, amount_y, &weights)?;
            allocations.extend(amounts.into_iter().map(BinAmount::into_bid));
        }
        if active_id <= range.max {
            let weights = ask_shape(BinRange::new(active_id, range.max));
            let amounts = amounts::ask_side(active_id, bin_step, amount_x, &weights)?;
            allocations.extend(amounts.into_iter().map(BinAmount::into_ask));
        }
    } else {
        if range.min <= active_id {
            let weights = bid_shape(BinRange::new(range.min, active_id));
            let amounts = amounts::bid_side(active_id, amount_y, &weights)?;
            allocations.extend(amounts.into_iter().map(BinAmount::into_bid));
        }
        if active_id < range.max {
            let weights = ask_shape(BinRange::new(active_id + 1, range.max));
            let amounts = amounts::ask_side(active_id, bin_step, amount_x, &weights)?;
            allocations.extend(amounts.into_iter().map(BinAmount::into_ask));
        }
    }

    Ok(allocations)
}

/// Quotes the quote-token amount a strategy-shaped deposit of `amount_x`
/// implies over the whole range.
pub fn auto_fill_y_by_strategy(
    active_id: i32,
    bin_step: u16,
    range: BinRange,
    amount_x: U256,
    active_reserves: ActiveBinReserves,
    strategy: StrategyType,
) -> Result<U256, Error> {
    let weights = weights::by_strategy(range, active_id, WEIGHT_LIMITS, strategy)?;
    amounts::auto_fill_y(active_id, bin_step, amount_x, active_reserves, &weights)
}

/// Quotes the base-token amount a strategy-shaped deposit of `amount_y`
/// implies over the whole range.
pub fn auto_fill_x_by_strategy(
    active_id: i32,
    bin_step: u16,
    range: BinRange,
    amount_y: U256,
    active_reserves: ActiveBinReserves,
    strategy: StrategyType,
) -> Result<U256, Error> {
    let weights = weights::by_strategy(range, active_id, WEIGHT_LIMITS, strategy)?;
    amounts::auto_fill_x(active_id, bin_step, amount_y, active_reserves, &weights)
}

/// Single-sided shapes of a strategy: the bid side leans toward the active
/// bin and the ask side away from it for Curve, mirrored for BidAsk.
fn side_shapes(
    strategy: StrategyType,
) -> (
    fn(BinRange) -> Vec<WeightEntry>,
    fn(BinRange) -> Vec<WeightEntry>,
) {
    match strategy {
        StrategyType::Spot => (weights::uniform, weights::uniform),
        StrategyType::Curve => (weights::ascending, weights::descending),
        StrategyType::BidAsk => (weights::descending, weights::ascending),
    }
}

/// Whole-range shape used when the active bin lies beyond the range: the
/// anchored curves degrade into their single-sided renditions.
fn out_of_range_weights(
    range: BinRange,
    active_id: i32,
    strategy: StrategyType,
) -> Vec<WeightEntry> {
    match strategy {
        StrategyType::Spot => weights::uniform(range),
        StrategyType::Curve if active_id < range.min => weights::descending(range),
        StrategyType::Curve => weights::ascending(range),
        StrategyType::BidAsk if active_id < range.min => weights::ascending(range),
        StrategyType::BidAsk => weights::descending(range),
    }
}
