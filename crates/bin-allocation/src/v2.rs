//! Second-generation strategy front-end.
//!
//! One weight curve spans the whole range and both budgets are allocated
//! at the binding scale, so the curve's shape survives bin for bin. The
//! side the scale did not exhaust is then topped up: its remainder is
//! re-spread through a fresh single-sided curve over the bins beyond the
//! active bin and merged into the primary result.

use {
    crate::{
        amounts::{self, ActiveBinReserves, BinAllocation, BinAmount},
        error::Error,
        strategy::StrategyType,
        weights::{self, BinRange, WeightEntry, WeightLimits},
    },
    primitive_types::U256,
    std::collections::BTreeMap,
};

/// Weight magnitude convention of this front-end. Kept large so anchored
/// curve weights survive division by large fixed-point prices.
pub const WEIGHT_LIMITS: WeightLimits = WeightLimits {
    max: 2_000_000_000_000,
    min: 200_000_000_000,
};

/// Per-bin deposit amounts for both tokens under the given strategy, with
/// any unspent budget reconciled into the result.
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
        "allocating deposit across the bin range"
    );

    let weights = whole_range_weights(range, active_id, strategy)?;
    let allocations = amounts::both_sides(
        active_id,
        bin_step,
        amount_x,
        amount_y,
        active_reserves,
        &weights,
    )?;

    let (spent_x, spent_y) = allocations.iter().fold(
        (U256::zero(), U256::zero()),
        |(sum_x, sum_y), bin| (sum_x + bin.amount_x, sum_y + bin.amount_y),
    );
    let leftover_x = amount_x.saturating_sub(spent_x);
    let leftover_y = amount_y.saturating_sub(spent_y);

    let mut merged: BTreeMap<i32, BinAllocation> = allocations
        .into_iter()
        .map(|bin| (bin.bin_id, bin))
        .collect();

    if !leftover_x.is_zero() && active_id < range.max {
        tracing::debug!(%leftover_x, "topping up the ask side with unspent base budget");
        let extension = BinRange::new(active_id + 1, range.max);
        let amounts = amounts::ask_side(
            active_id,
            bin_step,
            leftover_x,
            &ask_extension_weights(extension, strategy),
        )?;
        merge(&mut merged, amounts.into_iter().map(BinAmount::into_ask));
    }
    if !leftover_y.is_zero() && range.min < active_id {
        tracing::debug!(%leftover_y, "topping up the bid side with unspent quote budget");
        let extension = BinRange::new(range.min, active_id - 1);
        let amounts = amounts::bid_side(
            active_id,
            leftover_y,
            &bid_extension_weights(extension, strategy),
        )?;
        merge(&mut merged, amounts.into_iter().map(BinAmount::into_bid));
    }

    Ok(merged.into_values().collect())
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

/// Whole-range curve of the primary pass. An active bin beyond the range
/// degrades the anchored shapes into their single-sided renditions.
fn whole_range_weights(
    range: BinRange,
    active_id: i32,
    strategy: StrategyType,
) -> Result<Vec<WeightEntry>, Error> {
    let weights = match strategy {
        StrategyType::Spot => weights::uniform(range),
        StrategyType::Curve if active_id < range.min => weights::descending(range),
        StrategyType::Curve if active_id > range.max => weights::ascending(range),
        StrategyType::Curve => weights::curve(range, active_id, WEIGHT_LIMITS)?,
        StrategyType::BidAsk if active_id < range.min => weights::ascending(range),
        StrategyType::BidAsk if active_id > range.max => weights::descending(range),
        StrategyType::BidAsk => weights::bid_ask(range, active_id, WEIGHT_LIMITS)?,
    };
    Ok(weights)
}

/// Fresh single-sided curve for re-spreading an X remainder above the
/// active bin.
fn ask_extension_weights(range: BinRange, strategy: StrategyType) -> Vec<WeightEntry> {
    match strategy {
        StrategyType::Spot => weights::uniform(range),
        StrategyType::Curve => weights::descending(range),
        StrategyType::BidAsk => weights::ascending(range),
    }
}

/// Fresh single-sided curve for re-spreading a Y remainder below the
/// active bin.
fn bid_extension_weights(range: BinRange, strategy: StrategyType) -> Vec<WeightEntry> {
    match strategy {
        StrategyType::Spot => weights::uniform(range),
        StrategyType::Curve => weights::ascending(range),
        StrategyType::BidAsk => weights::descending(range),
    }
}

fn merge(
    merged: &mut BTreeMap<i32, BinAllocation>,
    extra: impl Iterator<Item = BinAllocation>,
) {
    for bin in extra {
        merged
            .entry(bin.bin_id)
            .and_modify(|existing| {
                existing.amount_x += bin.amount_x;
                existing.amount_y += bin.amount_y;
            })
            .or_insert(bin);
    }
}

#[cfg(test)]
mod tests {
    use {super::*, itertools::Itertools};

    fn totals(allocations: &[BinAllocation]) -> (U256, U256) {
        allocations.iter().fold(
            (U256::zero(), U256::zero()),
            |(sum_x, sum_y), bin| (sum_x + bin.amount_x, sum_y + bin.amount_y),
        )
    }

    #[test]
    fn balanced_budgets_fill_the_curve_with_little_leftover() {
        let allocations = amounts_both_side_by_strategy(
            0,
            100,
            BinRange::new(-2, 2),
            U256::from(500),
            U256::from(500),
            ActiveBinReserves::default(),
            StrategyType::Spot,
        )
        .unwrap();

        let (total_x, total_y) = totals(&allocations);
        assert_eq!(total_y, U256::from(500));
        assert!(total_x <= U256::from(500));
        // The X remainder re-spreads over the two ask-side bins, so at
        // most their flooring dust stays unspent.
        assert!(U256::from(500) - total_x < U256::from(2));
    }

    #[test]
    fn excess_base_budget_is_reconciled_into_the_ask_side() {
        let primary = amounts::both_sides(
            0,
            100,
            U256::from(10_000),
            U256::from(500),
            ActiveBinReserves::default(),
            &weights::uniform(BinRange::new(-2, 2)),
        )
        .unwrap();
        let (primary_x, primary_y) = totals(&primary);

        let allocations = amounts_both_side_by_strategy(
            0,
            100,
            BinRange::new(-2, 2),
            U256::from(10_000),
            U256::from(500),
            ActiveBinReserves::default(),
            StrategyType::Spot,
        )
        .unwrap();
        let (total_x, total_y) = totals(&allocations);

        // Y was the binding side: its spend is unchanged while the
        // reconciliation pass pushes X well past the primary spend.
        assert_eq!(total_y, primary_y);
        assert!(total_x > primary_x);
        assert!(total_x <= U256::from(10_000));
        assert!(U256::from(10_000) - total_x < U256::from(2));
    }

    #[test]
    fn merged_output_is_ascending_and_deduplicated() {
        let allocations = amounts_both_side_by_strategy(
            0,
            100,
            BinRange::new(-3, 3),
            U256::from(9_000),
            U256::from(400),
            ActiveBinReserves::default(),
            StrategyType::Curve,
        )
        .unwrap();

        let ids: Vec<_> = allocations.iter().map(|bin| bin.bin_id).collect();
        assert!(ids.iter().tuple_windows().all(|(a, b)| a < b));
        assert_eq!(ids, vec![-3, -2, -1, 0, 1, 2, 3]);
        for bin in &allocations {
            if bin.bin_id < 0 {
                assert!(bin.amount_x.is_zero());
            }
            if bin.bin_id > 0 {
                assert!(bin.amount_y.is_zero());
            }
        }
    }

    #[test]
    fn excess_quote_budget_is_reconciled_into_the_bid_side() {
        let allocations = amounts_both_side_by_strategy(
            0,
            100,
            BinRange::new(-2, 2),
            U256::from(100),
            U256::from(10_000),
            ActiveBinReserves::default(),
            StrategyType::BidAsk,
        )
        .unwrap();
        let (total_x, total_y) = totals(&allocations);
        assert!(total_x <= U256::from(100));
        assert!(total_y <= U256::from(10_000));
        assert!(U256::from(10_000) - total_y < U256::from(2));
    }

    #[test]
    fn active_bin_at_the_range_edge_skips_the_empty_extension() {
        // Active bin at the top of the range: an X leftover has no bins
        // above the active id to extend into and stays unspent.
        let allocations = amounts_both_side_by_strategy(
            2,
            100,
            BinRange::new(-2, 2),
            U256::from(10_000),
            U256::from(500),
            ActiveBinReserves::default(),
            StrategyType::Spot,
        )
        .unwrap();
        let (total_x, total_y) = totals(&allocations);
        assert!(total_x < U256::from(10_000));
        assert!(total_y <= U256::from(500));
    }

    #[test]
    fn out_of_range_active_bin_keeps_the_single_sided_shape() {
        let allocations = amounts_both_side_by_strategy(
            -10,
            100,
            BinRange::new(-2, 2),
            U256::from(1_000),
            U256::from(1_000),
            ActiveBinReserves::default(),
            StrategyType::Curve,
        )
        .unwrap();
        // Purely ask side, shaped by the descending rendition. The dust
        // extension may insert zero-amount bins next to the active id, so
        // only the funded bins carry the shape.
        assert!(allocations.iter().all(|bin| bin.amount_y.is_zero()));
        let funded: Vec<_> = allocations
            .iter()
            .filter(|bin| !bin.amount_x.is_zero())
            .collect();
        assert_eq!(
            funded.iter().map(|bin| bin.bin_id).collect_vec(),
            vec![-2, -1, 0, 1, 2]
        );
        assert!(
            funded
                .iter()
                .tuple_windows()
                .all(|(a, b)| a.amount_x >= b.amount_x)
        );
    }

    #[test]
    fn auto_fill_quotes_zero_for_a_zero_deposit() {
        for strategy in [StrategyType::Spot, StrategyType::Curve, StrategyType::BidAsk] {
            assert_eq!(
                auto_fill_y_by_strategy(
                    0,
                    100,
                    BinRange::new(-5, 5),
                    U256::zero(),
                    ActiveBinReserves::default(),
                    strategy,
                )
                .unwrap(),
                U256::zero()
            );
        }
    }

    #[test]
    fn auto_fill_balances_a_spot_deposit_around_parity() {
        // With step 100 around bin zero the two sides are near-symmetric
        // in value, so the implied Y sits close to the fixed X.
        let implied_y = auto_fill_y_by_strategy(
            0,
            100,
            BinRange::new(-2, 2),
            U256::from(500),
            ActiveBinReserves::default(),
            StrategyType::Spot,
        )
        .unwrap();
        assert!(implied_y > U256::from(490));
        assert!(implied_y < U256::from(510));
    }
}
