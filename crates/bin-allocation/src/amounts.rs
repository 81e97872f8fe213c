//! Conversion of weight distributions into per-bin token amounts.
//!
//! Bid-side (quote token, Y) amounts are proportional to raw weight while
//! ask-side (base token, X) amounts are proportional to weight divided by
//! the bin price, so equal weight represents equal value on either side of
//! the active bin. All intermediate arithmetic is exact rational math;
//! every division that materializes a token amount floors toward zero,
//! because amounts are drawn from a fixed caller budget and must never
//! round past it.

use {
    crate::{error::Error, weights::WeightEntry},
    bin_math::{
        conversions::{U256Ext, big_int_to_u256, big_rational_to_u256_floor},
        price,
    },
    num::{BigInt, BigRational, One, Zero},
    primitive_types::U256,
    serde::{Deserialize, Serialize},
};

/// Amount of a single token placed into one bin.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinAmount {
    pub bin_id: i32,
    pub amount: U256,
}

impl BinAmount {
    /// Wraps the amount as a quote-token (bid side) allocation.
    pub fn into_bid(self) -> BinAllocation {
        BinAllocation {
            bin_id: self.bin_id,
            amount_x: U256::zero(),
            amount_y: self.amount,
        }
    }

    /// Wraps the amount as a base-token (ask side) allocation.
    pub fn into_ask(self) -> BinAllocation {
        BinAllocation {
            bin_id: self.bin_id,
            amount_x: self.amount,
            amount_y: U256::zero(),
        }
    }
}

/// Amounts of both tokens placed into one bin. Outside the active bin at
/// most one side is nonzero.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinAllocation {
    pub bin_id: i32,
    pub amount_x: U256,
    pub amount_y: U256,
}

/// Reserves already sitting in the active bin. Both zero means the bin is
/// fresh and splits its weight evenly by value at the current price.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ActiveBinReserves {
    pub amount_x: U256,
    pub amount_y: U256,
}

impl ActiveBinReserves {
    fn is_fresh(&self) -> bool {
        self.amount_x.is_zero() && self.amount_y.is_zero()
    }
}

fn weight_ratio(weight: u64) -> BigRational {
    BigRational::from_integer(weight.into())
}

/// Spreads `total_amount` of the quote token over the bins at or below the
/// active bin, proportionally to raw weight. Bins above the active bin are
/// emitted with a zero amount.
pub fn bid_side(
    active_id: i32,
    total_amount: U256,
    distribution: &[WeightEntry],
) -> Result<Vec<BinAmount>, Error> {
    let total_weight: BigInt = distribution
        .iter()
        .filter(|entry| entry.bin_id <= active_id)
        .map(|entry| BigInt::from(entry.weight))
        .sum();
    if total_weight.is_zero() {
        return Err(Error::ZeroOrNegativeWeightSum);
    }

    let total_amount = total_amount.to_big_int();
    distribution
        .iter()
        .map(|entry| {
            let amount = if entry.bin_id > active_id {
                U256::zero()
            } else {
                big_int_to_u256(&(&total_amount * entry.weight / &total_weight))?
            };
            Ok(BinAmount { bin_id: entry.bin_id, amount })
        })
        .collect()
}

/// Spreads `total_amount` of the base token over the bins at or above the
/// active bin, proportionally to weight per price. Bins below the active
/// bin are emitted with a zero amount.
pub fn ask_side(
    active_id: i32,
    bin_step: u16,
    total_amount: U256,
    distribution: &[WeightEntry],
) -> Result<Vec<BinAmount>, Error> {
    let mut total_weight_per_price = BigRational::zero();
    let mut weight_per_price = Vec::with_capacity(distribution.len());
    for entry in distribution {
        if entry.bin_id < active_id {
            weight_per_price.push(None);
            continue;
        }
        let per_price =
            weight_ratio(entry.weight) / price::price_ratio_of_bin(entry.bin_id, bin_step)?;
        total_weight_per_price += &per_price;
        weight_per_price.push(Some(per_price));
    }
    if total_weight_per_price.is_zero() {
        return Err(Error::ZeroOrNegativeWeightSum);
    }

    let total_amount = total_amount.to_big_rational();
    distribution
        .iter()
        .zip(weight_per_price)
        .map(|(entry, per_price)| {
            let amount = match per_price {
                None => U256::zero(),
                Some(per_price) => big_rational_to_u256_floor(
                    &(&total_amount * per_price / &total_weight_per_price),
                )?,
            };
            Ok(BinAmount { bin_id: entry.bin_id, amount })
        })
        .collect()
}

/// Splits the active bin's weight into X and Y components. A fresh bin
/// splits evenly by value at the current price; otherwise the split
/// follows the bin's existing reserve ratio, and a zero reserve on one
/// side leaves that side's component at zero.
fn active_bin_split(
    weight: u64,
    price: &BigRational,
    reserves: &ActiveBinReserves,
) -> (BigRational, BigRational) {
    let weight = weight_ratio(weight);
    if reserves.is_fresh() {
        let half = weight / BigRational::from_integer(2.into());
        return (&half / price, half);
    }

    let reserve_x = reserves.amount_x.to_big_rational();
    let reserve_y = reserves.amount_y.to_big_rational();
    let mut weight_x = BigRational::zero();
    let mut weight_y = BigRational::zero();
    if !reserves.amount_x.is_zero() {
        weight_x = &weight / (price + &reserve_y / &reserve_x);
    }
    if !reserves.amount_y.is_zero() {
        weight_y = &weight / (BigRational::one() + price * &reserve_x / &reserve_y);
    }
    (weight_x, weight_y)
}

/// Adds the strictly-below and strictly-above sides of the distribution to
/// an active-bin split: weights below count toward Y, weights above count
/// toward X scaled down by their bin price.
fn split_weight_sums(
    active_id: i32,
    bin_step: u16,
    distribution: &[WeightEntry],
    active_split: (BigRational, BigRational),
) -> Result<(BigRational, BigRational), Error> {
    let (mut weight_x, mut weight_y) = active_split;
    for entry in distribution {
        if entry.bin_id < active_id {
            weight_y += weight_ratio(entry.weight);
        } else if entry.bin_id > active_id {
            weight_x +=
                weight_ratio(entry.weight) / price::price_ratio_of_bin(entry.bin_id, bin_step)?;
        }
    }
    Ok((weight_x, weight_y))
}

/// Side weight sums when no single entry matches the active bin: bins at
/// the active id count toward the X side.
fn whole_weight_sums(
    active_id: i32,
    bin_step: u16,
    distribution: &[WeightEntry],
) -> Result<(BigRational, BigRational), Error> {
    let mut weight_x = BigRational::zero();
    let mut weight_y = BigRational::zero();
    for entry in distribution {
        if entry.bin_id < active_id {
            weight_y += weight_ratio(entry.weight);
        } else {
            weight_x +=
                weight_ratio(entry.weight) / price::price_ratio_of_bin(entry.bin_id, bin_step)?;
        }
    }
    Ok((weight_x, weight_y))
}

/// The value-per-weight scale both budgets support together. A side with
/// no weight mass puts no bound on the scale; with no mass on either side
/// there is nothing to divide by.
fn binding_scale(
    amount_x: U256,
    amount_y: U256,
    weight_x: &BigRational,
    weight_y: &BigRational,
) -> Result<BigRational, Error> {
    let scale_x = (!weight_x.is_zero()).then(|| amount_x.to_big_rational() / weight_x);
    let scale_y = (!weight_y.is_zero()).then(|| amount_y.to_big_rational() / weight_y);
    match (scale_x, scale_y) {
        (Some(scale_x), Some(scale_y)) => Ok(scale_x.min(scale_y)),
        (Some(scale_x), None) => Ok(scale_x),
        (None, Some(scale_y)) => Ok(scale_y),
        (None, None) => Err(Error::ZeroOrNegativeWeightSum),
    }
}

/// Spreads both budgets over the distribution at a single value-per-weight
/// scale.
///
/// The scale is the minimum of what either budget supports, so one side is
/// exhausted up to flooring dust while the other can leave a remainder
/// unspent. The active bin, when present, absorbs both tokens according to
/// its reserve-ratio split. An active bin beyond either end of the
/// distribution, or a zero budget on one side, degenerates into a purely
/// single-sided allocation.
pub fn both_sides(
    active_id: i32,
    bin_step: u16,
    amount_x: U256,
    amount_y: U256,
    active_reserves: ActiveBinReserves,
    distribution: &[WeightEntry],
) -> Result<Vec<BinAllocation>, Error> {
    let (Some(first), Some(last)) = (distribution.first(), distribution.last()) else {
        return Err(Error::ZeroOrNegativeWeightSum);
    };

    if active_id > last.bin_id || amount_x.is_zero() {
        let amounts = bid_side(active_id, amount_y, distribution)?;
        return Ok(amounts.into_iter().map(BinAmount::into_bid).collect());
    }
    if active_id < first.bin_id || amount_y.is_zero() {
        let amounts = ask_side(active_id, bin_step, amount_x, distribution)?;
        return Ok(amounts.into_iter().map(BinAmount::into_ask).collect());
    }

    let active: Vec<&WeightEntry> = distribution
        .iter()
        .filter(|entry| entry.bin_id == active_id)
        .collect();
    if let [active_entry] = active[..] {
        let price = price::price_ratio_of_bin(active_id, bin_step)?;
        let split = active_bin_split(active_entry.weight, &price, &active_reserves);
        let (weight_x, weight_y) =
            split_weight_sums(active_id, bin_step, distribution, split.clone())?;
        let scale = binding_scale(amount_x, amount_y, &weight_x, &weight_y)?;
        distribution
            .iter()
            .map(|entry| {
                if entry.bin_id < active_id {
                    let amount = &scale * weight_ratio(entry.weight);
                    Ok(BinAmount {
                        bin_id: entry.bin_id,
                        amount: big_rational_to_u256_floor(&amount)?,
                    }
                    .into_bid())
                } else if entry.bin_id > active_id {
                    let per_price = weight_ratio(entry.weight)
                        / price::price_ratio_of_bin(entry.bin_id, bin_step)?;
                    Ok(BinAmount {
                        bin_id: entry.bin_id,
                        amount: big_rational_to_u256_floor(&(&scale * per_price))?,
                    }
                    .into_ask())
                } else {
                    Ok(BinAllocation {
                        bin_id: entry.bin_id,
                        amount_x: big_rational_to_u256_floor(&(&scale * &split.0))?,
                        amount_y: big_rational_to_u256_floor(&(&scale * &split.1))?,
                    })
                }
            })
            .collect()
    } else {
        let (weight_x, weight_y) = whole_weight_sums(active_id, bin_step, distribution)?;
        let scale = binding_scale(amount_x, amount_y, &weight_x, &weight_y)?;
        distribution
            .iter()
            .map(|entry| {
                if entry.bin_id < active_id {
                    let amount = &scale * weight_ratio(entry.weight);
                    Ok(BinAmount {
                        bin_id: entry.bin_id,
                        amount: big_rational_to_u256_floor(&amount)?,
                    }
                    .into_bid())
                } else {
                    let per_price = weight_ratio(entry.weight)
                        / price::price_ratio_of_bin(entry.bin_id, bin_step)?;
                    Ok(BinAmount {
                        bin_id: entry.bin_id,
                        amount: big_rational_to_u256_floor(&(&scale * per_price))?,
                    }
                    .into_ask())
                }
            })
            .collect()
    }
}

/// Side weight sums for quoting: uses the active-bin split when exactly
/// one entry sits on the active bin, the plain partition otherwise.
fn fill_weight_sums(
    active_id: i32,
    bin_step: u16,
    active_reserves: ActiveBinReserves,
    distribution: &[WeightEntry],
) -> Result<(BigRational, BigRational), Error> {
    let active: Vec<&WeightEntry> = distribution
        .iter()
        .filter(|entry| entry.bin_id == active_id)
        .collect();
    if let [active_entry] = active[..] {
        let price = price::price_ratio_of_bin(active_id, bin_step)?;
        let split = active_bin_split(active_entry.weight, &price, &active_reserves);
        split_weight_sums(active_id, bin_step, distribution, split)
    } else {
        whole_weight_sums(active_id, bin_step, distribution)
    }
}

/// Quotes the quote-token amount a fixed base-token deposit implies over
/// the distribution, without materializing per-bin amounts. A distribution
/// with no X-side mass quotes at scale one.
pub fn auto_fill_y(
    active_id: i32,
    bin_step: u16,
    amount_x: U256,
    active_reserves: ActiveBinReserves,
    distribution: &[WeightEntry],
) -> Result<U256, Error> {
    let (weight_x, weight_y) =
        fill_weight_sums(active_id, bin_step, active_reserves, distribution)?;
    let scale = if weight_x.is_zero() {
        BigRational::one()
    } else {
        amount_x.to_big_rational() / weight_x
    };
    Ok(big_rational_to_u256_floor(&(scale * weight_y))?)
}

/// Quotes the base-token amount a fixed quote-token deposit implies over
/// the distribution, mirroring [`auto_fill_y`].
pub fn auto_fill_x(
    active_id: i32,
    bin_step: u16,
    amount_y: U256,
    active_reserves: ActiveBinReserves,
    distribution: &[WeightEntry],
) -> Result<U256, Error> {
    let (weight_x, weight_y) =
        fill_weight_sums(active_id, bin_step, active_reserves, distribution)?;
    let scale = if weight_y.is_zero() {
        BigRational::one()
    } else {
        amount_y.to_big_rational() / weight_y
    };
    Ok(big_rational_to_u256_floor(&(scale * weight_x))?)
}
