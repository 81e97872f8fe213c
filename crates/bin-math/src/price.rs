//! Bin id to price conversion along the geometric bin ladder.
//!
//! Adjacent bins differ by a constant factor of `1 + bin_step / 10_000`
//! with the step expressed in basis points, so the price of a bin is that
//! base raised to the signed bin id, kept in 128.128 fixed point. On-chain
//! storage addresses the same ladder through a shifted unsigned "storage
//! id"; the remapping lives here because the price computation validates
//! ids against the same window.
//!
//! Amounts everywhere in the engine are base (smallest) token units; the
//! per-token-decimals adjustment only exists in the display helper at the
//! bottom of this module.

use {
    crate::{
        conversions::U256Ext,
        error::Error,
        fixed_point::{self, SCALE_OFFSET},
    },
    bigdecimal::BigDecimal,
    num::{BigInt, BigRational, One},
    primitive_types::U256,
};

/// Basis points in one whole unit.
pub const BASIS_POINT_MAX: u16 = 10_000;

/// Decimal digits of the fixed price unit used by the `u128` helpers.
pub const PRICE_UNIT_DECIMALS: u8 = 9;

/// Offset between real (signed) and storage (unsigned) bin ids.
pub const REAL_ID_SHIFT: u32 = 1 << 23;

/// Maps a signed bin id into the unsigned on-chain storage window.
pub fn storage_id_from_real_id(bin_id: i32) -> Result<u32, Error> {
    let storage_id = if bin_id >= 0 {
        REAL_ID_SHIFT.checked_add(bin_id.unsigned_abs())
    } else {
        REAL_ID_SHIFT.checked_sub(bin_id.unsigned_abs())
    };
    storage_id
        .filter(|id| *id < REAL_ID_SHIFT << 1)
        .ok_or(Error::StorageIdOutOfRange)
}

/// Maps an unsigned storage id back to the signed bin id.
pub fn real_id_from_storage_id(storage_id: u32) -> Result<i32, Error> {
    if storage_id >= REAL_ID_SHIFT << 1 {
        return Err(Error::StorageIdOutOfRange);
    }
    let bin_id = if storage_id >= REAL_ID_SHIFT {
        i32::try_from(storage_id - REAL_ID_SHIFT)
    } else {
        i32::try_from(REAL_ID_SHIFT - storage_id).map(|id| -id)
    };
    bin_id.map_err(|_| Error::StorageIdOutOfRange)
}

fn base_factor_x128(bin_step: u16) -> U256 {
    fixed_point::one_x128()
        + (U256::from(bin_step) << SCALE_OFFSET) / U256::from(BASIS_POINT_MAX)
}

/// 128.128 price of a bin: `(1 + bin_step / 10_000)^bin_id`.
pub fn price_x128_from_real_id(bin_id: i32, bin_step: u16) -> Result<U256, Error> {
    storage_id_from_real_id(bin_id)?;
    fixed_point::pow(base_factor_x128(bin_step), bin_id)
}

/// 128.128 price of the bin behind a storage id.
pub fn price_x128_from_storage_id(storage_id: u32, bin_step: u16) -> Result<U256, Error> {
    price_x128_from_real_id(real_id_from_storage_id(storage_id)?, bin_step)
}

/// The bin whose price is closest to the given 128.128 price, found as the
/// ratio of base-2 logarithms. The quotient truncates toward zero, so the
/// result can land one bin short of an exact power of the base.
pub fn real_id_from_price_x128(price_x128: U256, bin_step: u16) -> Result<i32, Error> {
    if bin_step == 0 {
        return Err(Error::ZeroBinStep);
    }
    let (price_magnitude, price_positive) = fixed_point::log2(price_x128)?;
    let (base_magnitude, base_positive) = fixed_point::log2(base_factor_x128(bin_step))?;
    let magnitude = price_magnitude / base_magnitude;
    let bin_id = i32::try_from(magnitude.low_u64())
        .ok()
        .filter(|_| magnitude <= U256::from(i32::MAX))
        .ok_or(Error::StorageIdOutOfRange)?;
    Ok(if price_positive != base_positive {
        -bin_id
    } else {
        bin_id
    })
}

/// Exact price of a bin as a rational number.
pub fn price_ratio_of_bin(bin_id: i32, bin_step: u16) -> Result<BigRational, Error> {
    let price = price_x128_from_real_id(bin_id, bin_step)?;
    Ok(BigRational::new(price.to_big_int(), BigInt::one() << 128))
}

/// Decimals-adjusted price for display: `price * 10^(decimals_x -
/// decimals_y)`, rendered exactly in base 10. This is the only place the
/// engine touches token decimals.
pub fn ui_price_of_bin(
    bin_id: i32,
    bin_step: u16,
    decimals_x: u8,
    decimals_y: u8,
) -> Result<BigDecimal, Error> {
    let price = price_x128_from_real_id(bin_id, bin_step)?;
    // x / 2^128 == x * 5^128 / 10^128, so the binary fraction has an exact
    // decimal form.
    let digits = price.to_big_int() * BigInt::from(5).pow(128u32);
    let scale = 128 + i64::from(decimals_y) - i64::from(decimals_x);
    Ok(BigDecimal::new(digits, scale))
}

/// Converts a price expressed in the fixed 10^9 decimal unit into 128.128.
pub fn price_x128_from_unit_price(unit_price: u128) -> U256 {
    fixed_point::to_x128(unit_price, PRICE_UNIT_DECIMALS)
}

/// Converts a 128.128 price into the fixed 10^9 decimal unit, truncating.
pub fn unit_price_from_price_x128(price_x128: U256) -> Result<U256, Error> {
    price_x128
        .checked_mul(U256::from(10).pow(U256::from(PRICE_UNIT_DECIMALS)))
        .map(|scaled| scaled >> SCALE_OFFSET)
        .ok_or(Error::AmountOverflow)
}
