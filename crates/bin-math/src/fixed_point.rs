//! 128.128 binary fixed-point arithmetic over `U256`.
//!
//! Bin prices are powers of a base barely above one, so the whole engine
//! keeps them in a 128.128 binary representation: the high 128 bits hold
//! the integer part, the low 128 bits the fraction. The exponentiation and
//! logarithm here mirror the on-chain primitive bin prices are defined by,
//! truncating every intermediate product back to 128 fractional bits.

use {crate::error::Error, primitive_types::U256};

/// Number of fractional bits in the 128.128 representation.
pub const SCALE_OFFSET: u32 = 128;

const LOG_SCALE_OFFSET: u32 = 127;

/// The 128.128 representation of one.
pub fn one_x128() -> U256 {
    U256::one() << SCALE_OFFSET
}

fn log_scale() -> U256 {
    U256::one() << LOG_SCALE_OFFSET
}

fn log_scale_squared() -> U256 {
    log_scale() * log_scale()
}

/// Converts `value / 10^decimals` into 128.128 fixed point, truncating.
pub fn to_x128(value: u128, decimals: u8) -> U256 {
    (U256::from(value) << SCALE_OFFSET) / U256::from(10).pow(U256::from(decimals))
}

/// Splits a 128.128 number into its integer and fractional parts.
pub fn from_x128(value: U256) -> (u128, u128) {
    ((value >> SCALE_OFFSET).low_u128(), value.low_u128())
}

/// Base-2 logarithm of a 128.128 fixed-point number.
///
/// Returns the magnitude of the logarithm as a 128.128 number together
/// with its sign, `true` meaning nonnegative. The least significant
/// fraction bit of the input does not survive the squaring ladder.
pub fn log2(x: U256) -> Result<(U256, bool), Error> {
    if x == U256::one() {
        // The smallest representable value, 2^-128.
        return Ok((U256::from(128) << SCALE_OFFSET, false));
    }
    if x.is_zero() {
        return Err(Error::LogUnderflow);
    }

    let mut x = x >> 1;
    let positive = x >= log_scale();
    if !positive {
        x = log_scale_squared() / x;
    }

    let n = (x >> LOG_SCALE_OFFSET).bits() - 1;
    let mut result = U256::from(n) << LOG_SCALE_OFFSET;
    let mut y = x >> n;
    if y != log_scale() {
        let mut delta = U256::one() << (LOG_SCALE_OFFSET - 1);
        while !delta.is_zero() {
            y = (y * y) >> LOG_SCALE_OFFSET;
            if y >= U256::one() << (LOG_SCALE_OFFSET + 1) {
                result += delta;
                y = y >> 1;
            }
            delta = delta >> 1;
        }
    }

    Ok((result << 1, positive))
}

/// Raises a 128.128 fixed-point base to a signed integer exponent.
///
/// Exponent magnitudes of 2^20 and above are rejected; a base at or above
/// one is inverted up front so the squaring ladder only ever multiplies
/// values below one, and the result is inverted back at the end.
pub fn pow(x: U256, y: i32) -> Result<U256, Error> {
    if x.is_zero() {
        return Ok(U256::zero());
    }
    if y == 0 {
        return Ok(one_x128());
    }
    if y.unsigned_abs() >= 1 << 20 {
        return Err(Error::PowUnderflow);
    }

    let mut invert = y < 0;
    let mut squared = x;
    if squared >= one_x128() {
        squared = U256::MAX / squared;
        invert = !invert;
    }

    let mut result = one_x128();
    let mut exponent = y.unsigned_abs();
    while exponent != 0 {
        if exponent & 1 != 0 {
            result = (result * squared) >> SCALE_OFFSET;
        }
        exponent >>= 1;
        if exponent != 0 {
            squared = (squared * squared) >> SCALE_OFFSET;
        }
    }

    if result.is_zero() {
        return Err(Error::PowUnderflow);
    }
    Ok(if invert { U256::MAX / result } else { result })
}
