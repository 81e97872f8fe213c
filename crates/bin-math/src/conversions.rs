//! Conversions between `U256` and the arbitrary-precision `num` types.

use {
    crate::error::Error,
    num::{BigInt, BigRational, bigint::Sign},
    primitive_types::U256,
};

/// Extension trait lifting raw `U256` values into arbitrary-precision
/// numbers.
pub trait U256Ext {
    fn to_big_int(&self) -> BigInt;
    fn to_big_rational(&self) -> BigRational;
}

impl U256Ext for U256 {
    fn to_big_int(&self) -> BigInt {
        let mut bytes = [0u8; 32];
        self.to_big_endian(&mut bytes);
        BigInt::from_bytes_be(Sign::Plus, &bytes)
    }

    fn to_big_rational(&self) -> BigRational {
        BigRational::from_integer(self.to_big_int())
    }
}

/// Converts a nonnegative big integer back into a `U256`.
pub fn big_int_to_u256(value: &BigInt) -> Result<U256, Error> {
    let (sign, bytes) = value.to_bytes_be();
    if sign == Sign::Minus || bytes.len() > 32 {
        return Err(Error::AmountOverflow);
    }
    Ok(U256::from_big_endian(&bytes))
}

/// Floors a nonnegative rational down to a whole `U256`.
pub fn big_rational_to_u256_floor(value: &BigRational) -> Result<U256, Error> {
    big_int_to_u256(&value.floor().to_integer())
}
