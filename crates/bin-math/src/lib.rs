//! Fixed-point price math for discretized liquidity ("bin") ladders.
//!
//! Bin-based market makers quote prices on a geometric ladder: adjacent
//! bins differ by a constant factor of `1 + bin_step / 10_000`. This crate
//! computes the 128.128 binary fixed-point price of any bin, the inverse
//! mapping from a price back to its bin, and the conversions between raw
//! `U256` values and the arbitrary-precision types the allocation engine
//! works with.

pub mod conversions;
pub mod error;
pub mod fixed_point;
pub mod price;

pub use error::Error;
