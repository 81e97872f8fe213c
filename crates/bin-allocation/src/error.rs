//! Error conditions of the allocation engine.

#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// The active bin lies outside the curve's bin range.
    #[error("active bin outside the strategy range")]
    InvalidStrategyParams,
    /// No positive weight mass is available as a divisor on the requested
    /// side.
    #[error("weight sum on the requested side is not positive")]
    ZeroOrNegativeWeightSum,
    /// A raw strategy discriminant no known variant matches.
    #[error("unsupported strategy type: {0}")]
    UnsupportedStrategyType(u8),
    /// The price primitive failed.
    #[error(transparent)]
    Math(#[from] bin_math::Error),
}
