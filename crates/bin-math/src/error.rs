//! Error conditions of the bin price primitive.

#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// The base-2 logarithm of zero is undefined.
    #[error("logarithm of zero is undefined")]
    LogUnderflow,
    /// The exponent magnitude is outside the supported window, or the
    /// result truncated all the way to zero.
    #[error("fixed point exponentiation underflowed")]
    PowUnderflow,
    /// The bin id does not fit the unsigned storage id window.
    #[error("bin id is outside the storage id window")]
    StorageIdOutOfRange,
    /// A bin step of zero describes a degenerate ladder with no price
    /// movement between bins.
    #[error("bin step must be positive")]
    ZeroBinStep,
    /// The value does not fit in a `U256`.
    #[error("value does not fit in a U256")]
    AmountOverflow,
}
