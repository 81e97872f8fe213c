//! Liquidity placement strategies.

use {
    crate::error::Error,
    serde::{Deserialize, Serialize},
};

/// Shape of the weight curve a deposit is spread with.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum StrategyType {
    /// Equal mass in every bin.
    Spot,
    /// Mass peaking at the active bin, decaying toward the range edges.
    Curve,
    /// Mass pushed toward the range edges, thinnest at the active bin.
    BidAsk,
}

impl StrategyType {
    /// Decodes the on-chain strategy discriminant.
    pub fn from_raw(raw: u8) -> Result<Self, Error> {
        match raw {
            1 => Ok(Self::Spot),
            2 => Ok(Self::Curve),
            3 => Ok(Self::BidAsk),
            other => Err(Error::UnsupportedStrategyType(other)),
        }
    }

    /// The on-chain strategy discriminant.
    pub fn as_raw(self) -> u8 {
        match self {
            Self::Spot => 1,
            Self::Curve => 2,
            Self::BidAsk => 3,
        }
    }
}
