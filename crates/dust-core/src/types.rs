//! Core identifier and amount types.
//!
//! All monetary values are in motes (1 DUST = 10^8 motes) and use u64;
//! fixed-point quantities (weight points, the accumulator) use u128 scaled
//! by [`SCALE`](crate::constants::SCALE).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::SCALE;

/// A monetary amount in motes.
pub type Amount = u64;

/// Sequential position identifier, assigned at mint starting from 1.
///
/// The id is immutable and determines the position's fixed multiplier:
/// earlier positions earn an outsized share per unit of weight.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
    bincode::Encode, bincode::Decode,
)]
pub struct PositionId(pub u64);

impl PositionId {
    /// Fixed positional multiplier `SCALE / id²`, strictly decreasing in id.
    ///
    /// Quadratic decay is the reference curve. For astronomically late ids
    /// the integer division floors to zero; such a position accrues nothing.
    pub fn multiplier(self) -> u128 {
        let sq = (self.0 as u128) * (self.0 as u128);
        if sq == 0 { 0 } else { SCALE / sq }
    }
}

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A 32-byte account identifier, supplied by the external token layer.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
    bincode::Encode, bincode::Decode,
)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    /// The zero account (32 zero bytes).
    pub const ZERO: Self = Self([0u8; 32]);

    /// Create an AccountId from a byte array.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl From<[u8; 32]> for AccountId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for AccountId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
