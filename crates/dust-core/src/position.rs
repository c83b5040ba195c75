//! Per-position accrual state.
//!
//! A position is a uniquely numbered ledger entry with an integer weight
//! and a reward checkpoint. Positions are created once at mint and never
//! deleted; deactivation (weight zeroed) is terminal.

use serde::{Deserialize, Serialize};

use crate::constants::MAX_WEIGHT;
use crate::error::LedgerError;
use crate::types::{AccountId, Amount, PositionId};

/// A minted position with its accrual state.
///
/// `weight_points` is the cached product `weight * multiplier(id)`, the
/// unit actually used in the global accrual basis. `checkpoint` is the
/// value of the global accumulator the position last settled against;
/// the pending reward is computed as a delta against it.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct Position {
    pub id: PositionId,
    pub owner: AccountId,
    /// Integer stake magnitude in `[0, MAX_WEIGHT]`. Zero means deactivated.
    pub weight: u32,
    /// `weight * multiplier(id)`, fixed-point scaled by SCALE.
    pub weight_points: u128,
    /// Accumulator value this position last settled against.
    pub checkpoint: u128,
    /// Lifetime amount paid out to the owner. Only ever increases.
    pub claimed: Amount,
}

impl Position {
    /// Whether the position still participates in accrual.
    pub fn is_active(&self) -> bool {
        self.weight > 0
    }
}

/// Weight points for a given weight and position id.
///
/// Checked multiplication: weight points feed the global accumulator basis,
/// so an overflow must reject rather than wrap.
pub fn weight_points(weight: u32, id: PositionId) -> Result<u128, LedgerError> {
    debug_assert!(weight <= MAX_WEIGHT);
    id.multiplier()
        .checked_mul(weight as u128)
        .ok_or(LedgerError::ArithmeticOverflow)
}
