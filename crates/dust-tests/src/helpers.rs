//! Shared test helpers for scenario and invariant tests.

use dust_accrual::InlineAccrual;
use dust_core::ledger::LedgerState;
use dust_core::position::weight_points;
use dust_core::types::{AccountId, PositionId};

/// Simple account id from a seed byte.
pub fn acct(seed: u8) -> AccountId {
    AccountId([seed; 32])
}

/// The production engine.
pub fn engine() -> InlineAccrual {
    InlineAccrual
}

/// A ledger with one position forced to the given weight.
///
/// Reaching high weights organically takes long realization chains, so
/// crafted states go through [`LedgerState::from_parts`] the same way the
/// store rebuilds them.
pub fn ledger_with_weight(owner: AccountId, weight: u32) -> (LedgerState, PositionId) {
    let e = engine();
    let mut state = LedgerState::new();
    let out = state.mint(&e, owner, 1).unwrap();
    let mut pos = *state.position(out.id).unwrap();
    pos.weight = weight;
    pos.weight_points = weight_points(weight, out.id).unwrap();
    let state = LedgerState::from_parts(
        vec![pos],
        state.rewards_per_weight_point(),
        state.total_rewards(),
        state.pool_balance(),
        state.next_id(),
    )
    .unwrap();
    (state, out.id)
}

/// Weight-point consistency: the aggregate equals the sum over active
/// positions.
pub fn assert_consistent(state: &LedgerState) {
    let sum: u128 = state
        .positions()
        .filter(|p| p.is_active())
        .map(|p| p.weight_points)
        .sum();
    assert_eq!(
        state.total_weight_points(),
        sum,
        "weight-point aggregate out of sync"
    );
}
