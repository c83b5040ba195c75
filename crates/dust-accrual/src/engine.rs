//! Production [`AccrualEngine`] implementations.
//!
//! [`InlineAccrual`] computes every figure in-process; this is the engine
//! live deployments run. [`DelegatedAccrual`] wraps any other engine behind
//! the same trait, standing in for a deployment where the math lives in a
//! separately upgraded component. Both are selected once at construction.

use dust_core::constants::{DUST_QUANTUM, SCALE};
use dust_core::error::AccrualError;
use dust_core::traits::AccrualEngine;
use dust_core::types::Amount;
use tracing::trace;

use crate::curve;

/// In-process accrual arithmetic. Stateless and deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineAccrual;

impl AccrualEngine for InlineAccrual {
    fn accumulator_increase(
        &self,
        amount: Amount,
        basis: u128,
        pool_balance: Amount,
    ) -> Result<u128, AccrualError> {
        if basis == 0 {
            return Ok(0);
        }
        let inc = (amount as u128)
            .checked_mul(SCALE)
            .ok_or(AccrualError::ArithmeticOverflow)?
            / basis;
        // Cap: the accumulator may never promise more than the pool holds.
        let cap = (pool_balance as u128)
            .checked_mul(SCALE)
            .ok_or(AccrualError::ArithmeticOverflow)?
            / basis;
        let inc = inc.min(cap);
        // Truncate to the quantum grid; the remainder feeds the dust buffer.
        Ok(inc - inc % DUST_QUANTUM as u128)
    }

    fn pending_delta(
        &self,
        weight_points: u128,
        accumulator_delta: u128,
    ) -> Result<Amount, AccrualError> {
        let raw = weight_points
            .checked_mul(accumulator_delta)
            .ok_or(AccrualError::ArithmeticOverflow)?
            / SCALE;
        let quantized = raw - raw % DUST_QUANTUM as u128;
        u64::try_from(quantized).map_err(|_| AccrualError::ArithmeticOverflow)
    }

    fn weight_increase(&self, pending: Amount, current_weight: u32) -> Result<u32, AccrualError> {
        curve::weight_increase(pending, current_weight)
    }
}

/// Forwarding engine: routes every accrual call to a wrapped engine.
///
/// The indirection models a deployment where accrual math is served by a
/// replaceable component; the ledger sees the same trait either way.
pub struct DelegatedAccrual {
    inner: Box<dyn AccrualEngine>,
}

impl DelegatedAccrual {
    pub fn new(inner: Box<dyn AccrualEngine>) -> Self {
        Self { inner }
    }
}

impl AccrualEngine for DelegatedAccrual {
    fn accumulator_increase(
        &self,
        amount: Amount,
        basis: u128,
        pool_balance: Amount,
    ) -> Result<u128, AccrualError> {
        let inc = self.inner.accumulator_increase(amount, basis, pool_balance)?;
        trace!(amount, basis, increase = inc, "delegated accumulator increase");
        Ok(inc)
    }

    fn pending_delta(
        &self,
        weight_points: u128,
        accumulator_delta: u128,
    ) -> Result<Amount, AccrualError> {
        self.inner.pending_delta(weight_points, accumulator_delta)
    }

    fn weight_increase(&self, pending: Amount, current_weight: u32) -> Result<u32, AccrualError> {
        self.inner.weight_increase(pending, current_weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dust_core::constants::UNIT;
    use proptest::prelude::*;

    #[test]
    fn zero_basis_distributes_nothing() {
        let e = InlineAccrual;
        assert_eq!(e.accumulator_increase(UNIT, 0, UNIT).unwrap(), 0);
    }

    #[test]
    fn increase_lands_on_quantum_grid() {
        let e = InlineAccrual;
        // An awkward basis forces a non-trivial remainder.
        let inc = e.accumulator_increase(UNIT, 7 * SCALE / 3, 10 * UNIT).unwrap();
        assert!(inc > 0);
        assert_eq!(inc % DUST_QUANTUM as u128, 0);
    }

    #[test]
    fn increase_capped_by_pool() {
        let e = InlineAccrual;
        let basis = SCALE;
        // Amount exceeds what the pool holds; the cap binds.
        let capped = e.accumulator_increase(10 * UNIT, basis, UNIT).unwrap();
        let exact = e.accumulator_increase(UNIT, basis, UNIT).unwrap();
        assert_eq!(capped, exact);
    }

    #[test]
    fn pending_is_quantized() {
        let e = InlineAccrual;
        // 1/3 of a scale unit leaves a remainder below the quantum.
        let pending = e.pending_delta(SCALE / 3, SCALE).unwrap();
        assert_eq!(pending % DUST_QUANTUM, 0);
    }

    #[test]
    fn pending_recovers_full_basis_share() {
        let e = InlineAccrual;
        let basis = 4 * SCALE;
        let inc = e.accumulator_increase(UNIT, basis, UNIT).unwrap();
        let pending = e.pending_delta(basis, inc).unwrap();
        // Truncation may shave dust but never overshoots.
        assert!(pending <= UNIT);
        assert!(UNIT - pending < 2 * DUST_QUANTUM * 4);
    }

    #[test]
    fn delegated_forwards_to_inner() {
        let e = DelegatedAccrual::new(Box::new(InlineAccrual));
        let basis = 2 * SCALE;
        assert_eq!(
            e.accumulator_increase(UNIT, basis, UNIT).unwrap(),
            InlineAccrual.accumulator_increase(UNIT, basis, UNIT).unwrap()
        );
        assert_eq!(
            e.pending_delta(basis, SCALE).unwrap(),
            InlineAccrual.pending_delta(basis, SCALE).unwrap()
        );
        assert_eq!(
            e.weight_increase(UNIT, 10).unwrap(),
            InlineAccrual.weight_increase(UNIT, 10).unwrap()
        );
    }

    proptest! {
        #[test]
        fn distribution_never_exceeds_amount(
            amount in 0u64..1u64 << 50,
            basis_units in 1u128..1u128 << 40,
        ) {
            let e = InlineAccrual;
            let basis = basis_units * SCALE / 1000;
            let inc = e.accumulator_increase(amount, basis, amount).unwrap();
            // A claimant holding the entire basis recovers at most `amount`.
            let recovered = e.pending_delta(basis, inc).unwrap();
            prop_assert!(recovered <= amount);
        }

        #[test]
        fn increase_always_on_grid(
            amount in 0u64..1u64 << 50,
            basis in 1u128..1u128 << 60,
            pool in 0u64..1u64 << 50,
        ) {
            let inc = InlineAccrual.accumulator_increase(amount, basis, pool).unwrap();
            prop_assert_eq!(inc % DUST_QUANTUM as u128, 0);
        }

        #[test]
        fn pending_monotone_in_delta(
            wp in 1u128..1u128 << 50,
            d1 in 0u128..1u128 << 50,
            d2 in 0u128..1u128 << 50,
        ) {
            let (lo, hi) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
            let e = InlineAccrual;
            prop_assert!(e.pending_delta(wp, lo).unwrap() <= e.pending_delta(wp, hi).unwrap());
        }
    }
}
