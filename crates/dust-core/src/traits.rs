//! Trait interfaces for the Dust ledger.
//!
//! [`AccrualEngine`] is the seam between the ledger orchestration
//! (dust-core) and the accrual math (dust-accrual). The ledger never
//! computes a reward figure itself; every accumulator increase, pending
//! delta, and weight bump goes through the engine so that the math can be
//! swapped at construction time (inline vs delegated) without touching
//! the state machine.

use crate::error::AccrualError;
use crate::types::Amount;

/// Pure accrual arithmetic.
///
/// All methods are deterministic functions of their arguments; an engine
/// holds no ledger state. Engines are selected once at construction and
/// must not be swapped mid-operation: two engines that diverge in rounding
/// would break the checkpoint and monotonicity invariants.
pub trait AccrualEngine: Send + Sync {
    /// Scaled accumulator increase for distributing `amount` over `basis`
    /// weight points.
    ///
    /// Returns 0 when `basis` is 0 (nothing to distribute against). The
    /// increase is capped so it never promises more than `pool_balance`
    /// and is truncated down to the quantum grid (the dust buffer).
    fn accumulator_increase(
        &self,
        amount: Amount,
        basis: u128,
        pool_balance: Amount,
    ) -> Result<u128, AccrualError>;

    /// Pending reward for `weight_points` against an accumulator delta,
    /// truncated down to whole cents.
    fn pending_delta(&self, weight_points: u128, accumulator_delta: u128)
    -> Result<Amount, AccrualError>;

    /// Weight delta granted for realizing `pending` at `current_weight`.
    ///
    /// Returns 0 only when `pending` is 0; any nonzero realization grants
    /// at least 1 (forward-progress guarantee).
    fn weight_increase(&self, pending: Amount, current_weight: u32) -> Result<u32, AccrualError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SCALE;

    /// Exact-arithmetic mock: no quantum truncation, only the required
    /// balance cap. Good enough to exercise trait plumbing.
    struct ExactAccrual;

    impl AccrualEngine for ExactAccrual {
        fn accumulator_increase(
            &self,
            amount: Amount,
            basis: u128,
            pool_balance: Amount,
        ) -> Result<u128, AccrualError> {
            if basis == 0 {
                return Ok(0);
            }
            let capped = amount.min(pool_balance) as u128;
            capped
                .checked_mul(SCALE)
                .map(|v| v / basis)
                .ok_or(AccrualError::ArithmeticOverflow)
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
            u64::try_from(raw).map_err(|_| AccrualError::ArithmeticOverflow)
        }

        fn weight_increase(&self, pending: Amount, _current_weight: u32) -> Result<u32, AccrualError> {
            Ok(if pending == 0 { 0 } else { 1 })
        }
    }

    #[test]
    fn zero_basis_yields_zero_increase() {
        let e = ExactAccrual;
        assert_eq!(e.accumulator_increase(1_000, 0, 1_000).unwrap(), 0);
    }

    #[test]
    fn increase_capped_by_pool_balance() {
        let e = ExactAccrual;
        let unbounded = e.accumulator_increase(1_000, SCALE, 1_000).unwrap();
        let capped = e.accumulator_increase(1_000, SCALE, 500).unwrap();
        assert!(capped < unbounded);
    }

    #[test]
    fn pending_round_trips_increase() {
        let e = ExactAccrual;
        let basis = 4 * SCALE;
        let inc = e.accumulator_increase(1_000, basis, 1_000).unwrap();
        // A position holding the whole basis recovers the whole amount.
        assert_eq!(e.pending_delta(basis, inc).unwrap(), 1_000);
    }

    #[test]
    fn engine_is_object_safe() {
        let e = ExactAccrual;
        let dyn_e: &dyn AccrualEngine = &e;
        assert_eq!(dyn_e.weight_increase(0, 0).unwrap(), 0);
    }
}
