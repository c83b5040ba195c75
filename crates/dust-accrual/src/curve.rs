//! Square-root weight-increase curve with high-weight damping.
//!
//! Realizing a pending reward grants weight sub-linearly: quadrupling the
//! realized amount only doubles the grant. On top of the curve, a linear
//! damping factor shrinks the grant as the position's current weight
//! approaches the ceiling, up to a 90% reduction at `MAX_WEIGHT`.

use dust_core::constants::{
    BASE_WEIGHT_INCREASE, CURVE_NORMALIZER, MAX_WEIGHT, MAX_WEIGHT_DAMPING_PCT, SCALE,
};
use dust_core::error::AccrualError;
use dust_core::types::Amount;

use crate::isqrt::isqrt;

/// Weight delta granted for realizing `pending` at `current_weight`.
///
/// The raw grant is `sqrt(pending / BASE_WEIGHT_INCREASE)` in integer
/// fixed-point: `pending` is scaled by [`SCALE`] before the square root so
/// sub-unit ratios still resolve, then normalized back down by
/// [`CURVE_NORMALIZER`] (`sqrt(SCALE)`). Damping then removes up to
/// [`MAX_WEIGHT_DAMPING_PCT`] percent linearly in `current_weight`.
///
/// Returns 0 only for a zero `pending`; any nonzero realization grants at
/// least 1 so progress never stalls to rounding.
pub fn weight_increase(pending: Amount, current_weight: u32) -> Result<u32, AccrualError> {
    if pending == 0 {
        return Ok(0);
    }
    let ratio = (pending as u128)
        .checked_mul(SCALE)
        .ok_or(AccrualError::ArithmeticOverflow)?
        / BASE_WEIGHT_INCREASE as u128;
    let raw = isqrt(ratio) / CURVE_NORMALIZER;

    // Linear damping: 0% reduction at weight 0, MAX_WEIGHT_DAMPING_PCT at
    // the ceiling.
    let reduction = (current_weight.min(MAX_WEIGHT) as u128) * MAX_WEIGHT_DAMPING_PCT as u128
        / MAX_WEIGHT as u128;
    let damped = raw * (100 - reduction) / 100;

    Ok((damped.min(MAX_WEIGHT as u128) as u32).max(1))
}
