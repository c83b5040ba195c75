//! Protocol constants. All monetary values in motes (1 DUST = 10^8 motes).

pub const UNIT: u64 = 100_000_000;

/// Fixed-point precision for weight points and the rewards accumulator.
///
/// Weight points and `rewards_per_weight_point` are both scaled by this
/// constant; a pending reward is `weight_points * accumulator_delta / SCALE`.
pub const SCALE: u128 = 1_000_000_000_000;

/// Weight ceiling. A position's weight can only grow toward this value and
/// never past it; the weight-increase curve is fully damped here.
pub const MAX_WEIGHT: u32 = 1000;

/// Bounds for the initial weight supplied at mint.
pub const MIN_MINT_WEIGHT: u32 = 1;
pub const MAX_MINT_WEIGHT: u32 = 100;

/// Mint price per unit of initial weight: 0.001 DUST.
pub const PRICE_PER_WEIGHT: u64 = UNIT / 1000;

/// Reference amount for the weight-increase curve: 0.001 DUST.
///
/// A realized pending reward equal to this amount maps to a raw curve
/// output of exactly 1 before damping.
pub const BASE_WEIGHT_INCREASE: u64 = UNIT / 1000;

/// Divisor bringing the integer square root of the curve ratio down into
/// the small-integer weight range.
pub const CURVE_NORMALIZER: u128 = 1_000_000;

/// Damping percentage applied to the curve at `MAX_WEIGHT`. The curve keeps
/// `100 - MAX_WEIGHT_DAMPING_PCT` percent of its output at the ceiling.
pub const MAX_WEIGHT_DAMPING_PCT: u32 = 90;

/// One "cent": realized pending rewards and accumulator increases are
/// truncated down to whole multiples of this quantum. The systematic
/// downward rounding leaves a small surplus in the pool (the dust buffer)
/// that backs the solvency invariant. Truncate, never round to nearest.
pub const DUST_QUANTUM: u64 = 100;

/// Minimum pending reward required for a soft withdraw: 0.001 DUST.
pub const MIN_SOFT_WITHDRAW: u64 = UNIT / 1000;

/// Minimum pending reward required for a redistribute: 0.001 DUST.
pub const MIN_REDISTRIBUTE: u64 = UNIT / 1000;

/// Soft withdraw pays out 25% and redistributes the remainder.
pub const SOFT_WITHDRAW_PAYOUT_PCT: u64 = 25;

/// Hard withdraw pays out 75% and redistributes the remainder.
pub const HARD_WITHDRAW_PAYOUT_PCT: u64 = 75;

/// Redistribute keeps 25% (re-credited via checkpoint shift) and
/// redistributes the remainder. No external payout.
pub const REDISTRIBUTE_KEEP_PCT: u64 = 25;
