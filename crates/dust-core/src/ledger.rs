//! The global ledger: accumulator state, per-position checkpoints, and the
//! reward-realizing operations.
//!
//! Accrual is O(1) per operation. A deposit advances the single global
//! `rewards_per_weight_point` accumulator; a position's pending reward is a
//! pure function of its weight points, the accumulator, and its checkpoint.
//! No operation iterates the position set except the cold diagnostic
//! queries ([`LedgerState::contract_health`], [`LedgerState::can_claim_victory`]).
//!
//! Every mutating operation is all-or-nothing: all new values are staged in
//! locals and validated before any field is written, so a late failure
//! (including arithmetic overflow inside the engine) leaves the state
//! untouched. The external host serializes operations; in a multi-threaded
//! host the whole `LedgerState` goes behind a single exclusion boundary.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::constants::{
    HARD_WITHDRAW_PAYOUT_PCT, MAX_MINT_WEIGHT, MAX_WEIGHT, MIN_MINT_WEIGHT, MIN_REDISTRIBUTE,
    MIN_SOFT_WITHDRAW, PRICE_PER_WEIGHT, REDISTRIBUTE_KEEP_PCT, SCALE, SOFT_WITHDRAW_PAYOUT_PCT,
};
use crate::error::LedgerError;
use crate::position::{Position, weight_points};
use crate::traits::AccrualEngine;
use crate::types::{AccountId, Amount, PositionId};

/// Result of a successful mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MintOutcome {
    pub id: PositionId,
    pub weight: u32,
    /// Payment collected by the external runtime: `PRICE_PER_WEIGHT * weight`.
    pub payment: Amount,
}

/// Result of a successful soft withdraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SoftWithdrawOutcome {
    pub payout: Amount,
    pub redistributed: Amount,
    pub new_weight: u32,
}

/// Result of a successful hard withdraw. The position is now terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HardWithdrawOutcome {
    pub payout: Amount,
    pub redistributed: Amount,
}

/// Result of a successful redistribute. No external payout occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RedistributeOutcome {
    pub kept: Amount,
    pub redistributed: Amount,
    pub new_weight: u32,
}

/// Read-only view of one position plus its derived accrual figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PositionInfo {
    pub id: PositionId,
    pub owner: AccountId,
    pub weight: u32,
    /// Fixed positional multiplier, scaled by SCALE.
    pub multiplier: u128,
    pub pending: Amount,
    pub claimed: Amount,
    pub active: bool,
}

/// Aggregate solvency diagnostics, computed by full scan (cold path).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContractHealth {
    /// Lifetime sum of new money received.
    pub total_rewards: Amount,
    /// Sum of every position's pending reward, each capped at the balance.
    pub pending_sum: Amount,
    pub balance: Amount,
    /// Surplus created by systematic downward rounding.
    pub dust_buffer: Amount,
    pub solvent: bool,
}

/// The owned ledger aggregate: every mutation flows through `&mut self`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerState {
    positions: BTreeMap<u64, Position>,
    total_weight_points: u128,
    rewards_per_weight_point: u128,
    total_rewards: Amount,
    pool_balance: Amount,
    next_id: u64,
}

impl LedgerState {
    /// An empty ledger. The first minted position receives id 1.
    pub fn new() -> Self {
        Self {
            positions: BTreeMap::new(),
            total_weight_points: 0,
            rewards_per_weight_point: 0,
            total_rewards: 0,
            pool_balance: 0,
            next_id: 1,
        }
    }

    /// Rebuild a ledger from persisted parts.
    ///
    /// `total_weight_points` is recomputed from the active positions; the
    /// caller (the store) compares it against the persisted value as an
    /// integrity check.
    pub fn from_parts(
        positions: Vec<Position>,
        rewards_per_weight_point: u128,
        total_rewards: Amount,
        pool_balance: Amount,
        next_id: u64,
    ) -> Result<Self, LedgerError> {
        let mut total_weight_points: u128 = 0;
        let mut map = BTreeMap::new();
        for pos in positions {
            if pos.is_active() {
                total_weight_points = total_weight_points
                    .checked_add(pos.weight_points)
                    .ok_or(LedgerError::ArithmeticOverflow)?;
            }
            map.insert(pos.id.0, pos);
        }
        Ok(Self {
            positions: map,
            total_weight_points,
            rewards_per_weight_point,
            total_rewards,
            pool_balance,
            next_id,
        })
    }

    // --- Accessors ---

    pub fn total_weight_points(&self) -> u128 {
        self.total_weight_points
    }

    pub fn rewards_per_weight_point(&self) -> u128 {
        self.rewards_per_weight_point
    }

    pub fn total_rewards(&self) -> Amount {
        self.total_rewards
    }

    pub fn pool_balance(&self) -> Amount {
        self.pool_balance
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn position(&self, id: PositionId) -> Option<&Position> {
        self.positions.get(&id.0)
    }

    /// All positions in id order, active and deactivated alike.
    pub fn positions(&self) -> impl Iterator<Item = &Position> {
        self.positions.values()
    }

    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    // --- Mutating operations ---

    /// Mint a new position. The payment (`PRICE_PER_WEIGHT * weight`) enters
    /// the ledger as new money distributed to the *existing* positions; the
    /// new position's checkpoint starts at the post-deposit accumulator so
    /// it has no claim on its own mint fee.
    pub fn mint(
        &mut self,
        engine: &dyn AccrualEngine,
        owner: AccountId,
        initial_weight: u32,
    ) -> Result<MintOutcome, LedgerError> {
        if !(MIN_MINT_WEIGHT..=MAX_MINT_WEIGHT).contains(&initial_weight) {
            return Err(LedgerError::InvalidWeight {
                got: initial_weight,
                min: MIN_MINT_WEIGHT,
                max: MAX_MINT_WEIGHT,
            });
        }
        let payment = PRICE_PER_WEIGHT
            .checked_mul(initial_weight as Amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let id = PositionId(self.next_id);
        let points = weight_points(initial_weight, id)?;

        // Stage: new money lands in the pool, then the accumulator advances
        // against the pre-mint basis (the new position is excluded).
        let total_rewards = self
            .total_rewards
            .checked_add(payment)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let pool_balance = self
            .pool_balance
            .checked_add(payment)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let increase = engine.accumulator_increase(payment, self.total_weight_points, pool_balance)?;
        let accumulator = self
            .rewards_per_weight_point
            .checked_add(increase)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let total_points = self
            .total_weight_points
            .checked_add(points)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        // Commit.
        self.total_rewards = total_rewards;
        self.pool_balance = pool_balance;
        self.rewards_per_weight_point = accumulator;
        self.total_weight_points = total_points;
        self.positions.insert(
            id.0,
            Position {
                id,
                owner,
                weight: initial_weight,
                weight_points: points,
                checkpoint: accumulator,
                claimed: 0,
            },
        );
        self.next_id += 1;
        Ok(MintOutcome {
            id,
            weight: initial_weight,
            payment,
        })
    }

    /// Inject external value (a direct transfer, a routed fee). New money,
    /// distributed across the full basis with no exclusion. A zero amount
    /// is a no-op.
    pub fn deposit_external(
        &mut self,
        engine: &dyn AccrualEngine,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        if amount == 0 {
            return Ok(());
        }
        let total_rewards = self
            .total_rewards
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let pool_balance = self
            .pool_balance
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let increase = engine.accumulator_increase(amount, self.total_weight_points, pool_balance)?;
        let accumulator = self
            .rewards_per_weight_point
            .checked_add(increase)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        self.total_rewards = total_rewards;
        self.pool_balance = pool_balance;
        self.rewards_per_weight_point = accumulator;
        Ok(())
    }

    /// Partial claim: pay out 25%, redistribute 75%, bump the weight by half
    /// the curve delta. The position stays active and keeps earning.
    pub fn soft_withdraw(
        &mut self,
        engine: &dyn AccrualEngine,
        caller: AccountId,
        id: PositionId,
    ) -> Result<SoftWithdrawOutcome, LedgerError> {
        let pos = *self
            .positions
            .get(&id.0)
            .ok_or(LedgerError::PositionNotFound(id))?;
        if pos.owner != caller {
            return Err(LedgerError::Unauthorized(id));
        }
        let pending = self.pending_of(engine, &pos)?;
        if pending < MIN_SOFT_WITHDRAW {
            return Err(LedgerError::BelowThreshold {
                pending,
                min: MIN_SOFT_WITHDRAW,
            });
        }

        // u128 intermediate: pending can approach u64::MAX. The quotient is
        // at most pending, so the cast back is lossless.
        let payout = (pending as u128 * SOFT_WITHDRAW_PAYOUT_PCT as u128 / 100) as u64;
        let redistributed = pending - payout;
        // Defensive: unreachable if the accumulator cap holds.
        if self.pool_balance < payout {
            return Err(LedgerError::InsufficientBalance {
                need: payout,
                have: self.pool_balance,
            });
        }
        let pool_balance = self.pool_balance - payout;

        // Half the curve delta, at least 1, only below the ceiling.
        let new_weight = if pos.weight < MAX_WEIGHT {
            let delta = (engine.weight_increase(pending, pos.weight)? / 2).max(1);
            (pos.weight + delta).min(MAX_WEIGHT)
        } else {
            pos.weight
        };
        let new_points = weight_points(new_weight, id)?;

        // Redistribute against the basis with this position excluded, so it
        // cannot earn from its own returned funds.
        let basis = self
            .total_weight_points
            .checked_sub(pos.weight_points)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let increase = engine.accumulator_increase(redistributed, basis, pool_balance)?;
        let accumulator = self
            .rewards_per_weight_point
            .checked_add(increase)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let total_points = basis
            .checked_add(new_points)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let claimed = pos
            .claimed
            .checked_add(payout)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        // Commit.
        self.pool_balance = pool_balance;
        self.rewards_per_weight_point = accumulator;
        self.total_weight_points = total_points;
        self.positions.insert(
            id.0,
            Position {
                weight: new_weight,
                weight_points: new_points,
                checkpoint: accumulator,
                claimed,
                ..pos
            },
        );
        Ok(SoftWithdrawOutcome {
            payout,
            redistributed,
            new_weight,
        })
    }

    /// Majority claim: pay out 75%, redistribute 25%, and permanently
    /// deactivate the position. Terminal transition; the id is never reused.
    pub fn hard_withdraw(
        &mut self,
        engine: &dyn AccrualEngine,
        caller: AccountId,
        id: PositionId,
    ) -> Result<HardWithdrawOutcome, LedgerError> {
        let pos = *self
            .positions
            .get(&id.0)
            .ok_or(LedgerError::PositionNotFound(id))?;
        if pos.owner != caller {
            return Err(LedgerError::Unauthorized(id));
        }
        let pending = self.pending_of(engine, &pos)?;
        if pending == 0 {
            return Err(LedgerError::NoReward);
        }

        let payout = (pending as u128 * HARD_WITHDRAW_PAYOUT_PCT as u128 / 100) as u64;
        let redistributed = pending - payout;
        if self.pool_balance < payout {
            return Err(LedgerError::InsufficientBalance {
                need: payout,
                have: self.pool_balance,
            });
        }
        let pool_balance = self.pool_balance - payout;

        let basis = self
            .total_weight_points
            .checked_sub(pos.weight_points)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let increase = engine.accumulator_increase(redistributed, basis, pool_balance)?;
        let accumulator = self
            .rewards_per_weight_point
            .checked_add(increase)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let claimed = pos
            .claimed
            .checked_add(payout)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        // Commit: weight and weight points zeroed, basis shrinks for good.
        self.pool_balance = pool_balance;
        self.rewards_per_weight_point = accumulator;
        self.total_weight_points = basis;
        self.positions.insert(
            id.0,
            Position {
                weight: 0,
                weight_points: 0,
                checkpoint: accumulator,
                claimed,
                ..pos
            },
        );
        Ok(HardWithdrawOutcome {
            payout,
            redistributed,
        })
    }

    /// Reinvest: keep 25% as still-claimable (checkpoint shift), redistribute
    /// 75%, grant the full curve delta. No value leaves the pool.
    pub fn redistribute(
        &mut self,
        engine: &dyn AccrualEngine,
        caller: AccountId,
        id: PositionId,
    ) -> Result<RedistributeOutcome, LedgerError> {
        let pos = *self
            .positions
            .get(&id.0)
            .ok_or(LedgerError::PositionNotFound(id))?;
        if pos.owner != caller {
            return Err(LedgerError::Unauthorized(id));
        }
        if pos.weight >= MAX_WEIGHT {
            return Err(LedgerError::MaxWeightReached);
        }
        let pending = self.pending_of(engine, &pos)?;
        if pending < MIN_REDISTRIBUTE {
            return Err(LedgerError::BelowThreshold {
                pending,
                min: MIN_REDISTRIBUTE,
            });
        }

        let kept = (pending as u128 * REDISTRIBUTE_KEEP_PCT as u128 / 100) as u64;
        let redistributed = pending - kept;

        let delta = engine.weight_increase(pending, pos.weight)?.max(1);
        let new_weight = (pos.weight + delta).min(MAX_WEIGHT);
        let new_points = weight_points(new_weight, id)?;

        // When this is the only active position the reduced basis is zero:
        // the engine returns a zero increase and the redistributed share
        // simply stays in the pool (documented no-op, not an error).
        let basis = self
            .total_weight_points
            .checked_sub(pos.weight_points)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let increase = engine.accumulator_increase(redistributed, basis, self.pool_balance)?;
        let accumulator = self
            .rewards_per_weight_point
            .checked_add(increase)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let total_points = basis
            .checked_add(new_points)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        // The kept share is re-credited by backdating the checkpoint: the
        // position appears to still hold `kept` as future-claimable.
        let shift = (kept as u128)
            .checked_mul(SCALE)
            .ok_or(LedgerError::ArithmeticOverflow)?
            .checked_div(new_points)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let checkpoint = accumulator
            .checked_sub(shift)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        // Commit.
        self.rewards_per_weight_point = accumulator;
        self.total_weight_points = total_points;
        self.positions.insert(
            id.0,
            Position {
                weight: new_weight,
                weight_points: new_points,
                checkpoint,
                ..pos
            },
        );
        Ok(RedistributeOutcome {
            kept,
            redistributed,
            new_weight,
        })
    }

    /// Integration hook for the external token transfer layer. Trusted:
    /// transfer authorization happens outside the ledger.
    pub fn set_owner(&mut self, id: PositionId, new_owner: AccountId) -> Result<(), LedgerError> {
        let pos = self
            .positions
            .get_mut(&id.0)
            .ok_or(LedgerError::PositionNotFound(id))?;
        pos.owner = new_owner;
        Ok(())
    }

    // --- Read-only queries ---

    /// Pending reward for a position. Zero for unknown or deactivated
    /// positions. Pure read: never advances the checkpoint.
    pub fn pending_reward(
        &self,
        engine: &dyn AccrualEngine,
        id: PositionId,
    ) -> Result<Amount, LedgerError> {
        match self.positions.get(&id.0) {
            Some(pos) => self.pending_of(engine, pos),
            None => Ok(0),
        }
    }

    /// Detailed view of one position.
    pub fn position_info(
        &self,
        engine: &dyn AccrualEngine,
        id: PositionId,
    ) -> Result<PositionInfo, LedgerError> {
        let pos = self
            .positions
            .get(&id.0)
            .ok_or(LedgerError::PositionNotFound(id))?;
        Ok(PositionInfo {
            id: pos.id,
            owner: pos.owner,
            weight: pos.weight,
            multiplier: pos.id.multiplier(),
            pending: self.pending_of(engine, pos)?,
            claimed: pos.claimed,
            active: pos.is_active(),
        })
    }

    /// True iff this position is active and every other position has been
    /// deactivated. Full scan; rare terminal-state query, not a hot path.
    pub fn can_claim_victory(&self, id: PositionId) -> bool {
        match self.positions.get(&id.0) {
            Some(pos) if pos.is_active() => self
                .positions
                .values()
                .all(|p| p.id == id || !p.is_active()),
            _ => false,
        }
    }

    /// Aggregate solvency diagnostics. Full scan; cold path.
    pub fn contract_health(&self, engine: &dyn AccrualEngine) -> Result<ContractHealth, LedgerError> {
        let mut pending_sum: Amount = 0;
        for pos in self.positions.values() {
            pending_sum = pending_sum
                .checked_add(self.pending_of(engine, pos)?)
                .ok_or(LedgerError::ArithmeticOverflow)?;
        }
        Ok(ContractHealth {
            total_rewards: self.total_rewards,
            pending_sum,
            balance: self.pool_balance,
            dust_buffer: self.pool_balance.saturating_sub(pending_sum),
            solvent: pending_sum <= self.pool_balance,
        })
    }

    // --- Internal ---

    /// Pending reward for a loaded position: engine delta, clamped at the
    /// pool balance (second line of defense behind the accumulator cap).
    fn pending_of(&self, engine: &dyn AccrualEngine, pos: &Position) -> Result<Amount, LedgerError> {
        if pos.weight_points == 0 {
            return Ok(0);
        }
        let delta = self
            .rewards_per_weight_point
            .checked_sub(pos.checkpoint)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let raw = engine.pending_delta(pos.weight_points, delta)?;
        Ok(raw.min(self.pool_balance))
    }
}
