//! End-to-end accrual scenarios against the production engine.
//!
//! Each test walks a small, fully specified operation sequence and checks
//! exact mote amounts, so any rounding or distribution regression shows up
//! as a concrete numeric diff.

use dust_core::constants::{MAX_WEIGHT, UNIT};
use dust_core::error::LedgerError;
use dust_core::ledger::LedgerState;
use dust_tests::helpers::{acct, assert_consistent, engine, ledger_with_weight};

// ------------------------------------------------------------------
// Early-position advantage
// ------------------------------------------------------------------

#[test]
fn early_position_outweighs_late_heavy_position() {
    let e = engine();
    let mut state = LedgerState::new();

    // #1: weight 1, multiplier 1.0 -> 1 weight point (scaled).
    let p1 = state.mint(&e, acct(1), 1).unwrap();
    assert_eq!(p1.payment, UNIT / 1000);

    // #2: weight 100, multiplier 0.25 -> 25 weight points. Price 0.1 DUST.
    let p2 = state.mint(&e, acct(2), 100).unwrap();
    assert_eq!(p2.payment, UNIT / 10);

    // #2's mint fee accrues entirely to #1 (the only prior position).
    assert_eq!(state.pending_reward(&e, p1.id).unwrap(), UNIT / 10);
    assert_eq!(state.pending_reward(&e, p2.id).unwrap(), 0);

    // A deposit splits 1 : 25 despite #2 holding 100x the weight.
    state.deposit_external(&e, 26 * UNIT).unwrap();
    assert_eq!(state.pending_reward(&e, p1.id).unwrap(), UNIT / 10 + UNIT);
    assert_eq!(state.pending_reward(&e, p2.id).unwrap(), 25 * UNIT);
    assert_consistent(&state);
}

// ------------------------------------------------------------------
// Soft withdraw split and weight growth
// ------------------------------------------------------------------

#[test]
fn soft_withdraw_quarter_payout_and_half_curve() {
    let e = engine();
    let mut state = LedgerState::new();
    let p1 = state.mint(&e, acct(1), 1).unwrap();
    state.deposit_external(&e, UNIT / 10).unwrap();
    assert_eq!(state.pending_reward(&e, p1.id).unwrap(), UNIT / 10);

    let out = state.soft_withdraw(&e, acct(1), p1.id).unwrap();
    // 0.1 DUST pending: 0.025 paid out, 0.075 redistributed.
    assert_eq!(out.payout, 2_500_000);
    assert_eq!(out.redistributed, 7_500_000);
    // Curve grants sqrt(0.1 / 0.001) = 10 at weight 1; halved to 5.
    assert_eq!(out.new_weight, 6);
    assert_eq!(state.position(p1.id).unwrap().claimed, 2_500_000);
    assert_consistent(&state);
}

// ------------------------------------------------------------------
// Redistribute at the weight ceiling
// ------------------------------------------------------------------

#[test]
fn redistribute_at_max_weight_fails() {
    let e = engine();
    let (mut state, id) = ledger_with_weight(acct(1), MAX_WEIGHT);
    state.deposit_external(&e, UNIT).unwrap();

    let before = state.clone();
    assert_eq!(
        state.redistribute(&e, acct(1), id),
        Err(LedgerError::MaxWeightReached)
    );
    // Rejected before any reward realization.
    assert_eq!(state, before);
}

// ------------------------------------------------------------------
// Sole-survivor redistribute
// ------------------------------------------------------------------

#[test]
fn sole_position_redistribute_is_lossless_no_op() {
    let e = engine();
    let mut state = LedgerState::new();
    let p1 = state.mint(&e, acct(1), 1).unwrap();
    let p2 = state.mint(&e, acct(2), 1).unwrap();
    state.deposit_external(&e, 2 * UNIT).unwrap();
    state.hard_withdraw(&e, acct(2), p2.id).unwrap();

    // #1 is the only active position left.
    let pending = state.pending_reward(&e, p1.id).unwrap();
    assert!(pending > 0);
    let pool_before = state.pool_balance();
    let acc_before = state.rewards_per_weight_point();

    let out = state.redistribute(&e, acct(1), p1.id).unwrap();
    // No basis for the 75% share: it stays in the pool, no division blows up.
    assert_eq!(state.rewards_per_weight_point(), acc_before);
    assert_eq!(state.pool_balance(), pool_before);
    // The kept 25% survives via the checkpoint shift. The shift floors and
    // the pending read quantizes, so the visible amount may trail by dust.
    assert_eq!(out.kept, pending / 4);
    let visible = state.pending_reward(&e, p1.id).unwrap();
    assert!(visible <= out.kept);
    assert!(out.kept - visible < 200);
    assert_consistent(&state);
}

// ------------------------------------------------------------------
// Deactivation is forever
// ------------------------------------------------------------------

#[test]
fn hard_withdrawn_position_never_accrues_again() {
    let e = engine();
    let mut state = LedgerState::new();
    let p1 = state.mint(&e, acct(1), 1).unwrap();
    let p2 = state.mint(&e, acct(2), 1).unwrap();
    state.deposit_external(&e, UNIT).unwrap();

    state.hard_withdraw(&e, acct(1), p1.id).unwrap();
    assert_eq!(state.pending_reward(&e, p1.id).unwrap(), 0);

    // Deposits, mints, and other activity never revive it.
    for round in 0..5u64 {
        state.deposit_external(&e, (round + 1) * UNIT).unwrap();
        assert_eq!(state.pending_reward(&e, p1.id).unwrap(), 0);
    }
    state.mint(&e, acct(3), 10).unwrap();
    assert_eq!(state.pending_reward(&e, p1.id).unwrap(), 0);
    assert!(state.pending_reward(&e, p2.id).unwrap() > 0);
    assert_consistent(&state);
}

// ------------------------------------------------------------------
// Cross-scenario: dust buffer accumulates
// ------------------------------------------------------------------

#[test]
fn truncation_builds_a_dust_buffer() {
    let e = engine();
    let mut state = LedgerState::new();
    // Three positions with awkward weight points force remainders.
    state.mint(&e, acct(1), 7).unwrap();
    state.mint(&e, acct(2), 13).unwrap();
    state.mint(&e, acct(3), 29).unwrap();

    // Odd deposit amounts leave truncation dust behind.
    for amount in [333_337u64, 999_999, 123_457] {
        state.deposit_external(&e, amount).unwrap();
    }

    let health = state.contract_health(&e).unwrap();
    assert!(health.solvent);
    // Strictly positive buffer: the pool retains the rounding margin.
    assert!(health.dust_buffer > 0);
}
