//! Integration test suite for the Dust ledger.
//!
//! This crate contains end-to-end scenario tests against the production
//! accrual engine and property-based invariant tests over randomized
//! operation sequences. The solvency and consistency invariants are
//! verified after every step, not just at the end.

pub mod helpers;
