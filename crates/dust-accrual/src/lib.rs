//! # dust-accrual — Reward accrual math engine.
//!
//! All calculations use integer arithmetic only for determinism.
//!
//! This crate implements the accrual formulas behind the Dust ledger:
//! - **Accumulator increases**: deposits are converted to scaled
//!   per-weight-point increases, capped by the pool balance and truncated
//!   to the dust quantum so rounding always favors the pool.
//! - **Pending deltas**: a position's share of accumulator growth,
//!   quantized down to whole dust quanta.
//! - **Square-root weight curve**: realized rewards grant weight with
//!   diminishing returns, damped as a position approaches the ceiling.

pub mod curve;
pub mod engine;
pub mod isqrt;

pub use curve::weight_increase;
pub use engine::{DelegatedAccrual, InlineAccrual};
pub use isqrt::isqrt;
