//! Error types for the Dust ledger.
use thiserror::Error;

use crate::types::{Amount, PositionId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("caller does not own position {0}")] Unauthorized(PositionId),
    #[error("pending reward {pending} below minimum {min}")] BelowThreshold { pending: Amount, min: Amount },
    #[error("no pending reward")] NoReward,
    #[error("weight already at maximum")] MaxWeightReached,
    #[error("insufficient balance: need {need}, have {have}")] InsufficientBalance { need: Amount, have: Amount },
    #[error("arithmetic overflow")] ArithmeticOverflow,
    #[error("position not found: {0}")] PositionNotFound(PositionId),
    #[error("invalid mint weight {got}: must be in [{min}, {max}]")] InvalidWeight { got: u32, min: u32, max: u32 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccrualError {
    #[error("arithmetic overflow")] ArithmeticOverflow,
}

impl From<AccrualError> for LedgerError {
    fn from(e: AccrualError) -> Self {
        match e {
            AccrualError::ArithmeticOverflow => LedgerError::ArithmeticOverflow,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("backend: {0}")] Backend(String),
    #[error("codec: {0}")] Codec(String),
    #[error("corrupt state: {0}")] Corrupt(String),
}

#[derive(Error, Debug)]
pub enum DustError {
    #[error(transparent)] Ledger(#[from] LedgerError),
    #[error(transparent)] Accrual(#[from] AccrualError),
    #[error(transparent)] Store(#[from] StoreError),
}
