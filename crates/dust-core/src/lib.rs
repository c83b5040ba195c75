//! # dust-core
//! Foundation types, ledger state, and accrual traits for the Dust ledger.

pub mod constants;
pub mod error;
pub mod ledger;
pub mod position;
pub mod traits;
pub mod types;
