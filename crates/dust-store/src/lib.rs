//! # dust-store — RocksDB persistence and the ledger service.
//!
//! [`DustStore`] maps the ledger state onto RocksDB column families with
//! atomic [`rocksdb::WriteBatch`] commits. [`LedgerService`] is the durable
//! front door: it owns the in-memory [`dust_core::ledger::LedgerState`], an
//! accrual engine, and the store, and persists every successful operation
//! before returning it.

pub mod config;
pub mod service;
pub mod storage;

pub use config::StoreConfig;
pub use service::LedgerService;
pub use storage::DustStore;
