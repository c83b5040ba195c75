//! RocksDB-backed persistent ledger storage.
//!
//! Positions and aggregate metadata live in separate column families. All
//! mutations for one ledger operation go through a single atomic
//! [`WriteBatch`], so a crash between operations never leaves a torn state.
//!
//! On load, the aggregate weight-point total is recomputed from the stored
//! positions and checked against the persisted value; a mismatch is
//! reported as corruption rather than silently repaired.

use std::path::Path;

use rocksdb::{ColumnFamilyDescriptor, DB, Options, WriteBatch};

use dust_core::error::StoreError;
use dust_core::ledger::LedgerState;
use dust_core::position::Position;
use dust_core::types::PositionId;

// --- Column family names ---

const CF_POSITIONS: &str = "positions";
const CF_METADATA: &str = "metadata";

const ALL_CFS: &[&str] = &[CF_POSITIONS, CF_METADATA];

// --- Metadata keys ---

const META_TOTAL_WEIGHT_POINTS: &[u8] = b"total_weight_points";
const META_REWARDS_PER_WEIGHT_POINT: &[u8] = b"rewards_per_weight_point";
const META_TOTAL_REWARDS: &[u8] = b"total_rewards";
const META_POOL_BALANCE: &[u8] = b"pool_balance";
const META_NEXT_ID: &[u8] = b"next_id";

/// RocksDB-backed persistent ledger storage.
pub struct DustStore {
    db: DB,
}

impl DustStore {
    /// Open or create a database at the given path, creating all column
    /// families as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = ALL_CFS
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(*name, Options::default()))
            .collect();

        let db = DB::open_cf_descriptors(&db_opts, path.as_ref(), cf_descriptors)
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self { db })
    }

    /// Load the full ledger state.
    ///
    /// Every position is decoded, the weight-point total is recomputed,
    /// and the recomputed value must equal the persisted aggregate.
    pub fn load_state(&self) -> Result<LedgerState, StoreError> {
        let cf = self.cf_handle(CF_POSITIONS)?;
        let mut positions = Vec::new();

        let iter = self.db.iterator_cf(&cf, rocksdb::IteratorMode::Start);
        for item in iter {
            let (_, value_bytes) = item.map_err(|e| StoreError::Backend(e.to_string()))?;
            let (pos, _): (Position, _) =
                bincode::decode_from_slice(&value_bytes, bincode::config::standard())
                    .map_err(|e| StoreError::Codec(e.to_string()))?;
            positions.push(pos);
        }

        let stored_total = self.get_meta_u128(META_TOTAL_WEIGHT_POINTS)?;
        let rewards_per_weight_point = self.get_meta_u128(META_REWARDS_PER_WEIGHT_POINT)?;
        let total_rewards = self.get_meta_u64(META_TOTAL_REWARDS)?;
        let pool_balance = self.get_meta_u64(META_POOL_BALANCE)?;
        // A fresh database has no counter yet; ids start at 1.
        let next_id = self.get_meta_u64(META_NEXT_ID)?.max(1);

        let state = LedgerState::from_parts(
            positions,
            rewards_per_weight_point,
            total_rewards,
            pool_balance,
            next_id,
        )
        .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        if state.total_weight_points() != stored_total {
            return Err(StoreError::Corrupt(format!(
                "weight-point total mismatch: recomputed {}, stored {}",
                state.total_weight_points(),
                stored_total
            )));
        }

        Ok(state)
    }

    /// Persist the aggregate metadata plus the listed positions atomically.
    ///
    /// Ledger operations touch at most one position, so the caller passes
    /// exactly the ids it modified; untouched positions stay as stored.
    pub fn commit(&self, state: &LedgerState, touched: &[PositionId]) -> Result<(), StoreError> {
        let cf_pos = self.cf_handle(CF_POSITIONS)?;
        let cf_meta = self.cf_handle(CF_METADATA)?;
        let mut batch = WriteBatch::default();

        for id in touched {
            let pos = state.position(*id).ok_or_else(|| {
                StoreError::Corrupt(format!("touched position {id} missing from state"))
            })?;
            let bytes = bincode::encode_to_vec(pos, bincode::config::standard())
                .map_err(|e| StoreError::Codec(e.to_string()))?;
            batch.put_cf(cf_pos, Self::position_key(*id), &bytes);
        }

        batch.put_cf(
            cf_meta,
            META_TOTAL_WEIGHT_POINTS,
            state.total_weight_points().to_le_bytes(),
        );
        batch.put_cf(
            cf_meta,
            META_REWARDS_PER_WEIGHT_POINT,
            state.rewards_per_weight_point().to_le_bytes(),
        );
        batch.put_cf(cf_meta, META_TOTAL_REWARDS, state.total_rewards().to_le_bytes());
        batch.put_cf(cf_meta, META_POOL_BALANCE, state.pool_balance().to_le_bytes());
        batch.put_cf(cf_meta, META_NEXT_ID, state.next_id().to_le_bytes());

        self.db
            .write(batch)
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    /// Flush all in-memory buffers to disk.
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db
            .flush()
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    // --- Internal helpers ---

    fn cf_handle(&self, name: &str) -> Result<&rocksdb::ColumnFamily, StoreError> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Backend(format!("missing column family: {name}")))
    }

    /// Big-endian id key for ordered iteration.
    fn position_key(id: PositionId) -> [u8; 8] {
        id.0.to_be_bytes()
    }

    fn get_meta_u64(&self, key: &[u8]) -> Result<u64, StoreError> {
        let cf = self.cf_handle(CF_METADATA)?;
        match self
            .db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Backend(e.to_string()))?
        {
            Some(bytes) => {
                let arr: [u8; 8] = bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| StoreError::Corrupt("invalid metadata value length".into()))?;
                Ok(u64::from_le_bytes(arr))
            }
            None => Ok(0),
        }
    }

    fn get_meta_u128(&self, key: &[u8]) -> Result<u128, StoreError> {
        let cf = self.cf_handle(CF_METADATA)?;
        match self
            .db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Backend(e.to_string()))?
        {
            Some(bytes) => {
                let arr: [u8; 16] = bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| StoreError::Corrupt("invalid metadata value length".into()))?;
                Ok(u128::from_le_bytes(arr))
            }
            None => Ok(0),
        }
    }
}
