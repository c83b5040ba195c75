//! Durable ledger service.
//!
//! [`LedgerService`] glues the in-memory [`LedgerState`] to a [`DustStore`]
//! and an [`AccrualEngine`]. Every mutating call runs the in-memory
//! operation first (all-or-nothing) and then commits the touched position
//! plus the aggregates in one atomic batch.
//!
//! If a commit fails the in-memory state is ahead of disk; the error is
//! propagated and the service must be dropped and reopened, which reloads
//! the last durable state.

use std::path::Path;

use tracing::info;

use dust_accrual::InlineAccrual;
use dust_core::error::DustError;
use dust_core::ledger::{
    ContractHealth, HardWithdrawOutcome, LedgerState, MintOutcome, PositionInfo,
    RedistributeOutcome, SoftWithdrawOutcome,
};
use dust_core::traits::AccrualEngine;
use dust_core::types::{AccountId, Amount, PositionId};

use crate::config::StoreConfig;
use crate::storage::DustStore;

/// Durable front door to the ledger.
pub struct LedgerService {
    state: LedgerState,
    store: DustStore,
    engine: Box<dyn AccrualEngine>,
}

impl LedgerService {
    /// Open a service at the configured data directory with the inline
    /// accrual engine.
    pub fn open(config: &StoreConfig) -> Result<Self, DustError> {
        Self::open_with_engine(config.db_path(), Box::new(InlineAccrual))
    }

    /// Open a service with an explicit engine.
    ///
    /// The engine choice must be stable across the database's lifetime:
    /// engines that round differently would disagree with the persisted
    /// checkpoints.
    pub fn open_with_engine(
        path: impl AsRef<Path>,
        engine: Box<dyn AccrualEngine>,
    ) -> Result<Self, DustError> {
        let store = DustStore::open(path)?;
        let state = store.load_state()?;
        info!(
            positions = state.position_count(),
            pool_balance = state.pool_balance(),
            "ledger loaded"
        );
        Ok(Self {
            state,
            store,
            engine,
        })
    }

    /// Read-only view of the in-memory state.
    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    // --- Mutating operations ---

    pub fn mint(&mut self, owner: AccountId, weight: u32) -> Result<MintOutcome, DustError> {
        let out = self.state.mint(self.engine.as_ref(), owner, weight)?;
        self.store.commit(&self.state, &[out.id])?;
        info!(id = %out.id, weight = out.weight, payment = out.payment, "position minted");
        Ok(out)
    }

    pub fn deposit_external(&mut self, amount: Amount) -> Result<(), DustError> {
        self.state.deposit_external(self.engine.as_ref(), amount)?;
        self.store.commit(&self.state, &[])?;
        info!(amount, pool_balance = self.state.pool_balance(), "deposit received");
        Ok(())
    }

    pub fn soft_withdraw(
        &mut self,
        caller: AccountId,
        id: PositionId,
    ) -> Result<SoftWithdrawOutcome, DustError> {
        let out = self.state.soft_withdraw(self.engine.as_ref(), caller, id)?;
        self.store.commit(&self.state, &[id])?;
        info!(
            %id,
            payout = out.payout,
            redistributed = out.redistributed,
            new_weight = out.new_weight,
            "soft withdraw"
        );
        Ok(out)
    }

    pub fn hard_withdraw(
        &mut self,
        caller: AccountId,
        id: PositionId,
    ) -> Result<HardWithdrawOutcome, DustError> {
        let out = self.state.hard_withdraw(self.engine.as_ref(), caller, id)?;
        self.store.commit(&self.state, &[id])?;
        info!(
            %id,
            payout = out.payout,
            redistributed = out.redistributed,
            "hard withdraw, position deactivated"
        );
        Ok(out)
    }

    pub fn redistribute(
        &mut self,
        caller: AccountId,
        id: PositionId,
    ) -> Result<RedistributeOutcome, DustError> {
        let out = self.state.redistribute(self.engine.as_ref(), caller, id)?;
        self.store.commit(&self.state, &[id])?;
        info!(
            %id,
            kept = out.kept,
            redistributed = out.redistributed,
            new_weight = out.new_weight,
            "redistribute"
        );
        Ok(out)
    }

    pub fn set_owner(&mut self, id: PositionId, new_owner: AccountId) -> Result<(), DustError> {
        self.state.set_owner(id, new_owner)?;
        self.store.commit(&self.state, &[id])?;
        info!(%id, owner = %new_owner, "owner updated");
        Ok(())
    }

    // --- Queries ---

    pub fn pending_reward(&self, id: PositionId) -> Result<Amount, DustError> {
        Ok(self.state.pending_reward(self.engine.as_ref(), id)?)
    }

    pub fn position_info(&self, id: PositionId) -> Result<PositionInfo, DustError> {
        Ok(self.state.position_info(self.engine.as_ref(), id)?)
    }

    pub fn contract_health(&self) -> Result<ContractHealth, DustError> {
        Ok(self.state.contract_health(self.engine.as_ref())?)
    }

    pub fn can_claim_victory(&self, id: PositionId) -> bool {
        self.state.can_claim_victory(id)
    }

    /// Flush the backing store.
    pub fn flush(&self) -> Result<(), DustError> {
        Ok(self.store.flush()?)
    }
}
