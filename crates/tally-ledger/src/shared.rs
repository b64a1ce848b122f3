//! Lock-guarded ledger handle for multiple callers
//!
//! Appends take the write lock, so at most one is in flight and readers
//! observe the chain either before or after it, never a partial block.

use crate::block::Block;
use crate::clock::Clock;
use crate::ledger::Ledger;
use crate::verify::Validation;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tally_core::{ExportFormat, Result, TallyError};

#[derive(Debug, Clone, Default)]
pub struct SharedLedger {
    inner: Arc<RwLock<Ledger>>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    pub fn append(
        &self,
        sender: &str,
        receiver: &str,
        amount_text: &str,
        clock: &dyn Clock,
    ) -> Result<Block> {
        self.write()?.append(sender, receiver, amount_text, clock)
    }

    pub fn validate(&self) -> Result<Validation> {
        Ok(self.read()?.validate())
    }

    pub fn export_as(&self, format: ExportFormat) -> Result<String> {
        self.read()?.export_as(format)
    }

    /// Copy of the current chain
    pub fn snapshot(&self) -> Result<Ledger> {
        Ok(self.read()?.clone())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Ledger>> {
        self.inner
            .read()
            .map_err(|_| TallyError::Internal("ledger lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Ledger>> {
        self.inner
            .write()
            .map_err(|_| TallyError::Internal("ledger lock poisoned".to_string()))
    }
}
