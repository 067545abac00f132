//! In-memory storage implementation for testing

use async_trait::async_trait;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::traits::*;
use crate::types::*;

#[derive(Debug, Default)]
struct Tables {
    groups: Vec<LedgerGroup>,
    ledgers: Vec<Ledger>,
    vouchers: Vec<Voucher>,
}

/// In-memory storage implementation for testing and development.
///
/// Every table keeps insertion order, which is the registry order the
/// reports follow. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create a new memory store instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> BooksResult<()> {
        *self.write()? = Tables::default();
        Ok(())
    }

    fn read(&self) -> BooksResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| BooksError::Storage("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> BooksResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| BooksError::Storage("memory store lock poisoned".to_string()))
    }
}

/// Replace the row with the same id in place, or append it
fn upsert<T: Clone>(rows: &mut Vec<T>, row: &T, same: impl Fn(&T) -> bool) {
    match rows.iter_mut().find(|r| same(r)) {
        Some(existing) => *existing = row.clone(),
        None => rows.push(row.clone()),
    }
}

#[async_trait]
impl BooksStore for MemoryStore {
    async fn save_group(&mut self, group: &LedgerGroup) -> BooksResult<()> {
        upsert(&mut self.write()?.groups, group, |g| g.id == group.id);
        Ok(())
    }

    async fn get_group(&self, group_id: &str) -> BooksResult<Option<LedgerGroup>> {
        Ok(self.read()?.groups.iter().find(|g| g.id == group_id).cloned())
    }

    async fn list_groups(&self) -> BooksResult<Vec<LedgerGroup>> {
        Ok(self.read()?.groups.clone())
    }

    async fn save_ledger(&mut self, ledger: &Ledger) -> BooksResult<()> {
        upsert(&mut self.write()?.ledgers, ledger, |l| l.id == ledger.id);
        Ok(())
    }

    async fn get_ledger(&self, ledger_id: &str) -> BooksResult<Option<Ledger>> {
        Ok(self.read()?.ledgers.iter().find(|l| l.id == ledger_id).cloned())
    }

    async fn list_ledgers(&self) -> BooksResult<Vec<Ledger>> {
        Ok(self.read()?.ledgers.clone())
    }

    async fn append_voucher(&mut self, voucher: &Voucher) -> BooksResult<()> {
        let mut tables = self.write()?;
        if tables.vouchers.iter().any(|v| v.id == voucher.id) {
            return Err(VoucherError::DuplicateId(voucher.id.clone()).into());
        }
        tables.vouchers.push(voucher.clone());
        Ok(())
    }

    async fn get_voucher(&self, voucher_id: &str) -> BooksResult<Option<Voucher>> {
        Ok(self.read()?.vouchers.iter().find(|v| v.id == voucher_id).cloned())
    }

    async fn list_vouchers(&self) -> BooksResult<Vec<Voucher>> {
        Ok(self.read()?.vouchers.clone())
    }

    /// Read all three tables under one lock
    async fn snapshot(&self) -> BooksResult<crate::ledger::BooksSnapshot> {
        let tables = self.read()?;
        Ok(crate::ledger::BooksSnapshot {
            groups: tables.groups.clone(),
            ledgers: tables.ledgers.clone(),
            vouchers: tables.vouchers.clone(),
        })
    }
}
