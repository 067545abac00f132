//! Traits for storage abstraction and extensibility

use async_trait::async_trait;

use crate::ledger::BooksSnapshot;
use crate::types::*;

/// Storage abstraction for the books.
///
/// The engine never talks to a database itself. A host application implements
/// this trait over its persistence layer and the orchestrator reads a complete
/// [`BooksSnapshot`] from it before deriving any report.
#[async_trait]
pub trait BooksStore: Send + Sync {
    /// Save a ledger group
    async fn save_group(&mut self, group: &LedgerGroup) -> BooksResult<()>;

    /// Get a ledger group by ID
    async fn get_group(&self, group_id: &str) -> BooksResult<Option<LedgerGroup>>;

    /// List all ledger groups
    async fn list_groups(&self) -> BooksResult<Vec<LedgerGroup>>;

    /// Save a ledger
    async fn save_ledger(&mut self, ledger: &Ledger) -> BooksResult<()>;

    /// Get a ledger by ID
    async fn get_ledger(&self, ledger_id: &str) -> BooksResult<Option<Ledger>>;

    /// List all ledgers
    async fn list_ledgers(&self) -> BooksResult<Vec<Ledger>>;

    /// Append a voucher to the journal. Posted vouchers are never rewritten.
    async fn append_voucher(&mut self, voucher: &Voucher) -> BooksResult<()>;

    /// Get a voucher by ID
    async fn get_voucher(&self, voucher_id: &str) -> BooksResult<Option<Voucher>>;

    /// List vouchers in the order they were appended
    async fn list_vouchers(&self) -> BooksResult<Vec<Voucher>>;

    /// Read a consistent copy of everything the derivers need
    async fn snapshot(&self) -> BooksResult<BooksSnapshot> {
        Ok(BooksSnapshot {
            groups: self.list_groups().await?,
            ledgers: self.list_ledgers().await?,
            vouchers: self.list_vouchers().await?,
        })
    }
}

/// Trait for implementing custom chart of accounts validation rules
pub trait ChartValidator: Send + Sync {
    /// Validate a group before saving
    fn validate_group(&self, group: &LedgerGroup) -> Result<(), ChartError>;

    /// Validate a ledger before saving
    fn validate_ledger(&self, ledger: &Ledger) -> Result<(), ChartError>;
}

/// Trait for implementing custom voucher validation rules
pub trait VoucherValidator: Send + Sync {
    /// Validate a voucher before it is accepted into the journal
    fn validate_voucher(&self, voucher: &Voucher) -> Result<(), VoucherError>;
}

/// Default chart validator with basic rules
pub struct DefaultChartValidator;

impl ChartValidator for DefaultChartValidator {
    fn validate_group(&self, group: &LedgerGroup) -> Result<(), ChartError> {
        if group.id.trim().is_empty() {
            return Err(ChartError::Validation("Group ID cannot be empty".to_string()));
        }

        if group.name.trim().is_empty() {
            return Err(ChartError::Validation(
                "Group name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_ledger(&self, ledger: &Ledger) -> Result<(), ChartError> {
        if ledger.id.trim().is_empty() {
            return Err(ChartError::Validation("Ledger ID cannot be empty".to_string()));
        }

        if ledger.name.trim().is_empty() {
            return Err(ChartError::Validation(
                "Ledger name cannot be empty".to_string(),
            ));
        }

        if ledger.opening_balance.is_negative() {
            return Err(ChartError::Validation(format!(
                "Opening balance of ledger '{}' must be a non-negative magnitude",
                ledger.id
            )));
        }

        Ok(())
    }
}

/// Default voucher validator enforcing the double-entry rules
pub struct DefaultVoucherValidator;

impl VoucherValidator for DefaultVoucherValidator {
    fn validate_voucher(&self, voucher: &Voucher) -> Result<(), VoucherError> {
        voucher.validate()
    }
}
