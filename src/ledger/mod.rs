//! Ledger module containing the chart of accounts, the voucher journal and
//! the books orchestrator

pub mod chart;
pub mod core;
pub mod journal;

pub use self::chart::*;
pub use self::core::*;
pub use self::journal::*;

use serde::{Deserialize, Serialize};

use crate::config::ReportOptions;
use crate::reports::{self, FinancialStatements, LedgerStatement, TrialBalance};
use crate::tax::aggregate::{summarize_vouchers, TaxReport};
use crate::types::*;

/// Immutable view of the books handed to every deriver
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BooksSnapshot {
    pub groups: Vec<LedgerGroup>,
    pub ledgers: Vec<Ledger>,
    /// Vouchers in sequence order
    pub vouchers: Vec<Voucher>,
}

impl BooksSnapshot {
    pub fn chart(&self) -> ChartIndex<'_> {
        ChartIndex::new(&self.groups, &self.ledgers)
    }

    pub fn trial_balance(&self, options: &ReportOptions) -> TrialBalance {
        reports::build_trial_balance(self, options)
    }

    pub fn financial_statements(&self, options: &ReportOptions) -> FinancialStatements {
        FinancialStatements::derive(self, options)
    }

    /// GST summaries for the given voucher types (all types when empty)
    pub fn tax_report(&self, voucher_types: &[VoucherType], options: &ReportOptions) -> TaxReport {
        summarize_vouchers(&self.vouchers, voucher_types, options)
    }

    pub fn ledger_statement(
        &self,
        ledger_id: &str,
        options: &ReportOptions,
    ) -> Option<LedgerStatement> {
        reports::ledger_statement(self, ledger_id, options)
    }
}
