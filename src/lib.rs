//! # Voucher Books
//!
//! A double-entry voucher accounting engine that derives Indian-style final
//! accounts and GST summaries from a chart of ledger groups, ledgers and
//! vouchers.
//!
//! ## Features
//!
//! - **Voucher journal**: balanced-entry validation, per-series numbering and reversal vouchers
//! - **Chart of accounts**: ledger groups with a fixed statement taxonomy and parent roll-up
//! - **Final accounts**: trial balance, trading account, profit & loss and balance sheet
//! - **GST summaries**: CGST/SGST/IGST/cess per voucher and per rate slab
//! - **Ledger statements**: running balances in voucher order
//! - **Storage abstraction**: database-agnostic design with an async `BooksStore` trait
//!
//! Every report is a pure function of a [`BooksSnapshot`]. Records the
//! derivers cannot use are left out and listed as [`EngineWarning`]s.
//!
//! ## Quick Start
//!
//! ```rust
//! use voucher_books::{
//!     BooksSnapshot, EntryType, GroupType, Ledger, LedgerGroup, Money, ReportOptions, Voucher,
//!     VoucherEntryLine, VoucherType,
//! };
//! use chrono::NaiveDate;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
//! let mut sale = Voucher::new("v1".into(), "1".into(), VoucherType::Sales, date);
//! sale.add_entry(VoucherEntryLine::debit("l1".into(), "cash".into(), Money::from_major(500)));
//! sale.add_entry(VoucherEntryLine::credit("l2".into(), "sales".into(), Money::from_major(500)));
//!
//! let snapshot = BooksSnapshot {
//!     groups: vec![
//!         LedgerGroup::new("ca".into(), "Current Assets".into(), GroupType::CurrentAssets, None),
//!         LedgerGroup::new("sa".into(), "Sales Accounts".into(), GroupType::Sales, None),
//!     ],
//!     ledgers: vec![
//!         Ledger::new("cash".into(), "Cash".into(), "ca".into()),
//!         Ledger::new("sales".into(), "Sales".into(), "sa".into()),
//!     ],
//!     vouchers: vec![sale],
//! };
//!
//! let statements = snapshot.financial_statements(&ReportOptions::default());
//! assert!(statements.trial_balance.is_balanced);
//! assert_eq!(statements.trading.gross_profit, Money::from_major(500));
//! assert_eq!(
//!     statements.trial_balance.entry("cash").map(|e| e.closing.side),
//!     Some(EntryType::Debit)
//! );
//! ```

pub mod config;
pub mod ledger;
pub mod money;
pub mod reports;
pub mod tax;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::ReportOptions;
pub use ledger::{
    new_line_id, patterns, validate_hierarchy, Books, BooksSnapshot, ChartIndex, Placement,
    VoucherBuilder, VoucherJournal,
};
pub use money::{Money, MoneyError};
pub use reports::*;
pub use tax::*;
pub use traits::*;
pub use types::*;
