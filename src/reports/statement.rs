//! Ledger statement with a running balance column

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::ReportOptions;
use crate::ledger::{BooksSnapshot, ChartIndex};
use crate::money::Money;
use crate::reports::{accumulate, postings};
use crate::types::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRow {
    pub date: NaiveDate,
    pub voucher_id: String,
    pub voucher_number: String,
    pub voucher_type: VoucherType,
    pub narration: Option<String>,
    pub debit: Option<Money>,
    pub credit: Option<Money>,
    pub running_balance: Balance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerStatement {
    pub ledger_id: String,
    pub ledger_name: String,
    pub opening: Balance,
    pub rows: Vec<StatementRow>,
    pub debit_total: Money,
    pub credit_total: Money,
    pub closing: Balance,
    pub warnings: Vec<EngineWarning>,
}

/// Postings of one ledger in fold order (voucher date, then sequence).
///
/// Returns `None` when the ledger is not in the snapshot.
pub fn ledger_statement(
    snapshot: &BooksSnapshot,
    ledger_id: &str,
    options: &ReportOptions,
) -> Option<LedgerStatement> {
    let index = ChartIndex::new(&snapshot.groups, &snapshot.ledgers);
    let ledger = index.ledger(ledger_id)?;

    let mut warnings = Vec::new();
    let mut running = ledger.signed_opening();
    let mut rows = Vec::new();
    let mut debit_total = Money::ZERO;
    let mut credit_total = Money::ZERO;

    let own_postings = postings(&index, &snapshot.vouchers, options, &mut warnings)
        .into_iter()
        .filter(|p| p.ledger.id == ledger_id);
    for posting in own_postings {
        let amount = posting.line.amount;
        let (debit, credit) = match posting.line.entry_type {
            EntryType::Debit => {
                accumulate(&mut debit_total, amount, ledger_id, &mut warnings);
                (Some(amount), None)
            }
            EntryType::Credit => {
                accumulate(&mut credit_total, amount, ledger_id, &mut warnings);
                (None, Some(amount))
            }
        };
        accumulate(&mut running, posting.line.signed_amount(), ledger_id, &mut warnings);

        rows.push(StatementRow {
            date: posting.voucher.date,
            voucher_id: posting.voucher.id.clone(),
            voucher_number: posting.voucher.number.clone(),
            voucher_type: posting.voucher.voucher_type,
            narration: posting
                .line
                .narration
                .clone()
                .or_else(|| posting.voucher.narration.clone()),
            debit,
            credit,
            running_balance: Balance::from_net(running),
        });
    }

    Some(LedgerStatement {
        ledger_id: ledger.id.clone(),
        ledger_name: ledger.name.clone(),
        opening: Balance::from_net(ledger.signed_opening()),
        rows,
        debit_total,
        credit_total,
        closing: Balance::from_net(running),
        warnings,
    })
}
