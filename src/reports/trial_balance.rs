//! Trial balance: opening balances plus every posted line, per ledger

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::ReportOptions;
use crate::ledger::{BooksSnapshot, ChartIndex};
use crate::money::Money;
use crate::reports::{accumulate, postings};
use crate::types::*;

/// Net position of one ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceEntry {
    pub ledger_id: String,
    pub ledger_name: String,
    pub group_id: String,
    /// `None` when the ledger feeds no statement
    pub bucket: Option<StatementBucket>,
    pub opening: Balance,
    pub debit_total: Money,
    pub credit_total: Money,
    pub closing: Balance,
}

impl TrialBalanceEntry {
    /// Closing balance in the debit-positive convention
    pub fn net(&self) -> Money {
        self.closing.net()
    }
}

/// Per-ledger net positions with column totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalance {
    pub as_of: Option<NaiveDate>,
    pub entries: Vec<TrialBalanceEntry>,
    /// Sum of debit closing balances
    pub total_debit: Money,
    /// Sum of credit closing balances
    pub total_credit: Money,
    pub is_balanced: bool,
    pub warnings: Vec<EngineWarning>,
}

impl TrialBalance {
    pub fn entry(&self, ledger_id: &str) -> Option<&TrialBalanceEntry> {
        self.entries.iter().find(|e| e.ledger_id == ledger_id)
    }

    /// `ledger_id → net` in the debit-positive convention
    pub fn net_balances(&self) -> HashMap<&str, Money> {
        self.entries
            .iter()
            .map(|e| (e.ledger_id.as_str(), e.net()))
            .collect()
    }
}

#[derive(Default)]
struct Movement {
    debit: Money,
    credit: Money,
}

/// Fold opening balances and every valid voucher line into per-ledger totals.
///
/// Rows follow the registry order of `snapshot.ledgers`. Lines that reference
/// unknown ledgers and item lines with no ledger are left out, as is every
/// voucher that fails validation. Each exclusion is reported in `warnings`. Ledgers whose group feeds no statement
/// still appear, with `bucket: None`.
pub fn build_trial_balance(snapshot: &BooksSnapshot, options: &ReportOptions) -> TrialBalance {
    let index = ChartIndex::new(&snapshot.groups, &snapshot.ledgers);
    let mut warnings = Vec::new();

    let mut movements: HashMap<&str, Movement> = HashMap::new();
    for posting in postings(&index, &snapshot.vouchers, options, &mut warnings) {
        let ledger_id = posting.ledger.id.as_str();
        let movement = movements.entry(ledger_id).or_default();
        let column = match posting.line.entry_type {
            EntryType::Debit => &mut movement.debit,
            EntryType::Credit => &mut movement.credit,
        };
        accumulate(column, posting.line.amount, ledger_id, &mut warnings);
    }

    let mut entries = Vec::with_capacity(snapshot.ledgers.len());
    for ledger in &snapshot.ledgers {
        let bucket = match index.place_ledger(ledger) {
            Ok(bucket) => Some(bucket),
            Err(warning) => {
                warning.push_into(&mut warnings);
                None
            }
        };

        let movement = movements.remove(ledger.id.as_str()).unwrap_or_default();
        let opening = ledger.signed_opening();
        let mut net = opening;
        accumulate(&mut net, movement.debit, &ledger.id, &mut warnings);
        accumulate(&mut net, -movement.credit, &ledger.id, &mut warnings);

        entries.push(TrialBalanceEntry {
            ledger_id: ledger.id.clone(),
            ledger_name: ledger.name.clone(),
            group_id: ledger.group_id.clone(),
            bucket,
            opening: Balance::from_net(opening),
            debit_total: movement.debit,
            credit_total: movement.credit,
            closing: Balance::from_net(net),
        });
    }

    let mut total_debit = Money::ZERO;
    let mut total_credit = Money::ZERO;
    for entry in &entries {
        if let Some(amount) = entry.closing.debit_amount() {
            accumulate(&mut total_debit, amount, "trial balance debit total", &mut warnings);
        }
        if let Some(amount) = entry.closing.credit_amount() {
            accumulate(&mut total_credit, amount, "trial balance credit total", &mut warnings);
        }
    }

    if options.hide_zero_balances {
        entries.retain(|e| !e.closing.amount.is_zero());
    }

    tracing::debug!(
        ledgers = entries.len(),
        warnings = warnings.len(),
        %total_debit,
        %total_credit,
        "trial balance built"
    );

    TrialBalance {
        as_of: options.as_of,
        entries,
        total_debit,
        total_credit,
        is_balanced: total_debit == total_credit,
        warnings,
    }
}
