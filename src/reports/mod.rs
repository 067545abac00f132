//! Derived statements: trial balance, trading account, profit & loss,
//! balance sheet and ledger statements

pub mod balance_sheet;
pub mod buckets;
pub mod profit_loss;
pub mod statement;
pub mod trading;
pub mod trial_balance;

pub use balance_sheet::*;
pub use buckets::*;
pub use profit_loss::*;
pub use statement::*;
pub use trading::*;
pub use trial_balance::*;

use serde::{Deserialize, Serialize};

use crate::config::ReportOptions;
use crate::ledger::{BooksSnapshot, ChartIndex};
use crate::money::Money;
use crate::types::*;

/// Sign of a statement result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Profit,
    Loss,
    Nil,
}

impl Outcome {
    pub fn of(result: Money) -> Self {
        if result.is_positive() {
            Outcome::Profit
        } else if result.is_negative() {
            Outcome::Loss
        } else {
            Outcome::Nil
        }
    }
}

/// One ledger's contribution to a statement line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerAmount {
    pub ledger_id: String,
    pub ledger_name: String,
    pub amount: Money,
}

/// A captioned amount on one side of a statement ("To Purchases", "By Sales")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    pub label: String,
    pub amount: Money,
    #[serde(default)]
    pub details: Vec<LedgerAmount>,
}

impl StatementLine {
    pub fn new(label: impl Into<String>, amount: Money) -> Self {
        Self {
            label: label.into(),
            amount,
            details: Vec::new(),
        }
    }

    /// Line for a bucket, captioned with the bucket name
    pub(crate) fn of_bucket(bucket: StatementBucket, totals: &BucketTotals) -> Self {
        Self {
            label: bucket.label().to_string(),
            amount: totals.get(bucket),
            details: totals.details(bucket).to_vec(),
        }
    }

    /// Line for a bucket, captioned with `prefix` ("To" or "By")
    pub(crate) fn for_bucket(prefix: &str, bucket: StatementBucket, totals: &BucketTotals) -> Self {
        let mut line = Self::of_bucket(bucket, totals);
        line.label = format!("{prefix} {}", line.label);
        line
    }
}

/// One voucher line resolved to a known ledger
#[derive(Debug, Clone, Copy)]
pub(crate) struct Posting<'a> {
    pub voucher: &'a Voucher,
    pub line: &'a VoucherEntryLine,
    pub ledger: &'a Ledger,
}

/// Vouchers inside the reporting window, by date then by sequence
pub fn ordered_vouchers<'a>(vouchers: &'a [Voucher], options: &ReportOptions) -> Vec<&'a Voucher> {
    let mut ordered: Vec<&Voucher> = vouchers.iter().filter(|v| options.includes(v.date)).collect();
    // stable: same-day vouchers keep their sequence order
    ordered.sort_by_key(|v| v.date);
    ordered
}

/// Vouchers in fold order that pass [`Voucher::validate`].
///
/// Every rejected voucher is reported to `warnings` and contributes to no total.
pub(crate) fn accepted_vouchers<'a>(
    vouchers: &'a [Voucher],
    options: &ReportOptions,
    warnings: &mut Vec<EngineWarning>,
) -> Vec<&'a Voucher> {
    ordered_vouchers(vouchers, options)
        .into_iter()
        .filter(|voucher| match voucher.validate() {
            Ok(()) => true,
            Err(err) => {
                let warning = match err {
                    VoucherError::Unbalanced {
                        voucher_id,
                        debits,
                        credits,
                    } => EngineWarning::UnbalancedVoucher {
                        voucher_id,
                        debits,
                        credits,
                    },
                    other => EngineWarning::InvalidVoucher {
                        voucher_id: voucher.id.clone(),
                        reason: other.to_string(),
                    },
                };
                warning.push_into(warnings);
                false
            }
        })
        .collect()
}

/// Add `amount` into `total`. On overflow the total saturates and an
/// [`EngineWarning::AmountOutOfRange`] names `context`.
pub(crate) fn accumulate(
    total: &mut Money,
    amount: Money,
    context: &str,
    warnings: &mut Vec<EngineWarning>,
) {
    match total.checked_add(amount) {
        Some(sum) => *total = sum,
        None => {
            EngineWarning::AmountOutOfRange {
                context: context.to_string(),
            }
            .push_into(warnings);
            *total = *total + amount;
        }
    }
}

/// Resolve every postable line of the accepted vouchers in fold order. Lines
/// that cannot be posted are reported to `warnings` and left out.
pub(crate) fn postings<'a>(
    index: &ChartIndex<'a>,
    vouchers: &'a [Voucher],
    options: &ReportOptions,
    warnings: &mut Vec<EngineWarning>,
) -> Vec<Posting<'a>> {
    let mut postings = Vec::new();

    for voucher in accepted_vouchers(vouchers, options, warnings) {
        for line in &voucher.entries {
            let Some(ledger_id) = line.ledger_id.as_deref() else {
                EngineWarning::UnpostedItemLine {
                    voucher_id: voucher.id.clone(),
                    line_id: line.id.clone(),
                }
                .push_into(warnings);
                continue;
            };

            match index.ledger(ledger_id) {
                Some(ledger) => postings.push(Posting {
                    voucher,
                    line,
                    ledger,
                }),
                None => EngineWarning::DanglingLedger {
                    voucher_id: voucher.id.clone(),
                    line_id: line.id.clone(),
                    ledger_id: ledger_id.to_string(),
                }
                .push_into(warnings),
            }
        }
    }

    postings
}

/// Every statement derived from one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatements {
    pub trial_balance: TrialBalance,
    pub trading: TradingAccountResult,
    pub profit_loss: ProfitLossResult,
    pub balance_sheet: BalanceSheetResult,
    /// Trial balance warnings followed by bucket roll-up warnings
    #[serde(default)]
    pub warnings: Vec<EngineWarning>,
}

impl FinancialStatements {
    /// Run the whole derivation chain:
    /// trial balance → buckets → trading → profit & loss → balance sheet
    pub fn derive(snapshot: &BooksSnapshot, options: &ReportOptions) -> Self {
        let trial_balance = build_trial_balance(snapshot, options);
        let buckets = BucketTotals::from_trial_balance(&trial_balance);
        let trading = derive_trading_account(&buckets);
        let profit_loss = derive_profit_loss(trading.gross_profit, &buckets);
        let balance_sheet = derive_balance_sheet(&buckets, profit_loss.net_profit, options);

        let mut warnings = trial_balance.warnings.clone();
        warnings.extend_from_slice(buckets.warnings());

        Self {
            trial_balance,
            trading,
            profit_loss,
            balance_sheet,
            warnings,
        }
    }

    pub fn warnings(&self) -> &[EngineWarning] {
        &self.warnings
    }
}
