//! Profit & Loss Account: net result from gross result and indirect items

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::reports::{BucketTotals, Outcome, StatementLine};
use crate::types::StatementBucket;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitLossResult {
    /// Gross profit brought forward, present only when the trading result is positive
    pub gross_profit_brought_forward: Option<Money>,
    /// Gross loss brought forward, present only when the trading result is negative
    pub gross_loss_brought_forward: Option<Money>,
    pub indirect_income: Money,
    pub indirect_expenses: Money,
    /// `max(0, -gross_profit) + indirect_expenses`
    pub debit_total: Money,
    /// `max(0, gross_profit) + indirect_income`
    pub credit_total: Money,
    /// `credit_total - debit_total`
    pub net_profit: Money,
    pub outcome: Outcome,
    pub debit_side: Vec<StatementLine>,
    pub credit_side: Vec<StatementLine>,
}

/// Carry the trading result into the Profit & Loss Account.
///
/// A zero gross result emits neither a "b/f profit" nor a "b/f loss" line.
pub fn derive_profit_loss(gross_profit: Money, buckets: &BucketTotals) -> ProfitLossResult {
    let indirect_income = buckets.get(StatementBucket::IndirectIncome);
    let indirect_expenses = buckets.get(StatementBucket::IndirectExpenses);

    let gross_profit_brought_forward = gross_profit.is_positive().then_some(gross_profit);
    let gross_loss_brought_forward = gross_profit.is_negative().then(|| gross_profit.abs());

    let debit_total = (-gross_profit).positive_part() + indirect_expenses;
    let credit_total = gross_profit.positive_part() + indirect_income;
    let net_profit = credit_total - debit_total;

    let mut debit_side = Vec::new();
    if let Some(loss) = gross_loss_brought_forward {
        debit_side.push(StatementLine::new("To Gross Loss b/f", loss));
    }
    debit_side.push(StatementLine::for_bucket(
        "To",
        StatementBucket::IndirectExpenses,
        buckets,
    ));

    let mut credit_side = Vec::new();
    if let Some(profit) = gross_profit_brought_forward {
        credit_side.push(StatementLine::new("By Gross Profit b/f", profit));
    }
    credit_side.push(StatementLine::for_bucket(
        "By",
        StatementBucket::IndirectIncome,
        buckets,
    ));

    ProfitLossResult {
        gross_profit_brought_forward,
        gross_loss_brought_forward,
        indirect_income,
        indirect_expenses,
        debit_total,
        credit_total,
        net_profit,
        outcome: Outcome::of(net_profit),
        debit_side,
        credit_side,
    }
}
