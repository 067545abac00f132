//! Trading Account: gross profit or loss from stock and direct trading activity

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::reports::{BucketTotals, Outcome, StatementLine};
use crate::types::StatementBucket;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingAccountResult {
    pub opening_stock: Money,
    pub purchases: Money,
    pub direct_expenses: Money,
    pub sales: Money,
    pub closing_stock: Money,
    /// `opening_stock + purchases + direct_expenses`
    pub debit_total: Money,
    /// `sales + closing_stock`
    pub credit_total: Money,
    /// `credit_total - debit_total`; negative is a gross loss
    pub gross_profit: Money,
    pub outcome: Outcome,
    /// "To …" lines
    pub debit_side: Vec<StatementLine>,
    /// "By …" lines
    pub credit_side: Vec<StatementLine>,
}

const DEBIT_BUCKETS: [StatementBucket; 3] = [
    StatementBucket::OpeningStock,
    StatementBucket::Purchase,
    StatementBucket::DirectExpenses,
];

const CREDIT_BUCKETS: [StatementBucket; 2] = [StatementBucket::Sales, StatementBucket::ClosingStock];

pub fn derive_trading_account(buckets: &BucketTotals) -> TradingAccountResult {
    let opening_stock = buckets.get(StatementBucket::OpeningStock);
    let purchases = buckets.get(StatementBucket::Purchase);
    let direct_expenses = buckets.get(StatementBucket::DirectExpenses);
    let sales = buckets.get(StatementBucket::Sales);
    let closing_stock = buckets.get(StatementBucket::ClosingStock);

    let debit_total = opening_stock + purchases + direct_expenses;
    let credit_total = sales + closing_stock;
    let gross_profit = credit_total - debit_total;

    TradingAccountResult {
        opening_stock,
        purchases,
        direct_expenses,
        sales,
        closing_stock,
        debit_total,
        credit_total,
        gross_profit,
        outcome: Outcome::of(gross_profit),
        debit_side: DEBIT_BUCKETS
            .iter()
            .map(|b| StatementLine::for_bucket("To", *b, buckets))
            .collect(),
        credit_side: CREDIT_BUCKETS
            .iter()
            .map(|b| StatementLine::for_bucket("By", *b, buckets))
            .collect(),
    }
}
