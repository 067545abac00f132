//! Balance Sheet: assets against liabilities and capital

use serde::{Deserialize, Serialize};

use crate::config::ReportOptions;
use crate::money::Money;
use crate::reports::{BucketTotals, StatementLine};
use crate::types::StatementBucket;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetResult {
    pub capital: Money,
    pub loans: Money,
    pub current_liabilities: Money,
    /// Net profit (or loss, negative) carried to the liabilities side.
    /// Present only when folding is enabled.
    pub retained_profit: Option<Money>,
    pub fixed_assets: Money,
    pub current_assets: Money,
    /// `capital + loans + current_liabilities (+ retained_profit)`
    pub total_liabilities: Money,
    /// `fixed_assets + current_assets`
    pub total_assets: Money,
    /// `total_assets - total_liabilities`
    pub difference: Money,
    /// Exact equality of the two sides
    pub is_balanced: bool,
    pub liabilities_side: Vec<StatementLine>,
    pub assets_side: Vec<StatementLine>,
}

const LIABILITY_BUCKETS: [StatementBucket; 3] = [
    StatementBucket::Capital,
    StatementBucket::Loans,
    StatementBucket::CurrentLiabilities,
];

const ASSET_BUCKETS: [StatementBucket; 2] =
    [StatementBucket::FixedAssets, StatementBucket::CurrentAssets];

/// Derive the balance sheet and check it balances, with no tolerance.
///
/// Net profit is left out of capital unless
/// `options.fold_net_profit_into_capital` is set, so any profit or loss for the
/// period shows as an imbalance in the default view.
pub fn derive_balance_sheet(
    buckets: &BucketTotals,
    net_profit: Money,
    options: &ReportOptions,
) -> BalanceSheetResult {
    let capital = buckets.get(StatementBucket::Capital);
    let loans = buckets.get(StatementBucket::Loans);
    let current_liabilities = buckets.get(StatementBucket::CurrentLiabilities);
    let fixed_assets = buckets.get(StatementBucket::FixedAssets);
    let current_assets = buckets.get(StatementBucket::CurrentAssets);

    let retained_profit = options.fold_net_profit_into_capital.then_some(net_profit);

    let total_liabilities =
        capital + loans + current_liabilities + retained_profit.unwrap_or_default();
    let total_assets = fixed_assets + current_assets;
    let difference = total_assets - total_liabilities;

    let mut liabilities_side: Vec<_> = LIABILITY_BUCKETS
        .iter()
        .map(|b| StatementLine::of_bucket(*b, buckets))
        .collect();
    if let Some(retained) = retained_profit {
        liabilities_side.push(StatementLine::new("Profit & Loss A/c", retained));
    }

    let assets_side = ASSET_BUCKETS
        .iter()
        .map(|b| StatementLine::of_bucket(*b, buckets))
        .collect();

    if !difference.is_zero() {
        tracing::debug!(%total_assets, %total_liabilities, "balance sheet does not balance");
    }

    BalanceSheetResult {
        capital,
        loans,
        current_liabilities,
        retained_profit,
        fixed_assets,
        current_assets,
        total_liabilities,
        total_assets,
        difference,
        is_balanced: difference.is_zero(),
        liabilities_side,
        assets_side,
    }
}
