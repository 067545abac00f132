//! Single-pass accumulation of trial balance rows into statement buckets

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::money::Money;
use crate::reports::{accumulate, LedgerAmount, TrialBalance};
use crate::types::{EngineWarning, StatementBucket};

/// Bucket totals in each bucket's reporting sign.
///
/// A debit-natured bucket (purchases, assets) holds its net debit; a
/// credit-natured bucket (sales, capital) holds its net credit. A contra
/// balance shows up as a negative figure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketTotals {
    totals: BTreeMap<StatementBucket, Money>,
    details: BTreeMap<StatementBucket, Vec<LedgerAmount>>,
    #[serde(default)]
    warnings: Vec<EngineWarning>,
}

impl BucketTotals {
    /// Accumulate every bucketed trial balance row in one pass
    pub fn from_trial_balance(trial_balance: &TrialBalance) -> Self {
        let mut totals = Self::default();
        for entry in &trial_balance.entries {
            if let Some(bucket) = entry.bucket {
                totals.add(
                    bucket,
                    LedgerAmount {
                        ledger_id: entry.ledger_id.clone(),
                        ledger_name: entry.ledger_name.clone(),
                        amount: bucket.natural_amount(entry.net()),
                    },
                );
            }
        }
        totals
    }

    /// Totals given directly, without ledger detail
    pub fn from_totals(pairs: impl IntoIterator<Item = (StatementBucket, Money)>) -> Self {
        let mut totals = Self::default();
        for (bucket, amount) in pairs {
            let total = totals.totals.entry(bucket).or_default();
            accumulate(total, amount, bucket.label(), &mut totals.warnings);
        }
        totals
    }

    fn add(&mut self, bucket: StatementBucket, amount: LedgerAmount) {
        let total = self.totals.entry(bucket).or_default();
        accumulate(total, amount.amount, bucket.label(), &mut self.warnings);
        self.details.entry(bucket).or_default().push(amount);
    }

    /// Total for a bucket, zero when no ledger feeds it
    pub fn get(&self, bucket: StatementBucket) -> Money {
        self.totals.get(&bucket).copied().unwrap_or_default()
    }

    /// Bucket totals that overflowed and were saturated
    pub fn warnings(&self) -> &[EngineWarning] {
        &self.warnings
    }

    /// Contributing ledgers in trial balance order
    pub fn details(&self, bucket: StatementBucket) -> &[LedgerAmount] {
        self.details.get(&bucket).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportOptions;
    use crate::ledger::BooksSnapshot;
    use crate::reports::build_trial_balance;
    use crate::types::*;

    #[test]
    fn test_natural_sign_per_bucket() {
        let snapshot = BooksSnapshot {
            groups: vec![
                LedgerGroup::new("s".into(), "Sales".into(), GroupType::Sales, None),
                LedgerGroup::new("p".into(), "Purchase".into(), GroupType::Purchase, None),
            ],
            ledgers: vec![
                Ledger::new("local".into(), "Local Sales".into(), "s".into())
                    .with_opening(Money::from_major(800), EntryType::Credit),
                Ledger::new("returns".into(), "Sales Returns".into(), "s".into())
                    .with_opening(Money::from_major(50), EntryType::Debit),
                Ledger::new("raw".into(), "Raw Material".into(), "p".into())
                    .with_opening(Money::from_major(300), EntryType::Debit),
            ],
            vouchers: Vec::new(),
        };

        let tb = build_trial_balance(&snapshot, &ReportOptions::default());
        let buckets = BucketTotals::from_trial_balance(&tb);

        assert_eq!(buckets.get(StatementBucket::Sales), Money::from_major(750));
        assert_eq!(buckets.get(StatementBucket::Purchase), Money::from_major(300));
        assert_eq!(buckets.get(StatementBucket::Capital), Money::ZERO);

        let details = buckets.details(StatementBucket::Sales);
        assert_eq!(details.len(), 2);
        assert_eq!(details[1].amount, Money::from_major(-50));
        assert!(buckets.details(StatementBucket::Loans).is_empty());
    }

    #[test]
    fn test_overflowing_bucket_is_warned() {
        let buckets = BucketTotals::from_totals([
            (StatementBucket::FixedAssets, Money::MAX),
            (StatementBucket::FixedAssets, Money::from_major(1)),
            (StatementBucket::Capital, Money::from_major(1)),
        ]);

        assert_eq!(buckets.get(StatementBucket::FixedAssets), Money::MAX);
        assert_eq!(buckets.get(StatementBucket::Capital), Money::from_major(1));
        assert_eq!(
            buckets.warnings(),
            &[EngineWarning::AmountOutOfRange {
                context: StatementBucket::FixedAssets.label().to_string()
            }]
        );
    }
}
