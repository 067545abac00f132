//! Report derivation options
//!
//! Options are plain serde data so a host application can keep them in its
//! own configuration file next to the rest of its settings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Options shared by every report derivation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Ignore vouchers dated after this day
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
    /// Carry net profit/loss to the liabilities side before the balance check
    #[serde(default)]
    pub fold_net_profit_into_capital: bool,
    /// Drop ledgers with a zero closing balance from trial balance rows
    #[serde(default)]
    pub hide_zero_balances: bool,
}

impl ReportOptions {
    /// Options for a report as of the given day
    pub fn as_of(date: NaiveDate) -> Self {
        Self {
            as_of: Some(date),
            ..Self::default()
        }
    }

    /// Whether a voucher dated `date` falls inside the reporting window
    pub fn includes(&self, date: NaiveDate) -> bool {
        self.as_of.is_none_or(|cutoff| date <= cutoff)
    }
}
