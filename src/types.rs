//! Core types and data structures for the voucher accounting engine

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Side of a posting or a balance in double-entry bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Debit,
    Credit,
}

impl EntryType {
    /// The other side
    pub fn opposite(self) -> Self {
        match self {
            EntryType::Debit => EntryType::Credit,
            EntryType::Credit => EntryType::Debit,
        }
    }

    /// Apply the debit-positive sign convention to a magnitude
    pub fn signed(self, amount: Money) -> Money {
        match self {
            EntryType::Debit => amount,
            EntryType::Credit => -amount,
        }
    }
}

/// A non-negative amount together with the side it sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Balance {
    pub amount: Money,
    pub side: EntryType,
}

impl Balance {
    /// Split a debit-positive net figure. Zero is reported as a debit balance.
    pub fn from_net(net: Money) -> Self {
        if net.is_negative() {
            Self {
                amount: net.abs(),
                side: EntryType::Credit,
            }
        } else {
            Self {
                amount: net,
                side: EntryType::Debit,
            }
        }
    }

    /// Back to the debit-positive convention
    pub fn net(&self) -> Money {
        self.side.signed(self.amount)
    }

    pub fn debit_amount(&self) -> Option<Money> {
        (self.side == EntryType::Debit).then_some(self.amount)
    }

    pub fn credit_amount(&self) -> Option<Money> {
        (self.side == EntryType::Credit).then_some(self.amount)
    }
}

/// Statement buckets read by the derivers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatementBucket {
    OpeningStock,
    Purchase,
    DirectExpenses,
    Sales,
    ClosingStock,
    IndirectExpenses,
    IndirectIncome,
    Capital,
    Loans,
    CurrentLiabilities,
    FixedAssets,
    CurrentAssets,
}

impl StatementBucket {
    /// The side on which this bucket's figure is reported.
    ///
    /// Closing stock sits on the credit side of the Trading Account.
    pub fn nature(self) -> EntryType {
        match self {
            StatementBucket::OpeningStock
            | StatementBucket::Purchase
            | StatementBucket::DirectExpenses
            | StatementBucket::IndirectExpenses
            | StatementBucket::FixedAssets
            | StatementBucket::CurrentAssets => EntryType::Debit,
            StatementBucket::Sales
            | StatementBucket::ClosingStock
            | StatementBucket::IndirectIncome
            | StatementBucket::Capital
            | StatementBucket::Loans
            | StatementBucket::CurrentLiabilities => EntryType::Credit,
        }
    }

    /// Convert a debit-positive net into this bucket's reporting sign
    pub fn natural_amount(self, net: Money) -> Money {
        match self.nature() {
            EntryType::Debit => net,
            EntryType::Credit => -net,
        }
    }

    /// Display caption used on statement lines
    pub fn label(self) -> &'static str {
        match self {
            StatementBucket::OpeningStock => "Opening Stock",
            StatementBucket::Purchase => "Purchases",
            StatementBucket::DirectExpenses => "Direct Expenses",
            StatementBucket::Sales => "Sales",
            StatementBucket::ClosingStock => "Closing Stock",
            StatementBucket::IndirectExpenses => "Indirect Expenses",
            StatementBucket::IndirectIncome => "Indirect Income",
            StatementBucket::Capital => "Capital",
            StatementBucket::Loans => "Loans",
            StatementBucket::CurrentLiabilities => "Current Liabilities",
            StatementBucket::FixedAssets => "Fixed Assets",
            StatementBucket::CurrentAssets => "Current Assets",
        }
    }
}

/// Fixed taxonomy of ledger group types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupType {
    Capital,
    Loans,
    CurrentLiabilities,
    FixedAssets,
    CurrentAssets,
    OpeningStock,
    ClosingStock,
    Sales,
    Purchase,
    DirectExpenses,
    IndirectExpenses,
    IndirectIncome,
    Bank,
    Cash,
    SundryDebtors,
    SundryCreditors,
    DutiesAndTaxes,
    Investments,
    Suspense,
    /// Any tag outside the taxonomy
    #[serde(other)]
    Unknown,
}

impl GroupType {
    /// Taxonomy-to-bucket table. Types without a bucket of their own roll up
    /// through their parent group (see [`crate::ledger::ChartIndex`]).
    pub fn bucket(self) -> Option<StatementBucket> {
        match self {
            GroupType::Capital => Some(StatementBucket::Capital),
            GroupType::Loans => Some(StatementBucket::Loans),
            GroupType::CurrentLiabilities => Some(StatementBucket::CurrentLiabilities),
            GroupType::FixedAssets => Some(StatementBucket::FixedAssets),
            GroupType::CurrentAssets => Some(StatementBucket::CurrentAssets),
            GroupType::OpeningStock => Some(StatementBucket::OpeningStock),
            GroupType::ClosingStock => Some(StatementBucket::ClosingStock),
            GroupType::Sales => Some(StatementBucket::Sales),
            GroupType::Purchase => Some(StatementBucket::Purchase),
            GroupType::DirectExpenses => Some(StatementBucket::DirectExpenses),
            GroupType::IndirectExpenses => Some(StatementBucket::IndirectExpenses),
            GroupType::IndirectIncome => Some(StatementBucket::IndirectIncome),
            GroupType::Bank
            | GroupType::Cash
            | GroupType::SundryDebtors
            | GroupType::SundryCreditors
            | GroupType::DutiesAndTaxes
            | GroupType::Investments
            | GroupType::Suspense
            | GroupType::Unknown => None,
        }
    }
}

/// A typed bucket organizing ledgers into statement categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerGroup {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub group_type: GroupType,
    #[serde(default)]
    pub parent_group_id: Option<String>,
}

impl LedgerGroup {
    pub fn new(
        id: String,
        name: String,
        group_type: GroupType,
        parent_group_id: Option<String>,
    ) -> Self {
        Self {
            id,
            name,
            group_type,
            parent_group_id,
        }
    }
}

/// A named account bound to exactly one ledger group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub id: String,
    pub name: String,
    pub group_id: String,
    /// Non-negative magnitude; the side comes from `balance_type`
    #[serde(default)]
    pub opening_balance: Money,
    pub balance_type: EntryType,
    #[serde(default)]
    pub gst_number: Option<String>,
}

impl Ledger {
    /// Create a ledger with a zero opening balance
    pub fn new(id: String, name: String, group_id: String) -> Self {
        Self {
            id,
            name,
            group_id,
            opening_balance: Money::ZERO,
            balance_type: EntryType::Debit,
            gst_number: None,
        }
    }

    /// Set the opening balance and its side
    pub fn with_opening(mut self, amount: Money, balance_type: EntryType) -> Self {
        self.opening_balance = amount;
        self.balance_type = balance_type;
        self
    }

    pub fn with_gst_number(mut self, gst_number: String) -> Self {
        self.gst_number = Some(gst_number);
        self
    }

    /// Opening balance in the debit-positive convention
    pub fn signed_opening(&self) -> Money {
        self.balance_type.signed(self.opening_balance)
    }
}

/// Voucher classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VoucherType {
    Payment,
    Receipt,
    Contra,
    Journal,
    Sales,
    Purchase,
    CreditNote,
    DebitNote,
    StockJournal,
}

/// One debit or credit line of a voucher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoucherEntryLine {
    pub id: String,
    #[serde(default)]
    pub ledger_id: Option<String>,
    /// Stock item for inventory-linked lines
    #[serde(default)]
    pub item_id: Option<String>,
    pub amount: Money,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    #[serde(default)]
    pub cgst_rate: Option<BigDecimal>,
    #[serde(default)]
    pub sgst_rate: Option<BigDecimal>,
    #[serde(default)]
    pub igst_rate: Option<BigDecimal>,
    #[serde(default)]
    pub cess_rate: Option<BigDecimal>,
    #[serde(default)]
    pub discount: Option<Money>,
    #[serde(default)]
    pub narration: Option<String>,
}

impl VoucherEntryLine {
    /// Create a line posting to a ledger
    pub fn new(id: String, ledger_id: String, entry_type: EntryType, amount: Money) -> Self {
        Self {
            id,
            ledger_id: Some(ledger_id),
            item_id: None,
            amount,
            entry_type,
            cgst_rate: None,
            sgst_rate: None,
            igst_rate: None,
            cess_rate: None,
            discount: None,
            narration: None,
        }
    }

    pub fn debit(id: String, ledger_id: String, amount: Money) -> Self {
        Self::new(id, ledger_id, EntryType::Debit, amount)
    }

    pub fn credit(id: String, ledger_id: String, amount: Money) -> Self {
        Self::new(id, ledger_id, EntryType::Credit, amount)
    }

    /// Attach a stock item to the line
    pub fn with_item(mut self, item_id: String) -> Self {
        self.item_id = Some(item_id);
        self
    }

    /// Copy the component rates of a GST rate onto the line
    pub fn with_gst(mut self, rate: &crate::tax::gst::GstRate) -> Self {
        self.cgst_rate = Some(rate.cgst_rate.clone());
        self.sgst_rate = Some(rate.sgst_rate.clone());
        self.igst_rate = Some(rate.igst_rate.clone());
        self
    }

    pub fn with_cess(mut self, rate: BigDecimal) -> Self {
        self.cess_rate = Some(rate);
        self
    }

    pub fn with_discount(mut self, discount: Money) -> Self {
        self.discount = Some(discount);
        self
    }

    pub fn with_narration(mut self, narration: String) -> Self {
        self.narration = Some(narration);
        self
    }

    /// Whether any tax rate field is populated
    pub fn has_tax_fields(&self) -> bool {
        self.cgst_rate.is_some()
            || self.sgst_rate.is_some()
            || self.igst_rate.is_some()
            || self.cess_rate.is_some()
    }

    /// Line amount in the debit-positive convention
    pub fn signed_amount(&self) -> Money {
        self.entry_type.signed(self.amount)
    }
}

/// A dated, balanced set of postings representing one business transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voucher {
    pub id: String,
    pub number: String,
    #[serde(rename = "type")]
    pub voucher_type: VoucherType,
    /// Numbering series within the voucher type
    #[serde(default)]
    pub series: Option<String>,
    pub date: NaiveDate,
    pub entries: Vec<VoucherEntryLine>,
    #[serde(default)]
    pub reference_no: Option<String>,
    #[serde(default)]
    pub narration: Option<String>,
}

impl Voucher {
    /// Create a voucher with no entries
    pub fn new(id: String, number: String, voucher_type: VoucherType, date: NaiveDate) -> Self {
        Self {
            id,
            number,
            voucher_type,
            series: None,
            date,
            entries: Vec::new(),
            reference_no: None,
            narration: None,
        }
    }

    pub fn add_entry(&mut self, entry: VoucherEntryLine) {
        self.entries.push(entry);
    }

    pub fn total_debits(&self) -> Money {
        self.entries
            .iter()
            .filter(|e| e.entry_type == EntryType::Debit)
            .map(|e| e.amount)
            .sum()
    }

    pub fn total_credits(&self) -> Money {
        self.entries
            .iter()
            .filter(|e| e.entry_type == EntryType::Credit)
            .map(|e| e.amount)
            .sum()
    }

    /// Debit and credit totals, or `None` when either side overflows
    pub fn checked_totals(&self) -> Option<(Money, Money)> {
        let side = |side: EntryType| {
            Money::checked_sum(
                self.entries
                    .iter()
                    .filter(|e| e.entry_type == side)
                    .map(|e| e.amount),
            )
        };
        Some((side(EntryType::Debit)?, side(EntryType::Credit)?))
    }

    /// Debits equal credits, exactly
    pub fn is_balanced(&self) -> bool {
        matches!(self.checked_totals(), Some((debits, credits)) if debits == credits)
    }

    /// Validate line shape and the balance invariant
    pub fn validate(&self) -> Result<(), VoucherError> {
        if self.entries.is_empty() {
            return Err(VoucherError::Empty(self.id.clone()));
        }

        for entry in &self.entries {
            if !entry.amount.is_positive() {
                return Err(VoucherError::NonPositiveAmount {
                    voucher_id: self.id.clone(),
                    line_id: entry.id.clone(),
                });
            }
            if entry.ledger_id.is_none() && entry.item_id.is_none() {
                return Err(VoucherError::MissingAccount {
                    voucher_id: self.id.clone(),
                    line_id: entry.id.clone(),
                });
            }
            if let Some(discount) = entry.discount {
                if discount.is_negative() || discount > entry.amount {
                    return Err(VoucherError::InvalidDiscount {
                        voucher_id: self.id.clone(),
                        line_id: entry.id.clone(),
                    });
                }
            }
        }

        let (debits, credits) = self
            .checked_totals()
            .ok_or_else(|| VoucherError::AmountOutOfRange(self.id.clone()))?;
        if debits != credits {
            return Err(VoucherError::Unbalanced {
                voucher_id: self.id.clone(),
                debits,
                credits,
            });
        }

        Ok(())
    }

    /// Build the offsetting voucher that supersedes this one.
    ///
    /// Every line keeps its ledger, item, amount and rates with the side swapped.
    pub fn reversal(&self, id: String, number: String, date: NaiveDate) -> Voucher {
        let entries = self
            .entries
            .iter()
            .map(|line| VoucherEntryLine {
                id: format!("{}-rev", line.id),
                entry_type: line.entry_type.opposite(),
                ..line.clone()
            })
            .collect();

        Voucher {
            id,
            number,
            voucher_type: self.voucher_type,
            series: self.series.clone(),
            date,
            entries,
            reference_no: Some(self.number.clone()),
            narration: Some(format!("Reversal of voucher {}", self.number)),
        }
    }
}

/// Errors raised when a voucher is offered to the journal
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VoucherError {
    #[error("Voucher {0} has no entries")]
    Empty(String),
    #[error("Voucher {voucher_id} is not balanced: debits = {debits}, credits = {credits}")]
    Unbalanced {
        voucher_id: String,
        debits: Money,
        credits: Money,
    },
    #[error("Voucher {voucher_id} line {line_id}: amount must be positive")]
    NonPositiveAmount { voucher_id: String, line_id: String },
    #[error("Voucher {voucher_id} line {line_id}: references neither a ledger nor an item")]
    MissingAccount { voucher_id: String, line_id: String },
    #[error("Voucher {voucher_id} line {line_id}: discount must be between zero and the line amount")]
    InvalidDiscount { voucher_id: String, line_id: String },
    #[error("Voucher {0}: line totals exceed the representable amount")]
    AmountOutOfRange(String),
    #[error("Voucher number {number} already used in {voucher_type:?} series {series:?}")]
    DuplicateNumber {
        voucher_type: VoucherType,
        series: Option<String>,
        number: String,
    },
    #[error("Voucher with ID '{0}' already exists")]
    DuplicateId(String),
    #[error("Voucher not found: {0}")]
    NotFound(String),
    #[error("Voucher {voucher_id} rejected: {reason}")]
    Invalid { voucher_id: String, reason: String },
}

/// Errors raised while setting up the chart of accounts
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChartError {
    #[error("Group with ID '{0}' already exists")]
    DuplicateGroup(String),
    #[error("Ledger with ID '{0}' already exists")]
    DuplicateLedger(String),
    #[error("Parent group '{0}' does not exist")]
    UnknownParent(String),
    #[error("Group not found: {0}")]
    GroupNotFound(String),
    #[error("Ledger group hierarchy contains a cycle through '{0}'")]
    Cycle(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors that can occur in the books orchestrator
#[derive(Debug, thiserror::Error)]
pub enum BooksError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error(transparent)]
    Voucher(#[from] VoucherError),
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error("Ledger not found: {0}")]
    LedgerNotFound(String),
}

/// Result type for books operations
pub type BooksResult<T> = Result<T, BooksError>;

/// A recoverable data problem found while deriving reports.
///
/// The offending record is excluded and the report is produced from the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EngineWarning {
    #[error("Voucher {voucher_id} line {line_id} references unknown ledger '{ledger_id}'")]
    DanglingLedger {
        voucher_id: String,
        line_id: String,
        ledger_id: String,
    },
    #[error("Ledger '{ledger_id}' references unknown group '{group_id}'")]
    DanglingGroup { ledger_id: String, group_id: String },
    #[error("Ledger '{ledger_id}' in group '{group_id}' ({group_type:?}) feeds no statement")]
    InvalidGroupType {
        ledger_id: String,
        group_id: String,
        group_type: GroupType,
    },
    #[error("Ledger group hierarchy contains a cycle through '{group_id}'")]
    GroupCycle { group_id: String },
    #[error("Voucher {voucher_id} skipped, not balanced: debits = {debits}, credits = {credits}")]
    UnbalancedVoucher {
        voucher_id: String,
        debits: Money,
        credits: Money,
    },
    #[error("Voucher {voucher_id} skipped: {reason}")]
    InvalidVoucher { voucher_id: String, reason: String },
    #[error("{context}: amount out of range")]
    AmountOutOfRange { context: String },
    #[error("Voucher {voucher_id} item line {line_id} posts to no ledger")]
    UnpostedItemLine { voucher_id: String, line_id: String },
    #[error("Voucher {voucher_id} line {line_id} has an invalid tax rate {rate}")]
    InvalidTaxRate {
        voucher_id: String,
        line_id: String,
        rate: BigDecimal,
    },
    #[error("Voucher {voucher_id} line {line_id}: tax amount out of range")]
    TaxOutOfRange { voucher_id: String, line_id: String },
}

impl EngineWarning {
    /// Log the warning and append it to `sink`
    pub(crate) fn push_into(self, sink: &mut Vec<EngineWarning>) {
        tracing::warn!("excluded record from derivation: {}", self);
        sink.push(self);
    }
}
