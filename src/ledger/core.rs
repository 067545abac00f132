//! Books orchestrator that validates records on the way in and derives reports
//! from a snapshot of the store

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::config::ReportOptions;
use crate::ledger::{BooksSnapshot, VoucherJournal};
use crate::reports::{FinancialStatements, LedgerStatement, TrialBalance};
use crate::tax::aggregate::TaxReport;
use crate::traits::*;
use crate::types::*;

/// Main books system that orchestrates chart, journal and reporting operations
pub struct Books<S: BooksStore> {
    storage: S,
    chart_validator: Box<dyn ChartValidator>,
    voucher_validator: Box<dyn VoucherValidator>,
}

impl<S: BooksStore> Books<S> {
    /// Create new books over the given storage backend
    pub fn new(storage: S) -> Self {
        Self::with_validators(
            storage,
            Box::new(DefaultChartValidator),
            Box::new(DefaultVoucherValidator),
        )
    }

    /// Create new books with custom validators
    pub fn with_validators(
        storage: S,
        chart_validator: Box<dyn ChartValidator>,
        voucher_validator: Box<dyn VoucherValidator>,
    ) -> Self {
        Self {
            storage,
            chart_validator,
            voucher_validator,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // Chart operations
    /// Create a ledger group under an existing parent (or at the root)
    pub async fn create_group(
        &mut self,
        id: String,
        name: String,
        group_type: GroupType,
        parent_group_id: Option<String>,
    ) -> BooksResult<LedgerGroup> {
        let group = LedgerGroup::new(id, name, group_type, parent_group_id);
        self.chart_validator.validate_group(&group)?;

        if self.storage.get_group(&group.id).await?.is_some() {
            return Err(ChartError::DuplicateGroup(group.id).into());
        }

        if let Some(parent_id) = &group.parent_group_id {
            if self.storage.get_group(parent_id).await?.is_none() {
                return Err(ChartError::UnknownParent(parent_id.clone()).into());
            }
        }

        self.storage.save_group(&group).await?;
        Ok(group)
    }

    /// Create a ledger with no opening balance
    pub async fn create_ledger(
        &mut self,
        id: String,
        name: String,
        group_id: String,
    ) -> BooksResult<Ledger> {
        self.add_ledger(Ledger::new(id, name, group_id)).await
    }

    /// Add a fully specified ledger (opening balance, GSTIN)
    pub async fn add_ledger(&mut self, ledger: Ledger) -> BooksResult<Ledger> {
        self.chart_validator.validate_ledger(&ledger)?;

        if self.storage.get_group(&ledger.group_id).await?.is_none() {
            return Err(ChartError::GroupNotFound(ledger.group_id).into());
        }

        if self.storage.get_ledger(&ledger.id).await?.is_some() {
            return Err(ChartError::DuplicateLedger(ledger.id).into());
        }

        self.storage.save_ledger(&ledger).await?;
        Ok(ledger)
    }

    pub async fn get_group(&self, group_id: &str) -> BooksResult<Option<LedgerGroup>> {
        self.storage.get_group(group_id).await
    }

    pub async fn get_ledger(&self, ledger_id: &str) -> BooksResult<Option<Ledger>> {
        self.storage.get_ledger(ledger_id).await
    }

    pub async fn list_ledgers(&self) -> BooksResult<Vec<Ledger>> {
        self.storage.list_ledgers().await
    }

    // Voucher operations
    /// Accept a voucher into the journal.
    ///
    /// The voucher is rejected when it fails validation, when any line names a
    /// ledger that does not exist, or when its id or number is already taken.
    pub async fn post_voucher(&mut self, voucher: Voucher) -> BooksResult<Voucher> {
        for ledger_id in voucher.entries.iter().filter_map(|e| e.ledger_id.as_deref()) {
            if self.storage.get_ledger(ledger_id).await?.is_none() {
                return Err(BooksError::LedgerNotFound(ledger_id.to_string()));
            }
        }

        let journal = self.load_journal().await?;
        journal.check(&voucher, self.voucher_validator.as_ref())?;

        self.storage.append_voucher(&voucher).await?;
        tracing::debug!(
            voucher_id = %voucher.id,
            number = %voucher.number,
            "voucher posted"
        );
        Ok(voucher)
    }

    /// Post the reversal of an existing voucher
    pub async fn reverse_voucher(
        &mut self,
        original_id: &str,
        id: String,
        number: String,
        date: NaiveDate,
    ) -> BooksResult<Voucher> {
        let original = self
            .storage
            .get_voucher(original_id)
            .await?
            .ok_or_else(|| VoucherError::NotFound(original_id.to_string()))?;
        self.post_voucher(original.reversal(id, number, date)).await
    }

    pub async fn get_voucher(&self, voucher_id: &str) -> BooksResult<Option<Voucher>> {
        self.storage.get_voucher(voucher_id).await
    }

    async fn load_journal(&self) -> BooksResult<VoucherJournal> {
        let vouchers = self.storage.list_vouchers().await?;
        Ok(VoucherJournal::index_only(vouchers))
    }

    // Reporting operations
    /// Load a snapshot of the whole books
    pub async fn snapshot(&self) -> BooksResult<BooksSnapshot> {
        let snapshot = self.storage.snapshot().await?;
        tracing::debug!(
            groups = snapshot.groups.len(),
            ledgers = snapshot.ledgers.len(),
            vouchers = snapshot.vouchers.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    pub async fn trial_balance(&self, options: &ReportOptions) -> BooksResult<TrialBalance> {
        Ok(self.snapshot().await?.trial_balance(options))
    }

    pub async fn financial_statements(
        &self,
        options: &ReportOptions,
    ) -> BooksResult<FinancialStatements> {
        Ok(self.snapshot().await?.financial_statements(options))
    }

    pub async fn tax_report(
        &self,
        voucher_types: &[VoucherType],
        options: &ReportOptions,
    ) -> BooksResult<TaxReport> {
        Ok(self.snapshot().await?.tax_report(voucher_types, options))
    }

    pub async fn ledger_statement(
        &self,
        ledger_id: &str,
        options: &ReportOptions,
    ) -> BooksResult<LedgerStatement> {
        self.snapshot()
            .await?
            .ledger_statement(ledger_id, options)
            .ok_or_else(|| BooksError::LedgerNotFound(ledger_id.to_string()))
    }

    /// Closing balance of one ledger
    pub async fn ledger_balance(
        &self,
        ledger_id: &str,
        options: &ReportOptions,
    ) -> BooksResult<Balance> {
        Ok(self.ledger_statement(ledger_id, options).await?.closing)
    }

    /// Set up a standard trading-business chart and return the created groups
    /// keyed by short name
    pub async fn setup_standard_chart(&mut self) -> BooksResult<HashMap<String, LedgerGroup>> {
        let mut groups = HashMap::new();

        for (key, id, name, group_type, parent) in STANDARD_CHART {
            let group = self
                .create_group(
                    id.to_string(),
                    name.to_string(),
                    *group_type,
                    parent.map(str::to_string),
                )
                .await?;
            groups.insert(key.to_string(), group);
        }

        Ok(groups)
    }
}

type ChartRow = (
    &'static str,
    &'static str,
    &'static str,
    GroupType,
    Option<&'static str>,
);

/// Primary groups first so every parent exists before its children
const STANDARD_CHART: &[ChartRow] = &[
    ("capital", "G01", "Capital Account", GroupType::Capital, None),
    ("loans", "G02", "Loans (Liability)", GroupType::Loans, None),
    ("current_liabilities", "G03", "Current Liabilities", GroupType::CurrentLiabilities, None),
    ("fixed_assets", "G04", "Fixed Assets", GroupType::FixedAssets, None),
    ("current_assets", "G05", "Current Assets", GroupType::CurrentAssets, None),
    ("sales", "G06", "Sales Accounts", GroupType::Sales, None),
    ("purchase", "G07", "Purchase Accounts", GroupType::Purchase, None),
    ("direct_expenses", "G08", "Direct Expenses", GroupType::DirectExpenses, None),
    ("indirect_expenses", "G09", "Indirect Expenses", GroupType::IndirectExpenses, None),
    ("indirect_income", "G10", "Indirect Income", GroupType::IndirectIncome, None),
    ("opening_stock", "G11", "Opening Stock", GroupType::OpeningStock, None),
    ("closing_stock", "G12", "Closing Stock", GroupType::ClosingStock, None),
    ("cash", "G13", "Cash-in-Hand", GroupType::Cash, Some("G05")),
    ("bank", "G14", "Bank Accounts", GroupType::Bank, Some("G05")),
    ("sundry_debtors", "G15", "Sundry Debtors", GroupType::SundryDebtors, Some("G05")),
    ("sundry_creditors", "G16", "Sundry Creditors", GroupType::SundryCreditors, Some("G03")),
    ("duties_and_taxes", "G17", "Duties & Taxes", GroupType::DutiesAndTaxes, Some("G03")),
];
