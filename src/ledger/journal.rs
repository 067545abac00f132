//! Voucher journal: acceptance, numbering and reversal

use chrono::NaiveDate;
use std::collections::HashSet;

use crate::money::Money;
use crate::traits::*;
use crate::types::*;

type NumberKey = (VoucherType, Option<String>, String);

fn number_key(voucher: &Voucher) -> NumberKey {
    (
        voucher.voucher_type,
        voucher.series.clone(),
        voucher.number.clone(),
    )
}

/// Append-only sequence of accepted vouchers.
///
/// A voucher that fails validation never enters the journal, so nothing
/// downstream can see it. Posted vouchers are not edited; corrections go in as
/// reversal vouchers.
#[derive(Debug, Clone, Default)]
pub struct VoucherJournal {
    vouchers: Vec<Voucher>,
    ids: HashSet<String>,
    numbers: HashSet<NumberKey>,
}

impl VoucherJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the id and number indexes over vouchers that were accepted
    /// earlier, possibly by a custom validator. Nothing is re-validated.
    pub fn index_only(vouchers: Vec<Voucher>) -> Self {
        let ids = vouchers.iter().map(|v| v.id.clone()).collect();
        let numbers = vouchers.iter().map(number_key).collect();
        Self {
            vouchers,
            ids,
            numbers,
        }
    }

    /// Check a voucher against the validator and the journal's numbering
    pub fn check(
        &self,
        voucher: &Voucher,
        validator: &dyn VoucherValidator,
    ) -> Result<(), VoucherError> {
        validator.validate_voucher(voucher)?;

        if self.ids.contains(&voucher.id) {
            return Err(VoucherError::DuplicateId(voucher.id.clone()));
        }

        if self.numbers.contains(&number_key(voucher)) {
            return Err(VoucherError::DuplicateNumber {
                voucher_type: voucher.voucher_type,
                series: voucher.series.clone(),
                number: voucher.number.clone(),
            });
        }

        Ok(())
    }

    /// Accept a voucher using the default double-entry rules
    pub fn post(&mut self, voucher: Voucher) -> Result<&Voucher, VoucherError> {
        self.post_with(voucher, &DefaultVoucherValidator)
    }

    /// Accept a voucher using a custom validator
    pub fn post_with(
        &mut self,
        voucher: Voucher,
        validator: &dyn VoucherValidator,
    ) -> Result<&Voucher, VoucherError> {
        self.check(&voucher, validator)?;

        tracing::debug!(
            voucher_id = %voucher.id,
            number = %voucher.number,
            lines = voucher.entries.len(),
            "voucher accepted"
        );
        self.ids.insert(voucher.id.clone());
        self.numbers.insert(number_key(&voucher));
        self.vouchers.push(voucher);

        let last = self.vouchers.len() - 1;
        Ok(&self.vouchers[last])
    }

    /// Post the offsetting voucher for `original_id`
    pub fn reverse(
        &mut self,
        original_id: &str,
        id: String,
        number: String,
        date: NaiveDate,
    ) -> Result<&Voucher, VoucherError> {
        let reversal = self
            .get(original_id)
            .ok_or_else(|| VoucherError::NotFound(original_id.to_string()))?
            .reversal(id, number, date);
        self.post(reversal)
    }

    pub fn get(&self, voucher_id: &str) -> Option<&Voucher> {
        self.vouchers.iter().find(|v| v.id == voucher_id)
    }

    /// Vouchers in acceptance order
    pub fn vouchers(&self) -> &[Voucher] {
        &self.vouchers
    }

    pub fn len(&self) -> usize {
        self.vouchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vouchers.is_empty()
    }
}

/// Voucher builder for creating multi-line vouchers
#[derive(Debug)]
pub struct VoucherBuilder {
    voucher: Voucher,
}

impl VoucherBuilder {
    /// Create a new voucher builder
    pub fn new(id: String, number: String, voucher_type: VoucherType, date: NaiveDate) -> Self {
        Self {
            voucher: Voucher::new(id, number, voucher_type, date),
        }
    }

    /// Set the numbering series
    pub fn series(mut self, series: String) -> Self {
        self.voucher.series = Some(series);
        self
    }

    /// Set the reference number (bill number, cheque number, etc.)
    pub fn reference(mut self, reference_no: String) -> Self {
        self.voucher.reference_no = Some(reference_no);
        self
    }

    pub fn narration(mut self, narration: String) -> Self {
        self.voucher.narration = Some(narration);
        self
    }

    /// Add a debit line with a generated line id
    pub fn debit(mut self, ledger_id: String, amount: Money) -> Self {
        self.voucher
            .add_entry(VoucherEntryLine::debit(new_line_id(), ledger_id, amount));
        self
    }

    /// Add a credit line with a generated line id
    pub fn credit(mut self, ledger_id: String, amount: Money) -> Self {
        self.voucher
            .add_entry(VoucherEntryLine::credit(new_line_id(), ledger_id, amount));
        self
    }

    /// Add a prepared line
    pub fn line(mut self, line: VoucherEntryLine) -> Self {
        self.voucher.add_entry(line);
        self
    }

    /// Build the voucher, rejecting it if it does not balance
    pub fn build(self) -> Result<Voucher, VoucherError> {
        self.voucher.validate()?;
        Ok(self.voucher)
    }
}

/// Fresh identifier for a voucher line
pub fn new_line_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Common voucher patterns
pub mod patterns {
    use super::*;
    use crate::tax::gst::{GstError, GstRate};

    /// Ledgers receiving the tax components of a GST voucher
    #[derive(Debug, Clone)]
    pub struct TaxLedgers {
        pub cgst: String,
        pub sgst: String,
        pub igst: String,
        pub cess: Option<String>,
    }

    /// Parameters for a single-item GST sales or purchase voucher
    #[derive(Debug, Clone)]
    pub struct GstVoucherParams {
        pub id: String,
        pub number: String,
        pub date: NaiveDate,
        /// Customer or supplier ledger
        pub party_ledger_id: String,
        /// Sales or purchase ledger the item line posts to
        pub trade_ledger_id: String,
        pub item_id: String,
        pub amount: Money,
        pub rate: GstRate,
        pub cess_rate: Option<bigdecimal::BigDecimal>,
        pub tax_ledgers: TaxLedgers,
    }

    /// Errors from building a patterned voucher
    #[derive(Debug, thiserror::Error)]
    pub enum PatternError {
        #[error(transparent)]
        Gst(#[from] GstError),
        #[error(transparent)]
        Voucher(#[from] VoucherError),
    }

    /// Payment voucher (debit expense or party, credit cash or bank)
    pub fn payment(
        id: String,
        number: String,
        date: NaiveDate,
        debit_ledger_id: String,
        cash_or_bank_ledger_id: String,
        amount: Money,
    ) -> Result<Voucher, VoucherError> {
        VoucherBuilder::new(id, number, VoucherType::Payment, date)
            .debit(debit_ledger_id, amount)
            .credit(cash_or_bank_ledger_id, amount)
            .build()
    }

    /// Receipt voucher (debit cash or bank, credit income or party)
    pub fn receipt(
        id: String,
        number: String,
        date: NaiveDate,
        cash_or_bank_ledger_id: String,
        credit_ledger_id: String,
        amount: Money,
    ) -> Result<Voucher, VoucherError> {
        VoucherBuilder::new(id, number, VoucherType::Receipt, date)
            .debit(cash_or_bank_ledger_id, amount)
            .credit(credit_ledger_id, amount)
            .build()
    }

    /// Contra voucher moving funds between cash and bank ledgers
    pub fn contra(
        id: String,
        number: String,
        date: NaiveDate,
        to_ledger_id: String,
        from_ledger_id: String,
        amount: Money,
    ) -> Result<Voucher, VoucherError> {
        VoucherBuilder::new(id, number, VoucherType::Contra, date)
            .debit(to_ledger_id, amount)
            .credit(from_ledger_id, amount)
            .build()
    }

    /// Sales voucher: debit party with the gross, credit the item line and
    /// each non-zero output tax
    pub fn gst_sale(params: GstVoucherParams) -> Result<Voucher, PatternError> {
        gst_trade(params, VoucherType::Sales, EntryType::Credit)
    }

    /// Purchase voucher: debit the item line and each non-zero input tax,
    /// credit party with the gross
    pub fn gst_purchase(params: GstVoucherParams) -> Result<Voucher, PatternError> {
        gst_trade(params, VoucherType::Purchase, EntryType::Debit)
    }

    fn gst_trade(
        params: GstVoucherParams,
        voucher_type: VoucherType,
        trade_side: EntryType,
    ) -> Result<Voucher, PatternError> {
        params.rate.validate()?;

        let mut item_line = VoucherEntryLine::new(
            new_line_id(),
            params.trade_ledger_id,
            trade_side,
            params.amount,
        )
        .with_item(params.item_id)
        .with_gst(&params.rate);
        if let Some(cess_rate) = &params.cess_rate {
            item_line = item_line.with_cess(cess_rate.clone());
        }

        let component = |rate: &bigdecimal::BigDecimal| {
            params
                .amount
                .percent(rate)
                .ok_or_else(|| GstError::Calculation(format!("tax on {} overflows", params.amount)))
        };
        let mut taxes = vec![
            (params.tax_ledgers.cgst, component(&params.rate.cgst_rate)?),
            (params.tax_ledgers.sgst, component(&params.rate.sgst_rate)?),
            (params.tax_ledgers.igst, component(&params.rate.igst_rate)?),
        ];
        if let (Some(ledger), Some(rate)) = (params.tax_ledgers.cess, &params.cess_rate) {
            taxes.push((ledger, component(rate)?));
        }

        let gross = params.amount + taxes.iter().map(|(_, amount)| *amount).sum::<Money>();
        let mut builder =
            VoucherBuilder::new(params.id, params.number, voucher_type, params.date).line(item_line);
        for (ledger_id, amount) in taxes.into_iter().filter(|(_, a)| a.is_positive()) {
            builder = builder.line(VoucherEntryLine::new(
                new_line_id(),
                ledger_id,
                trade_side,
                amount,
            ));
        }
        builder = builder.line(VoucherEntryLine::new(
            new_line_id(),
            params.party_ledger_id,
            trade_side.opposite(),
            gross,
        ));

        Ok(builder.build()?)
    }
}
