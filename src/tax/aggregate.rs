//! Per-voucher, per-item GST split used by GST returns and sales registers

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::ReportOptions;
use crate::money::Money;
use crate::reports::{accepted_vouchers, accumulate};
use crate::types::*;

/// Tax split of one voucher line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxLine {
    pub line_id: String,
    pub ledger_id: Option<String>,
    pub item_id: Option<String>,
    pub amount: Money,
    pub discount: Money,
    /// `amount - discount`
    pub taxable_value: Money,
    pub cgst_rate: BigDecimal,
    pub sgst_rate: BigDecimal,
    pub igst_rate: BigDecimal,
    pub cess_rate: BigDecimal,
    pub cgst_amount: Money,
    pub sgst_amount: Money,
    pub igst_amount: Money,
    pub cess_amount: Money,
}

impl TaxLine {
    pub fn total_tax(&self) -> Money {
        self.cgst_amount + self.sgst_amount + self.igst_amount + self.cess_amount
    }

    /// Combined GST rate (CGST + SGST + IGST), cess excluded
    pub fn gst_rate(&self) -> BigDecimal {
        (&self.cgst_rate + &self.sgst_rate + &self.igst_rate).normalized()
    }
}

/// GST summary of one voucher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoucherTaxSummary {
    pub voucher_id: String,
    pub number: String,
    pub voucher_type: VoucherType,
    pub date: NaiveDate,
    pub lines: Vec<TaxLine>,
    pub taxable_value: Money,
    pub cgst_amount: Money,
    pub sgst_amount: Money,
    pub igst_amount: Money,
    pub cess_amount: Money,
    pub total_tax: Money,
    /// `taxable_value + cgst + sgst + igst + cess`
    pub net_amount: Money,
}

/// Totals for every line taxed at one combined GST rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSlabSummary {
    pub gst_rate: BigDecimal,
    pub line_count: usize,
    pub taxable_value: Money,
    pub cgst_amount: Money,
    pub sgst_amount: Money,
    pub igst_amount: Money,
    pub cess_amount: Money,
}

/// GST summaries for a voucher set with any excluded lines reported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxReport {
    pub summaries: Vec<VoucherTaxSummary>,
    pub rate_slabs: Vec<RateSlabSummary>,
    pub warnings: Vec<EngineWarning>,
}

/// A line takes part in the tax split when it names an item or carries a rate
fn is_tax_line(line: &VoucherEntryLine) -> bool {
    line.item_id.is_some() || line.has_tax_fields()
}

fn rate_or_zero(
    voucher: &Voucher,
    line: &VoucherEntryLine,
    rate: &Option<BigDecimal>,
) -> Result<BigDecimal, EngineWarning> {
    let rate = rate.clone().unwrap_or_else(|| BigDecimal::from(0));
    if rate < BigDecimal::from(0) {
        return Err(EngineWarning::InvalidTaxRate {
            voucher_id: voucher.id.clone(),
            line_id: line.id.clone(),
            rate,
        });
    }
    Ok(rate)
}

/// Split one line into its tax components.
///
/// Each component is charged on the line amount. CGST/SGST and IGST on the same
/// line are both honored and summed.
pub fn split_line(voucher: &Voucher, line: &VoucherEntryLine) -> Result<TaxLine, EngineWarning> {
    let cgst_rate = rate_or_zero(voucher, line, &line.cgst_rate)?;
    let sgst_rate = rate_or_zero(voucher, line, &line.sgst_rate)?;
    let igst_rate = rate_or_zero(voucher, line, &line.igst_rate)?;
    let cess_rate = rate_or_zero(voucher, line, &line.cess_rate)?;

    let charge = |rate: &BigDecimal| {
        line.amount
            .percent(rate)
            .ok_or_else(|| EngineWarning::TaxOutOfRange {
                voucher_id: voucher.id.clone(),
                line_id: line.id.clone(),
            })
    };
    let cgst_amount = charge(&cgst_rate)?;
    let sgst_amount = charge(&sgst_rate)?;
    let igst_amount = charge(&igst_rate)?;
    let cess_amount = charge(&cess_rate)?;

    let discount = line.discount.unwrap_or(Money::ZERO);
    Ok(TaxLine {
        line_id: line.id.clone(),
        ledger_id: line.ledger_id.clone(),
        item_id: line.item_id.clone(),
        amount: line.amount,
        discount,
        taxable_value: line.amount - discount,
        cgst_rate,
        sgst_rate,
        igst_rate,
        cess_rate,
        cgst_amount,
        sgst_amount,
        igst_amount,
        cess_amount,
    })
}

/// Summarize one voucher. Returns `None` when it has no tax lines.
pub fn summarize_voucher(
    voucher: &Voucher,
    warnings: &mut Vec<EngineWarning>,
) -> Option<VoucherTaxSummary> {
    let mut lines = Vec::new();
    for line in voucher.entries.iter().filter(|l| is_tax_line(l)) {
        match split_line(voucher, line) {
            Ok(tax_line) => lines.push(tax_line),
            Err(warning) => warning.push_into(warnings),
        }
    }
    if lines.is_empty() {
        return None;
    }

    let context = format!("voucher {} tax totals", voucher.id);
    let mut sum = |column: fn(&TaxLine) -> Money| {
        let mut total = Money::ZERO;
        for line in &lines {
            accumulate(&mut total, column(line), &context, warnings);
        }
        total
    };
    let taxable_value = sum(|l| l.taxable_value);
    let cgst_amount = sum(|l| l.cgst_amount);
    let sgst_amount = sum(|l| l.sgst_amount);
    let igst_amount = sum(|l| l.igst_amount);
    let cess_amount = sum(|l| l.cess_amount);

    let mut total_tax = Money::ZERO;
    for component in [cgst_amount, sgst_amount, igst_amount, cess_amount] {
        accumulate(&mut total_tax, component, &context, warnings);
    }
    let mut net_amount = taxable_value;
    accumulate(&mut net_amount, total_tax, &context, warnings);

    Some(VoucherTaxSummary {
        voucher_id: voucher.id.clone(),
        number: voucher.number.clone(),
        voucher_type: voucher.voucher_type,
        date: voucher.date,
        lines,
        taxable_value,
        cgst_amount,
        sgst_amount,
        igst_amount,
        cess_amount,
        total_tax,
        net_amount,
    })
}

/// Group summarized lines by combined GST rate, lowest rate first
pub fn rate_slabs(
    summaries: &[VoucherTaxSummary],
    warnings: &mut Vec<EngineWarning>,
) -> Vec<RateSlabSummary> {
    let mut slabs: BTreeMap<BigDecimal, RateSlabSummary> = BTreeMap::new();

    for line in summaries.iter().flat_map(|s| s.lines.iter()) {
        let rate = line.gst_rate();
        let slab = slabs.entry(rate.clone()).or_insert_with(|| RateSlabSummary {
            gst_rate: rate,
            line_count: 0,
            taxable_value: Money::ZERO,
            cgst_amount: Money::ZERO,
            sgst_amount: Money::ZERO,
            igst_amount: Money::ZERO,
            cess_amount: Money::ZERO,
        });
        let context = format!("{}% rate slab", slab.gst_rate);
        slab.line_count += 1;
        accumulate(&mut slab.taxable_value, line.taxable_value, &context, warnings);
        accumulate(&mut slab.cgst_amount, line.cgst_amount, &context, warnings);
        accumulate(&mut slab.sgst_amount, line.sgst_amount, &context, warnings);
        accumulate(&mut slab.igst_amount, line.igst_amount, &context, warnings);
        accumulate(&mut slab.cess_amount, line.cess_amount, &context, warnings);
    }

    slabs.into_values().collect()
}

/// Summarize every accepted voucher in the reporting window, in fold order.
///
/// Only vouchers of `voucher_types` are included when the filter is non-empty.
/// Vouchers that fail validation are skipped with a warning.
pub fn summarize_vouchers(
    vouchers: &[Voucher],
    voucher_types: &[VoucherType],
    options: &ReportOptions,
) -> TaxReport {
    let mut warnings = Vec::new();
    let mut summaries = Vec::new();
    for voucher in accepted_vouchers(vouchers, options, &mut warnings) {
        if !voucher_types.is_empty() && !voucher_types.contains(&voucher.voucher_type) {
            continue;
        }
        if let Some(summary) = summarize_voucher(voucher, &mut warnings) {
            summaries.push(summary);
        }
    }
    let rate_slabs = rate_slabs(&summaries, &mut warnings);

    TaxReport {
        summaries,
        rate_slabs,
        warnings,
    }
}
