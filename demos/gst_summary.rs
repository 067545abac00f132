//! GST calculation and voucher tax summary example

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;
use voucher_books::{
    summarize_vouchers, GstCalculation, GstCategory, GstRate, Money, ReportOptions, Voucher,
    VoucherEntryLine, VoucherType,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("🧾 Voucher Books - GST Summary Example\n");

    // 1. Standard rates
    println!("📊 Standard GST Rates by Category:");
    for category in [
        GstCategory::Essential,
        GstCategory::Reduced,
        GstCategory::Standard,
        GstCategory::Higher,
        GstCategory::Luxury,
    ] {
        println!("  {:?}: {}%", category, category.rate());
    }
    println!();

    // 2. Intra-state vs inter-state on the same base
    let base = Money::from_major(10_000);
    for (title, rate) in [
        ("🏢 Intra-state (CGST + SGST)", GstCategory::Higher.intra_state_rate()),
        ("🚚 Inter-state (IGST)", GstCategory::Higher.inter_state_rate()),
    ] {
        let calc = GstCalculation::calculate(base, rate)?;
        println!("{title}:");
        println!("  Base Amount: ₹{}", calc.base_amount);
        println!("  CGST:        ₹{}", calc.cgst_amount);
        println!("  SGST:        ₹{}", calc.sgst_amount);
        println!("  IGST:        ₹{}", calc.igst_amount);
        println!("  Total:       ₹{}\n", calc.total_amount);
    }

    // 3. Voucher summaries with discount and cess
    let date = NaiveDate::from_ymd_opt(2024, 8, 14).ok_or("invalid date")?;
    let mut invoice = Voucher::new("s1".into(), "S/101".into(), VoucherType::Sales, date);
    invoice.add_entry(
        VoucherEntryLine::credit("l1".into(), "sales".into(), Money::from_major(2_000))
            .with_item("phone".into())
            .with_gst(&GstRate::intra_state(BigDecimal::from(18)))
            .with_discount(Money::from_major(200)),
    );
    invoice.add_entry(
        VoucherEntryLine::credit("l2".into(), "sales".into(), Money::from_major(500))
            .with_item("aerated-drink".into())
            .with_gst(&GstRate::intra_state(BigDecimal::from(28)))
            .with_cess(BigDecimal::from(12)),
    );
    invoice.add_entry(VoucherEntryLine::debit("l3".into(), "party".into(), Money::from_major(2_500)));

    let report = summarize_vouchers(&[invoice], &[VoucherType::Sales], &ReportOptions::default());
    for summary in &report.summaries {
        println!("🧮 Voucher {} ({}):", summary.number, summary.date);
        for line in &summary.lines {
            println!(
                "  {:<14} taxable ₹{:>9} tax ₹{:>8}",
                line.item_id.as_deref().unwrap_or("-"),
                line.taxable_value,
                line.total_tax()
            );
        }
        println!("  Taxable value: ₹{}", summary.taxable_value);
        println!(
            "  CGST ₹{} SGST ₹{} IGST ₹{} Cess ₹{}",
            summary.cgst_amount, summary.sgst_amount, summary.igst_amount, summary.cess_amount
        );
        println!("  Net amount:    ₹{}\n", summary.net_amount);
    }

    println!("📑 Rate Slabs:");
    for slab in &report.rate_slabs {
        println!(
            "  {}%: {} line(s), taxable ₹{}, tax ₹{}",
            slab.gst_rate,
            slab.line_count,
            slab.taxable_value,
            slab.cgst_amount + slab.sgst_amount + slab.igst_amount + slab.cess_amount
        );
    }

    Ok(())
}
