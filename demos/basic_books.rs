//! Basic books usage example

use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;
use voucher_books::utils::MemoryStore;
use voucher_books::{patterns, Books, EntryType, Ledger, Money, ReportOptions, StatementLine};

fn print_side(title: &str, lines: &[StatementLine]) {
    println!("  {title}");
    for line in lines {
        println!("    {:<28} ₹{:>12}", line.label, line.amount);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("🧾 Voucher Books - Basic Books Example\n");

    let mut books = Books::new(MemoryStore::new());

    // 1. Set up a standard chart of ledger groups
    println!("📊 Setting up Chart of Accounts...");
    let groups = books.setup_standard_chart().await?;
    let mut names: Vec<_> = groups.values().map(|g| (g.id.clone(), g.name.clone())).collect();
    names.sort();
    for (id, name) in names {
        println!("  ✓ Created group: {id} - {name}");
    }
    println!();

    // 2. Ledgers with opening balances
    let date = |day| NaiveDate::from_ymd_opt(2024, 4, day).ok_or("invalid date");
    for ledger in [
        Ledger::new("capital".into(), "Owner's Capital".into(), groups["capital"].id.clone())
            .with_opening(Money::from_major(50_000), EntryType::Credit),
        Ledger::new("cash".into(), "Cash".into(), groups["cash"].id.clone())
            .with_opening(Money::from_major(50_000), EntryType::Debit),
        Ledger::new("stock-open".into(), "Opening Stock".into(), groups["opening_stock"].id.clone()),
        Ledger::new("stock-close".into(), "Closing Stock".into(), groups["closing_stock"].id.clone())
            .with_opening(Money::from_major(4_000), EntryType::Credit),
        Ledger::new("inventory".into(), "Stock-in-Hand".into(), groups["current_assets"].id.clone())
            .with_opening(Money::from_major(4_000), EntryType::Debit),
        Ledger::new("purchases".into(), "Purchases".into(), groups["purchase"].id.clone()),
        Ledger::new("sales".into(), "Sales".into(), groups["sales"].id.clone()),
        Ledger::new("rent".into(), "Rent".into(), groups["indirect_expenses"].id.clone()),
    ] {
        books.add_ledger(ledger).await?;
    }

    // 3. Post vouchers
    println!("💰 Posting Vouchers...\n");
    books
        .post_voucher(patterns::payment(
            "v1".into(),
            "P/1".into(),
            date(2)?,
            "purchases".into(),
            "cash".into(),
            Money::from_major(20_000),
        )?)
        .await?;
    println!("  ✓ Payment: purchases of ₹20,000");

    books
        .post_voucher(patterns::receipt(
            "v2".into(),
            "R/1".into(),
            date(10)?,
            "cash".into(),
            "sales".into(),
            Money::from_major(32_000),
        )?)
        .await?;
    println!("  ✓ Receipt: cash sales of ₹32,000");

    books
        .post_voucher(patterns::payment(
            "v3".into(),
            "P/2".into(),
            date(30)?,
            "rent".into(),
            "cash".into(),
            Money::from_major(5_000),
        )?)
        .await?;
    println!("  ✓ Payment: rent of ₹5,000\n");

    // 4. Reports
    let options = ReportOptions {
        fold_net_profit_into_capital: true,
        ..ReportOptions::default()
    };
    let statements = books.financial_statements(&options).await?;

    println!("📋 Trial Balance:");
    for entry in &statements.trial_balance.entries {
        println!(
            "  {:<20} {:>12} {:?}",
            entry.ledger_name, entry.closing.amount, entry.closing.side
        );
    }
    println!(
        "  Totals: Dr ₹{} / Cr ₹{} (balanced: {})\n",
        statements.trial_balance.total_debit,
        statements.trial_balance.total_credit,
        statements.trial_balance.is_balanced
    );

    println!("📈 Trading Account:");
    print_side("Dr", &statements.trading.debit_side);
    print_side("Cr", &statements.trading.credit_side);
    println!("  Gross result: ₹{} ({:?})\n", statements.trading.gross_profit, statements.trading.outcome);

    println!("📉 Profit & Loss Account:");
    print_side("Dr", &statements.profit_loss.debit_side);
    print_side("Cr", &statements.profit_loss.credit_side);
    println!("  Net result: ₹{} ({:?})\n", statements.profit_loss.net_profit, statements.profit_loss.outcome);

    println!("🏦 Balance Sheet:");
    print_side("Liabilities", &statements.balance_sheet.liabilities_side);
    print_side("Assets", &statements.balance_sheet.assets_side);
    println!("  Balanced: {}\n", statements.balance_sheet.is_balanced);

    println!("📒 Cash Ledger Statement:");
    let statement = books.ledger_statement("cash", &ReportOptions::default()).await?;
    println!("  Opening: ₹{} {:?}", statement.opening.amount, statement.opening.side);
    for row in &statement.rows {
        println!(
            "  {} {:<5} Dr {:>10} Cr {:>10} → ₹{} {:?}",
            row.date,
            row.voucher_number,
            row.debit.map(|m| m.to_string()).unwrap_or_default(),
            row.credit.map(|m| m.to_string()).unwrap_or_default(),
            row.running_balance.amount,
            row.running_balance.side
        );
    }

    Ok(())
}
