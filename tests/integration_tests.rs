//! Integration tests for voucher-books

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use proptest::prelude::*;
use voucher_books::{
    patterns::{self, GstVoucherParams, TaxLedgers},
    utils::{EnhancedChartValidator, EnhancedVoucherValidator, MemoryStore},
    Balance, Books, BooksError, BooksSnapshot, BooksStore, EngineWarning, EntryType, GroupType,
    GstRate, Ledger, LedgerGroup, Money, Outcome, ReportOptions, Voucher, VoucherBuilder,
    VoucherEntryLine, VoucherError, VoucherType,
};

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

fn rupees(amount: i64) -> Money {
    Money::from_major(amount)
}

async fn books_with_ledgers(ledgers: Vec<Ledger>) -> Books<MemoryStore> {
    let mut books = Books::new(MemoryStore::new());
    books.setup_standard_chart().await.unwrap();
    for ledger in ledgers {
        books.add_ledger(ledger).await.unwrap();
    }
    books
}

fn trading_ledgers(closing_stock: i64) -> Vec<Ledger> {
    vec![
        Ledger::new("sales".into(), "Sales".into(), "G06".into())
            .with_opening(rupees(100_000), EntryType::Credit),
        Ledger::new("purchases".into(), "Purchases".into(), "G07".into())
            .with_opening(rupees(60_000), EntryType::Debit),
        Ledger::new("opening-stock".into(), "Opening Stock".into(), "G11".into())
            .with_opening(rupees(10_000), EntryType::Debit),
        Ledger::new("closing-stock".into(), "Closing Stock".into(), "G12".into())
            .with_opening(rupees(closing_stock), EntryType::Credit),
    ]
}

#[tokio::test]
async fn test_trading_account_from_opening_balances() {
    let books = books_with_ledgers(trading_ledgers(15_000)).await;
    let statements = books.financial_statements(&ReportOptions::default()).await.unwrap();

    assert_eq!(statements.trading.debit_total, rupees(70_000));
    assert_eq!(statements.trading.credit_total, rupees(115_000));
    assert_eq!(statements.trading.gross_profit, rupees(45_000));
    assert_eq!(statements.trading.outcome, Outcome::Profit);
    assert_eq!(statements.profit_loss.gross_profit_brought_forward, Some(rupees(45_000)));
    assert!(statements.warnings().is_empty());

    let books = books_with_ledgers(trading_ledgers(5_000)).await;
    let statements = books.financial_statements(&ReportOptions::default()).await.unwrap();
    assert_eq!(statements.trading.credit_total, rupees(105_000));
    assert_eq!(statements.trading.gross_profit, rupees(35_000));
}

#[tokio::test]
async fn test_profit_and_loss_carries_gross_profit() {
    let mut ledgers = trading_ledgers(15_000);
    ledgers.push(
        Ledger::new("interest".into(), "Interest Received".into(), "G10".into())
            .with_opening(rupees(2_000), EntryType::Credit),
    );
    ledgers.push(
        Ledger::new("rent".into(), "Rent".into(), "G09".into())
            .with_opening(rupees(10_000), EntryType::Debit),
    );
    let books = books_with_ledgers(ledgers).await;

    let pl = books.financial_statements(&ReportOptions::default()).await.unwrap().profit_loss;
    assert_eq!(pl.credit_total, rupees(47_000));
    assert_eq!(pl.debit_total, rupees(10_000));
    assert_eq!(pl.net_profit, rupees(37_000));
    assert_eq!(pl.gross_loss_brought_forward, None);
}

#[tokio::test]
async fn test_multi_line_voucher_moves_trial_balance() {
    let mut books = books_with_ledgers(vec![
        Ledger::new("cash".into(), "Cash".into(), "G13".into()),
        Ledger::new("sales".into(), "Sales".into(), "G06".into()),
        Ledger::new("bank".into(), "Bank".into(), "G14".into()),
    ])
    .await;

    let voucher = VoucherBuilder::new("v1".into(), "J/1".into(), VoucherType::Journal, date(4, 10))
        .debit("cash".into(), rupees(5_000))
        .credit("sales".into(), rupees(3_000))
        .credit("bank".into(), rupees(2_000))
        .build()
        .unwrap();
    books.post_voucher(voucher).await.unwrap();

    let tb = books.trial_balance(&ReportOptions::default()).await.unwrap();
    assert!(tb.is_balanced);
    assert_eq!(tb.total_debit, rupees(5_000));
    assert_eq!(
        tb.entry("cash").unwrap().closing,
        Balance { amount: rupees(5_000), side: EntryType::Debit }
    );
    assert_eq!(
        tb.entry("sales").unwrap().closing,
        Balance { amount: rupees(3_000), side: EntryType::Credit }
    );
    assert_eq!(
        tb.entry("bank").unwrap().closing,
        Balance { amount: rupees(2_000), side: EntryType::Credit }
    );
}

#[tokio::test]
async fn test_unbalanced_voucher_is_rejected_and_books_unchanged() {
    let mut books = books_with_ledgers(vec![
        Ledger::new("cash".into(), "Cash".into(), "G13".into()),
        Ledger::new("sales".into(), "Sales".into(), "G06".into()),
    ])
    .await;
    let before = books.trial_balance(&ReportOptions::default()).await.unwrap();

    let mut voucher = Voucher::new("v1".into(), "J/1".into(), VoucherType::Journal, date(4, 11));
    voucher.add_entry(VoucherEntryLine::debit("l1".into(), "cash".into(), rupees(5_000)));
    voucher.add_entry(VoucherEntryLine::credit("l2".into(), "sales".into(), rupees(4_000)));

    let err = books.post_voucher(voucher).await.unwrap_err();
    assert!(matches!(
        err,
        BooksError::Voucher(VoucherError::Unbalanced { ref debits, ref credits, .. })
            if *debits == rupees(5_000) && *credits == rupees(4_000)
    ));

    let after = books.trial_balance(&ReportOptions::default()).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_balance_sheet_strict_equality_and_fold() {
    let books = books_with_ledgers(vec![
        Ledger::new("capital".into(), "Owner's Capital".into(), "G01".into())
            .with_opening(rupees(150_000), EntryType::Credit),
        Ledger::new("loan".into(), "Bank Loan".into(), "G02".into())
            .with_opening(rupees(30_000), EntryType::Credit),
        Ledger::new("creditors".into(), "Creditors".into(), "G16".into())
            .with_opening(rupees(15_000), EntryType::Credit),
        Ledger::new("machinery".into(), "Machinery".into(), "G04".into())
            .with_opening(rupees(120_000), EntryType::Debit),
        Ledger::new("cash".into(), "Cash".into(), "G13".into())
            .with_opening(rupees(80_000), EntryType::Debit),
        Ledger::new("sales".into(), "Sales".into(), "G06".into())
            .with_opening(rupees(5_000), EntryType::Credit),
    ])
    .await;

    let statements = books.financial_statements(&ReportOptions::default()).await.unwrap();
    assert!(statements.trial_balance.is_balanced);
    assert_eq!(statements.profit_loss.net_profit, rupees(5_000));

    let sheet = &statements.balance_sheet;
    assert_eq!(sheet.total_assets, rupees(200_000));
    assert_eq!(sheet.total_liabilities, rupees(195_000));
    assert!(!sheet.is_balanced);

    let folded = ReportOptions {
        fold_net_profit_into_capital: true,
        ..ReportOptions::default()
    };
    let sheet = books.financial_statements(&folded).await.unwrap().balance_sheet;
    assert_eq!(sheet.total_liabilities, rupees(200_000));
    assert!(sheet.is_balanced);
}

#[tokio::test]
async fn test_gst_sale_flows_into_tax_report_and_statements() {
    let mut books = books_with_ledgers(vec![
        Ledger::new("acme".into(), "Acme Retail".into(), "G15".into()),
        Ledger::new("sales".into(), "Sales".into(), "G06".into()),
        Ledger::new("cgst".into(), "Output CGST".into(), "G17".into()),
        Ledger::new("sgst".into(), "Output SGST".into(), "G17".into()),
        Ledger::new("igst".into(), "Output IGST".into(), "G17".into()),
    ])
    .await;

    let sale = patterns::gst_sale(GstVoucherParams {
        id: "s1".into(),
        number: "S/001".into(),
        date: date(5, 2),
        party_ledger_id: "acme".into(),
        trade_ledger_id: "sales".into(),
        item_id: "widget".into(),
        amount: rupees(10_000),
        rate: GstRate::intra_state(BigDecimal::from(18)),
        cess_rate: None,
        tax_ledgers: TaxLedgers {
            cgst: "cgst".into(),
            sgst: "sgst".into(),
            igst: "igst".into(),
            cess: None,
        },
    })
    .unwrap();
    books.post_voucher(sale).await.unwrap();

    let report = books.tax_report(&[VoucherType::Sales], &ReportOptions::default()).await.unwrap();
    assert_eq!(report.summaries.len(), 1);
    let summary = &report.summaries[0];
    assert_eq!(summary.taxable_value, rupees(10_000));
    assert_eq!(summary.cgst_amount, rupees(900));
    assert_eq!(summary.sgst_amount, rupees(900));
    assert_eq!(summary.igst_amount, Money::ZERO);
    assert_eq!(summary.net_amount, rupees(11_800));
    assert!(report.warnings.is_empty());

    let purchases_only = books
        .tax_report(&[VoucherType::Purchase], &ReportOptions::default())
        .await
        .unwrap();
    assert!(purchases_only.summaries.is_empty());

    let statements = books.financial_statements(&ReportOptions::default()).await.unwrap();
    assert_eq!(statements.trading.sales, rupees(10_000));
    assert_eq!(statements.balance_sheet.current_assets, rupees(11_800));
    assert_eq!(statements.balance_sheet.current_liabilities, rupees(1_800));
}

#[tokio::test]
async fn test_as_of_cutoff_and_ledger_statement() {
    let mut books = books_with_ledgers(vec![
        Ledger::new("cash".into(), "Cash".into(), "G13".into())
            .with_opening(rupees(1_000), EntryType::Debit),
        Ledger::new("bank".into(), "Bank".into(), "G14".into()),
    ])
    .await;

    for (id, day, amount) in [("c1", 3, 400), ("c2", 1, 100), ("c3", 20, 250)] {
        let voucher = patterns::contra(
            id.into(),
            id.into(),
            date(6, day),
            "bank".into(),
            "cash".into(),
            rupees(amount),
        )
        .unwrap();
        books.post_voucher(voucher).await.unwrap();
    }

    let cutoff = ReportOptions::as_of(date(6, 10));
    let statement = books.ledger_statement("cash", &cutoff).await.unwrap();
    let ids: Vec<_> = statement.rows.iter().map(|r| r.voucher_id.as_str()).collect();
    assert_eq!(ids, vec!["c2", "c1"]);
    assert_eq!(statement.credit_total, rupees(500));
    assert_eq!(statement.closing, Balance { amount: rupees(500), side: EntryType::Debit });

    let full = books.ledger_balance("bank", &ReportOptions::default()).await.unwrap();
    assert_eq!(full, Balance { amount: rupees(750), side: EntryType::Debit });

    let missing = books.ledger_statement("nobody", &cutoff).await;
    assert!(matches!(missing, Err(BooksError::LedgerNotFound(_))));
}

#[tokio::test]
async fn test_enhanced_validators() {
    let mut books = Books::with_validators(
        MemoryStore::new(),
        Box::new(EnhancedChartValidator),
        Box::new(EnhancedVoucherValidator),
    );
    books.setup_standard_chart().await.unwrap();

    let bad_gstin = Ledger::new("acme".into(), "Acme".into(), "G15".into())
        .with_gst_number("not-a-gstin".into());
    assert!(books.add_ledger(bad_gstin).await.is_err());

    books
        .create_ledger("cash".into(), "Cash".into(), "G13".into())
        .await
        .unwrap();
    books
        .create_ledger("sales".into(), "Sales".into(), "G06".into())
        .await
        .unwrap();

    let mut blank_number = Voucher::new("v1".into(), " ".into(), VoucherType::Receipt, date(7, 1));
    blank_number.add_entry(VoucherEntryLine::debit("l1".into(), "cash".into(), rupees(10)));
    blank_number.add_entry(VoucherEntryLine::credit("l2".into(), "sales".into(), rupees(10)));
    let err = books.post_voucher(blank_number).await.unwrap_err();
    assert!(matches!(err, BooksError::Voucher(VoucherError::Invalid { .. })));
}

#[test]
fn test_snapshot_degrades_gracefully() {
    let mut dangling = Voucher::new("v1".into(), "1".into(), VoucherType::Journal, date(8, 1));
    dangling.add_entry(VoucherEntryLine::debit("l1".into(), "ghost".into(), rupees(10)));
    dangling.add_entry(VoucherEntryLine::credit("l2".into(), "cash".into(), rupees(10)));

    let snapshot = BooksSnapshot {
        groups: vec![
            LedgerGroup::new("ca".into(), "Current Assets".into(), GroupType::CurrentAssets, None),
            LedgerGroup::new("misc".into(), "Misc".into(), GroupType::Suspense, None),
        ],
        ledgers: vec![
            Ledger::new("cash".into(), "Cash".into(), "ca".into()),
            Ledger::new("limbo".into(), "Limbo".into(), "misc".into())
                .with_opening(rupees(50), EntryType::Debit),
        ],
        vouchers: vec![dangling],
    };

    let statements = snapshot.financial_statements(&ReportOptions::default());
    let warnings = statements.warnings();
    assert!(warnings.iter().any(|w| matches!(w, EngineWarning::DanglingLedger { ledger_id, .. } if ledger_id == "ghost")));
    assert!(warnings.iter().any(|w| matches!(w, EngineWarning::InvalidGroupType { ledger_id, .. } if ledger_id == "limbo")));

    // the surviving credit line still posts; the limbo ledger feeds no statement
    let cash = statements.trial_balance.entry("cash").unwrap();
    assert_eq!(cash.closing, Balance { amount: rupees(10), side: EntryType::Credit });
    assert_eq!(statements.balance_sheet.current_assets, rupees(-10));
}

#[test]
fn test_rejected_vouchers_feed_no_report() {
    let mut unbalanced = Voucher::new("s1".into(), "1".into(), VoucherType::Sales, date(8, 2));
    unbalanced.add_entry(VoucherEntryLine::debit("l1".into(), "party".into(), rupees(5000)));
    unbalanced.add_entry(
        VoucherEntryLine::credit("l2".into(), "sales".into(), rupees(4000))
            .with_item("widget".into())
            .with_gst(&GstRate::intra_state(BigDecimal::from(18))),
    );
    let mut negative = Voucher::new("j1".into(), "1".into(), VoucherType::Journal, date(8, 3));
    negative.add_entry(VoucherEntryLine::debit("l1".into(), "party".into(), rupees(-500)));
    negative.add_entry(VoucherEntryLine::credit("l2".into(), "sales".into(), rupees(-500)));

    let snapshot = BooksSnapshot {
        groups: vec![
            LedgerGroup::new("ca".into(), "Current Assets".into(), GroupType::CurrentAssets, None),
            LedgerGroup::new("sa".into(), "Sales".into(), GroupType::Sales, None),
        ],
        ledgers: vec![
            Ledger::new("party".into(), "Party".into(), "ca".into()),
            Ledger::new("sales".into(), "Sales".into(), "sa".into()),
        ],
        vouchers: vec![unbalanced, negative],
    };
    let options = ReportOptions::default();

    let report = snapshot.tax_report(&[], &options);
    assert!(report.summaries.is_empty());
    assert!(matches!(report.warnings[0], EngineWarning::UnbalancedVoucher { ref voucher_id, .. } if voucher_id == "s1"));
    assert!(matches!(report.warnings[1], EngineWarning::InvalidVoucher { ref voucher_id, .. } if voucher_id == "j1"));

    let statements = snapshot.financial_statements(&options);
    assert_eq!(statements.warnings().len(), 2);
    assert!(statements.trial_balance.total_debit.is_zero());
    assert!(statements.trading.sales.is_zero());

    let party = snapshot.ledger_statement("party", &options).unwrap();
    assert!(party.rows.is_empty());
}

#[test]
fn test_statements_serialize_to_json() {
    let snapshot = BooksSnapshot {
        groups: vec![LedgerGroup::new("sa".into(), "Sales".into(), GroupType::Sales, None)],
        ledgers: vec![Ledger::new("sales".into(), "Sales".into(), "sa".into())
            .with_opening(Money::from_minor(12_345), EntryType::Credit)],
        vouchers: Vec::new(),
    };

    let statements = snapshot.financial_statements(&ReportOptions::default());
    let json = serde_json::to_value(&statements).unwrap();
    assert_eq!(json["trading"]["sales"], serde_json::json!(12_345));
    assert_eq!(json["trading"]["outcome"], serde_json::json!("profit"));

    let round_trip: BooksSnapshot =
        serde_json::from_str(&serde_json::to_string(&snapshot).unwrap()).unwrap();
    assert_eq!(round_trip, snapshot);
}

#[tokio::test]
async fn test_store_snapshot_matches_books() {
    let store = MemoryStore::new();
    let mut books = Books::new(store.clone());
    books.setup_standard_chart().await.unwrap();
    let snapshot = store.snapshot().await.unwrap();
    assert_eq!(snapshot, books.snapshot().await.unwrap());
    assert_eq!(snapshot.groups.first().map(|g| g.id.as_str()), Some("G01"));
}

fn transfer_snapshot(pairs: &[(usize, usize, i64)], names: &[&str]) -> BooksSnapshot {
    let groups = vec![LedgerGroup::new(
        "ca".into(),
        "Current Assets".into(),
        GroupType::CurrentAssets,
        None,
    )];
    let ledgers = names
        .iter()
        .map(|n| Ledger::new(n.to_string(), n.to_uppercase(), "ca".into()))
        .collect();
    let vouchers = pairs
        .iter()
        .enumerate()
        .map(|(i, (from, to, amount))| {
            let mut voucher =
                Voucher::new(format!("v{i}"), format!("{i}"), VoucherType::Journal, date(9, 1));
            voucher.add_entry(VoucherEntryLine::debit(
                format!("v{i}-d"),
                names[*to].to_string(),
                Money::from_minor(*amount),
            ));
            voucher.add_entry(VoucherEntryLine::credit(
                format!("v{i}-c"),
                names[*from].to_string(),
                Money::from_minor(*amount),
            ));
            voucher
        })
        .collect();

    BooksSnapshot {
        groups,
        ledgers,
        vouchers,
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    })]

    /// Balanced vouchers over balanced openings always give a balanced trial balance
    #[test]
    fn trial_balance_conserves_debits_and_credits(
        pairs in prop::collection::vec((0usize..4, 0usize..4, 1i64..10_000_000), 1..20)
    ) {
        let snapshot = transfer_snapshot(&pairs, &["a", "b", "c", "d"]);
        let tb = snapshot.trial_balance(&ReportOptions::default());

        prop_assert!(tb.is_balanced);
        prop_assert_eq!(tb.total_debit, tb.total_credit);
        let net: Money = tb.entries.iter().map(|e| e.net()).sum();
        prop_assert_eq!(net, Money::ZERO);
        prop_assert!(tb.warnings.is_empty());
    }

    /// Deriving twice from the same snapshot gives identical output
    #[test]
    fn derivation_is_idempotent(
        pairs in prop::collection::vec((0usize..3, 0usize..3, 1i64..1_000_000), 0..10)
    ) {
        let snapshot = transfer_snapshot(&pairs, &["x", "y", "z"]);
        let options = ReportOptions::default();
        prop_assert_eq!(
            snapshot.financial_statements(&options),
            snapshot.financial_statements(&options)
        );
    }
}
