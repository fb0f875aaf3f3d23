use bijak::core::*;
use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

// Amounts in paise and rates in hundredths of a percent keep the
// generated values on realistic scales.
fn arb_line() -> impl Strategy<Value = LineItem> {
    (
        0i64..10_000,
        0i64..10_000_000,
        0i64..1_500,
        0i64..1_500,
        proptest::option::of(0i64..3_000),
    )
        .prop_map(|(qty, rate, cgst, sgst, igst)| LineItem {
            description: "Item".into(),
            quantity: Decimal::new(qty, 2),
            rate: Decimal::new(rate, 2),
            cgst_percent: Decimal::new(cgst, 2),
            sgst_percent: Decimal::new(sgst, 2),
            igst_percent: igst.map(|r| Decimal::new(r, 2)),
            ..LineItem::default()
        })
}

fn arb_lines() -> impl Strategy<Value = Vec<LineItem>> {
    proptest::collection::vec(arb_line(), 1..20)
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=366).prop_filter_map("valid ordinal", |(y, d)| {
        NaiveDate::from_yo_opt(y, d)
    })
}

proptest! {
    #[test]
    fn intra_state_has_no_igst(items in arb_lines()) {
        let t = compute_totals(TaxMode::IntraState, &items);
        prop_assert_eq!(t.igst, Decimal::ZERO);
        prop_assert_eq!(t.total, t.subtotal + t.cgst + t.sgst);
    }

    #[test]
    fn inter_state_has_no_split_tax(items in arb_lines()) {
        let t = compute_totals(TaxMode::InterState, &items);
        prop_assert_eq!(t.cgst, Decimal::ZERO);
        prop_assert_eq!(t.sgst, Decimal::ZERO);
        prop_assert_eq!(t.total, t.subtotal + t.igst);
    }

    #[test]
    fn line_amount_is_quantity_times_rate(item in arb_line()) {
        prop_assert_eq!(line_amount(&item), item.quantity * item.rate);
    }

    #[test]
    fn subtotal_independent_of_mode(items in arb_lines()) {
        let intra = compute_totals(TaxMode::IntraState, &items);
        let inter = compute_totals(TaxMode::InterState, &items);
        prop_assert_eq!(intra.subtotal, inter.subtotal);
        let sum: Decimal = intra.lines.iter().map(|l| l.amount).sum();
        prop_assert_eq!(intra.subtotal, sum);
    }

    #[test]
    fn totals_never_negative(items in arb_lines()) {
        for mode in [TaxMode::IntraState, TaxMode::InterState] {
            let t = compute_totals(mode, &items);
            prop_assert!(t.total >= Decimal::ZERO);
            prop_assert!(t.total >= t.subtotal);
        }
    }

    #[test]
    fn words_are_well_formed(n in any::<u64>()) {
        let words = amount_in_words(n);
        prop_assert!(!words.is_empty());
        prop_assert!(!words.contains("  "));
        prop_assert_eq!(words.trim(), words.as_str());
    }

    #[test]
    fn financial_year_contains_date(date in arb_date()) {
        let fy = FinancialYear::from_date(date);
        prop_assert!(fy.contains(date));
        prop_assert!(fy.start_date().unwrap() <= date);
        prop_assert!(date <= fy.end_date().unwrap());
        prop_assert_eq!(fy.end_year(), fy.start_year() + 1);
        if date.month() >= 4 {
            prop_assert_eq!(fy.start_year(), date.year());
        } else {
            prop_assert_eq!(fy.start_year(), date.year() - 1);
        }
    }

    #[test]
    fn next_sequence_follows_latest(seq in 1u64..1_000_000, date in arb_date()) {
        let series = InvoiceSeries::default();
        let fy = FinancialYear::from_date(date);
        let latest = series.format(fy, seq);
        prop_assert_eq!(series.sequence_of(&latest, fy), Some(seq));
        prop_assert_eq!(series.sequence_after(Some(&latest), fy), seq + 1);
    }

    #[test]
    fn financial_year_parses_its_display(start in 1900i32..2900) {
        let fy = FinancialYear::starting(start);
        prop_assert_eq!(fy.to_string().parse::<FinancialYear>().unwrap(), fy);
    }
}
