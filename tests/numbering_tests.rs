use std::cell::Cell;

use bijak::core::*;
use chrono::{DateTime, NaiveDate, Utc};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Minimal persisted-invoice stand-in.
struct Issued {
    number: &'static str,
    created_at: i64,
}

impl IssuedInvoice for Issued {
    fn invoice_number(&self) -> &str {
        self.number
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created_at, 0)
    }
}

fn issued(number: &'static str, created_at: i64) -> Issued {
    Issued { number, created_at }
}

fn next(existing: &[Issued], today: NaiveDate) -> String {
    next_invoice_number(&InvoiceSeries::default(), existing, today)
}

#[test]
fn first_invoice_of_the_year() {
    assert_eq!(next(&[], date(2024, 6, 1)), "DL/01/2024-25/1");
}

#[test]
fn increments_latest() {
    let existing = [issued("DL/01/2024-25/7", 100)];
    assert_eq!(next(&existing, date(2024, 6, 1)), "DL/01/2024-25/8");
}

#[test]
fn latest_is_by_creation_time_not_by_sequence() {
    // /12 was created first, /3 was entered later by hand
    let existing = [
        issued("DL/01/2024-25/12", 100),
        issued("DL/01/2024-25/3", 200),
    ];
    assert_eq!(next(&existing, date(2024, 6, 1)), "DL/01/2024-25/4");
}

#[test]
fn non_numeric_tail_restarts() {
    let existing = [issued("DL/01/2024-25/draft", 100)];
    assert_eq!(next(&existing, date(2024, 6, 1)), "DL/01/2024-25/1");
    let existing = [issued("DL/01/2024-25/7a", 100)];
    assert_eq!(next(&existing, date(2024, 6, 1)), "DL/01/2024-25/1");
}

#[test]
fn other_years_and_series_ignored() {
    let existing = [
        issued("DL/01/2023-24/99", 300),
        issued("MH/02/2024-25/40", 400),
        issued("DL/01/2024-25/5", 100),
    ];
    assert_eq!(next(&existing, date(2024, 6, 1)), "DL/01/2024-25/6");
}

#[test]
fn new_financial_year_resets() {
    let existing = [issued("DL/01/2023-24/250", 100)];
    assert_eq!(next(&existing, date(2024, 3, 31)), "DL/01/2023-24/251");
    assert_eq!(next(&existing, date(2024, 4, 1)), "DL/01/2024-25/1");
}

#[test]
fn custom_series() {
    let series = InvoiceSeries::new("MH/02");
    let existing = [issued("MH/02/2024-25/9", 1)];
    assert_eq!(
        next_invoice_number(&series, &existing, date(2025, 1, 10)),
        "MH/02/2024-25/10"
    );
}

#[test]
fn firm_series_drives_prefix() {
    let firm = FirmConfig {
        invoice_series: "KA/03".into(),
        ..FirmConfig::default()
    };
    assert_eq!(
        next_invoice_number(&firm.series(), &[] as &[Issued], date(2024, 12, 1)),
        "KA/03/2024-25/1"
    );
}

#[test]
fn financial_year_display_and_parse() {
    let fy = FinancialYear::from_date(date(2024, 3, 31));
    assert_eq!(fy.to_string(), "2023-24");
    assert_eq!("2023-24".parse::<FinancialYear>().unwrap(), fy);
    assert_eq!(fy.next().to_string(), "2024-25");
}

// --- Numbering sources ---

struct FlakySource {
    fail: bool,
    calls: Cell<u32>,
}

impl NumberingSource for FlakySource {
    type Error = String;

    fn latest_invoice_number(&self, prefix: &str) -> Result<Option<String>, String> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            Err("database is locked".into())
        } else {
            Ok(Some(format!("{prefix}41")))
        }
    }
}

#[test]
fn source_answers() {
    let source = FlakySource {
        fail: false,
        calls: Cell::new(0),
    };
    let generated = number_or_fallback(&source, &InvoiceSeries::default(), date(2024, 8, 1));
    assert_eq!(generated.number, "DL/01/2024-25/42");
    assert!(!generated.degraded);
    assert_eq!(source.calls.get(), 1);
}

#[test]
fn source_failure_falls_back() {
    let source = FlakySource {
        fail: true,
        calls: Cell::new(0),
    };
    assert!(number_from_source(&source, &InvoiceSeries::default(), date(2024, 8, 1)).is_err());

    let generated = number_or_fallback(&source, &InvoiceSeries::default(), date(2024, 8, 1));
    assert_eq!(generated.number, "DL/01/2024-25/1");
    assert!(generated.degraded);
}

#[test]
fn fallback_in_january_uses_previous_start_year() {
    let source = FlakySource {
        fail: true,
        calls: Cell::new(0),
    };
    let generated = number_or_fallback(&source, &InvoiceSeries::default(), date(2025, 1, 5));
    assert_eq!(generated.number, "DL/01/2024-25/1");
}

// --- Stateful sequence ---

#[test]
fn sequence_resumes_from_existing() {
    let existing = [
        issued("DL/01/2024-25/1", 1),
        issued("DL/01/2024-25/2", 2),
    ];
    let mut seq = InvoiceNumberSequence::resume(InvoiceSeries::default(), &existing, date(2024, 9, 1));
    assert_eq!(seq.year(), FinancialYear::starting(2024));
    assert_eq!(seq.next_number(), "DL/01/2024-25/3");
    assert_eq!(seq.next_number(), "DL/01/2024-25/4");
}

#[test]
fn sequence_crosses_year_end() {
    let mut seq = InvoiceNumberSequence::starting_at(
        InvoiceSeries::default(),
        FinancialYear::starting(2024),
        120,
    );
    assert!(!seq.auto_advance(date(2025, 3, 31)));
    assert_eq!(seq.next_number(), "DL/01/2024-25/120");
    assert!(seq.auto_advance(date(2025, 4, 1)));
    assert_eq!(seq.peek(), "DL/01/2025-26/1");
}

#[test]
fn sequence_saturates_at_the_top() {
    let existing = [issued("DL/01/2024-25/18446744073709551615", 1)];
    let mut seq = InvoiceNumberSequence::resume(InvoiceSeries::default(), &existing, date(2024, 9, 1));
    assert_eq!(seq.next_raw(), u64::MAX);
    seq.next_number();
    assert_eq!(seq.next_number(), "DL/01/2024-25/18446744073709551615");
    assert_eq!(seq.next_raw(), u64::MAX);
}

#[test]
fn today_in_india_is_a_real_date() {
    let today = today_in_india();
    let fy = FinancialYear::from_date(today);
    assert!(fy.contains(today));
}
