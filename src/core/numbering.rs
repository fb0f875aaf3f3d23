use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::error::BijakError;
use super::types::Invoice;

/// Indian financial year, April 1 to March 31.
///
/// Displays as `YYYY-YY`, e.g. "2024-25" for April 2024 to March 2025.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FinancialYear {
    start_year: i32,
}

impl FinancialYear {
    /// The financial year starting on April 1 of `start_year`.
    pub fn starting(start_year: i32) -> Self {
        Self { start_year }
    }

    /// The financial year `date` falls into.
    pub fn from_date(date: NaiveDate) -> Self {
        if date.month() >= 4 {
            Self::starting(date.year())
        } else {
            Self::starting(date.year() - 1)
        }
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn end_year(&self) -> i32 {
        self.start_year + 1
    }

    /// April 1 of the start year.
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.start_year, 4, 1)
    }

    /// March 31 of the end year.
    pub fn end_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.end_year(), 3, 31)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::from_date(date) == *self
    }

    pub fn next(&self) -> Self {
        Self::starting(self.start_year + 1)
    }
}

impl fmt::Display for FinancialYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{:02}",
            self.start_year,
            self.end_year().rem_euclid(100)
        )
    }
}

impl FromStr for FinancialYear {
    type Err = BijakError;

    /// Parse "2024-25"; the two-digit suffix must follow the start year.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BijakError::Numbering(format!("invalid financial year '{s}'"));
        let (start, end) = s.trim().split_once('-').ok_or_else(invalid)?;
        if start.len() != 4 || end.len() != 2 {
            return Err(invalid());
        }
        let start: i32 = start.parse().map_err(|_| invalid())?;
        let end: i32 = end.parse().map_err(|_| invalid())?;
        let fy = Self::starting(start);
        if fy.end_year().rem_euclid(100) != end {
            return Err(invalid());
        }
        Ok(fy)
    }
}

/// Today's date in India (UTC+05:30), for callers that need a "current
/// date" for numbering.
pub fn today_in_india() -> NaiveDate {
    let now = Utc::now();
    match FixedOffset::east_opt(5 * 3600 + 30 * 60) {
        Some(ist) => now.with_timezone(&ist).date_naive(),
        None => now.date_naive(),
    }
}

/// Invoice number series: `<prefix>/<financial year>/<sequence>`,
/// e.g. "DL/01/2024-25/7".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvoiceSeries {
    prefix: String,
}

impl Default for InvoiceSeries {
    fn default() -> Self {
        Self::new("DL/01")
    }
}

impl InvoiceSeries {
    /// Create a series; surrounding slashes on the prefix are ignored.
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix: String = prefix.into();
        Self {
            prefix: prefix.trim().trim_matches('/').to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Everything before the sequence, including the trailing slash:
    /// "DL/01/2024-25/".
    pub fn year_prefix(&self, year: FinancialYear) -> String {
        format!("{}/{}/", self.prefix, year)
    }

    /// Format a full invoice number.
    pub fn format(&self, year: FinancialYear, sequence: u64) -> String {
        format!("{}{}", self.year_prefix(year), sequence)
    }

    /// The number to use when no prior invoice can be consulted.
    pub fn fallback(&self, year: FinancialYear) -> String {
        self.format(year, 1)
    }

    /// Sequence of `number` if it belongs to this series and year and its
    /// trailing segment is a plain integer.
    pub fn sequence_of(&self, number: &str, year: FinancialYear) -> Option<u64> {
        number
            .strip_prefix(&self.year_prefix(year))?
            .rsplit('/')
            .next()?
            .parse()
            .ok()
    }

    /// Sequence that follows the most recent number in the year.
    ///
    /// No prior number, or one whose trailing segment is not numeric,
    /// restarts the sequence at 1.
    pub fn sequence_after(&self, latest: Option<&str>, year: FinancialYear) -> u64 {
        latest
            .and_then(|n| self.sequence_of(n, year))
            .map_or(1, |last| last.saturating_add(1))
    }
}

/// A persisted invoice as seen by the numbering service.
pub trait IssuedInvoice {
    fn invoice_number(&self) -> &str;
    fn created_at(&self) -> Option<DateTime<Utc>>;
}

impl IssuedInvoice for Invoice {
    fn invoice_number(&self) -> &str {
        &self.invoice_number
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl<T: IssuedInvoice + ?Sized> IssuedInvoice for &T {
    fn invoice_number(&self) -> &str {
        (**self).invoice_number()
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        (**self).created_at()
    }
}

/// Most recently created invoice whose number starts with `prefix`.
///
/// Ties on `created_at` go to the later element.
pub fn latest_with_prefix<'a, T: IssuedInvoice>(existing: &'a [T], prefix: &str) -> Option<&'a T> {
    existing
        .iter()
        .filter(|inv| inv.invoice_number().starts_with(prefix))
        .max_by_key(|inv| inv.created_at())
}

/// Generate the next invoice number for the financial year of `today`.
///
/// ```
/// use bijak::core::{InvoiceSeries, Invoice, next_invoice_number};
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
/// let none: [Invoice; 0] = [];
/// assert_eq!(
///     next_invoice_number(&InvoiceSeries::default(), &none, today),
///     "DL/01/2024-25/1"
/// );
/// ```
pub fn next_invoice_number<T: IssuedInvoice>(
    series: &InvoiceSeries,
    existing: &[T],
    today: NaiveDate,
) -> String {
    let year = FinancialYear::from_date(today);
    let latest = latest_with_prefix(existing, &series.year_prefix(year));
    let sequence = series.sequence_after(latest.map(|inv| inv.invoice_number()), year);
    series.format(year, sequence)
}

/// Anything that can report the most recent invoice number starting with a
/// prefix, such as a store or a slice of loaded invoices.
pub trait NumberingSource {
    type Error: fmt::Display;

    fn latest_invoice_number(&self, prefix: &str) -> Result<Option<String>, Self::Error>;
}

impl<T: IssuedInvoice> NumberingSource for [T] {
    type Error = Infallible;

    fn latest_invoice_number(&self, prefix: &str) -> Result<Option<String>, Self::Error> {
        Ok(latest_with_prefix(self, prefix).map(|inv| inv.invoice_number().to_string()))
    }
}

/// Outcome of number generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedNumber {
    pub number: String,
    /// True when the source failed and the deterministic fallback was used.
    pub degraded: bool,
}

/// Ask `source` for the next number in `series`.
pub fn number_from_source<S: NumberingSource + ?Sized>(
    source: &S,
    series: &InvoiceSeries,
    today: NaiveDate,
) -> Result<String, S::Error> {
    let year = FinancialYear::from_date(today);
    let latest = source.latest_invoice_number(&series.year_prefix(year))?;
    Ok(series.format(year, series.sequence_after(latest.as_deref(), year)))
}

/// Like [`number_from_source`], but never fails: if the source errors the
/// first number of the year is returned and the result is flagged
/// `degraded`. The failure is logged.
pub fn number_or_fallback<S: NumberingSource + ?Sized>(
    source: &S,
    series: &InvoiceSeries,
    today: NaiveDate,
) -> GeneratedNumber {
    match number_from_source(source, series, today) {
        Ok(number) => {
            tracing::debug!(%number, "generated invoice number");
            GeneratedNumber {
                number,
                degraded: false,
            }
        }
        Err(e) => {
            let number = series.fallback(FinancialYear::from_date(today));
            tracing::warn!(error = %e, %number, "invoice numbering unavailable, using fallback number");
            GeneratedNumber {
                number,
                degraded: true,
            }
        }
    }
}

/// Sequential invoice number generator for one series.
///
/// Tracks the current financial year and the next sequence, and resets
/// to 1 when a date in a later financial year comes along.
#[derive(Debug, Clone)]
pub struct InvoiceNumberSequence {
    series: InvoiceSeries,
    year: FinancialYear,
    next_number: u64,
}

impl InvoiceNumberSequence {
    /// Create a sequence starting at 1.
    pub fn new(series: InvoiceSeries, year: FinancialYear) -> Self {
        Self {
            series,
            year,
            next_number: 1,
        }
    }

    /// Create a sequence continuing from a given number.
    pub fn starting_at(series: InvoiceSeries, year: FinancialYear, next_number: u64) -> Self {
        Self {
            series,
            year,
            next_number,
        }
    }

    /// Continue after the invoices already issued.
    pub fn resume<T: IssuedInvoice>(series: InvoiceSeries, existing: &[T], today: NaiveDate) -> Self {
        let year = FinancialYear::from_date(today);
        let latest = latest_with_prefix(existing, &series.year_prefix(year));
        let next_number = series.sequence_after(latest.map(|inv| inv.invoice_number()), year);
        Self {
            series,
            year,
            next_number,
        }
    }

    /// Generate the next invoice number.
    pub fn next_number(&mut self) -> String {
        let number = self.series.format(self.year, self.next_number);
        self.next_number = self.next_number.saturating_add(1);
        number
    }

    /// Preview the next number without consuming it.
    pub fn peek(&self) -> String {
        self.series.format(self.year, self.next_number)
    }

    pub fn year(&self) -> FinancialYear {
        self.year
    }

    pub fn series(&self) -> &InvoiceSeries {
        &self.series
    }

    /// Get the next number that will be issued (without prefix/formatting).
    pub fn next_raw(&self) -> u64 {
        self.next_number
    }

    /// Skip ahead so the next number is at least `sequence`.
    pub fn skip_to(&mut self, sequence: u64) {
        self.next_number = self.next_number.max(sequence);
    }

    /// Advance to a new financial year, resetting the counter to 1.
    pub fn advance_year(&mut self, new_year: FinancialYear) -> Result<(), BijakError> {
        if new_year <= self.year {
            return Err(BijakError::Numbering(format!(
                "new financial year {new_year} must be later than current year {}",
                self.year
            )));
        }
        self.year = new_year;
        self.next_number = 1;
        Ok(())
    }

    /// Auto-advance if the given date is in a later financial year.
    /// Returns true if the year was advanced.
    pub fn auto_advance(&mut self, date: NaiveDate) -> bool {
        let year = FinancialYear::from_date(date);
        if year > self.year {
            self.year = year;
            self.next_number = 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn financial_year_boundary() {
        assert_eq!(FinancialYear::from_date(date(2024, 3, 31)).to_string(), "2023-24");
        assert_eq!(FinancialYear::from_date(date(2024, 4, 1)).to_string(), "2024-25");
        assert_eq!(FinancialYear::from_date(date(2025, 1, 15)).to_string(), "2024-25");
    }

    #[test]
    fn century_rollover() {
        assert_eq!(FinancialYear::starting(2099).to_string(), "2099-00");
        assert_eq!("2099-00".parse::<FinancialYear>().unwrap(), FinancialYear::starting(2099));
    }

    #[test]
    fn parse_financial_year() {
        assert_eq!("2024-25".parse::<FinancialYear>().unwrap().start_year(), 2024);
        assert!("2024-26".parse::<FinancialYear>().is_err());
        assert!("2024".parse::<FinancialYear>().is_err());
        assert!("24-25".parse::<FinancialYear>().is_err());
    }

    #[test]
    fn year_dates() {
        let fy = FinancialYear::starting(2024);
        assert_eq!(fy.start_date(), Some(date(2024, 4, 1)));
        assert_eq!(fy.end_date(), Some(date(2025, 3, 31)));
        assert!(fy.contains(date(2025, 3, 31)));
        assert!(!fy.contains(date(2025, 4, 1)));
        assert_eq!(fy.next(), FinancialYear::starting(2025));
    }

    #[test]
    fn series_prefix_normalized() {
        let series = InvoiceSeries::new("/MH/02/");
        assert_eq!(series.prefix(), "MH/02");
        assert_eq!(series.format(FinancialYear::starting(2024), 3), "MH/02/2024-25/3");
    }

    #[test]
    fn sequence_parsing() {
        let series = InvoiceSeries::default();
        let fy = FinancialYear::starting(2024);
        assert_eq!(series.sequence_of("DL/01/2024-25/7", fy), Some(7));
        assert_eq!(series.sequence_of("DL/01/2024-25/x7", fy), None);
        assert_eq!(series.sequence_of("DL/01/2023-24/7", fy), None);
        assert_eq!(series.sequence_after(Some("DL/01/2024-25/7"), fy), 8);
        assert_eq!(series.sequence_after(Some("DL/01/2024-25/abc"), fy), 1);
        assert_eq!(series.sequence_after(None, fy), 1);
    }

    #[test]
    fn slice_is_a_numbering_source() {
        let none: [Invoice; 0] = [];
        let n = number_from_source(&none[..], &InvoiceSeries::default(), date(2024, 5, 1));
        assert_eq!(n.unwrap(), "DL/01/2024-25/1");
    }

    struct Offline;

    impl NumberingSource for Offline {
        type Error = String;

        fn latest_invoice_number(&self, _prefix: &str) -> Result<Option<String>, String> {
            Err("connection refused".into())
        }
    }

    #[test]
    fn fallback_uses_financial_year() {
        let generated = number_or_fallback(&Offline, &InvoiceSeries::default(), date(2025, 2, 10));
        assert!(generated.degraded);
        assert_eq!(generated.number, "DL/01/2024-25/1");
    }

    #[test]
    fn sequential_numbering() {
        let mut seq = InvoiceNumberSequence::new(InvoiceSeries::default(), FinancialYear::starting(2024));
        assert_eq!(seq.next_number(), "DL/01/2024-25/1");
        assert_eq!(seq.next_number(), "DL/01/2024-25/2");
        assert_eq!(seq.peek(), "DL/01/2024-25/3");
        assert_eq!(seq.next_raw(), 3);
    }

    #[test]
    fn starting_at_and_skip() {
        let mut seq = InvoiceNumberSequence::starting_at(
            InvoiceSeries::default(),
            FinancialYear::starting(2024),
            42,
        );
        seq.skip_to(10);
        assert_eq!(seq.next_number(), "DL/01/2024-25/42");
        seq.skip_to(50);
        assert_eq!(seq.next_number(), "DL/01/2024-25/50");
    }

    #[test]
    fn year_advance_rejects_past() {
        let mut seq = InvoiceNumberSequence::new(InvoiceSeries::default(), FinancialYear::starting(2024));
        assert!(seq.advance_year(FinancialYear::starting(2023)).is_err());
        assert!(seq.advance_year(FinancialYear::starting(2024)).is_err());
        seq.advance_year(FinancialYear::starting(2025)).unwrap();
        assert_eq!(seq.next_number(), "DL/01/2025-26/1");
    }

    #[test]
    fn auto_advance_on_april_first() {
        let mut seq = InvoiceNumberSequence::new(InvoiceSeries::default(), FinancialYear::starting(2024));
        seq.next_number();

        // Still the same financial year in March
        assert!(!seq.auto_advance(date(2025, 3, 31)));
        assert_eq!(seq.next_number(), "DL/01/2024-25/2");

        assert!(seq.auto_advance(date(2025, 4, 1)));
        assert_eq!(seq.next_number(), "DL/01/2025-26/1");
    }
}
