use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount the Indian way: two decimals, rounded half-up, with
/// digits grouped 2-2-3 ("12,34,567.89").
///
/// ```
/// use bijak::render::format_inr;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_inr(dec!(1234567.891)), "12,34,567.89");
/// assert_eq!(format_inr(dec!(-500)), "-500.00");
/// ```
pub fn format_inr(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut out = String::with_capacity(plain.len() + int_part.len() / 2 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(&group_indian(int_part));
    out.push('.');
    out.push_str(frac_part);
    out
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();
    format!("{},{}", groups.join(","), last_three)
}

/// Percentage without trailing zeros: 9 → "9%", 2.50 → "2.5%".
pub fn format_percent(rate: Decimal) -> String {
    format!("{}%", rate.normalize())
}

/// Quantity with exactly two decimals.
pub fn format_quantity(quantity: Decimal) -> String {
    format!(
        "{:.2}",
        quantity.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Dates print as dd/mm/yyyy.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Download name for an invoice PDF: every run of characters other than
/// letters, digits, `_` and `-` becomes a single `-`.
///
/// ```
/// assert_eq!(bijak::render::pdf_file_name("DL/01/2024-25/7"), "invoice-DL-01-2024-25-7.pdf");
/// ```
pub fn pdf_file_name(invoice_number: &str) -> String {
    let mut safe = String::with_capacity(invoice_number.len());
    let mut in_run = false;
    for c in invoice_number.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            safe.push(c);
            in_run = false;
        } else if !in_run {
            safe.push('-');
            in_run = true;
        }
    }
    format!("invoice-{safe}.pdf")
}
