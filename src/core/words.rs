//! Amounts in words, Indian numbering system (thousand, lakh, crore).
//!
//! ```
//! use bijak::core::amount_in_words;
//!
//! assert_eq!(amount_in_words(0), "Zero");
//! assert_eq!(amount_in_words(100_000), "One Lakh");
//! assert_eq!(
//!     amount_in_words(1_234_567),
//!     "Twelve Lakh Thirty Four Thousand Five Hundred Sixty Seven"
//! );
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::error::BijakError;

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const CRORE: u64 = 10_000_000;
const LAKH: u64 = 100_000;
const THOUSAND: u64 = 1_000;

/// 0..=999 in words; empty for zero.
fn below_thousand(n: u64) -> String {
    debug_assert!(n < 1000);
    let hundreds = (n / 100) as usize;
    let rest = (n % 100) as usize;

    let mut parts: Vec<&str> = Vec::with_capacity(4);
    if hundreds > 0 {
        parts.push(ONES[hundreds]);
        parts.push("Hundred");
    }
    if rest >= 20 {
        parts.push(TENS[rest / 10]);
        if rest % 10 != 0 {
            parts.push(ONES[rest % 10]);
        }
    } else if rest > 0 {
        parts.push(ONES[rest]);
    }
    parts.join(" ")
}

/// Render a non-negative integer in Indian-numbering English words.
///
/// Groups are crore, lakh, thousand and the remainder. A crore count of a
/// thousand or more is itself rendered recursively ("One Lakh Crore"), so
/// the whole `u64` range is covered. Zero renders as "Zero".
pub fn amount_in_words(n: u64) -> String {
    if n == 0 {
        return "Zero".to_string();
    }

    let crore = n / CRORE;
    let lakh = (n % CRORE) / LAKH;
    let thousand = (n % LAKH) / THOUSAND;
    let remainder = n % THOUSAND;

    let mut parts: Vec<String> = Vec::with_capacity(4);
    if crore > 0 {
        let head = if crore < 1000 {
            below_thousand(crore)
        } else {
            amount_in_words(crore)
        };
        parts.push(format!("{head} Crore"));
    }
    if lakh > 0 {
        parts.push(format!("{} Lakh", below_thousand(lakh)));
    }
    if thousand > 0 {
        parts.push(format!("{} Thousand", below_thousand(thousand)));
    }
    if remainder > 0 {
        parts.push(below_thousand(remainder));
    }
    parts.join(" ")
}

fn rupees(total: Decimal) -> Result<u64, BijakError> {
    if total.is_sign_negative() && !total.is_zero() {
        return Err(BijakError::NegativeAmount(total));
    }
    total
        .floor()
        .to_u64()
        .ok_or_else(|| BijakError::Arithmetic(format!("amount {total} is too large for words")))
}

/// Words for the whole-rupee part of a total; paise are dropped.
///
/// Negative totals are rejected with [`BijakError::NegativeAmount`].
pub fn total_in_words(total: Decimal) -> Result<String, BijakError> {
    rupees(total).map(amount_in_words)
}

/// The legal "amount in words" line printed on the invoice,
/// e.g. "Indian Rupee Eleven Thousand Eight Hundred Only".
pub fn legal_amount_line(total: Decimal) -> Result<String, BijakError> {
    Ok(format!("Indian Rupee {} Only", total_in_words(total)?))
}

/// Rupees and paise in words, rounded half-up to the paisa:
/// "Indian Rupees Ten and Fifty Paise Only". The paise clause is left
/// out when the amount is whole.
pub fn rupees_and_paise_in_words(total: Decimal) -> Result<String, BijakError> {
    let rounded = total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let whole = rupees(rounded)?;
    let paise = ((rounded - rounded.floor()) * dec!(100))
        .to_u64()
        .unwrap_or(0);

    let rupee_words = amount_in_words(whole);
    if paise > 0 {
        Ok(format!(
            "Indian Rupees {rupee_words} and {} Paise Only",
            below_thousand(paise)
        ))
    } else {
        Ok(format!("Indian Rupees {rupee_words} Only"))
    }
}
