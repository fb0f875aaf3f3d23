//! GST computation: jurisdiction, per-line tax, invoice aggregation.
//!
//! Everything here is a pure function of its inputs. Totals are
//! re-derived from the lines on every call; there is no cached state to
//! keep in sync while an invoice is being edited.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::firm::FirmConfig;
use super::types::{Client, InvoiceTotals, LineItem, LineTotals, TaxMode};

/// Parse user-entered numeric text, degrading anything that is not a
/// non-negative decimal number to zero.
///
/// A malformed quantity or rate zeroes that one line instead of failing
/// the whole invoice.
///
/// ```
/// use bijak::core::parse_non_negative_or_zero;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(parse_non_negative_or_zero(" 2.5 "), dec!(2.5));
/// assert_eq!(parse_non_negative_or_zero("abc"), dec!(0));
/// assert_eq!(parse_non_negative_or_zero("-3"), dec!(0));
/// ```
pub fn parse_non_negative_or_zero(input: &str) -> Decimal {
    Decimal::from_str(input.trim())
        .map(non_negative_or_zero)
        .unwrap_or(Decimal::ZERO)
}

/// Clamp a typed value the same way: negative becomes zero.
pub fn non_negative_or_zero(value: Decimal) -> Decimal {
    if value.is_sign_negative() {
        Decimal::ZERO
    } else {
        value
    }
}

/// Decide intra- vs inter-state supply.
///
/// The client's state (lower-cased) must contain the firm's state name as a
/// substring to count as intra-state. A client without a recorded state is
/// treated as intra-state rather than charged cross-state tax on missing data.
pub fn determine_tax_mode(client_state: Option<&str>, firm_state: &str) -> TaxMode {
    let Some(client_state) = client_state.map(str::trim).filter(|s| !s.is_empty()) else {
        return TaxMode::IntraState;
    };
    let client_state = client_state.to_lowercase();
    let firm_state = firm_state.trim().to_lowercase();
    if client_state.contains(&firm_state) {
        TaxMode::IntraState
    } else {
        TaxMode::InterState
    }
}

/// Tax mode for a client relative to the configured firm.
pub fn tax_mode_for(client: &Client, firm: &FirmConfig) -> TaxMode {
    determine_tax_mode(client.state.as_deref(), &firm.state)
}

/// quantity × rate with invalid (negative) inputs taken as zero.
pub fn line_amount(item: &LineItem) -> Decimal {
    let quantity = non_negative_or_zero(item.quantity);
    let rate = non_negative_or_zero(item.rate);
    quantity.checked_mul(rate).unwrap_or_else(|| {
        tracing::debug!(
            description = %item.description,
            "line amount overflows, treating line as zero"
        );
        Decimal::ZERO
    })
}

/// IGST rate for an inter-state line: the explicit override, else CGST + SGST.
pub fn effective_igst_rate(item: &LineItem) -> Decimal {
    match item.igst_percent {
        Some(rate) => non_negative_or_zero(rate),
        None => non_negative_or_zero(item.cgst_percent) + non_negative_or_zero(item.sgst_percent),
    }
}

fn percent_of(amount: Decimal, percent: Decimal) -> Decimal {
    amount
        .checked_mul(non_negative_or_zero(percent))
        .map(|v| v / dec!(100))
        .unwrap_or(Decimal::ZERO)
}

/// Compute amount and tax for one line in the given mode.
pub fn compute_line(item: &LineItem, mode: TaxMode) -> LineTotals {
    let amount = line_amount(item);
    match mode {
        TaxMode::IntraState => LineTotals {
            amount,
            cgst: percent_of(amount, item.cgst_percent),
            sgst: percent_of(amount, item.sgst_percent),
            igst: Decimal::ZERO,
            igst_rate: Decimal::ZERO,
        },
        TaxMode::InterState => {
            let igst_rate = effective_igst_rate(item);
            LineTotals {
                amount,
                cgst: Decimal::ZERO,
                sgst: Decimal::ZERO,
                igst: percent_of(amount, igst_rate),
                igst_rate,
            }
        }
    }
}

/// Aggregate line results for a known tax mode.
pub fn compute_totals(mode: TaxMode, items: &[LineItem]) -> InvoiceTotals {
    let lines: Vec<LineTotals> = items.iter().map(|i| compute_line(i, mode)).collect();

    let mut subtotal = Decimal::ZERO;
    let mut cgst = Decimal::ZERO;
    let mut sgst = Decimal::ZERO;
    let mut igst = Decimal::ZERO;
    for line in &lines {
        subtotal = subtotal.saturating_add(line.amount);
        cgst = cgst.saturating_add(line.cgst);
        sgst = sgst.saturating_add(line.sgst);
        igst = igst.saturating_add(line.igst);
    }

    let total = match mode {
        TaxMode::InterState => subtotal.saturating_add(igst),
        TaxMode::IntraState => subtotal.saturating_add(cgst).saturating_add(sgst),
    };

    InvoiceTotals {
        tax_mode: mode,
        lines,
        subtotal,
        cgst,
        sgst,
        igst,
        total,
    }
}

/// Project a client and its draft lines onto the full totals view.
///
/// Call this on every edit; it never mutates its inputs.
pub fn compute_invoice_totals(
    client: &Client,
    items: &[LineItem],
    firm: &FirmConfig,
) -> InvoiceTotals {
    let totals = compute_totals(tax_mode_for(client, firm), items);
    tracing::debug!(
        client = %client.name,
        mode = totals.tax_mode.code(),
        lines = items.len(),
        total = %totals.total,
        "computed invoice totals"
    );
    totals
}
