use super::calculation::compute_totals;
use super::error::ValidationError;
use super::types::*;

/// Longest invoice number accepted.
pub const MAX_INVOICE_NUMBER_LEN: usize = 200;

/// Validate a GST tax invoice against the CGST Rules 46 particulars that
/// can be checked on the record itself.
/// Returns all validation errors found (not just the first).
pub fn validate_invoice(invoice: &Invoice) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    // Rule 46(b): consecutive serial number of letters, digits, '-' and '/'
    let number = invoice.invoice_number.trim();
    if number.is_empty() {
        errors.push(ValidationError::with_rule(
            "invoice_number",
            "invoice number must not be empty",
            "Rule 46(b)",
        ));
    } else if number.len() > MAX_INVOICE_NUMBER_LEN {
        errors.push(ValidationError::with_rule(
            "invoice_number",
            format!("invoice number cannot exceed {MAX_INVOICE_NUMBER_LEN} characters"),
            "Rule 46(b)",
        ));
    } else if let Some(c) = number
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '/'))
    {
        errors.push(ValidationError::with_rule(
            "invoice_number",
            format!("invoice number must not contain '{c}'"),
            "Rule 46(b)",
        ));
    }

    if invoice.due_date < invoice.invoice_date {
        errors.push(ValidationError::new(
            "due_date",
            format!(
                "due date {} is before invoice date {}",
                invoice.due_date, invoice.invoice_date
            ),
        ));
    }

    if invoice.tax_mode.is_inter_state()
        && invoice
            .place_of_supply
            .as_deref()
            .is_none_or(|p| p.trim().is_empty())
    {
        errors.push(ValidationError::with_rule(
            "place_of_supply",
            "inter-state invoice must state the place of supply",
            "Rule 46(n)",
        ));
    }

    if invoice.items.is_empty() {
        errors.push(ValidationError::with_rule(
            "items",
            "invoice must have at least one line item",
            "Rule 46(g)",
        ));
    }

    for (i, item) in invoice.items.iter().enumerate() {
        if item.description.trim().is_empty() {
            errors.push(ValidationError::with_rule(
                format!("items.{i}.description"),
                "line item must have a description",
                "Rule 46(g)",
            ));
        }
    }

    errors.extend(validate_arithmetic(invoice));

    errors
}

/// Check that stored amounts match a fresh computation over the items in
/// the invoice's tax mode.
pub fn validate_arithmetic(invoice: &Invoice) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let expected = compute_totals(invoice.tax_mode, &invoice.items);

    for (i, (item, line)) in invoice.items.iter().zip(&expected.lines).enumerate() {
        if let Some(amount) = item.amount {
            if amount != line.amount {
                errors.push(ValidationError::new(
                    format!("items.{i}.amount"),
                    format!(
                        "amount {amount} does not match quantity × rate {}",
                        line.amount
                    ),
                ));
            }
        }
    }

    let checks = [
        ("subtotal", invoice.subtotal, expected.subtotal),
        ("cgst", invoice.cgst, expected.cgst),
        ("sgst", invoice.sgst, expected.sgst),
        ("igst", invoice.igst, expected.igst),
        ("total", invoice.total, expected.total),
    ];
    for (field, actual, wanted) in checks {
        if actual != wanted {
            errors.push(ValidationError::new(
                field,
                format!(
                    "{field} {actual} does not match computed {wanted} for {} supply",
                    invoice.tax_mode.code()
                ),
            ));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ClientBuilder, FirmConfig, InvoiceBuilder, LineItemBuilder};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn invoice() -> Invoice {
        let client = ClientBuilder::new("Acme").state("Delhi").build();
        InvoiceBuilder::new(
            "DL/01/2024-25/1",
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )
        .firm(FirmConfig::default())
        .client(&client)
        .add_line(LineItemBuilder::new("Consulting", dec!(1), dec!(10000)).build())
        .build_unchecked()
        .unwrap()
    }

    #[test]
    fn valid_invoice_passes() {
        let errors = validate_invoice(&invoice());
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn bad_number_characters() {
        let mut inv = invoice();
        inv.invoice_number = "DL 01#7".into();
        let errors = validate_invoice(&inv);
        assert!(errors.iter().any(|e| e.rule.as_deref() == Some("Rule 46(b)")));
    }

    #[test]
    fn empty_items_and_description() {
        let mut inv = invoice();
        inv.items[0].description = "  ".into();
        let errors = validate_invoice(&inv);
        assert!(errors.iter().any(|e| e.field == "items.0.description"));

        inv.items.clear();
        inv.subtotal = dec!(0);
        inv.cgst = dec!(0);
        inv.sgst = dec!(0);
        inv.total = dec!(0);
        let errors = validate_invoice(&inv);
        assert!(errors.iter().any(|e| e.field == "items"));
    }

    #[test]
    fn due_date_before_invoice_date() {
        let mut inv = invoice();
        inv.due_date = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
        assert!(validate_invoice(&inv).iter().any(|e| e.field == "due_date"));
    }

    #[test]
    fn tampered_total_detected() {
        let mut inv = invoice();
        inv.total += dec!(0.01);
        let errors = validate_arithmetic(&inv);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "total");
    }

    #[test]
    fn wrong_mode_detected() {
        let mut inv = invoice();
        inv.tax_mode = TaxMode::InterState;
        let fields: Vec<_> = validate_arithmetic(&inv).into_iter().map(|e| e.field).collect();
        assert!(fields.contains(&"cgst".to_string()));
        assert!(fields.contains(&"igst".to_string()));
    }

    #[test]
    fn stale_line_amount_detected() {
        let mut inv = invoice();
        inv.items[0].amount = Some(dec!(1));
        assert!(
            validate_arithmetic(&inv)
                .iter()
                .any(|e| e.field == "items.0.amount")
        );
    }
}
