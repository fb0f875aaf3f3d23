use serde::Serialize;

use super::format::{format_date, format_inr, format_percent, format_quantity, pdf_file_name};
use crate::core::{
    BijakError, Client, Company, FirmConfig, Invoice, TaxMode, compute_totals, legal_amount_line,
};

/// A label and its printed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub label: String,
    pub value: String,
}

impl Field {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Width of the item column in the text layout.
const ITEM_WIDTH: usize = 24;

/// Everything printed on a tax invoice, already formatted.
///
/// Built from a persisted invoice, the client it refers to and the firm
/// identity. The line table has IGST columns for inter-state supply and
/// CGST + SGST columns otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceView {
    pub title: String,
    pub firm_name: String,
    pub firm_address: Vec<String>,
    pub firm_gstin: Option<String>,
    pub firm_msme: Option<String>,
    pub meta: Vec<Field>,
    pub place_of_supply: Field,
    pub bill_to: Vec<String>,
    pub tax_mode: TaxMode,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Extra description lines printed under each row.
    pub row_details: Vec<Vec<String>>,
    pub totals: Vec<Field>,
    pub amount_in_words: String,
    pub notes: Option<String>,
    pub bank: Vec<Field>,
    pub terms: Vec<String>,
    pub signature: Vec<String>,
    pub file_name: String,
}

impl InvoiceView {
    pub fn build(
        invoice: &Invoice,
        client: &Client,
        company: Option<&Company>,
        firm: &FirmConfig,
    ) -> Result<Self, BijakError> {
        if invoice.client_id != client.id {
            return Err(BijakError::Render(format!(
                "client {} does not belong to invoice {}",
                client.id, invoice.invoice_number
            )));
        }
        let firm = match company {
            Some(company) => firm.with_company(company),
            None => firm.clone(),
        };

        let computed = compute_totals(invoice.tax_mode, &invoice.items);
        let inter = invoice.tax_mode.is_inter_state();

        let meta = vec![
            Field::new("Invoice Serial No", invoice.invoice_number.clone()),
            Field::new("Invoice Date", format_date(invoice.invoice_date)),
            Field::new("Terms", firm.payment_terms.clone()),
            Field::new("Due Date", format_date(invoice.due_date)),
        ];
        let place_of_supply = Field::new(
            "Place Of Supply",
            invoice
                .place_of_supply
                .clone()
                .unwrap_or_else(|| firm.place_of_supply()),
        );

        let mut columns = vec!["S.No", "Item & Description", "HSN/SAC", "Qty", "Rate"];
        if inter {
            columns.extend(["IGST %", "Amt"]);
        } else {
            columns.extend(["CGST %", "Amt", "SGST %", "Amt"]);
        }
        columns.push("Amount");

        let mut rows = Vec::with_capacity(invoice.items.len());
        let mut row_details = Vec::with_capacity(invoice.items.len());
        for (i, (item, line)) in invoice.items.iter().zip(&computed.lines).enumerate() {
            let mut row = vec![
                (i + 1).to_string(),
                non_blank(&item.description),
                item.hsn_sac.as_deref().map_or_else(|| "-".to_string(), non_blank),
                format_quantity(item.quantity),
                format_inr(item.rate),
            ];
            if inter {
                row.push(format_percent(line.igst_rate));
                row.push(format_inr(line.igst));
            } else {
                row.push(format_percent(item.cgst_percent));
                row.push(format_inr(line.cgst));
                row.push(format_percent(item.sgst_percent));
                row.push(format_inr(line.sgst));
            }
            row.push(format_inr(line.amount));
            rows.push(row);
            row_details.push(
                item.detailed_description
                    .as_deref()
                    .map(|d| d.lines().map(str::to_string).collect::<Vec<_>>())
                    .unwrap_or_default(),
            );
        }

        let mut totals = vec![Field::new("Sub Total", format_inr(invoice.subtotal))];
        if inter {
            totals.push(Field::new("IGST", format_inr(invoice.igst)));
        } else {
            totals.push(Field::new("CGST", format_inr(invoice.cgst)));
            totals.push(Field::new("SGST", format_inr(invoice.sgst)));
        }
        totals.push(Field::new("Total", format!("Rs. {}", format_inr(invoice.total))));
        totals.push(Field::new(
            "Balance Due",
            format!("Rs. {}", format_inr(invoice.total)),
        ));

        let bank = firm
            .bank
            .as_ref()
            .map(|b| {
                let mut fields = vec![Field::new("BANK NAME", b.bank_name.clone())];
                if let Some(branch) = &b.branch {
                    fields.push(Field::new("BRANCH", branch.clone()));
                }
                fields.push(Field::new("BANK ACCOUNT NO", b.account_number.clone()));
                fields.push(Field::new("IFSC CODE", b.ifsc.clone()));
                fields
            })
            .unwrap_or_default();

        Ok(Self {
            title: "TAX INVOICE".into(),
            firm_name: firm.name.clone(),
            firm_address: firm.address_lines.clone(),
            firm_gstin: firm.gstin.clone(),
            firm_msme: firm.msme_number.clone(),
            meta,
            place_of_supply,
            bill_to: bill_to(client),
            tax_mode: invoice.tax_mode,
            columns: columns.into_iter().map(String::from).collect(),
            rows,
            row_details,
            totals,
            amount_in_words: legal_amount_line(invoice.total)?,
            notes: firm.notes.clone(),
            bank,
            terms: firm.terms.clone(),
            signature: vec![
                format!("For {}", firm.name.to_uppercase()),
                "Authorised Signatory".into(),
            ],
            file_name: pdf_file_name(&invoice.invoice_number),
        })
    }

    /// Fixed-width text rendering, one entry per printed line.
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::new();

        out.push(self.firm_name.clone());
        out.extend(self.firm_address.iter().cloned());
        if let Some(gstin) = &self.firm_gstin {
            out.push(format!("GSTIN {gstin}"));
        }
        if let Some(msme) = &self.firm_msme {
            out.push(format!("MSME {msme}"));
        }
        out.push(String::new());
        out.push(self.title.clone());
        out.push(String::new());

        for field in &self.meta {
            out.push(format!("{:<18}: {}", field.label, field.value));
        }
        out.push(format!(
            "{:<18}: {}",
            self.place_of_supply.label, self.place_of_supply.value
        ));
        out.push(String::new());

        out.push("Bill To".into());
        out.extend(self.bill_to.iter().cloned());
        out.push(String::new());

        let widths = self.column_widths();
        let header = format_row(&self.columns, &widths);
        let rule = "-".repeat(header.len());
        out.push(rule.clone());
        out.push(header);
        out.push(rule.clone());
        for (row, details) in self.rows.iter().zip(&self.row_details) {
            let mut cells = row.clone();
            let mut description = wrap(&cells[1], ITEM_WIDTH);
            for detail in details {
                description.extend(wrap(detail, ITEM_WIDTH));
            }
            cells[1] = description.first().cloned().unwrap_or_default();
            out.push(format_row(&cells, &widths));
            for more in description.iter().skip(1) {
                let mut blank = vec![String::new(); cells.len()];
                blank[1] = more.clone();
                out.push(format_row(&blank, &widths).trim_end().to_string());
            }
        }
        out.push(rule);
        out.push(String::new());

        for field in &self.totals {
            out.push(format!("{:>40}  {:>20}", field.label, field.value));
        }
        out.push(String::new());

        out.push("Total In Words".into());
        out.push(self.amount_in_words.clone());

        if let Some(notes) = &self.notes {
            out.push(String::new());
            out.push("Notes".into());
            out.push(notes.clone());
        }

        if !self.bank.is_empty() {
            out.push(String::new());
            for field in &self.bank {
                out.push(format!("{} : {}", field.label, field.value));
            }
        }

        if !self.terms.is_empty() {
            out.push(String::new());
            out.push("Terms & Conditions".into());
            for (i, term) in self.terms.iter().enumerate() {
                out.push(format!("{}. {term}", i + 1));
            }
        }

        out.push(String::new());
        out.extend(self.signature.iter().cloned());
        out
    }

    pub fn to_text(&self) -> String {
        self.lines().join("\n")
    }

    fn column_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, title)| {
                if i == 1 {
                    return ITEM_WIDTH;
                }
                self.rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| c.chars().count())
                    .chain(std::iter::once(title.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

fn non_blank(s: &str) -> String {
    if s.trim().is_empty() {
        "-".into()
    } else {
        s.to_string()
    }
}

fn bill_to(client: &Client) -> Vec<String> {
    let mut lines = vec![client.name.clone()];
    if let Some(address) = client.address.as_deref().filter(|a| !a.trim().is_empty()) {
        lines.extend(address.lines().map(|l| l.trim().to_string()));
    }
    let locality: Vec<&str> = [&client.city, &client.state, &client.pincode]
        .into_iter()
        .filter_map(|v| v.as_deref())
        .filter(|v| !v.trim().is_empty())
        .collect();
    if !locality.is_empty() {
        lines.push(locality.join(", "));
    }
    lines.push("India".into());
    if let Some(gstin) = client.gstin.as_deref().filter(|g| !g.trim().is_empty()) {
        lines.push(format!("GSTIN {gstin}"));
    }
    lines
}

/// Text left-aligned in the first two columns, right-aligned elsewhere.
fn format_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, &w))| {
            if i <= 2 {
                format!("{cell:<w$}")
            } else {
                format!("{cell:>w$}")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Greedy word wrap; words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.drain(..width).collect());
        }
        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }
        if current.is_empty() {
            current = word;
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(&word);
        } else {
            lines.push(std::mem::replace(&mut current, word));
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_words() {
        assert_eq!(wrap("alpha beta gamma", 10), vec!["alpha beta", "gamma"]);
        assert_eq!(wrap("", 10), vec![""]);
        assert_eq!(wrap("abcdefghijkl", 5), vec!["abcde", "fghij", "kl"]);
    }

    #[test]
    fn row_alignment() {
        let cells = vec!["1".to_string(), "Item".into(), "-".into(), "9.00".into()];
        assert_eq!(format_row(&cells, &[3, 5, 2, 6]), "1   Item  -    9.00");
    }

    #[test]
    fn bill_to_block() {
        let client = crate::core::ClientBuilder::new("Acme")
            .city("Pune")
            .state("Maharashtra")
            .gstin("27AAPFU0939F1ZV")
            .build();
        assert_eq!(
            bill_to(&client),
            vec!["Acme", "Pune, Maharashtra", "India", "GSTIN 27AAPFU0939F1ZV"]
        );
    }
}
