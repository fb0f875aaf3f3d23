//! Persistence collaborator and invoice issuing.
//!
//! [`InvoiceStore`] is the narrow interface the numbering and issuing flow
//! needs. [`MemoryStore`] is an in-process implementation; anything backed
//! by a database implements the same trait.

mod dashboard;
mod memory;

pub use dashboard::*;
pub use memory::*;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{
    BijakError, Client, Company, FinancialYear, Invoice, InvoiceSeries, InvoiceStatus,
    IssuedInvoice, NumberingSource, StoreError, TaxMode,
};

/// Most attempts [`issue_invoice`] makes before giving up on conflicts.
pub const MAX_ISSUE_ATTEMPTS: usize = 5;

/// Invoice list row with the client's name joined in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    pub id: String,
    pub invoice_number: String,
    pub client_id: String,
    /// `None` when the client has since been deleted.
    pub client_name: Option<String>,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(rename = "taxType")]
    pub tax_mode: TaxMode,
    pub total: Decimal,
    pub status: InvoiceStatus,
    pub created_at: Option<DateTime<Utc>>,
}

impl InvoiceSummary {
    pub fn from_invoice(invoice: &Invoice, client_name: Option<String>) -> Self {
        Self {
            id: invoice.id.clone(),
            invoice_number: invoice.invoice_number.clone(),
            client_id: invoice.client_id.clone(),
            client_name,
            invoice_date: invoice.invoice_date,
            due_date: invoice.due_date,
            tax_mode: invoice.tax_mode,
            total: invoice.total,
            status: invoice.status,
            created_at: invoice.created_at,
        }
    }
}

impl IssuedInvoice for InvoiceSummary {
    fn invoice_number(&self) -> &str {
        &self.invoice_number
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

/// Storage for companies, clients and invoices.
///
/// Ids are assigned by the store. `create_invoice` must reject a number
/// that is already taken with [`StoreError::DuplicateInvoiceNumber`], and
/// the check and the insert must be one atomic step. Invoices without
/// items or with totals that do not add up are rejected with
/// [`StoreError::InvalidInvoice`].
pub trait InvoiceStore: NumberingSource<Error = StoreError> + Send + Sync {
    fn list_companies(&self) -> Result<Vec<Company>, StoreError>;
    fn get_company(&self, id: &str) -> Result<Company, StoreError>;
    fn create_company(&self, company: Company) -> Result<Company, StoreError>;
    fn update_company(&self, id: &str, company: Company) -> Result<Company, StoreError>;
    fn delete_company(&self, id: &str) -> Result<(), StoreError>;

    fn list_clients(&self) -> Result<Vec<Client>, StoreError>;
    fn get_client(&self, id: &str) -> Result<Client, StoreError>;
    fn create_client(&self, client: Client) -> Result<Client, StoreError>;
    fn update_client(&self, id: &str, client: Client) -> Result<Client, StoreError>;
    fn delete_client(&self, id: &str) -> Result<(), StoreError>;

    /// Newest first.
    fn list_invoices(&self) -> Result<Vec<InvoiceSummary>, StoreError>;
    fn get_invoice(&self, id: &str) -> Result<Invoice, StoreError>;
    /// Persist an invoice with its items; returns the stored record.
    fn create_invoice(&self, invoice: Invoice) -> Result<Invoice, StoreError>;
    fn set_invoice_status(&self, id: &str, status: InvoiceStatus) -> Result<Invoice, StoreError>;

    /// Highest numeric sequence already used in `year` of `series`.
    ///
    /// Numbers whose trailing segment is not an integer are skipped.
    fn highest_sequence(
        &self,
        series: &InvoiceSeries,
        year: FinancialYear,
    ) -> Result<Option<u64>, StoreError> {
        Ok(self
            .list_invoices()?
            .iter()
            .filter_map(|inv| series.sequence_of(&inv.invoice_number, year))
            .max())
    }
}

/// Assign the next number in `series` and persist the invoice.
///
/// A number taken in between generation and insert is regenerated, at
/// most [`MAX_ISSUE_ATTEMPTS`] times. After a conflict the next attempt
/// starts past the highest sequence used in the year, so a latest number
/// with a non-numeric tail cannot pin generation onto taken numbers.
pub fn issue_invoice<S: InvoiceStore + ?Sized>(
    store: &S,
    mut invoice: Invoice,
    series: &InvoiceSeries,
    today: NaiveDate,
) -> Result<Invoice, BijakError> {
    let year = FinancialYear::from_date(today);
    let mut floor = 1u64;

    for attempt in 1..=MAX_ISSUE_ATTEMPTS {
        let latest = store.latest_invoice_number(&series.year_prefix(year))?;
        let sequence = series
            .sequence_after(latest.as_deref(), year)
            .max(floor);
        invoice.invoice_number = series.format(year, sequence);

        match store.create_invoice(invoice.clone()) {
            Ok(created) => {
                tracing::debug!(number = %created.invoice_number, attempt, "issued invoice");
                return Ok(created);
            }
            Err(e) if e.is_conflict() => {
                tracing::warn!(
                    number = %invoice.invoice_number,
                    attempt,
                    "invoice number taken, regenerating"
                );
                let highest = store.highest_sequence(series, year)?.unwrap_or(0);
                floor = sequence.max(highest).saturating_add(1);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(BijakError::Numbering(format!(
        "could not allocate a free invoice number in {year} after {MAX_ISSUE_ATTEMPTS} attempts"
    )))
}
