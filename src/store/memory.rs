use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use super::{InvoiceStore, InvoiceSummary};
use crate::core::{
    Client, Company, FinancialYear, Invoice, InvoiceSeries, InvoiceStatus, NumberingSource,
    StoreError, join_errors, latest_with_prefix, validate_invoice,
};

#[derive(Debug, Default)]
struct Tables {
    companies: Vec<Company>,
    clients: Vec<Client>,
    invoices: Vec<Invoice>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl Tables {
    /// Creation timestamps are strictly increasing so "latest" is well
    /// defined even for inserts within the same clock tick.
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(ts);
        ts
    }

    fn client_name(&self, id: &str) -> Option<String> {
        self.clients
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.clone())
    }
}

/// In-memory [`InvoiceStore`].
///
/// Clones share the same underlying tables. All operations are synchronous;
/// the lock is never held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invoice_count(&self) -> usize {
        self.tables.read().invoices.len()
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl NumberingSource for MemoryStore {
    type Error = StoreError;

    fn latest_invoice_number(&self, prefix: &str) -> Result<Option<String>, StoreError> {
        let tables = self.tables.read();
        Ok(latest_with_prefix(&tables.invoices, prefix).map(|inv| inv.invoice_number.clone()))
    }
}

impl InvoiceStore for MemoryStore {
    fn list_companies(&self) -> Result<Vec<Company>, StoreError> {
        Ok(self.tables.read().companies.clone())
    }

    fn get_company(&self, id: &str) -> Result<Company, StoreError> {
        self.tables
            .read()
            .companies
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("company", id))
    }

    fn create_company(&self, mut company: Company) -> Result<Company, StoreError> {
        let mut tables = self.tables.write();
        company.id = new_id();
        company.created_at = Some(tables.next_timestamp());
        tables.companies.push(company.clone());
        tracing::info!(company_id = %company.id, name = %company.name, "company created");
        Ok(company)
    }

    fn update_company(&self, id: &str, company: Company) -> Result<Company, StoreError> {
        let mut tables = self.tables.write();
        let slot = tables
            .companies
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::not_found("company", id))?;
        *slot = Company {
            id: slot.id.clone(),
            created_at: slot.created_at,
            ..company
        };
        Ok(slot.clone())
    }

    fn delete_company(&self, id: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        let before = tables.companies.len();
        tables.companies.retain(|c| c.id != id);
        if tables.companies.len() == before {
            return Err(StoreError::not_found("company", id));
        }
        tracing::info!(company_id = %id, "company deleted");
        Ok(())
    }

    fn list_clients(&self) -> Result<Vec<Client>, StoreError> {
        Ok(self.tables.read().clients.clone())
    }

    fn get_client(&self, id: &str) -> Result<Client, StoreError> {
        self.tables
            .read()
            .clients
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("client", id))
    }

    fn create_client(&self, mut client: Client) -> Result<Client, StoreError> {
        let mut tables = self.tables.write();
        client.id = new_id();
        client.created_at = Some(tables.next_timestamp());
        tables.clients.push(client.clone());
        tracing::info!(client_id = %client.id, name = %client.name, "client created");
        Ok(client)
    }

    fn update_client(&self, id: &str, client: Client) -> Result<Client, StoreError> {
        let mut tables = self.tables.write();
        let slot = tables
            .clients
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::not_found("client", id))?;
        *slot = Client {
            id: slot.id.clone(),
            created_at: slot.created_at,
            ..client
        };
        Ok(slot.clone())
    }

    fn delete_client(&self, id: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        let before = tables.clients.len();
        tables.clients.retain(|c| c.id != id);
        if tables.clients.len() == before {
            return Err(StoreError::not_found("client", id));
        }
        tracing::info!(client_id = %id, "client deleted");
        Ok(())
    }

    fn list_invoices(&self) -> Result<Vec<InvoiceSummary>, StoreError> {
        let tables = self.tables.read();
        let mut rows: Vec<InvoiceSummary> = tables
            .invoices
            .iter()
            .map(|inv| InvoiceSummary::from_invoice(inv, tables.client_name(&inv.client_id)))
            .collect();
        // stable sort keeps insertion order among equal timestamps; reverse for newest first
        rows.sort_by_key(|r| r.created_at);
        rows.reverse();
        Ok(rows)
    }

    fn get_invoice(&self, id: &str) -> Result<Invoice, StoreError> {
        self.tables
            .read()
            .invoices
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("invoice", id))
    }

    fn create_invoice(&self, mut invoice: Invoice) -> Result<Invoice, StoreError> {
        let errors = validate_invoice(&invoice);
        if !errors.is_empty() {
            return Err(StoreError::InvalidInvoice(join_errors(&errors)));
        }

        let mut tables = self.tables.write();

        if tables
            .invoices
            .iter()
            .any(|i| i.invoice_number == invoice.invoice_number)
        {
            return Err(StoreError::DuplicateInvoiceNumber(invoice.invoice_number));
        }
        if !tables.clients.iter().any(|c| c.id == invoice.client_id) {
            return Err(StoreError::not_found("client", invoice.client_id));
        }
        if let Some(company_id) = invoice.company_id.as_deref() {
            if !tables.companies.iter().any(|c| c.id == company_id) {
                return Err(StoreError::not_found("company", company_id));
            }
        }

        invoice.id = new_id();
        if invoice.created_at.is_none() {
            invoice.created_at = Some(tables.next_timestamp());
        }
        tables.invoices.push(invoice.clone());

        tracing::info!(
            invoice_id = %invoice.id,
            number = %invoice.invoice_number,
            total = %invoice.total,
            "invoice created"
        );
        Ok(invoice)
    }

    fn set_invoice_status(&self, id: &str, status: InvoiceStatus) -> Result<Invoice, StoreError> {
        let mut tables = self.tables.write();
        let invoice = tables
            .invoices
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| StoreError::not_found("invoice", id))?;

        match (invoice.status, status) {
            (from, to) if from == to => {}
            (InvoiceStatus::Draft, InvoiceStatus::Paid) => {
                invoice.status = status;
                tracing::info!(invoice_id = %id, number = %invoice.invoice_number, "invoice paid");
            }
            (from, to) => {
                return Err(StoreError::InvalidStatusTransition {
                    id: id.to_string(),
                    from,
                    to,
                });
            }
        }
        Ok(invoice.clone())
    }

    fn highest_sequence(
        &self,
        series: &InvoiceSeries,
        year: FinancialYear,
    ) -> Result<Option<u64>, StoreError> {
        let tables = self.tables.read();
        Ok(tables
            .invoices
            .iter()
            .filter_map(|inv| series.sequence_of(&inv.invoice_number, year))
            .max())
    }
}
