use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{InvoiceStore, InvoiceSummary};
use crate::core::{InvoiceStatus, StoreError};

/// How many invoices the dashboard lists.
pub const RECENT_INVOICES: usize = 5;

/// Headline figures for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_clients: usize,
    pub total_invoices: usize,
    /// Sum of all invoice totals, paid or not.
    pub total_revenue: Decimal,
    /// Sum of totals still in draft.
    pub pending_amount: Decimal,
    /// Newest first.
    pub recent_invoices: Vec<InvoiceSummary>,
}

pub fn summarize<S: InvoiceStore + ?Sized>(store: &S) -> Result<DashboardSummary, StoreError> {
    let clients = store.list_clients()?;
    let invoices = store.list_invoices()?;

    let total_revenue = invoices.iter().map(|i| i.total).sum();
    let pending_amount = invoices
        .iter()
        .filter(|i| i.status == InvoiceStatus::Draft)
        .map(|i| i.total)
        .sum();

    Ok(DashboardSummary {
        total_clients: clients.len(),
        total_invoices: invoices.len(),
        total_revenue,
        pending_amount,
        recent_invoices: invoices.into_iter().take(RECENT_INVOICES).collect(),
    })
}
