use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::states::{IndianState, state_by_code};

/// Issuing entity (the firm that raises invoices).
///
/// Field names serialize exactly as the persisted records do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    /// Opaque unique id; assigned by the store, empty before persisting.
    #[serde(default)]
    pub id: String,
    /// Legal name.
    pub name: String,
    /// Postal address (free text, may span lines).
    pub address: Option<String>,
    /// 15-character GST registration id.
    pub gstin: Option<String>,
    /// MSME (Udyam) registration number.
    pub msme_number: Option<String>,
    /// Set by the store on creation.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Company {
    /// Registration state derived from the GSTIN's state code, if any.
    pub fn gst_state(&self) -> Option<&'static IndianState> {
        let gstin = self.gstin.as_deref()?.trim();
        state_by_code(gstin.get(..2)?)
    }
}

/// Billing counterpart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Opaque unique id; assigned by the store, empty before persisting.
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub gstin: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    /// Free text, expected to be one of [`INDIAN_STATES`](super::INDIAN_STATES).
    pub state: Option<String>,
    pub pincode: Option<String>,
    /// Informational only; does not affect tax computation.
    pub gst_treatment: Option<GstTreatment>,
    /// Primary contact person.
    #[serde(flatten)]
    pub contact: Contact,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Primary contact of a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(rename = "primaryContactName")]
    pub name: Option<String>,
    #[serde(rename = "primaryContactEmail")]
    pub email: Option<String>,
    #[serde(rename = "primaryContactPhone")]
    pub phone: Option<String>,
}

/// GST registration category of a client.
///
/// Serialized values are part of the stored-record contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GstTreatment {
    /// Registered - Regular.
    Registered,
    /// Registered - Composition scheme.
    Composition,
    Unregistered,
    Consumer,
    /// Special economic zone.
    #[serde(rename = "SEZ")]
    Sez,
    Other,
}

impl GstTreatment {
    /// Stored code ("Registered", "SEZ", ...).
    pub fn code(&self) -> &'static str {
        match self {
            Self::Registered => "Registered",
            Self::Composition => "Composition",
            Self::Unregistered => "Unregistered",
            Self::Consumer => "Consumer",
            Self::Sez => "SEZ",
            Self::Other => "Other",
        }
    }

    /// Parse from the stored code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Registered" => Some(Self::Registered),
            "Composition" => Some(Self::Composition),
            "Unregistered" => Some(Self::Unregistered),
            "Consumer" => Some(Self::Consumer),
            "SEZ" => Some(Self::Sez),
            "Other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Human-readable label as shown on the client form.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Registered => "Registered - Regular",
            Self::Composition => "Registered - Composition",
            Self::Unregistered => "Unregistered",
            Self::Consumer => "Consumer",
            Self::Sez => "SEZ / Special",
            Self::Other => "Other",
        }
    }

    /// Whether the client holds a GST registration.
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered | Self::Composition | Self::Sez)
    }
}

/// Invoice line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Item name as printed in the line table.
    pub description: String,
    /// Longer description printed under the item name.
    pub detailed_description: Option<String>,
    /// HSN/SAC tariff classification (free text).
    pub hsn_sac: Option<String>,
    /// Quantity; negative values are treated as zero by the tax engine.
    pub quantity: Decimal,
    /// Price per unit; negative values are treated as zero by the tax engine.
    pub rate: Decimal,
    /// CGST rate in percent, applied intra-state.
    pub cgst_percent: Decimal,
    /// SGST rate in percent, applied intra-state.
    pub sgst_percent: Decimal,
    /// IGST rate override for inter-state supply; defaults to CGST + SGST.
    #[serde(default)]
    pub igst_percent: Option<Decimal>,
    /// quantity × rate; recorded by the builder for the persisted record.
    #[serde(default)]
    pub amount: Option<Decimal>,
}

impl Default for LineItem {
    /// A fresh form row: quantity 1, rate 0, CGST 9 %, SGST 9 %.
    fn default() -> Self {
        Self {
            description: String::new(),
            detailed_description: None,
            hsn_sac: None,
            quantity: Decimal::ONE,
            rate: Decimal::ZERO,
            cgst_percent: Decimal::from(9),
            sgst_percent: Decimal::from(9),
            igst_percent: None,
            amount: None,
        }
    }
}

/// Intra-state (CGST + SGST) or inter-state (IGST) supply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxMode {
    /// Supplier and recipient in the same state.
    #[default]
    #[serde(rename = "intra")]
    IntraState,
    /// Supply across state borders.
    #[serde(rename = "inter")]
    InterState,
}

impl TaxMode {
    pub fn is_inter_state(&self) -> bool {
        matches!(self, Self::InterState)
    }

    /// Stored `taxType` value.
    pub fn code(&self) -> &'static str {
        match self {
            Self::IntraState => "intra",
            Self::InterState => "inter",
        }
    }
}

/// Invoice lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Paid,
}

impl InvoiceStatus {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Paid => "paid",
        }
    }
}

/// GST tax invoice with its line items and computed amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Opaque unique id; assigned by the store, empty before persisting.
    #[serde(default)]
    pub id: String,
    /// Serial number, unique across all invoices (e.g. "DL/01/2024-25/7").
    pub invoice_number: String,
    pub client_id: String,
    /// Issuing company; `None` means the configured default firm.
    pub company_id: Option<String>,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    /// Free text, e.g. "Delhi (07)".
    pub place_of_supply: Option<String>,
    /// Ordered line items (at least one).
    pub items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
    #[serde(rename = "taxType")]
    pub tax_mode: TaxMode,
    /// subtotal + igst (inter-state) or subtotal + cgst + sgst (intra-state).
    pub total: Decimal,
    pub status: InvoiceStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Invoice {
    /// Total tax charged, independent of mode.
    pub fn tax_total(&self) -> Decimal {
        self.cgst + self.sgst + self.igst
    }
}

/// Per-line result of the tax computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineTotals {
    /// quantity × rate, after coercing invalid inputs to zero.
    pub amount: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
    /// IGST rate actually applied (zero for intra-state lines).
    pub igst_rate: Decimal,
}

impl LineTotals {
    /// Tax on this line for its mode.
    pub fn tax(&self) -> Decimal {
        self.cgst + self.sgst + self.igst
    }
}

/// Invoice-level result of the tax computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    pub tax_mode: TaxMode,
    /// One entry per input line, same order.
    pub lines: Vec<LineTotals>,
    pub subtotal: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
    pub total: Decimal,
}

impl InvoiceTotals {
    pub fn is_inter_state(&self) -> bool {
        self.tax_mode.is_inter_state()
    }

    pub fn tax_total(&self) -> Decimal {
        self.cgst + self.sgst + self.igst
    }
}
