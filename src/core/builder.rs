use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::calculation::{compute_totals, determine_tax_mode, parse_non_negative_or_zero};
use super::error::{BijakError, join_errors};
use super::firm::FirmConfig;
use super::states::state_by_name;
use super::types::*;
use super::validation;

/// Builder for constructing valid GST invoices.
///
/// ```
/// use bijak::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let client = ClientBuilder::new("Acme Pvt Ltd").state("Maharashtra").build();
/// let invoice = InvoiceBuilder::new("DL/01/2024-25/1", NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
///     .client(&client)
///     .add_line(LineItemBuilder::new("Consulting", dec!(1), dec!(10000)).hsn_sac("998311").build())
///     .build()
///     .unwrap();
///
/// assert_eq!(invoice.tax_mode, TaxMode::InterState);
/// assert_eq!(invoice.igst, dec!(1800));
/// assert_eq!(invoice.place_of_supply.as_deref(), Some("Maharashtra (27)"));
/// ```
pub struct InvoiceBuilder {
    number: String,
    invoice_date: NaiveDate,
    due_date: Option<NaiveDate>,
    client: Option<Client>,
    company: Option<Company>,
    firm: FirmConfig,
    place_of_supply: Option<String>,
    status: InvoiceStatus,
    items: Vec<LineItem>,
}

impl InvoiceBuilder {
    pub fn new(number: impl Into<String>, invoice_date: NaiveDate) -> Self {
        Self {
            number: number.into(),
            invoice_date,
            due_date: None,
            client: None,
            company: None,
            firm: FirmConfig::default(),
            place_of_supply: None,
            status: InvoiceStatus::Draft,
            items: Vec::new(),
        }
    }

    /// Due date; defaults to the invoice date ("Due on Receipt").
    pub fn due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    pub fn client(mut self, client: &Client) -> Self {
        self.client = Some(client.clone());
        self
    }

    /// Issue on behalf of a stored company instead of the default firm.
    pub fn company(mut self, company: &Company) -> Self {
        self.company = Some(company.clone());
        self
    }

    pub fn firm(mut self, firm: FirmConfig) -> Self {
        self.firm = firm;
        self
    }

    pub fn place_of_supply(mut self, place: impl Into<String>) -> Self {
        self.place_of_supply = Some(place.into());
        self
    }

    pub fn status(mut self, status: InvoiceStatus) -> Self {
        self.status = status;
        self
    }

    pub fn add_line(mut self, line: LineItem) -> Self {
        self.items.push(line);
        self
    }

    pub fn lines(mut self, lines: impl IntoIterator<Item = LineItem>) -> Self {
        self.items.extend(lines);
        self
    }

    /// Build the invoice, calculating totals and running validation.
    /// Returns all validation errors (not just the first).
    pub fn build(self) -> Result<Invoice, BijakError> {
        let invoice = self.assemble()?;

        let errors = validation::validate_invoice(&invoice);
        if !errors.is_empty() {
            return Err(BijakError::Validation(join_errors(&errors)));
        }

        Ok(invoice)
    }

    /// Build without validation, for importing existing records.
    pub fn build_unchecked(self) -> Result<Invoice, BijakError> {
        self.assemble()
    }

    fn assemble(self) -> Result<Invoice, BijakError> {
        let client = self
            .client
            .ok_or_else(|| BijakError::Builder("client is required".into()))?;

        if self.items.is_empty() {
            return Err(BijakError::Builder(
                "at least one line item is required".into(),
            ));
        }
        if self.items.len() > 10_000 {
            return Err(BijakError::Builder(
                "invoice cannot have more than 10,000 line items".into(),
            ));
        }

        let firm = match &self.company {
            Some(company) => self.firm.with_company(company),
            None => self.firm,
        };

        let mode = determine_tax_mode(client.state.as_deref(), &firm.state);
        let totals = compute_totals(mode, &self.items);

        let mut items = self.items;
        for (item, line) in items.iter_mut().zip(&totals.lines) {
            item.amount = Some(line.amount);
        }

        let place_of_supply = self.place_of_supply.or_else(|| {
            let place = client
                .state
                .as_deref()
                .and_then(state_by_name)
                .map(|s| s.place_of_supply())
                .unwrap_or_else(|| firm.place_of_supply());
            Some(place)
        });

        Ok(Invoice {
            id: String::new(),
            invoice_number: self.number,
            client_id: client.id,
            company_id: self.company.map(|c| c.id),
            invoice_date: self.invoice_date,
            due_date: self.due_date.unwrap_or(self.invoice_date),
            place_of_supply,
            items,
            subtotal: totals.subtotal,
            cgst: totals.cgst,
            sgst: totals.sgst,
            igst: totals.igst,
            tax_mode: mode,
            total: totals.total,
            status: self.status,
            created_at: None,
        })
    }
}

/// Builder for a [`Company`] record.
pub struct CompanyBuilder {
    company: Company,
}

impl CompanyBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            company: Company {
                id: String::new(),
                name: name.into(),
                address: None,
                gstin: None,
                msme_number: None,
                created_at: None,
            },
        }
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.company.address = Some(address.into());
        self
    }

    pub fn gstin(mut self, gstin: impl Into<String>) -> Self {
        self.company.gstin = Some(gstin.into());
        self
    }

    pub fn msme_number(mut self, number: impl Into<String>) -> Self {
        self.company.msme_number = Some(number.into());
        self
    }

    pub fn build(self) -> Company {
        self.company
    }
}

/// Builder for a [`Client`] record.
pub struct ClientBuilder {
    client: Client,
}

impl ClientBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            client: Client {
                id: String::new(),
                name: name.into(),
                gstin: None,
                address: None,
                city: None,
                state: None,
                pincode: None,
                gst_treatment: None,
                contact: Contact::default(),
                created_at: None,
            },
        }
    }

    pub fn gstin(mut self, gstin: impl Into<String>) -> Self {
        self.client.gstin = Some(gstin.into());
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.client.address = Some(address.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.client.city = Some(city.into());
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.client.state = Some(state.into());
        self
    }

    pub fn pincode(mut self, pincode: impl Into<String>) -> Self {
        self.client.pincode = Some(pincode.into());
        self
    }

    pub fn gst_treatment(mut self, treatment: GstTreatment) -> Self {
        self.client.gst_treatment = Some(treatment);
        self
    }

    pub fn contact(
        mut self,
        name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
    ) -> Self {
        self.client.contact = Contact { name, email, phone };
        self
    }

    pub fn build(self) -> Client {
        self.client
    }
}

/// Builder for a [`LineItem`]; GST rates default to CGST 9 % + SGST 9 %.
pub struct LineItemBuilder {
    item: LineItem,
}

impl LineItemBuilder {
    pub fn new(description: impl Into<String>, quantity: Decimal, rate: Decimal) -> Self {
        Self {
            item: LineItem {
                description: description.into(),
                quantity,
                rate,
                ..LineItem::default()
            },
        }
    }

    /// Start from raw form input; unparseable or negative numbers become zero.
    pub fn from_input(description: impl Into<String>, quantity: &str, rate: &str) -> Self {
        Self::new(
            description,
            parse_non_negative_or_zero(quantity),
            parse_non_negative_or_zero(rate),
        )
    }

    pub fn detailed_description(mut self, text: impl Into<String>) -> Self {
        self.item.detailed_description = Some(text.into());
        self
    }

    pub fn hsn_sac(mut self, code: impl Into<String>) -> Self {
        self.item.hsn_sac = Some(code.into());
        self
    }

    /// CGST and SGST rates in percent.
    pub fn gst(mut self, cgst_percent: Decimal, sgst_percent: Decimal) -> Self {
        self.item.cgst_percent = cgst_percent;
        self.item.sgst_percent = sgst_percent;
        self
    }

    /// IGST rate override for inter-state supply.
    pub fn igst(mut self, igst_percent: Decimal) -> Self {
        self.item.igst_percent = Some(igst_percent);
        self
    }

    pub fn build(self) -> LineItem {
        self.item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn client_required() {
        let err = InvoiceBuilder::new("DL/01/2024-25/1", date())
            .add_line(LineItemBuilder::new("x", dec!(1), dec!(1)).build())
            .build()
            .unwrap_err();
        assert!(matches!(err, BijakError::Builder(_)));
    }

    #[test]
    fn items_required() {
        let client = ClientBuilder::new("Acme").build();
        let err = InvoiceBuilder::new("DL/01/2024-25/1", date())
            .client(&client)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("line item"));
    }

    #[test]
    fn defaults_for_intra_state() {
        let client = ClientBuilder::new("Acme").state("Delhi").build();
        let inv = InvoiceBuilder::new("DL/01/2024-25/1", date())
            .client(&client)
            .add_line(LineItemBuilder::new("Consulting", dec!(1), dec!(10000)).build())
            .build()
            .unwrap();
        assert_eq!(inv.tax_mode, TaxMode::IntraState);
        assert_eq!(inv.due_date, date());
        assert_eq!(inv.place_of_supply.as_deref(), Some("Delhi (07)"));
        assert_eq!(inv.items[0].amount, Some(dec!(10000)));
        assert_eq!(inv.total, dec!(11800));
        assert_eq!(inv.status, InvoiceStatus::Draft);
        assert_eq!(inv.company_id, None);
    }

    #[test]
    fn unknown_client_state_falls_back_to_firm_place() {
        let client = ClientBuilder::new("Overseas").state("Nowhere").build();
        let inv = InvoiceBuilder::new("DL/01/2024-25/1", date())
            .client(&client)
            .add_line(LineItemBuilder::new("Consulting", dec!(1), dec!(100)).build())
            .build()
            .unwrap();
        assert_eq!(inv.place_of_supply.as_deref(), Some("Delhi (07)"));
        assert!(inv.tax_mode.is_inter_state());
    }

    #[test]
    fn company_state_drives_mode() {
        let company = CompanyBuilder::new("Bengaluru Branch")
            .gstin("29AAGCB7383J1Z4")
            .build();
        let client = ClientBuilder::new("Delhi Client").state("Delhi").build();
        let inv = InvoiceBuilder::new("KA/01/2024-25/1", date())
            .company(&company)
            .client(&client)
            .add_line(LineItemBuilder::new("Audit", dec!(1), dec!(1000)).build())
            .build()
            .unwrap();
        assert_eq!(inv.tax_mode, TaxMode::InterState);
        assert_eq!(inv.igst, dec!(180));
    }

    #[test]
    fn validation_errors_collected() {
        let client = ClientBuilder::new("Acme").build();
        let err = InvoiceBuilder::new("", date())
            .client(&client)
            .due_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
            .add_line(LineItemBuilder::new("", dec!(1), dec!(1)).build())
            .build()
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("invoice_number"));
        assert!(msg.contains("due_date"));
        assert!(msg.contains("items.0.description"));
    }

    #[test]
    fn line_from_raw_input() {
        let item = LineItemBuilder::from_input("Widget", "2", "abc").build();
        assert_eq!(item.quantity, dec!(2));
        assert_eq!(item.rate, dec!(0));
        assert_eq!(item.cgst_percent, dec!(9));
        assert_eq!(item.sgst_percent, dec!(9));
    }

    #[test]
    fn client_contact() {
        let client = ClientBuilder::new("Acme")
            .gst_treatment(GstTreatment::Registered)
            .contact(Some("Asha".into()), Some("asha@example.com".into()), None)
            .build();
        assert_eq!(client.contact.name.as_deref(), Some("Asha"));
        assert!(client.gst_treatment.unwrap().is_registered());
    }
}
