//! Configuration of the issuing firm.
//!
//! A [`FirmConfig`] carries everything about the supplier that is printed on
//! an invoice or needed for the jurisdiction decision: legal name, address,
//! home state, GSTIN, invoice series and standard texts.

use serde::{Deserialize, Serialize};

use super::error::{BijakError, ValidationError, join_errors};
use super::gstin::validate_gstin_format;
use super::numbering::InvoiceSeries;
use super::states::{IndianState, state_by_name};
use super::types::Company;

/// Bank account printed in the payment block of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    pub bank_name: String,
    pub branch: Option<String>,
    pub account_number: String,
    pub ifsc: String,
}

/// Supplier configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FirmConfig {
    pub name: String,
    /// Printed one per line under the name.
    pub address_lines: Vec<String>,
    /// Home state; a client whose state contains this name is intra-state.
    pub state: String,
    pub gstin: Option<String>,
    pub msme_number: Option<String>,
    pub bank: Option<BankDetails>,
    /// Free text printed above the terms, e.g. "Thanks for your business."
    pub notes: Option<String>,
    /// Terms & conditions, one clause per entry.
    pub terms: Vec<String>,
    /// Invoice number prefix before the financial year, e.g. "DL/01".
    pub invoice_series: String,
    /// e.g. "Due on Receipt".
    pub payment_terms: String,
}

impl Default for FirmConfig {
    fn default() -> Self {
        Self {
            name: "R Bhargava & Associates".into(),
            address_lines: vec![
                "247-B, MIG FLATS".into(),
                "RAJOURI GARDEN".into(),
                "NEW DELHI Delhi 110027".into(),
                "India".into(),
            ],
            state: "Delhi".into(),
            gstin: Some("07AAQFR3892K1ZE".into()),
            msme_number: None,
            bank: None,
            notes: Some("Thanks for your business.".into()),
            terms: vec![
                "Payment is due on the receipt of the bill".into(),
                "All Disputes shall be subject to Delhi Jurisdiction".into(),
            ],
            invoice_series: "DL/01".into(),
            payment_terms: "Due on Receipt".into(),
        }
    }
}

impl FirmConfig {
    /// The home state, if it names a known state or union territory.
    pub fn home_state(&self) -> Option<&'static IndianState> {
        state_by_name(&self.state)
    }

    /// Two-digit GST code of the home state.
    pub fn state_code(&self) -> Option<&'static str> {
        self.home_state().map(|s| s.gst_code)
    }

    /// Default place of supply, e.g. "Delhi (07)".
    pub fn place_of_supply(&self) -> String {
        match self.home_state() {
            Some(state) => state.place_of_supply(),
            None => self.state.clone(),
        }
    }

    pub fn series(&self) -> InvoiceSeries {
        InvoiceSeries::new(self.invoice_series.as_str())
    }

    /// Override identity fields from a stored company.
    ///
    /// The home state follows the company's GSTIN when it has a valid
    /// state code; otherwise the configured state is kept.
    pub fn with_company(&self, company: &Company) -> Self {
        let mut firm = self.clone();
        firm.name = company.name.clone();
        if let Some(address) = company.address.as_deref() {
            firm.address_lines = address
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect();
        }
        if company.gstin.is_some() {
            firm.gstin = company.gstin.clone();
        }
        if company.msme_number.is_some() {
            firm.msme_number = company.msme_number.clone();
        }
        if let Some(state) = company.gst_state() {
            firm.state = state.name.to_string();
        }
        firm
    }

    /// Check the configuration; all problems are reported, not just the first.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(ValidationError::new("name", "firm name must not be empty"));
        }

        let home = self.home_state();
        if home.is_none() {
            errors.push(ValidationError::new(
                "state",
                format!("'{}' is not an Indian state or union territory", self.state),
            ));
        }

        if let Some(gstin) = self.gstin.as_deref() {
            match validate_gstin_format(gstin) {
                Ok((registered, _)) => match home {
                    Some(home) if home.gst_code != registered.gst_code => {
                        errors.push(ValidationError::new(
                            "gstin",
                            format!(
                                "GSTIN is registered in {} but the firm state is {}",
                                registered.name, home.name
                            ),
                        ));
                    }
                    _ => {}
                },
                Err(e) => errors.push(ValidationError::new("gstin", e.to_string())),
            }
        }

        if self.series().prefix().is_empty() {
            errors.push(ValidationError::new(
                "invoice_series",
                "invoice series prefix must not be empty",
            ));
        }

        errors
    }
}

/// Builder for [`FirmConfig`]; starts from empty texts, not from the default firm.
pub struct FirmConfigBuilder {
    config: FirmConfig,
}

impl FirmConfigBuilder {
    pub fn new(name: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            config: FirmConfig {
                name: name.into(),
                address_lines: Vec::new(),
                state: state.into(),
                gstin: None,
                msme_number: None,
                bank: None,
                notes: None,
                terms: Vec::new(),
                invoice_series: InvoiceSeries::default().prefix().to_string(),
                payment_terms: "Due on Receipt".into(),
            },
        }
    }

    pub fn address_line(mut self, line: impl Into<String>) -> Self {
        self.config.address_lines.push(line.into());
        self
    }

    pub fn gstin(mut self, gstin: impl Into<String>) -> Self {
        self.config.gstin = Some(gstin.into());
        self
    }

    pub fn msme_number(mut self, number: impl Into<String>) -> Self {
        self.config.msme_number = Some(number.into());
        self
    }

    pub fn bank(mut self, bank: BankDetails) -> Self {
        self.config.bank = Some(bank);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.config.notes = Some(notes.into());
        self
    }

    pub fn term(mut self, term: impl Into<String>) -> Self {
        self.config.terms.push(term.into());
        self
    }

    pub fn invoice_series(mut self, prefix: impl Into<String>) -> Self {
        self.config.invoice_series = prefix.into();
        self
    }

    pub fn payment_terms(mut self, terms: impl Into<String>) -> Self {
        self.config.payment_terms = terms.into();
        self
    }

    /// Build and validate.
    pub fn build(self) -> Result<FirmConfig, BijakError> {
        let errors = self.config.validate();
        if !errors.is_empty() {
            return Err(BijakError::Config(join_errors(&errors)));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_firm_is_valid() {
        let firm = FirmConfig::default();
        assert!(firm.validate().is_empty(), "{:?}", firm.validate());
        assert_eq!(firm.state_code(), Some("07"));
        assert_eq!(firm.place_of_supply(), "Delhi (07)");
        assert_eq!(firm.series().prefix(), "DL/01");
    }

    #[test]
    fn builder_rejects_unknown_state() {
        let err = FirmConfigBuilder::new("X", "Atlantis").build().unwrap_err();
        assert!(matches!(err, BijakError::Config(ref m) if m.contains("state")));
    }

    #[test]
    fn gstin_must_match_state() {
        let err = FirmConfigBuilder::new("Pune Traders", "Karnataka")
            .gstin("27AAPFU0939F1ZV")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("Maharashtra"));

        let firm = FirmConfigBuilder::new("Pune Traders", "Maharashtra")
            .gstin("27AAPFU0939F1ZV")
            .invoice_series("MH/02")
            .term("Net 30")
            .build()
            .unwrap();
        assert_eq!(firm.series().prefix(), "MH/02");
        assert_eq!(firm.terms, vec!["Net 30".to_string()]);
    }

    #[test]
    fn company_overrides_identity() {
        let company = Company {
            id: "c1".into(),
            name: "Bengaluru Branch".into(),
            address: Some("12 MG Road\n\nBengaluru 560001".into()),
            gstin: Some("29AAGCB7383J1Z4".into()),
            msme_number: None,
            created_at: None,
        };
        let firm = FirmConfig::default().with_company(&company);
        assert_eq!(firm.name, "Bengaluru Branch");
        assert_eq!(firm.state, "Karnataka");
        assert_eq!(firm.address_lines, vec!["12 MG Road", "Bengaluru 560001"]);
        // texts survive
        assert_eq!(firm.payment_terms, "Due on Receipt");
    }

    #[test]
    fn deserializes_with_defaults() {
        let firm: FirmConfig = serde_json::from_str(r#"{"name":"Solo","state":"Goa"}"#).unwrap();
        assert_eq!(firm.name, "Solo");
        assert_eq!(firm.state, "Goa");
        assert_eq!(firm.invoice_series, "DL/01");
    }
}
