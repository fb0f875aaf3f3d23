//! Client for a remote invoice-numbering endpoint.
//!
//! The server answers `GET <base>/api/invoices/generate-number` with
//! `{"invoiceNumber": "DL/01/2024-25/8"}` on success and
//! `{"error": "..."}` with a non-2xx status on failure.

use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::{FinancialYear, GeneratedNumber, InvoiceSeries};

/// Path of the numbering endpoint relative to the base URL.
pub const GENERATE_NUMBER_PATH: &str = "/api/invoices/generate-number";

/// Request timeout for the numbering call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Error from the remote numbering service.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum RemoteError {
    /// Network or HTTP error.
    Network(String),
    /// The service answered with an error.
    ApiError(String),
    /// Failed to parse the response.
    ParseError(String),
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(e) => write!(f, "numbering service network error: {e}"),
            Self::ApiError(e) => write!(f, "numbering service error: {e}"),
            Self::ParseError(e) => write!(f, "numbering service parse error: {e}"),
        }
    }
}

impl std::error::Error for RemoteError {}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateNumberResponse {
    invoice_number: Option<String>,
    error: Option<String>,
}

/// Extract the invoice number from a response body.
pub fn parse_number_response(body: &str) -> Result<String, RemoteError> {
    let resp: GenerateNumberResponse =
        serde_json::from_str(body).map_err(|e| RemoteError::ParseError(e.to_string()))?;

    if let Some(error) = resp.error {
        return Err(RemoteError::ApiError(error));
    }
    resp.invoice_number
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| RemoteError::ParseError("response has no invoiceNumber".into()))
}

/// Ask the service at `base_url` for the next invoice number.
///
/// # Errors
///
/// Returns `RemoteError::Network` on connection issues or timeout,
/// `RemoteError::ApiError` on a non-success status or an `error` body,
/// `RemoteError::ParseError` on unexpected response formats.
pub async fn fetch_invoice_number(base_url: &str) -> Result<String, RemoteError> {
    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| RemoteError::Network(e.to_string()))?;

    let url = format!("{}{GENERATE_NUMBER_PATH}", base_url.trim_end_matches('/'));
    let resp = client
        .get(&url)
        .send()
        .await
        .map_err(|e| RemoteError::Network(e.to_string()))?;

    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| RemoteError::Network(e.to_string()))?;

    if !status.is_success() {
        let detail = parse_number_response(&body)
            .err()
            .and_then(|e| match e {
                RemoteError::ApiError(msg) => Some(msg),
                _ => None,
            })
            .unwrap_or(body);
        return Err(RemoteError::ApiError(format!("HTTP {status}: {detail}")));
    }

    parse_number_response(&body)
}

/// Like [`fetch_invoice_number`], but falls back to the first number of the
/// financial year when the service cannot be reached.
pub async fn fetch_or_fallback(
    base_url: &str,
    series: &InvoiceSeries,
    today: NaiveDate,
) -> GeneratedNumber {
    match fetch_invoice_number(base_url).await {
        Ok(number) => GeneratedNumber {
            number,
            degraded: false,
        },
        Err(e) => {
            let number = series.fallback(FinancialYear::from_date(today));
            tracing::warn!(error = %e, %number, "numbering service unavailable, using fallback number");
            GeneratedNumber {
                number,
                degraded: true,
            }
        }
    }
}
