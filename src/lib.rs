//! # bijak
//!
//! Indian GST invoicing: intra-state (CGST + SGST) and inter-state (IGST)
//! tax computation, amounts in Indian-numbering words, financial-year
//! invoice numbering, and PDF rendering of tax invoices.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use bijak::core::*;
//! use rust_decimal_macros::dec;
//!
//! let client = ClientBuilder::new("Acme Pvt Ltd").state("Delhi").build();
//! let invoice = InvoiceBuilder::new("DL/01/2024-25/1", NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
//!     .client(&client)
//!     .add_line(LineItemBuilder::new("Consulting", dec!(1), dec!(10000)).build())
//!     .build()
//!     .unwrap();
//!
//! assert!(validate_invoice(&invoice).is_empty());
//! assert_eq!(invoice.cgst, dec!(900));
//! assert_eq!(invoice.total, dec!(11800));
//! assert_eq!(
//!     legal_amount_line(invoice.total).unwrap(),
//!     "Indian Rupee Eleven Thousand Eight Hundred Only"
//! );
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Types, tax computation, words, numbering, validation |
//! | `store` | `InvoiceStore` trait, in-memory store, invoice issuing, dashboard |
//! | `render` | Invoice view-model, INR formatting, PDF output |
//! | `remote` | Async client for a remote numbering endpoint |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "store")]
pub mod store;

#[cfg(feature = "render")]
pub mod render;

#[cfg(feature = "remote")]
pub mod remote;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
