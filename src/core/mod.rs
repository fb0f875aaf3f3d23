//! Core invoice types, tax computation, validation, and numbering.
//!
//! This module provides the foundational types for Indian GST invoicing:
//! CGST + SGST for intra-state supply, IGST for inter-state supply, amounts
//! in Indian-numbering words and financial-year invoice numbers.

mod builder;
mod calculation;
mod error;
mod firm;
pub mod gstin;
mod numbering;
pub mod states;
mod types;
mod validation;
mod words;

pub use builder::*;
pub use calculation::*;
pub use error::*;
pub use firm::*;
pub use gstin::validate_gstin_format;
pub use numbering::*;
pub use states::{INDIAN_STATES, IndianState, is_known_state, state_by_code, state_by_name};
pub use types::*;
pub use validation::*;
pub use words::*;
