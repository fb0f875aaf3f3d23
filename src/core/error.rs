use rust_decimal::Decimal;
use thiserror::Error;

use super::types::InvoiceStatus;

/// Errors that can occur during invoice construction or processing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BijakError {
    /// One or more validation rules failed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Builder encountered invalid or missing configuration.
    #[error("builder error: {0}")]
    Builder(String),

    /// Invoice number sequencing error.
    #[error("numbering error: {0}")]
    Numbering(String),

    /// Invoice totals or arithmetic inconsistency.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// A negative amount was passed where only non-negative amounts make sense
    /// (e.g. the amount-in-words line).
    #[error("amount must not be negative: {0}")]
    NegativeAmount(Decimal),

    /// Firm configuration is incomplete or inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// The persistence collaborator reported a failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// PDF or view-model rendering failed.
    #[error("render error: {0}")]
    Render(String),
}

impl BijakError {
    /// True if the underlying cause is a duplicate invoice number.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_conflict())
    }
}

/// Failures reported by an [`InvoiceStore`](crate::store::InvoiceStore)
/// or any other persistence collaborator.
///
/// "Not found" and "internal failure" are kept apart so callers can react
/// differently; a duplicate invoice number is its own recoverable category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// No record with this id exists.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind ("company", "client", "invoice").
        entity: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// The invoice number is already taken by a persisted invoice.
    #[error("invoice number {0} already exists")]
    DuplicateInvoiceNumber(String),

    /// Status change other than draft → paid.
    #[error("invoice {id} cannot move from {} to {}", from.code(), to.code())]
    InvalidStatusTransition {
        id: String,
        from: InvoiceStatus,
        to: InvoiceStatus,
    },

    /// The invoice breaks a record invariant (no items, totals off).
    #[error("invalid invoice: {0}")]
    InvalidInvoice(String),

    /// Storage-level failure (I/O, poisoned state, broken constraint).
    #[error("storage failure: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Duplicate invoice number; recoverable by regenerating the number.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::DuplicateInvoiceNumber(_))
    }
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "items.0.description").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    /// CGST Rules reference if applicable (e.g. "Rule 46(b)").
    pub rule: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(rule) = &self.rule {
            write!(f, "[{}] {}: {}", rule, self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

impl ValidationError {
    /// Create a validation error without a rule reference.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: None,
        }
    }

    /// Create a validation error with a CGST Rules reference.
    pub fn with_rule(
        field: impl Into<String>,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: Some(rule.into()),
        }
    }
}

/// Join validation errors into a single message, as carried by
/// [`BijakError::Validation`] and [`BijakError::Config`].
pub(crate) fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
