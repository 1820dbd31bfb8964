//! Workflow error types for buy/sell request management.
//!
//! This module defines all error types that can occur during
//! submission, decisions, and queries.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::workflow::types::TransactionStatus;

/// Coarse classification a caller can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing input; fix the input and retry.
    Validation,
    /// The referenced transaction does not exist.
    NotFound,
    /// The transaction is no longer pending; refetch it.
    InvalidState,
    /// The caller lacks the required role.
    Authorization,
    /// Storage failure.
    Internal,
}

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A required field was missing or blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A text field is longer than its stored column.
    #[error("{field} must be at most {max} characters")]
    FieldTooLong {
        /// The offending field.
        field: &'static str,
        /// Maximum length in characters.
        max: usize,
    },

    /// Quantity below one share.
    #[error("Quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),

    /// Negative unit price.
    #[error("Unit price must not be negative, got {0}")]
    NegativePrice(Decimal),

    /// Unit price with more decimal places than are stored.
    #[error("Unit price must have at most 8 decimal places, got {0}")]
    PricePrecision(Decimal),

    /// Unit price or derived total outside the stored range.
    #[error("Unit price or total amount is too large")]
    AmountTooLarge,

    /// Unknown transaction type string.
    #[error("Transaction type must be buy or sell, got '{0}'")]
    InvalidKind(String),

    /// Unknown status string.
    #[error("Status must be pending, approved or rejected, got '{0}'")]
    InvalidStatus(String),

    /// Rejection reason is required but not provided.
    #[error("Rejection reason is required")]
    RejectionReasonRequired,

    /// Transaction not found.
    #[error("Transaction {0} not found")]
    TransactionNotFound(Uuid),

    /// Attempted a transition out of a non-pending state.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: TransactionStatus,
        /// The attempted target status.
        to: TransactionStatus,
    },

    /// Caller is not an admin.
    #[error("User {user_id} is not an admin")]
    AdminRequired {
        /// The user who attempted the operation.
        user_id: Uuid,
    },

    /// Store error.
    #[error("Store error: {0}")]
    Store(String),
}

impl WorkflowError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingField(_)
            | Self::FieldTooLong { .. }
            | Self::InvalidQuantity(_)
            | Self::NegativePrice(_)
            | Self::PricePrecision(_)
            | Self::AmountTooLarge
            | Self::InvalidKind(_)
            | Self::InvalidStatus(_)
            | Self::RejectionReasonRequired => ErrorKind::Validation,
            Self::TransactionNotFound(_) => ErrorKind::NotFound,
            Self::InvalidTransition { .. } => ErrorKind::InvalidState,
            Self::AdminRequired { .. } => ErrorKind::Authorization,
            Self::Store(_) => ErrorKind::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::Authorization => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::InvalidState => 409,
            ErrorKind::Internal => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::FieldTooLong { .. } => "FIELD_TOO_LONG",
            Self::InvalidQuantity(_) => "INVALID_QUANTITY",
            Self::NegativePrice(_) => "NEGATIVE_PRICE",
            Self::PricePrecision(_) => "INVALID_PRICE_PRECISION",
            Self::AmountTooLarge => "AMOUNT_TOO_LARGE",
            Self::InvalidKind(_) => "INVALID_TRANSACTION_TYPE",
            Self::InvalidStatus(_) => "INVALID_STATUS",
            Self::RejectionReasonRequired => "REJECTION_REASON_REQUIRED",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::AdminRequired { .. } => "ADMIN_REQUIRED",
            Self::Store(_) => "STORE_ERROR",
        }
    }
}
