//! Workflow service for buy/sell request validation and decisions.
//!
//! This module implements the pure rules of the approval workflow:
//! submission validation, derived totals, and the decision state machine.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use stockdesk_shared::Role;
use uuid::Uuid;

use crate::workflow::error::WorkflowError;
use crate::workflow::types::{NewTransaction, Transaction, TransactionStatus, WorkflowAction};

/// Longest accepted ticker symbol, in characters.
pub const MAX_SYMBOL_LEN: usize = 16;

/// Longest accepted company name, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// Decimal places kept for prices and totals.
pub const PRICE_SCALE: u32 = 8;

/// Integer digits stored for a unit price.
const PRICE_INTEGER_DIGITS: u32 = 16;

/// Integer digits stored for a total amount.
const TOTAL_INTEGER_DIGITS: u32 = 24;

/// Stateless service for validating and deciding transactions.
///
/// All methods are associated functions that validate inputs and
/// state transitions, returning the record or `WorkflowAction` to persist.
pub struct WorkflowService;

impl WorkflowService {
    /// Computes the derived total of a request.
    ///
    /// # Errors
    ///
    /// Returns `AmountTooLarge` if the product overflows or does not fit
    /// the stored total column.
    pub fn total_amount(quantity: i64, unit_price: Decimal) -> Result<Decimal, WorkflowError> {
        Decimal::from(quantity)
            .checked_mul(unit_price)
            .filter(|total| fits_integer_digits(*total, TOTAL_INTEGER_DIGITS))
            .ok_or(WorkflowError::AmountTooLarge)
    }

    /// Validate a submission and build the pending record.
    ///
    /// # Arguments
    /// * `input` - The caller's request
    /// * `now` - Creation timestamp
    ///
    /// # Returns
    /// * `Ok(Transaction)` in `Pending` status with an uppercase symbol
    /// * `Err(WorkflowError::MissingField)` if symbol or name is blank
    /// * `Err(WorkflowError::FieldTooLong)` if symbol or name exceeds its column
    /// * `Err(WorkflowError::InvalidQuantity)` if quantity is below 1
    /// * `Err(WorkflowError::NegativePrice)` if unit price is negative
    /// * `Err(WorkflowError::PricePrecision)` if unit price has more than
    ///   [`PRICE_SCALE`] decimal places
    /// * `Err(WorkflowError::AmountTooLarge)` if price or total is out of range
    pub fn prepare_submission(
        input: NewTransaction,
        now: DateTime<Utc>,
    ) -> Result<Transaction, WorkflowError> {
        let stock_symbol = input.stock_symbol.trim().to_uppercase();
        if stock_symbol.is_empty() {
            return Err(WorkflowError::MissingField("stock_symbol"));
        }
        check_length("stock_symbol", &stock_symbol, MAX_SYMBOL_LEN)?;

        let stock_name = input.stock_name.trim().to_string();
        if stock_name.is_empty() {
            return Err(WorkflowError::MissingField("stock_name"));
        }
        check_length("stock_name", &stock_name, MAX_NAME_LEN)?;

        if input.quantity < 1 {
            return Err(WorkflowError::InvalidQuantity(input.quantity));
        }

        if input.unit_price < Decimal::ZERO {
            return Err(WorkflowError::NegativePrice(input.unit_price));
        }

        if input.unit_price.normalize().scale() > PRICE_SCALE {
            return Err(WorkflowError::PricePrecision(input.unit_price));
        }

        if !fits_integer_digits(input.unit_price, PRICE_INTEGER_DIGITS) {
            return Err(WorkflowError::AmountTooLarge);
        }

        let total_amount = Self::total_amount(input.quantity, input.unit_price)?;

        Ok(Transaction {
            id: Uuid::now_v7(),
            owner_id: input.owner_id,
            stock_symbol,
            stock_name,
            kind: input.kind,
            quantity: input.quantity,
            unit_price: input.unit_price,
            total_amount,
            status: TransactionStatus::Pending,
            decided_by: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Approve a pending transaction.
    ///
    /// # Arguments
    /// * `current_status` - The current status of the transaction
    /// * `decided_by` - The admin approving the transaction
    ///
    /// # Returns
    /// * `Ok(WorkflowAction::Approve)` if the transition is valid
    /// * `Err(WorkflowError::InvalidTransition)` if not in Pending status
    pub fn approve(
        current_status: TransactionStatus,
        decided_by: Uuid,
    ) -> Result<WorkflowAction, WorkflowError> {
        match current_status {
            TransactionStatus::Pending => Ok(WorkflowAction::Approve {
                new_status: TransactionStatus::Approved,
                decided_by,
                decided_at: Utc::now(),
            }),
            _ => Err(WorkflowError::InvalidTransition {
                from: current_status,
                to: TransactionStatus::Approved,
            }),
        }
    }

    /// Reject a pending transaction.
    ///
    /// The reason is checked before the status, so a blank reason is a
    /// validation error regardless of the record's state.
    ///
    /// # Returns
    /// * `Ok(WorkflowAction::Reject)` if the transition is valid
    /// * `Err(WorkflowError::RejectionReasonRequired)` if reason is blank
    /// * `Err(WorkflowError::InvalidTransition)` if not in Pending status
    pub fn reject(
        current_status: TransactionStatus,
        decided_by: Uuid,
        rejection_reason: &str,
    ) -> Result<WorkflowAction, WorkflowError> {
        let rejection_reason = Self::require_reason(rejection_reason)?;

        match current_status {
            TransactionStatus::Pending => Ok(WorkflowAction::Reject {
                new_status: TransactionStatus::Rejected,
                decided_by,
                decided_at: Utc::now(),
                rejection_reason,
            }),
            _ => Err(WorkflowError::InvalidTransition {
                from: current_status,
                to: TransactionStatus::Rejected,
            }),
        }
    }

    /// Returns the trimmed reason, or `RejectionReasonRequired` if blank.
    pub fn require_reason(reason: &str) -> Result<String, WorkflowError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(WorkflowError::RejectionReasonRequired);
        }
        Ok(reason.to_string())
    }

    /// Check that a caller may decide on transactions.
    ///
    /// # Returns
    /// * `Ok(())` for admins
    /// * `Err(WorkflowError::AdminRequired)` otherwise
    pub fn authorize_decision(user_id: Uuid, role: Role) -> Result<(), WorkflowError> {
        if role.is_admin() {
            Ok(())
        } else {
            Err(WorkflowError::AdminRequired { user_id })
        }
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Pending → Approved (approve)
    /// - Pending → Rejected (reject)
    #[must_use]
    pub fn is_valid_transition(from: TransactionStatus, to: TransactionStatus) -> bool {
        matches!(
            (from, to),
            (
                TransactionStatus::Pending,
                TransactionStatus::Approved | TransactionStatus::Rejected
            )
        )
    }
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), WorkflowError> {
    if value.chars().count() > max {
        return Err(WorkflowError::FieldTooLong { field, max });
    }
    Ok(())
}

/// True when the integer part of `value` has at most `digits` digits.
fn fits_integer_digits(value: Decimal, digits: u32) -> bool {
    let limit = Decimal::from_i128_with_scale(10_i128.pow(digits), 0);
    value.abs() < limit
}
