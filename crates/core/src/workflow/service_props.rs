//! Property-based tests for WorkflowService.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::workflow::error::WorkflowError;
use crate::workflow::service::WorkflowService;
use crate::workflow::types::{NewTransaction, TransactionKind, TransactionStatus};

fn arb_status() -> impl Strategy<Value = TransactionStatus> {
    prop_oneof![
        Just(TransactionStatus::Pending),
        Just(TransactionStatus::Approved),
        Just(TransactionStatus::Rejected),
    ]
}

fn arb_terminal_status() -> impl Strategy<Value = TransactionStatus> {
    prop_oneof![
        Just(TransactionStatus::Approved),
        Just(TransactionStatus::Rejected),
    ]
}

fn arb_kind() -> impl Strategy<Value = TransactionKind> {
    prop_oneof![Just(TransactionKind::Buy), Just(TransactionKind::Sell)]
}

fn arb_uuid() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

/// Prices with cent precision, 0.00 through 99_999.99.
fn arb_price() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_blank() -> impl Strategy<Value = String> {
    "[ \t\n]{0,8}"
}

fn arb_order() -> impl Strategy<Value = NewTransaction> {
    (
        arb_uuid(),
        "[a-zA-Z]{1,5}",
        "[A-Za-z][A-Za-z ]{0,30}",
        arb_kind(),
        1i64..1_000_000,
        arb_price(),
    )
        .prop_map(
            |(owner_id, stock_symbol, stock_name, kind, quantity, unit_price)| NewTransaction {
                owner_id,
                stock_symbol,
                stock_name,
                kind,
                quantity,
                unit_price,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Accepted submissions are pending, undecided and correctly totalled.
    #[test]
    fn prop_submission_is_pending_with_derived_total(input in arb_order()) {
        let expected_total = Decimal::from(input.quantity) * input.unit_price;
        let expected_symbol = input.stock_symbol.to_uppercase();

        let tx = WorkflowService::prepare_submission(input, Utc::now()).unwrap();

        prop_assert_eq!(tx.status, TransactionStatus::Pending);
        prop_assert_eq!(tx.total_amount, expected_total);
        prop_assert_eq!(tx.stock_symbol, expected_symbol);
        prop_assert!(tx.decided_by.is_none());
        prop_assert!(tx.rejection_reason.is_none());
        prop_assert_eq!(tx.created_at, tx.updated_at);
    }

    /// Quantities below one are always refused.
    #[test]
    fn prop_non_positive_quantity_rejected(mut input in arb_order(), quantity in i64::MIN..1) {
        input.quantity = quantity;
        let result = WorkflowService::prepare_submission(input, Utc::now());
        prop_assert!(matches!(result, Err(WorkflowError::InvalidQuantity(q)) if q == quantity));
    }

    /// Negative prices are always refused.
    #[test]
    fn prop_negative_price_rejected(mut input in arb_order(), cents in 1i64..10_000_000) {
        input.unit_price = Decimal::new(-cents, 2);
        let result = WorkflowService::prepare_submission(input, Utc::now());
        prop_assert!(matches!(result, Err(WorkflowError::NegativePrice(_))), "expected NegativePrice");
    }

    /// Huge quantities and prices produce an exact total or a validation
    /// error, never a panic.
    #[test]
    fn prop_large_amounts_never_panic(
        mut input in arb_order(),
        quantity in 1i64..=i64::MAX,
        cents in 0i64..=i64::MAX,
    ) {
        input.quantity = quantity;
        input.unit_price = Decimal::new(cents, 2);

        match WorkflowService::prepare_submission(input, Utc::now()) {
            Ok(tx) => {
                let expected = Decimal::from(quantity).checked_mul(tx.unit_price);
                prop_assert_eq!(Some(tx.total_amount), expected);
            }
            Err(err) => prop_assert!(
                matches!(err, WorkflowError::AmountTooLarge),
                "unexpected error {}", err
            ),
        }
    }

    /// Decisions on a terminal record always fail with the current status.
    #[test]
    fn prop_terminal_status_cannot_be_decided(
        status in arb_terminal_status(),
        admin in arb_uuid(),
    ) {
        let approve = WorkflowService::approve(status, admin);
        prop_assert!(
            matches!(approve, Err(WorkflowError::InvalidTransition { from, .. }) if from == status),
            "approve from terminal must fail"
        );

        let reject = WorkflowService::reject(status, admin, "late");
        prop_assert!(
            matches!(reject, Err(WorkflowError::InvalidTransition { from, .. }) if from == status),
            "reject from terminal must fail"
        );
    }

    /// Blank reasons fail validation whatever the status.
    #[test]
    fn prop_blank_reason_always_rejected(
        status in arb_status(),
        admin in arb_uuid(),
        reason in arb_blank(),
    ) {
        let result = WorkflowService::reject(status, admin, &reason);
        prop_assert!(matches!(result, Err(WorkflowError::RejectionReasonRequired)), "blank reason accepted");
    }

    /// Decisions succeed exactly when the transition table allows them.
    #[test]
    fn prop_decisions_agree_with_transition_table(
        status in arb_status(),
        admin in arb_uuid(),
    ) {
        let approved = WorkflowService::approve(status, admin);
        prop_assert_eq!(
            approved.is_ok(),
            WorkflowService::is_valid_transition(status, TransactionStatus::Approved)
        );

        let rejected = WorkflowService::reject(status, admin, "risk limit");
        prop_assert_eq!(
            rejected.is_ok(),
            WorkflowService::is_valid_transition(status, TransactionStatus::Rejected)
        );

        if let Ok(action) = approved {
            prop_assert_eq!(action.decided_by(), admin);
        }
    }
}
