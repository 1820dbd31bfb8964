//! Workflow domain types for buy/sell request management.
//!
//! This module defines the transaction record, its lifecycle status,
//! and the decision actions that move it out of `Pending`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Transaction status in the approval workflow.
///
/// The valid transitions are:
/// - Pending → Approved (approve)
/// - Pending → Rejected (reject)
///
/// `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Submitted by its owner and awaiting an admin decision.
    Pending,
    /// Approved by an admin (terminal).
    Approved,
    /// Rejected by an admin with a reason (terminal).
    Rejected,
}

impl TransactionStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true once a decision has been recorded.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Side of the requested trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Buy shares.
    Buy,
    /// Sell shares.
    Sell,
}

impl TransactionKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }

    /// Parses a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Some(Self::Buy),
            "sell" => Some(Self::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A buy/sell request and its decision audit trail.
///
/// Records are built by [`WorkflowService::prepare_submission`] and only
/// changed afterwards by a store applying a [`WorkflowAction`].
/// `total_amount` is always `quantity * unit_price`.
///
/// [`WorkflowService::prepare_submission`]: crate::workflow::WorkflowService::prepare_submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Time-ordered identifier.
    pub id: Uuid,
    /// The user who submitted the request.
    pub owner_id: Uuid,
    /// Uppercase ticker symbol.
    pub stock_symbol: String,
    /// Descriptive company name.
    pub stock_name: String,
    /// Buy or sell.
    pub kind: TransactionKind,
    /// Number of shares, at least 1.
    pub quantity: i64,
    /// Price per share supplied by the caller at submission time.
    pub unit_price: Decimal,
    /// `quantity * unit_price`.
    pub total_amount: Decimal,
    /// Lifecycle status.
    pub status: TransactionStatus,
    /// Admin who approved or rejected the request.
    pub decided_by: Option<Uuid>,
    /// Reason given on rejection.
    pub rejection_reason: Option<String>,
    /// When the request was submitted.
    pub created_at: DateTime<Utc>,
    /// When the record last changed.
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Returns true while the request awaits a decision.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == TransactionStatus::Pending
    }

    /// Writes the decision fields of `action` onto the record.
    ///
    /// Callers must have checked that the record is still pending.
    pub(crate) fn apply_decision(&mut self, action: &WorkflowAction) {
        self.status = action.new_status();
        self.decided_by = Some(action.decided_by());
        self.rejection_reason = action.rejection_reason().map(ToString::to_string);
        self.updated_at = action.decided_at();
    }
}

/// Input for submitting a new buy/sell request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// The submitting user.
    pub owner_id: Uuid,
    /// Ticker symbol in any case.
    pub stock_symbol: String,
    /// Descriptive company name.
    pub stock_name: String,
    /// Buy or sell.
    pub kind: TransactionKind,
    /// Number of shares.
    pub quantity: i64,
    /// Price per share.
    pub unit_price: Decimal,
}

/// Workflow action representing a decision with audit data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowAction {
    /// Approve a pending transaction.
    Approve {
        /// The new status after approval.
        new_status: TransactionStatus,
        /// The admin approving the transaction.
        decided_by: Uuid,
        /// When the transaction was approved.
        decided_at: DateTime<Utc>,
    },
    /// Reject a pending transaction.
    Reject {
        /// The new status after rejection.
        new_status: TransactionStatus,
        /// The admin rejecting the transaction.
        decided_by: Uuid,
        /// When the transaction was rejected.
        decided_at: DateTime<Utc>,
        /// The reason for rejection.
        rejection_reason: String,
    },
}

impl WorkflowAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> TransactionStatus {
        match self {
            Self::Approve { new_status, .. } | Self::Reject { new_status, .. } => *new_status,
        }
    }

    /// Returns the deciding admin.
    #[must_use]
    pub fn decided_by(&self) -> Uuid {
        match self {
            Self::Approve { decided_by, .. } | Self::Reject { decided_by, .. } => *decided_by,
        }
    }

    /// Returns the decision timestamp.
    #[must_use]
    pub fn decided_at(&self) -> DateTime<Utc> {
        match self {
            Self::Approve { decided_at, .. } | Self::Reject { decided_at, .. } => *decided_at,
        }
    }

    /// Returns the rejection reason, if this is a rejection.
    #[must_use]
    pub fn rejection_reason(&self) -> Option<&str> {
        match self {
            Self::Approve { .. } => None,
            Self::Reject {
                rejection_reason, ..
            } => Some(rejection_reason),
        }
    }
}

/// Optional-field filter for listing transactions.
///
/// Each `None` field matches everything; an empty filter matches all records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Only transactions in this status.
    pub status: Option<TransactionStatus>,
    /// Only transactions submitted by this user.
    pub owner_id: Option<Uuid>,
}

impl TransactionFilter {
    /// Filter matching every transaction of one owner.
    #[must_use]
    pub const fn for_owner(owner_id: Uuid) -> Self {
        Self {
            status: None,
            owner_id: Some(owner_id),
        }
    }

    /// Returns true if the transaction satisfies every set field.
    #[must_use]
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.status.is_none_or(|s| transaction.status == s)
            && self.owner_id.is_none_or(|o| transaction.owner_id == o)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample(owner_id: Uuid, status: TransactionStatus) -> Transaction {
        let now = Utc::now();
        Transaction {
            id: Uuid::now_v7(),
            owner_id,
            stock_symbol: "MSFT".to_string(),
            stock_name: "Microsoft".to_string(),
            kind: TransactionKind::Sell,
            quantity: 2,
            unit_price: dec!(400),
            total_amount: dec!(800),
            status,
            decided_by: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_status_as_str() {
        assert_eq!(TransactionStatus::Pending.as_str(), "pending");
        assert_eq!(TransactionStatus::Approved.as_str(), "approved");
        assert_eq!(TransactionStatus::Rejected.as_str(), "rejected");
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!(
            TransactionStatus::parse("pending"),
            Some(TransactionStatus::Pending)
        );
        assert_eq!(
            TransactionStatus::parse("APPROVED"),
            Some(TransactionStatus::Approved)
        );
        assert_eq!(
            TransactionStatus::parse(" Rejected "),
            Some(TransactionStatus::Rejected)
        );
        assert_eq!(TransactionStatus::parse("draft"), None);
    }

    #[test]
    fn test_status_terminal() {
        assert!(!TransactionStatus::Pending.is_terminal());
        assert!(TransactionStatus::Approved.is_terminal());
        assert!(TransactionStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_kind_parse_and_display() {
        assert_eq!(TransactionKind::parse("BUY"), Some(TransactionKind::Buy));
        assert_eq!(TransactionKind::parse("sell"), Some(TransactionKind::Sell));
        assert_eq!(TransactionKind::parse("short"), None);
        assert_eq!(format!("{}", TransactionKind::Sell), "sell");
    }

    #[test]
    fn test_serde_wire_forms() {
        assert_eq!(
            serde_json::to_string(&TransactionStatus::Approved).unwrap(),
            "\"approved\""
        );
        assert_eq!(
            serde_json::to_string(&TransactionKind::Buy).unwrap(),
            "\"buy\""
        );
    }

    #[test]
    fn test_apply_reject_decision() {
        let mut tx = sample(Uuid::new_v4(), TransactionStatus::Pending);
        let admin = Uuid::new_v4();
        let decided_at = Utc::now();

        tx.apply_decision(&WorkflowAction::Reject {
            new_status: TransactionStatus::Rejected,
            decided_by: admin,
            decided_at,
            rejection_reason: "Insufficient funds".to_string(),
        });

        assert_eq!(tx.status, TransactionStatus::Rejected);
        assert_eq!(tx.decided_by, Some(admin));
        assert_eq!(tx.rejection_reason.as_deref(), Some("Insufficient funds"));
        assert_eq!(tx.updated_at, decided_at);
    }

    #[test]
    fn test_filter_matches() {
        let owner = Uuid::new_v4();
        let tx = sample(owner, TransactionStatus::Pending);

        assert!(TransactionFilter::default().matches(&tx));
        assert!(TransactionFilter::for_owner(owner).matches(&tx));
        assert!(!TransactionFilter::for_owner(Uuid::new_v4()).matches(&tx));

        let approved_only = TransactionFilter {
            status: Some(TransactionStatus::Approved),
            owner_id: Some(owner),
        };
        assert!(!approved_only.matches(&tx));
    }
}
