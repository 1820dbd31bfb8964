//! Transaction workflow engine.
//!
//! The engine is the only writer of `status`, `decided_by`,
//! `rejection_reason` and `total_amount`. It owns no state of its own;
//! the store handle is injected at composition time.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::workflow::error::WorkflowError;
use crate::workflow::service::WorkflowService;
use crate::workflow::store::TransactionStore;
use crate::workflow::types::{NewTransaction, Transaction, TransactionStatus, WorkflowAction};

/// Submits and decides buy/sell requests against a [`TransactionStore`].
#[derive(Clone)]
pub struct TransactionEngine {
    store: Arc<dyn TransactionStore>,
}

impl std::fmt::Debug for TransactionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionEngine").finish_non_exhaustive()
    }
}

impl TransactionEngine {
    /// Creates an engine over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Self { store }
    }

    /// Submits a new request in `Pending` status.
    ///
    /// Nothing is persisted unless every field validates.
    pub async fn submit(&self, input: NewTransaction) -> Result<Transaction, WorkflowError> {
        let transaction = WorkflowService::prepare_submission(input, Utc::now())?;
        let saved = self.store.insert(transaction).await?;

        info!(
            transaction_id = %saved.id,
            owner_id = %saved.owner_id,
            symbol = %saved.stock_symbol,
            kind = %saved.kind,
            quantity = saved.quantity,
            total = %saved.total_amount,
            "Transaction submitted"
        );

        Ok(saved)
    }

    /// Approves a pending request.
    ///
    /// # Errors
    ///
    /// - `TransactionNotFound` if no such transaction exists
    /// - `InvalidTransition` if it is not pending, including when a
    ///   concurrent decision won the race
    pub async fn approve(
        &self,
        transaction_id: Uuid,
        acting_admin_id: Uuid,
    ) -> Result<Transaction, WorkflowError> {
        self.decide(transaction_id, |status| {
            WorkflowService::approve(status, acting_admin_id)
        })
        .await
    }

    /// Rejects a pending request with a non-blank reason.
    ///
    /// # Errors
    ///
    /// - `RejectionReasonRequired` if `reason` is blank; checked before
    ///   the store is touched
    /// - `TransactionNotFound` / `InvalidTransition` as for [`Self::approve`]
    pub async fn reject(
        &self,
        transaction_id: Uuid,
        acting_admin_id: Uuid,
        reason: &str,
    ) -> Result<Transaction, WorkflowError> {
        let reason = WorkflowService::require_reason(reason)?;
        self.decide(transaction_id, |status| {
            WorkflowService::reject(status, acting_admin_id, &reason)
        })
        .await
    }

    async fn decide<F>(&self, transaction_id: Uuid, build: F) -> Result<Transaction, WorkflowError>
    where
        F: FnOnce(TransactionStatus) -> Result<WorkflowAction, WorkflowError>,
    {
        let current = self
            .store
            .find_by_id(transaction_id)
            .await?
            .ok_or(WorkflowError::TransactionNotFound(transaction_id))?;

        let action = build(current.status)?;

        if let Some(updated) = self.store.decide_if_pending(transaction_id, &action).await? {
            info!(
                transaction_id = %transaction_id,
                decided_by = %action.decided_by(),
                status = %updated.status,
                "Transaction decided"
            );
            return Ok(updated);
        }

        // Lost the compare-and-set; report what is there now.
        let latest = self
            .store
            .find_by_id(transaction_id)
            .await?
            .ok_or(WorkflowError::TransactionNotFound(transaction_id))?;

        warn!(
            transaction_id = %transaction_id,
            attempted = %action.new_status(),
            current = %latest.status,
            "Concurrent decision already recorded"
        );

        Err(WorkflowError::InvalidTransition {
            from: latest.status,
            to: action.new_status(),
        })
    }
}
