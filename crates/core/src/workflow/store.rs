//! Persistence seam for transaction records.

use async_trait::async_trait;
use stockdesk_shared::types::PageRequest;
use uuid::Uuid;

use crate::workflow::error::WorkflowError;
use crate::workflow::types::{Transaction, TransactionFilter, WorkflowAction};

/// Storage for transaction records.
///
/// Implementations never delete records. Decision fields are only ever
/// written through [`TransactionStore::decide_if_pending`].
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Persists a freshly submitted record.
    async fn insert(&self, transaction: Transaction) -> Result<Transaction, WorkflowError>;

    /// Loads a record by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Transaction>, WorkflowError>;

    /// Applies `action` only if the record is still `Pending`.
    ///
    /// This is a compare-and-set: the status check and the write happen
    /// atomically. Returns the updated record, or `None` when the record
    /// is missing or no longer pending.
    async fn decide_if_pending(
        &self,
        id: Uuid,
        action: &WorkflowAction,
    ) -> Result<Option<Transaction>, WorkflowError>;

    /// Lists matching records newest-first (`created_at`, then `id`, descending).
    async fn list(
        &self,
        filter: &TransactionFilter,
        page: Option<PageRequest>,
    ) -> Result<Vec<Transaction>, WorkflowError>;

    /// Counts matching records.
    async fn count(&self, filter: &TransactionFilter) -> Result<u64, WorkflowError>;
}
